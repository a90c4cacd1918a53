//! API server state

use std::sync::Arc;
use std::time::Duration;

use crate::store::StoreGateway;

const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// API server state
#[derive(Clone)]
pub struct AppState {
    /// Store gateway shared by all handlers
    pub gateway: Arc<StoreGateway>,

    /// Upper bound on a whole request, store calls included
    pub request_timeout: Duration,
}

impl AppState {
    pub fn new(gateway: StoreGateway) -> Self {
        Self {
            gateway: Arc::new(gateway),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }
}
