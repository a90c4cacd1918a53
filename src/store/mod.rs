//! Store gateway
//!
//! All user persistence goes through [`StoreGateway`], which owns one
//! [`UserStore`] backend and bounds every operation with a timeout:
//! - `mongo`: MongoDB through the driver's connection pool
//! - `memory`: in-process map for development and tests

use async_trait::async_trait;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use crate::types::{User, UserId};
use crate::{Error, Result};

pub mod memory;
pub mod mongo;

pub use memory::MemoryStore;
pub use mongo::{MongoSettings, MongoStore};

/// User persistence backend
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Short backend name for logs and health output
    fn name(&self) -> &'static str;

    /// Fetch every stored user
    async fn list(&self) -> Result<Vec<User>>;

    /// Insert a new user
    async fn insert(&self, user: &User) -> Result<()>;

    /// Fetch exactly one user by id
    async fn get(&self, id: &UserId) -> Result<User>;

    /// Replace the stored record with the same id
    async fn replace(&self, user: &User) -> Result<()>;

    /// Remove a user by id
    async fn delete(&self, id: &UserId) -> Result<()>;

    /// Check that the backend is reachable
    async fn ping(&self) -> Result<()>;
}

/// Store configuration
#[derive(Debug, Clone)]
pub enum StoreConfig {
    Mongo(MongoSettings),
    Memory,
}

/// Create store backend from config
pub async fn create_store(config: StoreConfig) -> Result<Arc<dyn UserStore>> {
    match config {
        StoreConfig::Mongo(settings) => {
            let backend = MongoStore::connect(settings).await?;
            Ok(Arc::new(backend))
        }
        StoreConfig::Memory => Ok(Arc::new(MemoryStore::new())),
    }
}

/// Entry point for every store call made by the HTTP layer
#[derive(Clone)]
pub struct StoreGateway {
    backend: Arc<dyn UserStore>,
    operation_timeout: Duration,
}

impl StoreGateway {
    pub fn new(backend: Arc<dyn UserStore>, operation_timeout: Duration) -> Self {
        Self {
            backend,
            operation_timeout,
        }
    }

    /// Build the configured backend and probe it once.
    ///
    /// An unreachable MongoDB fails startup only when `require_on_startup`
    /// is set; otherwise the gateway starts degraded and requests report the
    /// store as unavailable until it comes back.
    pub async fn connect(config: StoreConfig, operation_timeout: Duration) -> Result<Self> {
        let require = match &config {
            StoreConfig::Mongo(settings) => settings.require_on_startup,
            StoreConfig::Memory => true,
        };

        let gateway = Self::new(create_store(config).await?, operation_timeout);

        match gateway.ping().await {
            Ok(()) => {
                tracing::info!(backend = gateway.backend_name(), "Store reachable");
            }
            Err(err) if require => return Err(err),
            Err(err) => {
                tracing::warn!(
                    backend = gateway.backend_name(),
                    error = %err,
                    "Store unreachable at startup; serving in degraded mode"
                );
            }
        }

        Ok(gateway)
    }

    pub fn backend_name(&self) -> &'static str {
        self.backend.name()
    }

    pub async fn list_users(&self) -> Result<Vec<User>> {
        self.bounded("list", self.backend.list()).await
    }

    pub async fn insert_user(&self, user: &User) -> Result<()> {
        self.bounded("insert", self.backend.insert(user)).await
    }

    pub async fn get_user(&self, id: &UserId) -> Result<User> {
        self.bounded("get", self.backend.get(id)).await
    }

    pub async fn replace_user(&self, user: &User) -> Result<()> {
        self.bounded("replace", self.backend.replace(user)).await
    }

    pub async fn delete_user(&self, id: &UserId) -> Result<()> {
        self.bounded("delete", self.backend.delete(id)).await
    }

    pub async fn ping(&self) -> Result<()> {
        self.bounded("ping", self.backend.ping()).await
    }

    async fn bounded<T>(
        &self,
        operation: &'static str,
        fut: impl Future<Output = Result<T>>,
    ) -> Result<T> {
        match tokio::time::timeout(self.operation_timeout, fut).await {
            Ok(result) => result,
            Err(_) => {
                let budget_ms = self.operation_timeout.as_millis() as u64;
                tracing::warn!(
                    operation,
                    backend = self.backend_name(),
                    budget_ms,
                    "Store operation timed out"
                );
                Err(Error::Timeout(budget_ms))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{now, NewUser};

    /// Backend whose every call outlives any reasonable timeout
    struct StalledStore;

    #[async_trait]
    impl UserStore for StalledStore {
        fn name(&self) -> &'static str {
            "stalled"
        }

        async fn list(&self) -> Result<Vec<User>> {
            tokio::time::sleep(Duration::from_secs(60)).await;
            Ok(Vec::new())
        }

        async fn insert(&self, _user: &User) -> Result<()> {
            tokio::time::sleep(Duration::from_secs(60)).await;
            Ok(())
        }

        async fn get(&self, id: &UserId) -> Result<User> {
            tokio::time::sleep(Duration::from_secs(60)).await;
            Err(Error::UserNotFound(id.to_hex()))
        }

        async fn replace(&self, _user: &User) -> Result<()> {
            tokio::time::sleep(Duration::from_secs(60)).await;
            Ok(())
        }

        async fn delete(&self, _id: &UserId) -> Result<()> {
            tokio::time::sleep(Duration::from_secs(60)).await;
            Ok(())
        }

        async fn ping(&self) -> Result<()> {
            Err(Error::unavailable("stalled backend"))
        }
    }

    #[tokio::test]
    async fn slow_operations_hit_the_timeout() {
        let gateway = StoreGateway::new(Arc::new(StalledStore), Duration::from_millis(20));

        let err = gateway.list_users().await.unwrap_err();
        assert!(matches!(err, Error::Timeout(20)));

        let err = gateway.get_user(&UserId::new()).await.unwrap_err();
        assert!(err.is_unavailable());
    }

    fn unreachable_mongo(require_on_startup: bool) -> StoreConfig {
        StoreConfig::Mongo(MongoSettings {
            uri: "mongodb://127.0.0.1:1".into(),
            database: "go-mongo-practice".into(),
            collection: "user".into(),
            max_pool_size: 2,
            min_pool_size: 0,
            connect_timeout: Duration::from_millis(100),
            server_selection_timeout: Duration::from_millis(100),
            require_on_startup,
        })
    }

    #[tokio::test]
    async fn unreachable_mongo_starts_degraded_unless_required() {
        let gateway = StoreGateway::connect(unreachable_mongo(false), Duration::from_secs(5))
            .await
            .expect("degraded start should succeed");
        assert_eq!(gateway.backend_name(), "mongo");
        assert!(gateway.ping().await.unwrap_err().is_unavailable());

        let result = StoreGateway::connect(unreachable_mongo(true), Duration::from_secs(5)).await;
        assert!(matches!(result, Err(Error::Unavailable(_))));
    }

    #[tokio::test]
    async fn memory_gateway_connects() {
        let gateway = StoreGateway::connect(StoreConfig::Memory, Duration::from_secs(1))
            .await
            .unwrap();
        assert_eq!(gateway.backend_name(), "memory");

        let user = User::create(NewUser::default(), now());
        gateway.insert_user(&user).await.unwrap();
        assert_eq!(gateway.get_user(&user.id).await.unwrap(), user);
    }
}
