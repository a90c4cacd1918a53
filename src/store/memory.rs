//! In-process user store

use async_trait::async_trait;
use dashmap::DashMap;

use crate::types::{User, UserId};
use crate::{Error, Result};

use super::UserStore;

/// Concurrent map keyed by user id
#[derive(Default)]
pub struct MemoryStore {
    users: DashMap<UserId, User>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    fn name(&self) -> &'static str {
        "memory"
    }

    async fn list(&self) -> Result<Vec<User>> {
        Ok(self.users.iter().map(|entry| entry.value().clone()).collect())
    }

    async fn insert(&self, user: &User) -> Result<()> {
        use dashmap::mapref::entry::Entry;

        match self.users.entry(user.id) {
            Entry::Occupied(_) => Err(Error::storage(format!(
                "duplicate key: {}",
                user.id.to_hex()
            ))),
            Entry::Vacant(slot) => {
                slot.insert(user.clone());
                Ok(())
            }
        }
    }

    async fn get(&self, id: &UserId) -> Result<User> {
        self.users
            .get(id)
            .map(|entry| entry.value().clone())
            .ok_or_else(|| Error::UserNotFound(id.to_hex()))
    }

    async fn replace(&self, user: &User) -> Result<()> {
        let mut stored = self
            .users
            .get_mut(&user.id)
            .ok_or_else(|| Error::UserNotFound(user.id.to_hex()))?;
        *stored = user.clone();
        Ok(())
    }

    async fn delete(&self, id: &UserId) -> Result<()> {
        self.users
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| Error::UserNotFound(id.to_hex()))
    }

    async fn ping(&self) -> Result<()> {
        Ok(())
    }
}
