use crate::error::{AppError, Result};
use crate::models::User;
use crate::store::MemoryStore;
use tracing::{info, warn};
use uuid::Uuid;

/// Registration and lookup for users. Balances live on the user records but
/// are only ever mutated by the ledger engine.
pub struct UserService {
    store: MemoryStore,
}

impl UserService {
    pub fn new(store: MemoryStore) -> Self {
        Self { store }
    }

    pub async fn create_user(&self, name: &str) -> Result<User> {
        if name.trim().is_empty() {
            return Err(AppError::Validation("name cannot be empty".to_string()));
        }

        let user = User::new(name.trim().to_string());
        let mut tx = self.store.begin().await;
        tx.insert_user(user.clone());
        tx.commit();

        info!(user_id = %user.id, name = %user.name, "user registered");
        Ok(user)
    }

    pub async fn get_user(&self, id: Uuid) -> Result<User> {
        self.store
            .find_user(id)
            .await
            .ok_or_else(|| AppError::NotFound(format!("user '{id}' not found")))
    }

    pub async fn list_users(&self) -> Vec<User> {
        self.store.list_users().await
    }

    /// Removes a user. Refused while any transaction names them as buyer;
    /// a user who is only a borrower may be removed, leaving the pointing
    /// transactions to degrade gracefully.
    pub async fn delete_user(&self, id: Uuid) -> Result<()> {
        let mut tx = self.store.begin().await;
        let user = tx
            .user(id)
            .map_err(|_| AppError::NotFound(format!("user '{id}' not found")))?;

        if !user.is_settled() {
            warn!(user_id = %id, total_owed = %user.total_owed, "deleting user with open balances");
        }
        if tx.is_buyer_referenced(id) {
            return Err(AppError::Validation(format!(
                "user '{id}' is the buyer of existing transactions and cannot be deleted"
            )));
        }

        tx.remove_user(id);
        tx.commit();
        info!(user_id = %id, "user deleted");
        Ok(())
    }
}
