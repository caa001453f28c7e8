use crate::error::{AppError, Result};
use crate::models::Group;
use crate::store::MemoryStore;
use tracing::info;
use uuid::Uuid;

/// Creation and lookup for groups. Membership is fixed at creation; every
/// member id must refer to a known user.
pub struct GroupService {
    store: MemoryStore,
}

impl GroupService {
    pub fn new(store: MemoryStore) -> Self {
        Self { store }
    }

    pub async fn create_group(&self, name: &str, member_ids: &[Uuid]) -> Result<Group> {
        if name.trim().is_empty() {
            return Err(AppError::Validation("name cannot be empty".to_string()));
        }

        let mut tx = self.store.begin().await;
        for member_id in member_ids {
            tx.user(*member_id)?;
        }

        let group = Group::new(name.trim().to_string(), member_ids.iter().copied());
        tx.insert_group(group.clone());
        tx.commit();

        info!(group_id = %group.id, name = %group.name, members = group.member_count(), "group created");
        Ok(group)
    }

    pub async fn get_group(&self, id: Uuid) -> Result<Group> {
        self.store
            .find_group(id)
            .await
            .ok_or_else(|| AppError::NotFound(format!("group '{id}' not found")))
    }

    pub async fn list_groups(&self) -> Vec<Group> {
        self.store.list_groups().await
    }

    /// Removes a group. Transactions that reference it stay live; their
    /// display and deletion paths degrade gracefully from here on.
    pub async fn delete_group(&self, id: Uuid) -> Result<()> {
        let mut tx = self.store.begin().await;
        if tx.remove_group(id).is_none() {
            return Err(AppError::NotFound(format!("group '{id}' not found")));
        }
        tx.commit();
        info!(group_id = %id, "group deleted");
        Ok(())
    }
}
