use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

use crate::models::{Group, TransactionRecord, TransactionStatus, User};

/// Standard API response wrapper.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<ErrorResponse>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn error(error: ErrorResponse) -> ApiResponse<()> {
        ApiResponse {
            success: false,
            data: None,
            error: Some(error),
        }
    }
}

/// Error response structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
    pub details: Option<Vec<ValidationErrorDetail>>,
}

impl ErrorResponse {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: Vec<ValidationErrorDetail>) -> Self {
        self.details = Some(details);
        self
    }
}

/// Validation error detail.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationErrorDetail {
    pub field: String,
    pub message: String,
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: DateTime<Utc>,
}

/// User DTO: the aggregate net position plus the per-counterparty balances,
/// keyed by counterparty id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserResponse {
    pub id: Uuid,
    pub name: String,
    pub total_owed: Decimal,
    pub outstanding: BTreeMap<Uuid, Decimal>,
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            total_owed: user.total_owed,
            outstanding: user.outstanding,
            created_at: user.created_at,
        }
    }
}

/// A group member with its display name resolved.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupMember {
    pub id: Uuid,
    pub name: Option<String>,
}

/// Group DTO.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupResponse {
    pub id: Uuid,
    pub name: String,
    pub members: Vec<GroupMember>,
    pub created_at: DateTime<Utc>,
}

impl GroupResponse {
    /// Builds the DTO with member names resolved via `lookup`. A member that
    /// can no longer be resolved keeps its id with no name.
    pub fn resolved(group: Group, mut lookup: impl FnMut(Uuid) -> Option<String>) -> Self {
        let members = group
            .members
            .iter()
            .map(|id| GroupMember {
                id: *id,
                name: lookup(*id),
            })
            .collect();
        Self {
            id: group.id,
            name: group.name,
            members,
            created_at: group.created_at,
        }
    }
}

/// Transaction DTO. Name fields degrade gracefully: a deleted group shows up
/// as `"deleted"`, a deleted borrower as no name at all.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransactionResponse {
    pub id: Uuid,
    pub item: String,
    pub price: Decimal,
    pub status: TransactionStatus,
    pub buyer_id: Uuid,
    pub buyer_name: Option<String>,
    pub borrower_id: Option<Uuid>,
    pub borrower_name: Option<String>,
    pub group_id: Option<Uuid>,
    pub group_name: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TransactionResponse {
    /// Builds the DTO with party names resolved via the lookups.
    pub fn resolved(
        record: TransactionRecord,
        mut user_name: impl FnMut(Uuid) -> Option<String>,
        mut group_name: impl FnMut(Uuid) -> Option<String>,
    ) -> Self {
        let buyer_name = user_name(record.buyer_id);
        let borrower_id = record.borrower_id();
        let group_id = record.group_id();
        let borrower_name = borrower_id.and_then(&mut user_name);
        let group_name =
            group_id.map(|id| group_name(id).unwrap_or_else(|| "deleted".to_string()));

        Self {
            id: record.id,
            item: record.item,
            price: record.price,
            status: record.status,
            buyer_id: record.buyer_id,
            buyer_name,
            borrower_id,
            borrower_name,
            group_id,
            group_name,
            created_at: record.created_at,
            updated_at: record.updated_at,
        }
    }
}
