use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Validation error.
#[derive(Debug, Clone)]
pub struct ValidationError {
    pub field: String,
    pub message: String,
}

impl ValidationError {
    fn new(field: &str, message: &str) -> Self {
        Self {
            field: field.to_string(),
            message: message.to_string(),
        }
    }
}

/// Request to register a new user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateUserRequest {
    pub name: String,
}

impl CreateUserRequest {
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();
        if self.name.trim().is_empty() {
            errors.push(ValidationError::new("name", "name cannot be empty"));
        }
        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }
}

/// Request to create a new group with its initial member set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateGroupRequest {
    pub name: String,
    #[serde(default)]
    pub member_ids: Vec<Uuid>,
}

impl CreateGroupRequest {
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();
        if self.name.trim().is_empty() {
            errors.push(ValidationError::new("name", "name cannot be empty"));
        }
        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }
}

/// Request to record a purchase. Exactly one of `borrower_id`/`group_id`
/// must be set; that invariant is enforced where the record is built, so the
/// core rejects malformed bodies even if a caller skips validation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTransactionRequest {
    pub item: String,
    pub price: Decimal,
    pub buyer_id: Uuid,
    pub borrower_id: Option<Uuid>,
    pub group_id: Option<Uuid>,
}

impl CreateTransactionRequest {
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();
        if self.item.trim().is_empty() {
            errors.push(ValidationError::new("item", "item cannot be empty"));
        }
        if self.price < Decimal::ZERO {
            errors.push(ValidationError::new("price", "price cannot be negative"));
        }
        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }
}

/// Request to edit a transaction's price.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateTransactionPriceRequest {
    pub price: Decimal,
}

impl UpdateTransactionPriceRequest {
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();
        if self.price < Decimal::ZERO {
            errors.push(ValidationError::new("price", "price cannot be negative"));
        }
        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }
}
