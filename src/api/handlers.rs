use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use std::collections::HashMap;
use uuid::Uuid;

use crate::api::requests::{
    CreateGroupRequest, CreateTransactionRequest, CreateUserRequest,
    UpdateTransactionPriceRequest, ValidationError,
};
use crate::api::responses::{
    ApiResponse, ErrorResponse, GroupResponse, HealthResponse, TransactionResponse, UserResponse,
    ValidationErrorDetail,
};
use crate::error::AppError;
use crate::services::{GroupService, LedgerEngine, NewTransaction, UserService};

use super::routes::AppState;

type ErrorReply = (StatusCode, Json<ApiResponse<()>>);

/// Maps a core error to its transport-level failure code. Every settlement
/// error is recoverable here; nothing crashes the process.
fn error_reply(err: AppError) -> ErrorReply {
    let (status, code) = match &err {
        AppError::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
        AppError::Validation(_) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
        AppError::UnknownUser(_) => (StatusCode::UNPROCESSABLE_ENTITY, "UNKNOWN_USER"),
        AppError::EmptyGroup(_) => (StatusCode::UNPROCESSABLE_ENTITY, "EMPTY_GROUP"),
        AppError::DanglingReference(_) => {
            (StatusCode::UNPROCESSABLE_ENTITY, "DANGLING_REFERENCE")
        }
        AppError::MalformedTransaction(_) => {
            (StatusCode::UNPROCESSABLE_ENTITY, "MALFORMED_TRANSACTION")
        }
        AppError::Unprocessable(_) => (StatusCode::UNPROCESSABLE_ENTITY, "UNPROCESSABLE"),
        AppError::Internal(_) => {
            tracing::error!("internal error: {err}");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::<()>::error(ErrorResponse::new(
                    "INTERNAL_ERROR",
                    "An internal error occurred",
                ))),
            );
        }
    };
    (
        status,
        Json(ApiResponse::<()>::error(ErrorResponse::new(
            code,
            err.to_string(),
        ))),
    )
}

fn validation_reply(errors: Vec<ValidationError>) -> ErrorReply {
    let details: Vec<ValidationErrorDetail> = errors
        .into_iter()
        .map(|e| ValidationErrorDetail {
            field: e.field,
            message: e.message,
        })
        .collect();
    (
        StatusCode::BAD_REQUEST,
        Json(ApiResponse::<()>::error(
            ErrorResponse::new("VALIDATION_ERROR", "Request validation failed")
                .with_details(details),
        )),
    )
}

/// Health check endpoint.
pub async fn health_check() -> Json<ApiResponse<HealthResponse>> {
    Json(ApiResponse::success(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now(),
    }))
}

/// Readiness check endpoint. The in-memory store is ready as soon as the
/// process is up.
pub async fn readiness_check() -> StatusCode {
    StatusCode::OK
}

/// Liveness check endpoint.
pub async fn liveness_check() -> StatusCode {
    StatusCode::OK
}

// ============================================================================
// User Handlers
// ============================================================================

/// Register a new user.
pub async fn create_user(
    State(state): State<AppState>,
    Json(request): Json<CreateUserRequest>,
) -> Result<(StatusCode, Json<ApiResponse<UserResponse>>), ErrorReply> {
    if let Err(errors) = request.validate() {
        return Err(validation_reply(errors));
    }

    let service = UserService::new(state.store.clone());
    let user = service.create_user(&request.name).await.map_err(error_reply)?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(UserResponse::from(user))),
    ))
}

/// List all users with their balances.
pub async fn list_users(
    State(state): State<AppState>,
) -> Json<ApiResponse<Vec<UserResponse>>> {
    let service = UserService::new(state.store.clone());
    let users = service
        .list_users()
        .await
        .into_iter()
        .map(UserResponse::from)
        .collect();
    Json(ApiResponse::success(users))
}

/// Get a single user by id.
pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<UserResponse>>, ErrorReply> {
    let service = UserService::new(state.store.clone());
    let user = service.get_user(id).await.map_err(error_reply)?;
    Ok(Json(ApiResponse::success(UserResponse::from(user))))
}

/// Delete a user. Refused while the user is the buyer of any transaction.
pub async fn delete_user(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<Uuid>>, ErrorReply> {
    let service = UserService::new(state.store.clone());
    service.delete_user(id).await.map_err(error_reply)?;
    Ok(Json(ApiResponse::success(id)))
}

// ============================================================================
// Group Handlers
// ============================================================================

/// Create a new group with its initial member set.
pub async fn create_group(
    State(state): State<AppState>,
    Json(request): Json<CreateGroupRequest>,
) -> Result<(StatusCode, Json<ApiResponse<GroupResponse>>), ErrorReply> {
    if let Err(errors) = request.validate() {
        return Err(validation_reply(errors));
    }

    let service = GroupService::new(state.store.clone());
    let group = service
        .create_group(&request.name, &request.member_ids)
        .await
        .map_err(error_reply)?;

    let names = user_names(&state).await;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(GroupResponse::resolved(group, |id| {
            names.get(&id).cloned()
        }))),
    ))
}

/// List all groups.
pub async fn list_groups(
    State(state): State<AppState>,
) -> Json<ApiResponse<Vec<GroupResponse>>> {
    let service = GroupService::new(state.store.clone());
    let names = user_names(&state).await;
    let groups = service
        .list_groups()
        .await
        .into_iter()
        .map(|g| GroupResponse::resolved(g, |id| names.get(&id).cloned()))
        .collect();
    Json(ApiResponse::success(groups))
}

/// Get a single group by id.
pub async fn get_group(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<GroupResponse>>, ErrorReply> {
    let service = GroupService::new(state.store.clone());
    let group = service.get_group(id).await.map_err(error_reply)?;
    let names = user_names(&state).await;
    Ok(Json(ApiResponse::success(GroupResponse::resolved(
        group,
        |id| names.get(&id).cloned(),
    ))))
}

/// Delete a group. Transactions that reference it are orphaned, not removed.
pub async fn delete_group(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<Uuid>>, ErrorReply> {
    let service = GroupService::new(state.store.clone());
    service.delete_group(id).await.map_err(error_reply)?;
    Ok(Json(ApiResponse::success(id)))
}

// ============================================================================
// Transaction Handlers
// ============================================================================

/// Record a purchase and settle it against the ledger.
pub async fn create_transaction(
    State(state): State<AppState>,
    Json(request): Json<CreateTransactionRequest>,
) -> Result<(StatusCode, Json<ApiResponse<TransactionResponse>>), ErrorReply> {
    if let Err(errors) = request.validate() {
        return Err(validation_reply(errors));
    }

    let engine = LedgerEngine::new(state.store.clone());
    let record = engine
        .create_transaction(NewTransaction {
            item: request.item,
            price: request.price,
            buyer_id: request.buyer_id,
            borrower_id: request.borrower_id,
            group_id: request.group_id,
        })
        .await
        .map_err(error_reply)?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(resolve_transaction(&state, record).await)),
    ))
}

/// List all transactions.
pub async fn list_transactions(
    State(state): State<AppState>,
) -> Json<ApiResponse<Vec<TransactionResponse>>> {
    let names = user_names(&state).await;
    let groups = group_names(&state).await;
    let records = state
        .store
        .list_transactions()
        .await
        .into_iter()
        .map(|r| {
            TransactionResponse::resolved(
                r,
                |id| names.get(&id).cloned(),
                |id| groups.get(&id).cloned(),
            )
        })
        .collect();
    Json(ApiResponse::success(records))
}

/// Get a single transaction by id.
pub async fn get_transaction(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<TransactionResponse>>, ErrorReply> {
    let record = state
        .store
        .find_transaction(id)
        .await
        .ok_or_else(|| error_reply(AppError::NotFound(format!("transaction '{id}' not found"))))?;
    Ok(Json(ApiResponse::success(
        resolve_transaction(&state, record).await,
    )))
}

/// Edit a transaction's price; the ledger settles the delta.
pub async fn update_transaction_price(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateTransactionPriceRequest>,
) -> Result<Json<ApiResponse<TransactionResponse>>, ErrorReply> {
    if let Err(errors) = request.validate() {
        return Err(validation_reply(errors));
    }

    let engine = LedgerEngine::new(state.store.clone());
    let record = engine
        .update_price(id, request.price)
        .await
        .map_err(error_reply)?;
    Ok(Json(ApiResponse::success(
        resolve_transaction(&state, record).await,
    )))
}

/// Delete a transaction; its settlement is reversed exactly.
pub async fn delete_transaction(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<Uuid>>, ErrorReply> {
    let engine = LedgerEngine::new(state.store.clone());
    engine.delete_transaction(id).await.map_err(error_reply)?;
    Ok(Json(ApiResponse::success(id)))
}

// ============================================================================
// Name resolution helpers
// ============================================================================

async fn user_names(state: &AppState) -> HashMap<Uuid, String> {
    state
        .store
        .list_users()
        .await
        .into_iter()
        .map(|u| (u.id, u.name))
        .collect()
}

async fn group_names(state: &AppState) -> HashMap<Uuid, String> {
    state
        .store
        .list_groups()
        .await
        .into_iter()
        .map(|g| (g.id, g.name))
        .collect()
}

async fn resolve_transaction(
    state: &AppState,
    record: crate::models::TransactionRecord,
) -> TransactionResponse {
    let names = user_names(state).await;
    let groups = group_names(state).await;
    TransactionResponse::resolved(
        record,
        |id| names.get(&id).cloned(),
        |id| groups.get(&id).cloned(),
    )
}
