use std::sync::Arc;

use axum::extract::{Extension, Json};
use axum::http::StatusCode;
use serde_json::Value;
use thermal_store::Receipt;

use crate::handlers::receipts::dto::{CreateReceipt, INVALID_RECEIPT};
use crate::validation::to_payload;
use crate::{error::ApiError, state::AppState};

/// POST /receipts
pub async fn create(
    Extension(state): Extension<Arc<AppState>>,
    body: Option<Json<Value>>,
) -> Result<(StatusCode, Json<Receipt>), ApiError> {
    let payload = body
        .ok_or_else(|| ApiError::bad_request("missing request body"))?
        .0;
    let dto: CreateReceipt =
        serde_json::from_value(payload).map_err(|_| ApiError::bad_request(INVALID_RECEIPT))?;
    let new_receipt = dto
        .validate()
        .map_err(|issues| ApiError::Validation(to_payload(INVALID_RECEIPT, &issues)))?;

    let receipt = state.store.create_receipt(new_receipt).await;
    tracing::info!(
        receipt_id = receipt.id,
        order_number = %receipt.order_number,
        total = %receipt.total,
        "receipt created"
    );
    Ok((StatusCode::CREATED, Json(receipt)))
}
