use std::sync::Arc;

use axum::extract::{Extension, Json};
use serde_json::Value;
use thermal_store::PrintJob;

use crate::handlers::utils::id_from_value;
use crate::{error::ApiError, state::AppState};

/// POST /print
///
/// Returns the new job immediately; it is still pending and resolves once
/// the simulated print delay has elapsed.
pub async fn print(
    Extension(state): Extension<Arc<AppState>>,
    body: Option<Json<Value>>,
) -> Result<Json<PrintJob>, ApiError> {
    let receipt_id = body
        .as_ref()
        .and_then(|Json(payload)| payload.get("receiptId"))
        .and_then(id_from_value)
        .ok_or_else(|| ApiError::bad_request("receipt id is required"))?;

    let job = state.simulator.start_print(receipt_id).await?;
    Ok(Json(job))
}
