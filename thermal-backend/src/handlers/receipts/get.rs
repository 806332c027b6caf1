use std::collections::HashMap;
use std::sync::Arc;

use axum::extract::{Extension, Json, Path};
use thermal_store::Receipt;

use crate::handlers::utils::path_id;
use crate::{error::ApiError, state::AppState};

/// GET /receipts/{id}
pub async fn get(
    Extension(state): Extension<Arc<AppState>>,
    Path(path): Path<HashMap<String, String>>,
) -> Result<Json<Receipt>, ApiError> {
    let receipt_id = path_id(&path, "id", "receipt not found")?;
    state
        .store
        .get_receipt(receipt_id)
        .await
        .map(Json)
        .ok_or_else(|| ApiError::not_found("receipt not found"))
}
