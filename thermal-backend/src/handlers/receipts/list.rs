use std::sync::Arc;

use axum::extract::{Extension, Json};
use thermal_store::Receipt;

use crate::{error::ApiError, state::AppState};

/// GET /receipts
pub async fn list(
    Extension(state): Extension<Arc<AppState>>,
) -> Result<Json<Vec<Receipt>>, ApiError> {
    Ok(Json(state.store.list_receipts().await))
}
