use std::sync::Arc;

use axum::extract::{Extension, Json};
use thermal_store::PrintJob;

use crate::{error::ApiError, state::AppState};

/// GET /print-jobs/pending
pub async fn pending(
    Extension(state): Extension<Arc<AppState>>,
) -> Result<Json<Vec<PrintJob>>, ApiError> {
    Ok(Json(state.store.list_pending().await))
}
