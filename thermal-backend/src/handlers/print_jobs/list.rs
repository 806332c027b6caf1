use std::sync::Arc;

use axum::extract::{Extension, Json};
use thermal_store::PrintJob;

use crate::{error::ApiError, state::AppState};

/// GET /print-jobs
pub async fn list(
    Extension(state): Extension<Arc<AppState>>,
) -> Result<Json<Vec<PrintJob>>, ApiError> {
    Ok(Json(state.store.list_jobs().await))
}
