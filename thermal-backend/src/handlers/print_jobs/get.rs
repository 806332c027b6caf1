use std::collections::HashMap;
use std::sync::Arc;

use axum::extract::{Extension, Json, Path};
use thermal_store::PrintJob;

use crate::handlers::utils::path_id;
use crate::{error::ApiError, state::AppState};

/// GET /print-jobs/{id}
pub async fn get(
    Extension(state): Extension<Arc<AppState>>,
    Path(path): Path<HashMap<String, String>>,
) -> Result<Json<PrintJob>, ApiError> {
    let job_id = path_id(&path, "id", "print job not found")?;
    state
        .store
        .get_job(job_id)
        .await
        .map(Json)
        .ok_or_else(|| ApiError::not_found("print job not found"))
}
