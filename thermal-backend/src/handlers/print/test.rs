use std::sync::Arc;

use axum::extract::{Extension, Json};
use serde_json::{json, Value};

use crate::{error::ApiError, state::AppState};

/// POST /print/test
pub async fn test_print(
    Extension(state): Extension<Arc<AppState>>,
) -> Result<Json<Value>, ApiError> {
    let job = state.simulator.start_test_print().await;
    Ok(Json(json!({
        "message": "Test print initiated",
        "printJob": job,
    })))
}
