use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Error body: `{"success": false, "error": {"code": ..., "message": ...}}`
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ApiError {
    #[schema(example = "NOT_FOUND")]
    pub code: String,
    #[schema(example = "Not found")]
    pub message: String,
}
