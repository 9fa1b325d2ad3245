use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::entities::EventState;

/// Outcome of a draw. The pairs themselves are never returned to the admin.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct DrawSummaryResponse {
    pub event_id: Uuid,
    pub state: EventState,
    pub participant_count: usize,
    pub pair_count: usize,
    /// True when an earlier assignment was replaced
    pub redraw: bool,
    pub drawn_at: DateTime<Utc>,
}
