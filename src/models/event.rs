use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::entities::{EventState, event_entity};

use super::{AdminParticipantResponse, PublicParticipantResponse, ShareLinks};

#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct CreateEventRequest {
    #[schema(example = "Familienwichteln 2025")]
    pub name: String,
    #[schema(example = "2025-12-24", value_type = String)]
    pub date: NaiveDate,
    /// Gift budget, any currency
    #[schema(example = 25)]
    pub budget: Option<i32>,
    #[schema(example = "Nichts Selbstgebasteltes")]
    pub rules: Option<String>,
    /// 4 digits, must not be used by any other event. Omit it to get a free
    /// one assigned.
    #[schema(example = "4711")]
    pub admin_pin: Option<String>,
}

/// Returned once, to the creator only
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CreatedEventResponse {
    pub event: EventDetails,
    pub event_code: String,
    pub admin_secret: String,
    /// Echoed back so an assigned PIN can be written down
    pub admin_pin: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub links: Option<ShareLinks>,
}

/// Event configuration visible to anyone holding the event code
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct EventDetails {
    pub id: Uuid,
    pub name: String,
    #[schema(value_type = String)]
    pub date: NaiveDate,
    pub budget: Option<i32>,
    pub rules: Option<String>,
    pub state: EventState,
    pub drawn_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl From<&event_entity::Model> for EventDetails {
    fn from(m: &event_entity::Model) -> Self {
        EventDetails {
            id: m.id,
            name: m.name.clone(),
            date: m.date,
            budget: m.budget,
            rules: m.rules.clone(),
            state: m.state,
            drawn_at: m.drawn_at,
            created_at: m.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PublicEventResponse {
    pub event: EventDetails,
    pub event_code: String,
    pub participant_count: usize,
    /// Registration order
    pub participants: Vec<PublicParticipantResponse>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub links: Option<ShareLinks>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct AdminDashboardResponse {
    pub event: EventDetails,
    pub event_code: String,
    pub participant_count: usize,
    /// Participants registered after the latest draw have no assignment
    /// until the event is drawn again
    pub unassigned_count: usize,
    pub participants: Vec<AdminParticipantResponse>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub links: Option<ShareLinks>,
}

#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct AdminLoginRequest {
    #[schema(example = "4711")]
    pub pin: String,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct AdminLoginResponse {
    pub admin_secret: String,
    pub event_code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub links: Option<ShareLinks>,
}
