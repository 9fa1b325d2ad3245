use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::entity::prelude::*;
use sea_orm::{DeriveActiveEnum, EnumIter};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::{AppError, AppResult};

/// Event lifecycle.
///
/// `open` accepts registrations; `drawn` has a current assignment. Registrations
/// and wishlist edits stay possible after a draw, and a drawn event may be
/// drawn again (full replacement). There is no way back to `open`.
#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, ToSchema, DeriveActiveEnum, EnumIter,
)]
#[sea_orm(rs_type = "String", db_type = "String(Some(16))")]
#[serde(rename_all = "snake_case")]
pub enum EventState {
    #[sea_orm(string_value = "open")]
    Open,
    #[sea_orm(string_value = "drawn")]
    Drawn,
}

impl EventState {
    pub fn is_drawn(&self) -> bool {
        matches!(self, EventState::Drawn)
    }

    /// Guard for the draw transition; returns the state to persist on success.
    /// Re-drawing an already drawn event is allowed.
    pub fn on_draw(&self, participant_count: usize) -> AppResult<EventState> {
        if participant_count < 2 {
            return Err(AppError::InsufficientParticipants {
                count: participant_count,
            });
        }
        Ok(EventState::Drawn)
    }
}

impl std::fmt::Display for EventState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EventState::Open => write!(f, "open"),
            EventState::Drawn => write!(f, "drawn"),
        }
    }
}

/// Event
/// - event_code: public share code (lowercase, 8 chars)
/// - admin_secret: admin capability, only returned to the creator
/// - admin_pin: 4 digits, globally unique, recovers admin_secret
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "events")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    pub date: NaiveDate,
    pub budget: Option<i32>,
    #[sea_orm(column_type = "Text", nullable)]
    pub rules: Option<String>,
    pub state: EventState,
    #[sea_orm(unique)]
    pub event_code: String,
    #[sea_orm(unique)]
    pub admin_secret: String,
    #[sea_orm(unique)]
    pub admin_pin: String,
    pub drawn_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::participants::Entity")]
    Participants,
    #[sea_orm(has_many = "super::draws::Entity")]
    Draws,
}

impl Related<super::participants::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Participants.def()
    }
}

impl Related<super::draws::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Draws.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_draw_requires_two_participants() {
        for count in [0, 1] {
            assert!(matches!(
                EventState::Open.on_draw(count),
                Err(AppError::InsufficientParticipants { count: c }) if c == count
            ));
        }
        assert_eq!(EventState::Open.on_draw(2).unwrap(), EventState::Drawn);
    }

    #[test]
    fn test_redraw_is_allowed() {
        assert_eq!(EventState::Drawn.on_draw(5).unwrap(), EventState::Drawn);
        assert!(EventState::Drawn.on_draw(1).is_err());
    }

    #[test]
    fn test_state_serialization() {
        assert_eq!(serde_json::to_string(&EventState::Open).unwrap(), "\"open\"");
        assert_eq!(EventState::Drawn.to_string(), "drawn");
        assert!(EventState::Drawn.is_drawn());
        assert!(!EventState::Open.is_drawn());
    }
}
