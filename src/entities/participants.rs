use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;

/// Participant
/// - event_id never changes after registration
/// - email is unique within an event (stored lowercase)
/// - secret_token: participant capability (globally unique)
/// - personal_pin: optional, recovers secret_token together with email + event_code
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "participants")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub event_id: Uuid,
    pub name: String,
    pub email: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub wishlist: Option<String>,
    pub avatar: String,
    #[sea_orm(unique)]
    pub secret_token: String,
    pub personal_pin: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::events::Entity",
        from = "Column::EventId",
        to = "super::events::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Event,
}

impl Related<super::events::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Event.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
