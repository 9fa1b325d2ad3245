#![allow(dead_code)]

use chrono::NaiveDate;
use migration::{Migrator, MigratorTrait};
use sea_orm::{ColumnTrait, ConnectOptions, Database, DatabaseConnection, EntityTrait, QueryFilter};
use std::collections::HashMap;
use uuid::Uuid;

use wichtel_backend::app::AppServices;
use wichtel_backend::config::{
    Config, DatabaseConfig, DrawConfig, NotifyConfig, ServerConfig,
};
use wichtel_backend::entities::draw_entity as draws;
use wichtel_backend::models::*;
use wichtel_backend::notifier::ChangeNotifier;

pub fn test_config(max_attempts: u32) -> Config {
    Config {
        server: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
        },
        database: DatabaseConfig {
            url: "sqlite::memory:".to_string(),
            max_connections: 1,
        },
        draw: DrawConfig { max_attempts },
        notify: NotifyConfig::default(),
        public_base_url: None,
    }
}

/// Every in-memory SQLite connection is its own database, so the pool is
/// pinned to a single connection.
pub async fn setup_db() -> DatabaseConnection {
    let mut options = ConnectOptions::new("sqlite::memory:".to_string());
    options
        .max_connections(1)
        .min_connections(1)
        .sqlx_logging(false);
    let db = Database::connect(options).await.unwrap();
    Migrator::up(&db, None).await.unwrap();
    db
}

pub struct TestApp {
    pub db: DatabaseConnection,
    pub notifier: ChangeNotifier,
    pub services: AppServices,
}

pub async fn setup() -> TestApp {
    setup_with(test_config(1000)).await
}

pub async fn setup_with(config: Config) -> TestApp {
    let db = setup_db().await;
    let notifier = ChangeNotifier::new();
    let services = AppServices::new(db.clone(), &config, notifier.clone());
    TestApp {
        db,
        notifier,
        services,
    }
}

pub fn event_request(admin_pin: &str) -> CreateEventRequest {
    CreateEventRequest {
        name: "Büro-Wichteln".to_string(),
        date: NaiveDate::from_ymd_opt(2025, 12, 19).unwrap(),
        budget: Some(20),
        rules: Some("Nichts Selbstgebasteltes".to_string()),
        admin_pin: Some(admin_pin.to_string()),
    }
}

pub fn participant_request(name: &str, pin: Option<&str>) -> RegisterParticipantRequest {
    RegisterParticipantRequest {
        name: name.to_string(),
        email: format!("{}@example.de", name.to_lowercase()),
        wishlist: Some(format!("Socken für {name}")),
        avatar: None,
        personal_pin: pin.map(str::to_string),
    }
}

impl TestApp {
    pub async fn create_event(&self, admin_pin: &str) -> CreatedEventResponse {
        self.services
            .events
            .create_event(event_request(admin_pin))
            .await
            .unwrap()
    }

    pub async fn join(&self, event_code: &str, name: &str) -> RegisteredParticipantResponse {
        self.services
            .participants
            .register(event_code, participant_request(name, None))
            .await
            .unwrap()
    }

    /// Stored pairs of an event as giver -> receiver
    pub async fn pairs(&self, event_id: Uuid) -> HashMap<Uuid, Uuid> {
        draws::Entity::find()
            .filter(draws::Column::EventId.eq(event_id))
            .all(&self.db)
            .await
            .unwrap()
            .into_iter()
            .map(|d| (d.giver_id, d.receiver_id))
            .collect()
    }

    pub async fn pair_rows(&self, event_id: Uuid) -> usize {
        draws::Entity::find()
            .filter(draws::Column::EventId.eq(event_id))
            .all(&self.db)
            .await
            .unwrap()
            .len()
    }
}

/// Giver -> receiver is a bijection on `ids` with no fixed point
pub fn assert_derangement(ids: &[Uuid], pairs: &HashMap<Uuid, Uuid>) {
    assert_eq!(pairs.len(), ids.len());
    let mut receivers: Vec<Uuid> = pairs.values().copied().collect();
    receivers.sort();
    let mut expected = ids.to_vec();
    expected.sort();
    assert_eq!(receivers, expected);
    for id in ids {
        let receiver = pairs.get(id).expect("every participant gives");
        assert_ne!(receiver, id);
    }
}
