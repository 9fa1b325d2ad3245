use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, IntoActiveModel, QueryFilter,
    QueryOrder, Set, TransactionTrait,
};
use uuid::Uuid;

use crate::entities::{draw_entity as draws, participant_entity as participants};
use crate::error::{AppError, AppResult};
use crate::models::DrawSummaryResponse;
use crate::notifier::{ChangeEvent, ChangeKind, ChangeNotifier, Collection};
use crate::services::access;
use crate::utils::DrawEngine;

#[derive(Clone)]
pub struct DrawService {
    pool: DatabaseConnection,
    engine: DrawEngine,
    notifier: ChangeNotifier,
}

impl DrawService {
    pub fn new(pool: DatabaseConnection, engine: DrawEngine, notifier: ChangeNotifier) -> Self {
        Self {
            pool,
            engine,
            notifier,
        }
    }

    /// Draw (open -> drawn) or redraw an event.
    ///
    /// Runs in a single transaction:
    /// 1. lock the event row (SELECT ... FOR UPDATE) so concurrent draws serialise
    /// 2. read the roster; fewer than 2 participants fails and leaves the state alone
    /// 3. compute the derangement
    /// 4. delete the previous pairs and insert the new ones
    /// 5. state = drawn, drawn_at = now, commit
    ///
    /// Readers never see old and new pairs side by side: both the delete and
    /// the insert only become visible at commit.
    pub async fn run_draw(&self, admin_secret: &str) -> AppResult<DrawSummaryResponse> {
        let txn = self.pool.begin().await?;

        let event = access::lock_event_by_admin_secret(&txn, admin_secret).await?;

        let roster = participants::Entity::find()
            .filter(participants::Column::EventId.eq(event.id))
            .order_by_asc(participants::Column::CreatedAt)
            .all(&txn)
            .await?;

        // the transaction rolls back on drop
        let next_state = event.state.on_draw(roster.len())?;

        let giver_ids: Vec<Uuid> = roster.iter().map(|p| p.id).collect();
        let assignment = self.engine.draw(&giver_ids)?;

        let deleted = draws::Entity::delete_many()
            .filter(draws::Column::EventId.eq(event.id))
            .exec(&txn)
            .await?
            .rows_affected;

        let now = Utc::now();
        let pairs = giver_ids
            .iter()
            .map(|giver_id| {
                let receiver_id = assignment.get(giver_id).copied().ok_or_else(|| {
                    AppError::InternalError("Draw result is missing a giver".to_string())
                })?;
                Ok(draws::ActiveModel {
                    id: Set(Uuid::new_v4()),
                    event_id: Set(event.id),
                    giver_id: Set(*giver_id),
                    receiver_id: Set(receiver_id),
                    created_at: Set(now),
                })
            })
            .collect::<AppResult<Vec<_>>>()?;
        let pair_count = pairs.len();

        draws::Entity::insert_many(pairs).exec(&txn).await?;

        let redraw = deleted > 0 || event.state.is_drawn();
        let event_id = event.id;
        let mut model = event.into_active_model();
        model.state = Set(next_state);
        model.drawn_at = Set(Some(now));
        model.update(&txn).await?;

        txn.commit().await?;

        log::info!(
            "Event {event_id} drawn: {} participants, {pair_count} pairs{}",
            giver_ids.len(),
            if redraw { " (replaced previous draw)" } else { "" }
        );

        if deleted > 0 {
            self.notifier.publish(ChangeEvent::new(
                Collection::Draws,
                ChangeKind::Delete,
                event_id,
            ));
        }
        self.notifier.publish(ChangeEvent::new(
            Collection::Draws,
            ChangeKind::Insert,
            event_id,
        ));
        self.notifier.publish(ChangeEvent::new(
            Collection::Events,
            ChangeKind::Update,
            event_id,
        ));

        Ok(DrawSummaryResponse {
            event_id,
            state: next_state,
            participant_count: giver_ids.len(),
            pair_count,
            redraw,
            drawn_at: now,
        })
    }
}
