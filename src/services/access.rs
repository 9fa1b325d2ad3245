//! Capability resolution.
//!
//! Three bearer credentials exist: the admin secret (plus the admin PIN that
//! recovers it), the participant token, and the re-entry triple
//! (event code + email + personal PIN) that recovers a participant token.
//! Every miss produces the same `NotFound`, whichever field was wrong.
//! Tokens from the path are matched exactly, without trimming.
//!
//! The helpers are generic over [`ConnectionTrait`] so they can run inside a
//! transaction as well as on the pool.

use sea_orm::{
    ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter, QuerySelect,
};

use crate::entities::{
    draw_entity as draws, event_entity as events, participant_entity as participants,
};
use crate::error::{AppError, AppResult};
use crate::utils::{
    generate_capability_token, generate_event_code, generate_pin, is_event_code_shaped,
    is_token_shaped, normalize_email, validate_pin,
};

/// Random identifiers are checked against the store before use; a handful of
/// collisions in a row means something is badly wrong with the generator.
const MAX_GENERATION_ATTEMPTS: usize = 10;

pub async fn resolve_event_code<C: ConnectionTrait>(
    db: &C,
    event_code: &str,
) -> AppResult<events::Model> {
    let code = event_code.trim().to_ascii_lowercase();
    if !is_event_code_shaped(&code) {
        return Err(AppError::credential_miss());
    }
    events::Entity::find()
        .filter(events::Column::EventCode.eq(code))
        .one(db)
        .await?
        .ok_or_else(AppError::credential_miss)
}

pub async fn resolve_admin_secret<C: ConnectionTrait>(
    db: &C,
    admin_secret: &str,
) -> AppResult<events::Model> {
    if !is_token_shaped(admin_secret) {
        return Err(AppError::credential_miss());
    }
    events::Entity::find()
        .filter(events::Column::AdminSecret.eq(admin_secret))
        .one(db)
        .await?
        .ok_or_else(AppError::credential_miss)
}

/// Same as [`resolve_admin_secret`] but takes an exclusive row lock on the
/// event (ignored by backends without row locks). Call inside a transaction.
pub async fn lock_event_by_admin_secret<C: ConnectionTrait>(
    db: &C,
    admin_secret: &str,
) -> AppResult<events::Model> {
    if !is_token_shaped(admin_secret) {
        return Err(AppError::credential_miss());
    }
    events::Entity::find()
        .filter(events::Column::AdminSecret.eq(admin_secret))
        .lock_exclusive()
        .one(db)
        .await?
        .ok_or_else(AppError::credential_miss)
}

pub async fn resolve_admin_pin<C: ConnectionTrait>(db: &C, pin: &str) -> AppResult<events::Model> {
    let pin = validate_pin(pin)?;
    events::Entity::find()
        .filter(events::Column::AdminPin.eq(pin))
        .one(db)
        .await?
        .ok_or_else(AppError::credential_miss)
}

pub async fn resolve_participant_token<C: ConnectionTrait>(
    db: &C,
    secret_token: &str,
) -> AppResult<participants::Model> {
    if !is_token_shaped(secret_token) {
        return Err(AppError::credential_miss());
    }
    participants::Entity::find()
        .filter(participants::Column::SecretToken.eq(secret_token))
        .one(db)
        .await?
        .ok_or_else(AppError::credential_miss)
}

/// Event code + email + personal PIN -> the participant owning that token.
/// Grants exactly what the token grants.
pub async fn resolve_reentry<C: ConnectionTrait>(
    db: &C,
    event_code: &str,
    email: &str,
    pin: &str,
) -> AppResult<participants::Model> {
    let Ok(pin) = validate_pin(pin) else {
        return Err(AppError::credential_miss());
    };
    let event = resolve_event_code(db, event_code).await?;
    let Ok(email) = normalize_email(email) else {
        return Err(AppError::credential_miss());
    };

    let participant = participants::Entity::find()
        .filter(participants::Column::EventId.eq(event.id))
        .filter(participants::Column::Email.eq(email))
        .one(db)
        .await?
        .ok_or_else(AppError::credential_miss)?;

    if participant.personal_pin.as_deref() != Some(pin.as_str()) {
        log::warn!("Re-entry rejected for event {}", event.id);
        return Err(AppError::credential_miss());
    }
    Ok(participant)
}

/// The participant `giver` must gift, according to the latest draw of
/// the giver's own event.
pub async fn receiver_of<C: ConnectionTrait>(
    db: &C,
    giver: &participants::Model,
) -> AppResult<Option<participants::Model>> {
    let Some(pair) = draws::Entity::find()
        .filter(draws::Column::EventId.eq(giver.event_id))
        .filter(draws::Column::GiverId.eq(giver.id))
        .one(db)
        .await?
    else {
        return Ok(None);
    };

    let receiver = participants::Entity::find_by_id(pair.receiver_id)
        .filter(participants::Column::EventId.eq(giver.event_id))
        .one(db)
        .await?;
    Ok(receiver)
}

pub async fn unique_event_code<C: ConnectionTrait>(db: &C) -> AppResult<String> {
    for _ in 0..MAX_GENERATION_ATTEMPTS {
        let code = generate_event_code();
        let taken = events::Entity::find()
            .filter(events::Column::EventCode.eq(code.as_str()))
            .count(db)
            .await?;
        if taken == 0 {
            return Ok(code);
        }
    }
    Err(AppError::InternalError(
        "Could not generate a unique event code".to_string(),
    ))
}

pub async fn unique_admin_secret<C: ConnectionTrait>(db: &C) -> AppResult<String> {
    for _ in 0..MAX_GENERATION_ATTEMPTS {
        let secret = generate_capability_token();
        let taken = events::Entity::find()
            .filter(events::Column::AdminSecret.eq(secret.as_str()))
            .count(db)
            .await?;
        if taken == 0 {
            return Ok(secret);
        }
    }
    Err(AppError::InternalError(
        "Could not generate a unique admin secret".to_string(),
    ))
}

/// An admin PIN no event uses yet. The 4-digit space is shared by every event,
/// so this gives up after a bounded number of tries.
pub async fn unique_admin_pin<C: ConnectionTrait>(db: &C) -> AppResult<String> {
    for _ in 0..MAX_GENERATION_ATTEMPTS {
        let pin = generate_pin();
        let taken = events::Entity::find()
            .filter(events::Column::AdminPin.eq(pin.as_str()))
            .count(db)
            .await?;
        if taken == 0 {
            return Ok(pin);
        }
    }
    Err(AppError::InternalError(
        "Could not find a free admin PIN".to_string(),
    ))
}

pub async fn unique_secret_token<C: ConnectionTrait>(db: &C) -> AppResult<String> {
    for _ in 0..MAX_GENERATION_ATTEMPTS {
        let token = generate_capability_token();
        let taken = participants::Entity::find()
            .filter(participants::Column::SecretToken.eq(token.as_str()))
            .count(db)
            .await?;
        if taken == 0 {
            return Ok(token);
        }
    }
    Err(AppError::InternalError(
        "Could not generate a unique participant token".to_string(),
    ))
}
