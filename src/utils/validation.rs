use regex::Regex;
use std::sync::LazyLock;

use crate::error::{AppError, AppResult};
use crate::utils::code_generator::PIN_LEN;

static EMAIL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email regex is valid")
});

pub const MAX_NAME_LEN: usize = 100;
pub const MAX_TEXT_LEN: usize = 2000;
pub const MAX_AVATAR_LEN: usize = 16;
pub const DEFAULT_AVATAR: &str = "🎅";

/// Trim + lowercase, then check the address shape
pub fn normalize_email(email: &str) -> AppResult<String> {
    let email = email.trim().to_lowercase();
    if !EMAIL_REGEX.is_match(&email) {
        return Err(AppError::ValidationError("Invalid email address".to_string()));
    }
    Ok(email)
}

pub fn validate_pin(pin: &str) -> AppResult<String> {
    let pin = pin.trim();
    if pin.len() != PIN_LEN || !pin.bytes().all(|b| b.is_ascii_digit()) {
        return Err(AppError::ValidationError(
            "PIN must be exactly 4 digits".to_string(),
        ));
    }
    Ok(pin.to_string())
}

pub fn validate_name(field: &str, name: &str) -> AppResult<String> {
    let name = name.trim();
    let len = name.chars().count();
    if len == 0 || len > MAX_NAME_LEN {
        return Err(AppError::ValidationError(format!(
            "{field} must be between 1 and {MAX_NAME_LEN} characters"
        )));
    }
    Ok(name.to_string())
}

/// Blank text is stored as absent
pub fn normalize_text(field: &str, text: Option<&str>) -> AppResult<Option<String>> {
    let Some(text) = text.map(str::trim).filter(|t| !t.is_empty()) else {
        return Ok(None);
    };
    if text.chars().count() > MAX_TEXT_LEN {
        return Err(AppError::ValidationError(format!(
            "{field} must be at most {MAX_TEXT_LEN} characters"
        )));
    }
    Ok(Some(text.to_string()))
}

pub fn validate_budget(budget: Option<i32>) -> AppResult<Option<i32>> {
    match budget {
        Some(b) if b <= 0 => Err(AppError::ValidationError(
            "Budget must be a positive amount".to_string(),
        )),
        other => Ok(other),
    }
}

pub fn normalize_avatar(avatar: Option<&str>) -> AppResult<String> {
    let Some(avatar) = avatar.map(str::trim).filter(|a| !a.is_empty()) else {
        return Ok(DEFAULT_AVATAR.to_string());
    };
    if avatar.chars().count() > MAX_AVATAR_LEN {
        return Err(AppError::ValidationError("Avatar is too long".to_string()));
    }
    Ok(avatar.to_string())
}
