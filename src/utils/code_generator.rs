use rand::Rng;

const EVENT_CODE_CHARSET: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";
const TOKEN_CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";

pub const EVENT_CODE_LEN: usize = 8;
pub const TOKEN_LEN: usize = 32;
pub const PIN_LEN: usize = 4;

fn random_string(charset: &[u8], len: usize) -> String {
    let mut rng = rand::thread_rng();
    (0..len)
        .map(|_| charset[rng.gen_range(0..charset.len())] as char)
        .collect()
}

/// Public, shareable event code: 8 chars of `[a-z0-9]`
pub fn generate_event_code() -> String {
    random_string(EVENT_CODE_CHARSET, EVENT_CODE_LEN)
}

/// Capability token used for admin secrets and participant links: 32 chars of `[A-Za-z0-9]`
pub fn generate_capability_token() -> String {
    random_string(TOKEN_CHARSET, TOKEN_LEN)
}

/// 4 decimal digits, leading zeros allowed
pub fn generate_pin() -> String {
    let mut rng = rand::thread_rng();
    format!("{:04}", rng.gen_range(0..=9999))
}

pub fn is_event_code_shaped(s: &str) -> bool {
    s.len() == EVENT_CODE_LEN && s.bytes().all(|b| EVENT_CODE_CHARSET.contains(&b))
}

pub fn is_token_shaped(s: &str) -> bool {
    s.len() == TOKEN_LEN && s.bytes().all(|b| b.is_ascii_alphanumeric())
}
