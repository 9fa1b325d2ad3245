use actix_web::middleware::Logger;
use regex::Regex;
use std::sync::LazyLock;

use crate::utils::code_generator::TOKEN_LEN;

const REDACTED: &str = "[redacted]";

/// Scopes whose next path segment is a bearer credential
const CREDENTIAL_SCOPES: [&str; 2] = ["admin", "participants"];

static TOKEN_RUN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!("[A-Za-z0-9]{{{TOKEN_LEN},}}")).expect("token regex is valid")
});

/// Access log that never writes capability tokens.
///
/// Admin secrets and participant tokens travel in URL paths. The segment after
/// `/admin/` or `/participants/` is always masked (whatever its encoding), and
/// so is any other segment carrying a token-length alphanumeric run.
pub fn create_access_logger() -> Logger {
    Logger::new(r#"%a "%{request_line}xi" %s %b %T"#).custom_request_replace(
        "request_line",
        |req| format!("{} {}", req.method(), redact_path(req.path())),
    )
}

pub fn redact_path(path: &str) -> String {
    let segments: Vec<&str> = path.split('/').collect();
    segments
        .iter()
        .enumerate()
        .map(|(i, segment)| {
            let after_scope = i > 0
                && CREDENTIAL_SCOPES.contains(&segments[i - 1])
                && !segment.is_empty()
                && *segment != "login";
            if after_scope || TOKEN_RUN.is_match(segment) {
                REDACTED
            } else {
                segment
            }
        })
        .collect::<Vec<_>>()
        .join("/")
}
