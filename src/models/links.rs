use serde::Serialize;
use utoipa::ToSchema;

/// Ready-to-share URLs, only built when a public base URL is configured
#[derive(Debug, Clone, Default, Serialize, ToSchema)]
pub struct ShareLinks {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub admin: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub participant: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct LinkBuilder {
    base: Option<String>,
}

impl LinkBuilder {
    pub fn new(base: Option<String>) -> Self {
        Self {
            base: base
                .map(|b| b.trim().trim_end_matches('/').to_string())
                .filter(|b| !b.is_empty()),
        }
    }

    pub fn event(&self, event_code: &str) -> Option<ShareLinks> {
        let base = self.base.as_ref()?;
        Some(ShareLinks {
            event: Some(format!("{base}/e/{event_code}")),
            ..Default::default()
        })
    }

    pub fn admin(&self, event_code: &str, admin_secret: &str) -> Option<ShareLinks> {
        let base = self.base.as_ref()?;
        Some(ShareLinks {
            event: Some(format!("{base}/e/{event_code}")),
            admin: Some(format!("{base}/admin/{admin_secret}")),
            participant: None,
        })
    }

    pub fn participant(&self, event_code: &str, secret_token: &str) -> Option<ShareLinks> {
        let base = self.base.as_ref()?;
        Some(ShareLinks {
            event: Some(format!("{base}/e/{event_code}")),
            admin: None,
            participant: Some(format!("{base}/p/{secret_token}")),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_base_no_links() {
        let links = LinkBuilder::new(None);
        assert!(links.event("abcd1234").is_none());
        assert!(LinkBuilder::new(Some("  ".into())).admin("a", "b").is_none());
    }

    #[test]
    fn test_links_trim_trailing_slash() {
        let links = LinkBuilder::new(Some("https://wichteln.example/".into()));
        let admin = links.admin("abcd1234", "SECRET").unwrap();
        assert_eq!(admin.event.as_deref(), Some("https://wichteln.example/e/abcd1234"));
        assert_eq!(admin.admin.as_deref(), Some("https://wichteln.example/admin/SECRET"));
        let p = links.participant("abcd1234", "TOKEN").unwrap();
        assert_eq!(p.participant.as_deref(), Some("https://wichteln.example/p/TOKEN"));
        assert!(p.admin.is_none());
    }
}
