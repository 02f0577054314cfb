//! Credential-bearing values.
//!
//! Both types hold a secret (the session cookie, the webhook token embedded in
//! the URL). `Debug` redacts them; error messages name the variable, never the
//! value.

use std::fmt;

use anyhow::{bail, Result};

/// Advent of Code `session` cookie value.
#[derive(Clone, PartialEq, Eq)]
pub struct SessionCookie(String);

impl SessionCookie {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for SessionCookie {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SessionCookie(<REDACTED>)")
    }
}

/// Webhook URL of the form `http(s)://host/.../<webhook_id>/<token>`.
#[derive(Clone, PartialEq, Eq)]
pub struct WebhookUrl {
    url: String,
    id: String,
}

impl WebhookUrl {
    /// Validate the shape. Only the last two path segments are interpreted.
    pub fn parse(raw: &str) -> Result<Self> {
        let url = raw.trim().trim_end_matches('/');
        let Some(rest) = url
            .strip_prefix("https://")
            .or_else(|| url.strip_prefix("http://"))
        else {
            bail!("CONFIG_INVALID DISCORD_WEBHOOK_URL: expected an http(s) URL");
        };
        if rest.contains('?') || rest.contains('#') {
            bail!("CONFIG_INVALID DISCORD_WEBHOOK_URL: query strings are not supported");
        }

        let mut segments = rest.rsplit('/');
        let token = segments.next().unwrap_or_default();
        let id = segments.next().unwrap_or_default();
        // Host must still be left over in front of `<id>/<token>`.
        if segments.next().is_none() || token.is_empty() || id.is_empty() {
            bail!("CONFIG_INVALID DISCORD_WEBHOOK_URL: expected '.../<webhook_id>/<token>'");
        }
        if !id.chars().all(|c| c.is_ascii_digit()) {
            bail!("CONFIG_INVALID DISCORD_WEBHOOK_URL: webhook id segment must be numeric");
        }

        Ok(Self {
            url: url.to_string(),
            id: id.to_string(),
        })
    }

    /// Webhook id; safe to log.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Full URL including the token.
    pub fn expose(&self) -> &str {
        &self.url
    }
}

impl fmt::Debug for WebhookUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WebhookUrl")
            .field("id", &self.id)
            .field("url", &"<REDACTED>")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_id_and_strips_trailing_slash() {
        let w = WebhookUrl::parse("https://discord.com/api/webhooks/123456/abc-DEF_ghi/").unwrap();
        assert_eq!(w.id(), "123456");
        assert_eq!(w.expose(), "https://discord.com/api/webhooks/123456/abc-DEF_ghi");
    }

    #[test]
    fn rejects_malformed_urls() {
        for bad in [
            "discord.com/api/webhooks/1/tok",
            "https://discord.com/tok",
            "https://discord.com/api/webhooks/notanid/tok",
            "https://discord.com/api/webhooks/1/tok?thread_id=5",
            "https://",
        ] {
            assert!(WebhookUrl::parse(bad).is_err(), "accepted {bad}");
        }
    }

    #[test]
    fn debug_never_prints_secrets() {
        let w = WebhookUrl::parse("https://discord.com/api/webhooks/1/very-secret").unwrap();
        let c = SessionCookie::new("53616c7465645f5f");
        let out = format!("{w:?} {c:?}");
        assert!(!out.contains("very-secret"));
        assert!(!out.contains("53616c7465645f5f"));
        assert!(out.contains("<REDACTED>"));
    }
}
