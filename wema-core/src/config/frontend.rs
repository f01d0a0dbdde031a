//! Frontend origin configuration.
//!
//! The origin is the single source of truth for checkout redirect targets
//! and for the CORS allow-list.

use url::Url;

/// Placeholder the provider substitutes with the created session id.
pub const SESSION_ID_PLACEHOLDER: &str = "{CHECKOUT_SESSION_ID}";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrontendConfig {
    /// Origin of the website, e.g. `https://wemacharity.org`.
    origin: Url,
    /// Origins allowed by CORS in addition to `origin`.
    pub extra_allowed_origins: Vec<String>,
    /// Append `?session_id={CHECKOUT_SESSION_ID}` to the success URL.
    pub append_session_id: bool,
}

impl FrontendConfig {
    pub fn new(origin: Url, extra_allowed_origins: Vec<String>, append_session_id: bool) -> Self {
        Self {
            origin,
            extra_allowed_origins,
            append_session_id,
        }
    }

    pub fn origin(&self) -> &Url {
        &self.origin
    }

    /// `{origin}/success`, optionally carrying the session id placeholder.
    pub fn success_url(&self) -> String {
        let base = self.page_url("success");
        if self.append_session_id {
            format!("{base}?session_id={SESSION_ID_PLACEHOLDER}")
        } else {
            base
        }
    }

    /// `{origin}/cancel`.
    pub fn cancel_url(&self) -> String {
        self.page_url("cancel")
    }

    /// Every origin CORS should accept, serialized without a trailing slash.
    pub fn allowed_origins(&self) -> Vec<String> {
        let mut origins = vec![self.origin.origin().ascii_serialization()];
        for extra in &self.extra_allowed_origins {
            let extra = extra.trim_end_matches('/').to_string();
            if !origins.contains(&extra) {
                origins.push(extra);
            }
        }
        origins
    }

    fn page_url(&self, page: &str) -> String {
        format!("{}/{page}", self.origin.as_str().trim_end_matches('/'))
    }
}
