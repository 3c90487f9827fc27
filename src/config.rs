use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use url::Url;

use crate::auth::Auth;
use crate::errors::Result;

pub const ODATA_VERSION: &str = "4.0";
pub const USER_AGENT: &str = concat!("odata-client-rs/", env!("CARGO_PKG_VERSION"));
pub const DEFAULT_TIMEOUT_SECS: u64 = 180;

/// Connection settings, sourced from the environment by default. Command-line
/// flags override individual fields.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub base_url: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub bearer_token: Option<String>,
    pub timeout_secs: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: std::env::var("ODATA_BASE_URL").ok(),
            username: std::env::var("ODATA_USERNAME").ok(),
            password: std::env::var("ODATA_PASSWORD").ok(),
            bearer_token: std::env::var("ODATA_BEARER_TOKEN").ok(),
            timeout_secs: std::env::var("ODATA_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse::<u64>().ok())
                .unwrap_or(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl ClientConfig {
    /// A bearer token wins over basic credentials when both are present.
    pub fn auth(&self) -> Auth {
        if let Some(token) = &self.bearer_token {
            return Auth::Bearer(token.clone());
        }

        if let Some(username) = &self.username {
            return Auth::Basic {
                username: username.clone(),
                password: self.password.clone(),
            };
        }

        Auth::None
    }
}

pub fn base_headers() -> Vec<(String, String)> {
    vec![
        ("accept".to_string(), "application/json".to_string()),
        ("odata-version".to_string(), ODATA_VERSION.to_string()),
        ("user-agent".to_string(), USER_AGENT.to_string()),
    ]
}

pub fn json_headers() -> Vec<(String, String)> {
    let mut headers = base_headers();
    headers.push(("content-type".to_string(), "application/json".to_string()));
    headers
}

pub fn apply_headers(map: &mut HeaderMap, headers: Vec<(String, String)>) {
    for (k, v) in headers {
        if let Ok(name) = HeaderName::from_bytes(k.as_bytes()) {
            if let Ok(value) = HeaderValue::from_str(&v) {
                map.insert(name, value);
            }
        }
    }
}

/// Joins a resource path onto the service base URL, treating the base as a
/// directory. An empty path yields the service document URL.
pub fn resource_url(base: &str, path: &str) -> Result<Url> {
    let mut base = Url::parse(base)?;

    if !base.path().ends_with('/') {
        let with_slash = format!("{}/", base.path());
        base.set_path(&with_slash);
    }

    if path.is_empty() {
        return Ok(base);
    }

    Ok(base.join(path.trim_start_matches('/'))?)
}
