//! Minimal TestRail API v2 client.

use crate::config::HttpConfig;
use crate::error::{Result, TrsearchError};
use crate::record::{Case, Project, Suite, User};
use log::debug;
use reqwest::blocking::Client;
use reqwest::header::CONTENT_TYPE;
use serde::de::DeserializeOwned;
use serde_json::Value;
use url::Url;

const API_PATH: &str = "index.php?/api/v2/";

/// Where to connect and who to connect as.
#[derive(Clone)]
pub struct Credentials {
    pub base_url: String,
    pub user: String,
    pub password: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("base_url", &self.base_url)
            .field("user", &self.user)
            .field("password", &"***")
            .finish()
    }
}

impl Credentials {
    pub fn new(server: &str, user: impl Into<String>, password: impl Into<String>) -> Result<Self> {
        Ok(Self {
            base_url: normalize_base_url(server)?,
            user: user.into(),
            password: password.into(),
        })
    }
}

/// Appends the trailing slash case links and API paths are built on, and
/// rejects anything that is not an absolute http(s) URL.
pub fn normalize_base_url(server: &str) -> Result<String> {
    let server = server.trim();
    let mut base_url = server.to_string();
    if !base_url.ends_with('/') {
        base_url.push('/');
    }

    let invalid = |reason: String| TrsearchError::InvalidServerUrl {
        url: server.to_string(),
        reason,
    };
    let parsed = Url::parse(&base_url).map_err(|e| invalid(e.to_string()))?;
    match parsed.scheme() {
        "http" | "https" => Ok(base_url),
        other => Err(invalid(format!("unsupported scheme '{other}'"))),
    }
}

/// Everything the search session needs from TestRail.
pub trait CaseSource {
    fn login(&self) -> Result<User>;
    fn projects(&self) -> Result<Vec<Project>>;
    fn suites(&self, project_id: u64) -> Result<Vec<Suite>>;
    fn cases(&self, project_id: u64, suite_id: u64) -> Result<Vec<Case>>;
}

pub struct TestRailClient {
    http: Client,
    credentials: Credentials,
}

impl TestRailClient {
    pub fn new(credentials: Credentials, config: &HttpConfig) -> Result<Self> {
        let http = Client::builder()
            .timeout(config.timeout())
            .danger_accept_invalid_certs(config.accept_invalid_certs)
            .build()?;

        Ok(Self { http, credentials })
    }

    pub fn base_url(&self) -> &str {
        &self.credentials.base_url
    }

    fn endpoint(&self, uri: &str) -> String {
        format!("{}{}{}", self.credentials.base_url, API_PATH, uri)
    }

    /// `_links.next` values look like `/api/v2/get_cases/1&offset=250`.
    fn link_url(&self, link: &str) -> String {
        format!(
            "{}index.php?/{}",
            self.credentials.base_url,
            link.trim_start_matches('/')
        )
    }

    pub fn send_get<T: DeserializeOwned>(&self, uri: &str) -> Result<T> {
        let value = self.get_json(&self.endpoint(uri), uri)?;
        serde_json::from_value(value).map_err(|e| malformed(uri, e.to_string()))
    }

    /// Fetches a list endpoint, following `_links.next` across pages.
    fn get_list<T: DeserializeOwned>(&self, uri: &str, key: &str) -> Result<Vec<T>> {
        let mut items = Vec::new();
        let mut next = Some(self.endpoint(uri));

        while let Some(url) = next.take() {
            let value = self.get_json(&url, uri)?;
            let (page, link) = split_page(value, key).map_err(|reason| malformed(uri, reason))?;
            let page: Vec<T> =
                serde_json::from_value(page).map_err(|e| malformed(uri, e.to_string()))?;
            debug!("{uri}: {} {key} on this page", page.len());
            items.extend(page);
            next = link.map(|link| self.link_url(&link));
        }

        Ok(items)
    }

    fn get_json(&self, url: &str, uri: &str) -> Result<Value> {
        debug!("GET {url}");
        let response = self
            .http
            .get(url)
            .basic_auth(&self.credentials.user, Some(&self.credentials.password))
            .header(CONTENT_TYPE, "application/json")
            .send()?;

        let status = response.status();
        let body = response.text()?;
        if status.is_client_error() || status.is_server_error() {
            return Err(api_error(status.as_u16(), &body));
        }

        serde_json::from_str(&body).map_err(|e| malformed(uri, e.to_string()))
    }
}

impl CaseSource for TestRailClient {
    fn login(&self) -> Result<User> {
        let email: String =
            url::form_urlencoded::byte_serialize(self.credentials.user.as_bytes()).collect();
        self.send_get(&format!("get_user_by_email&email={email}"))
    }

    fn projects(&self) -> Result<Vec<Project>> {
        self.get_list("get_projects", "projects")
    }

    fn suites(&self, project_id: u64) -> Result<Vec<Suite>> {
        self.get_list(&format!("get_suites/{project_id}"), "suites")
    }

    fn cases(&self, project_id: u64, suite_id: u64) -> Result<Vec<Case>> {
        self.get_list(&format!("get_cases/{project_id}&suite_id={suite_id}"), "cases")
    }
}

fn malformed(uri: &str, reason: String) -> TrsearchError {
    TrsearchError::MalformedResponse {
        uri: uri.to_string(),
        reason,
    }
}

/// Older TestRail versions answer list endpoints with a bare array; newer
/// ones wrap it as `{ "<key>": [...], "_links": { "next": ... } }`.
fn split_page(value: Value, key: &str) -> std::result::Result<(Value, Option<String>), String> {
    match value {
        Value::Array(items) => Ok((Value::Array(items), None)),
        Value::Object(mut map) => {
            let items = map
                .remove(key)
                .ok_or_else(|| format!("response has no '{key}' list"))?;
            let next = map
                .get("_links")
                .and_then(|links| links.get("next"))
                .and_then(Value::as_str)
                .map(str::to_string);
            Ok((items, next))
        }
        other => Err(format!("expected a list of {key}, got {other}")),
    }
}

/// TestRail reports failures as `{"error": "..."}`. Any other error body
/// comes from something in front of or instead of TestRail.
fn api_error(status: u16, body: &str) -> TrsearchError {
    let message = serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| v.get("error").and_then(Value::as_str).map(str::to_string));

    match message {
        Some(message)
            if status == 401
                || message.contains("Invalid credentials")
                || message.contains("Authentication failed") =>
        {
            TrsearchError::Authentication(message)
        }
        Some(message) => TrsearchError::Api { status, message },
        None if status == 401 => TrsearchError::Authentication(body.trim().to_string()),
        None => TrsearchError::UnexpectedResponse {
            status,
            body: body.trim().to_string(),
        },
    }
}
