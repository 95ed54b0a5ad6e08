//! Synchronous client for the **REST Countries API (v3.1)**.
//!
//! Two endpoints are used:
//! - `name/{name}?fullText=true` for an exact-name lookup of one country
//! - `all?fields=name,region,area,population,latlng` for the bulk dataset behind
//!   the continent explorer
//!
//! ### Notes
//! - Requests are never retried; every call is one outbound read.
//! - A non-success status on the lookup endpoint means "no exact match"
//!   (the API answers 404). On the bulk endpoint it means the dataset is unavailable.
//! - Network timeouts use a sane default (30s total, 10s connect).
//!
//! Typical usage:
//! ```no_run
//! # use country_facts::{Client, resolver};
//! let client = Client::default();
//! let france = resolver::resolve(&client, "France")?;
//! println!("{} has {} inhabitants", france.common_name, france.population);
//! # Ok::<(), country_facts::LookupError>(())
//! ```
use crate::error::LookupError;
use crate::models::RawCountry;
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC};
use reqwest::blocking::Client as HttpClient;
use reqwest::redirect::Policy;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://restcountries.com/v3.1";

/// Fields requested from the bulk endpoint.
pub const BULK_FIELDS: &str = "name,region,area,population,latlng";

/// Anything that can answer country lookups and hand out the bulk dataset.
///
/// `Client` talks to the live API; tests plug in canned data.
pub trait CountrySource {
    /// Exact full-text lookup. Returns the candidate list in provider order.
    fn lookup_by_name(&self, name: &str) -> Result<Vec<RawCountry>, LookupError>;

    /// Bulk dataset with the fields in [`BULK_FIELDS`], in provider order.
    fn fetch_all(&self) -> Result<Vec<RawCountry>, LookupError>;
}

#[derive(Debug, Clone)]
pub struct Client {
    pub base_url: String,
    http: HttpClient,
}

impl Default for Client {
    fn default() -> Self {
        Self::with_base_url(DEFAULT_BASE_URL)
    }
}

// Allow -, _, . unescaped in path segments; everything else (spaces, accents) is escaped
const SAFE: &AsciiSet = &NON_ALPHANUMERIC.remove(b'-').remove(b'_').remove(b'.');

fn encode_segment(s: &str) -> String {
    percent_encoding::utf8_percent_encode(s.trim(), SAFE).to_string()
}

impl Client {
    /// Client against a custom mirror (or a local stub in tests).
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        let http = HttpClient::builder()
            .timeout(Duration::from_secs(30)) // total request timeout
            .connect_timeout(Duration::from_secs(10)) // connect timeout
            .redirect(Policy::limited(5)) // cap redirects
            .user_agent(concat!("country_facts/", env!("CARGO_PKG_VERSION"))) // set user agent
            .build()
            .expect("reqwest client build");
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http,
        }
    }

    pub fn lookup_url(&self, name: &str) -> String {
        format!("{}/name/{}?fullText=true", self.base_url, encode_segment(name))
    }

    pub fn bulk_url(&self) -> String {
        format!("{}/all?fields={}", self.base_url, BULK_FIELDS)
    }

    /// Issue one GET and return `(status, body)`.
    fn get_text(&self, url: &str) -> Result<(u16, String), LookupError> {
        log::debug!("GET {}", url);
        let resp = self
            .http
            .get(url)
            .send()
            .map_err(|e| LookupError::Connection(e.to_string()))?;
        let status = resp.status().as_u16();
        let body = resp
            .text()
            .map_err(|e| LookupError::Connection(e.to_string()))?;
        log::debug!("GET {} -> HTTP {} ({} bytes)", url, status, body.len());
        Ok((status, body))
    }
}

impl CountrySource for Client {
    fn lookup_by_name(&self, name: &str) -> Result<Vec<RawCountry>, LookupError> {
        let (status, body) = self.get_text(&self.lookup_url(name))?;
        parse_lookup_response(name, status, &body)
    }

    fn fetch_all(&self) -> Result<Vec<RawCountry>, LookupError> {
        let (status, body) = self.get_text(&self.bulk_url())?;
        parse_bulk_response(status, &body)
    }
}

fn is_success(status: u16) -> bool {
    (200..300).contains(&status)
}

/// Interpret a lookup response. Any non-success status is "not found".
pub fn parse_lookup_response(
    name: &str,
    status: u16,
    body: &str,
) -> Result<Vec<RawCountry>, LookupError> {
    if !is_success(status) {
        return Err(LookupError::NotFound {
            name: name.trim().to_string(),
        });
    }
    serde_json::from_str(body).map_err(|e| LookupError::Decode(e.to_string()))
}

/// Interpret a bulk response. Any non-success status is a fetch failure.
pub fn parse_bulk_response(status: u16, body: &str) -> Result<Vec<RawCountry>, LookupError> {
    if !is_success(status) {
        return Err(LookupError::FetchFailed { status });
    }
    serde_json::from_str(body).map_err(|e| LookupError::Decode(e.to_string()))
}
