//! 2025 population estimates from a chat-completion language model.
//!
//! The model is asked for a single number; the first integer in its reply
//! (grouping commas allowed) is taken as the estimate. Any failure along the
//! way yields [`PopulationSource::Unavailable`] and callers fall back to the
//! provider's census figure via [`PopulationEstimate::or_provider`].
//!
//! Nothing is cached and nothing is retried: each call is one request.

use crate::models::{PopulationEstimate, PopulationSource};
use anyhow::{Context, Result, anyhow, bail};
use regex::Regex;
use reqwest::blocking::Client as HttpClient;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;
use std::time::Duration;

pub const DEFAULT_LLM_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_MODEL: &str = "gpt-3.5-turbo";
pub const DEFAULT_MAX_TOKENS: u32 = 20;

/// Environment variable holding the API credential.
pub const API_KEY_ENV: &str = "OPENAI_API_KEY";
/// Optional override for the model identifier.
pub const MODEL_ENV: &str = "CFI_MODEL";
/// Optional override for the endpoint base URL.
pub const BASE_URL_ENV: &str = "CFI_LLM_BASE_URL";

/// First run of digits, optionally grouped with commas.
static NUMBER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d[\d,]*").expect("valid number regex"));

/// Settings for the chat-completion endpoint.
///
/// The credential lives here rather than being read from the environment at
/// call time, so the estimator can be built against any key (or a stub).
#[derive(Debug, Clone)]
pub struct EstimatorConfig {
    pub api_key: String,
    pub model: String,
    pub base_url: String,
    pub max_tokens: u32,
    pub timeout: Duration,
}

impl EstimatorConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_LLM_BASE_URL.to_string(),
            max_tokens: DEFAULT_MAX_TOKENS,
            timeout: Duration::from_secs(30),
        }
    }

    /// Read `OPENAI_API_KEY` (required), `CFI_MODEL` and `CFI_LLM_BASE_URL` (optional).
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var(API_KEY_ENV)
            .ok()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| anyhow!("{} is not set", API_KEY_ENV))?;
        let mut cfg = Self::new(api_key.trim());
        if let Ok(model) = std::env::var(MODEL_ENV)
            && !model.trim().is_empty()
        {
            cfg.model = model.trim().to_string();
        }
        if let Ok(url) = std::env::var(BASE_URL_ENV)
            && !url.trim().is_empty()
        {
            cfg.base_url = url.trim().to_string();
        }
        Ok(cfg)
    }
}

/// A text-in, text-out language model.
pub trait Completion {
    fn complete(&self, prompt: &str) -> Result<String>;
}

/// Anything that can produce a 2025 population estimate for a country name.
pub trait PopulationEstimator {
    fn estimate_2025_population(&self, country: &str) -> PopulationEstimate;
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatReply,
}

#[derive(Debug, Deserialize)]
struct ChatReply {
    content: Option<String>,
}

/// Blocking client for an OpenAI-compatible `chat/completions` endpoint.
#[derive(Debug, Clone)]
pub struct ChatClient {
    config: EstimatorConfig,
    http: HttpClient,
}

impl ChatClient {
    pub fn new(config: EstimatorConfig) -> Result<Self> {
        let http = HttpClient::builder()
            .timeout(config.timeout)
            .connect_timeout(Duration::from_secs(10))
            .user_agent(concat!("country_facts/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("build chat http client")?;
        Ok(Self { config, http })
    }
}

impl Completion for ChatClient {
    fn complete(&self, prompt: &str) -> Result<String> {
        let url = format!(
            "{}/chat/completions",
            self.config.base_url.trim_end_matches('/')
        );
        let body = ChatRequest {
            model: &self.config.model,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
            max_tokens: self.config.max_tokens,
            temperature: 0.0,
        };
        log::debug!("POST {} (model {})", url, self.config.model);
        let resp = self
            .http
            .post(&url)
            .bearer_auth(&self.config.api_key)
            .json(&body)
            .send()
            .with_context(|| format!("POST {}", url))?;
        let status = resp.status();
        if !status.is_success() {
            bail!("chat completion failed with HTTP {}", status);
        }
        let parsed: ChatResponse = resp.json().context("decode chat completion")?;
        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| anyhow!("chat completion returned no content"))
    }
}

/// Prompt asking for nothing but the number.
pub fn population_prompt(country: &str) -> String {
    format!(
        "What is the estimated population of {} in 2025? Reply with only the number, no words.",
        country.trim()
    )
}

/// Extract the first integer from free text, e.g. "Approximately 1,234,567 people" -> 1234567.
///
/// Only the first match counts. Returns `None` when there is no digit or the
/// number does not fit in a `u64`.
pub fn extract_first_number(text: &str) -> Option<u64> {
    let m = NUMBER_RE.find(text)?;
    let digits: String = m.as_str().chars().filter(|c| c.is_ascii_digit()).collect();
    digits.parse::<u64>().ok()
}

/// Estimator backed by any [`Completion`] implementation.
#[derive(Debug, Clone)]
pub struct ModelEstimator<C> {
    completion: C,
}

impl<C: Completion> ModelEstimator<C> {
    pub fn new(completion: C) -> Self {
        Self { completion }
    }

    pub fn completion(&self) -> &C {
        &self.completion
    }
}

impl ModelEstimator<ChatClient> {
    /// Estimator talking to the configured chat endpoint.
    pub fn from_config(config: EstimatorConfig) -> Result<Self> {
        Ok(Self::new(ChatClient::new(config)?))
    }
}

impl<C: Completion> PopulationEstimator for ModelEstimator<C> {
    fn estimate_2025_population(&self, country: &str) -> PopulationEstimate {
        let reply = match self.completion.complete(&population_prompt(country)) {
            Ok(text) => text,
            Err(e) => {
                log::warn!("population estimate for {:?} unavailable: {:#}", country, e);
                return PopulationEstimate::unavailable();
            }
        };
        match extract_first_number(&reply) {
            Some(n) => {
                let est = PopulationEstimate::model(n);
                if est.source != PopulationSource::ModelEstimate {
                    log::warn!("model returned zero population for {:?}", country);
                }
                est
            }
            None => {
                log::warn!("no number in model reply for {:?}: {:?}", country, reply);
                PopulationEstimate::unavailable()
            }
        }
    }
}

/// Estimate several countries, keeping input order.
///
/// `workers == 1` runs the calls one after another. Larger values split the
/// names into contiguous chunks, each handled by a scoped thread.
pub fn estimate_many<E>(names: &[String], estimator: &E, workers: usize) -> Vec<PopulationEstimate>
where
    E: PopulationEstimator + Sync + ?Sized,
{
    let workers = workers.max(1);
    if workers == 1 || names.len() <= 1 {
        return names
            .iter()
            .map(|n| estimator.estimate_2025_population(n))
            .collect();
    }

    let chunk = names.len().div_ceil(workers);
    let parts: Vec<&[String]> = names.chunks(chunk).collect();
    std::thread::scope(|s| {
        let handles: Vec<_> = parts
            .iter()
            .map(|part| {
                let part: &[String] = part;
                s.spawn(move || {
                    part.iter()
                        .map(|n| estimator.estimate_2025_population(n))
                        .collect::<Vec<_>>()
                })
            })
            .collect();

        let mut out = Vec::with_capacity(names.len());
        for (part, handle) in parts.iter().zip(handles) {
            match handle.join() {
                Ok(estimates) => out.extend(estimates),
                Err(_) => {
                    log::warn!("estimate worker panicked; {} countries unavailable", part.len());
                    out.extend(part.iter().map(|_| PopulationEstimate::unavailable()));
                }
            }
        }
        out
    })
}
