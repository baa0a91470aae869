//! HTTP retrieval for the network-backed screens.

use std::future::Future;
use std::time::{Duration, Instant};

use reqwest::header::USER_AGENT;
use reqwest::Url;
use tracing::{debug, info};

use crate::config::defaults;
use crate::error::{ScreenError, ScreenResult};
use crate::runtime;
use crate::screen::Pacer;

/// How often a pending request checks for an interrupt.
const INTERRUPT_POLL: Duration = Duration::from_millis(50);

/// Something that turns a URL into text.
///
/// Implementations must give up with [`ScreenError::Interrupted`] once `pacer` reports an
/// interrupt, even while a request is still in flight.
pub trait Fetch {
    fn fetch(&mut self, url: &str, pacer: &dyn Pacer) -> ScreenResult<String>;
}

/// Fetches over HTTP, reusing the last body until `interval` has elapsed.
pub struct UrlFetcher {
    client: reqwest::Client,
    interval: Duration,
    user_agent: String,
    cache: Option<Cached>,
}

struct Cached {
    url: String,
    at: Instant,
    body: String,
}

impl UrlFetcher {
    pub fn new(interval: Duration) -> Self {
        Self {
            client: reqwest::Client::builder()
                .timeout(defaults::FETCH_TIMEOUT)
                .build()
                .unwrap_or_default(),
            interval,
            user_agent: format!("termsaver/{}", env!("CARGO_PKG_VERSION")),
            cache: None,
        }
    }

    pub fn with_user_agent(mut self, agent: &str) -> Self {
        self.user_agent = agent.to_string();
        self
    }

    fn cached(&self, url: &str) -> Option<&str> {
        self.cache
            .as_ref()
            .filter(|c| c.url == url && c.at.elapsed() < self.interval)
            .map(|c| c.body.as_str())
    }
}

impl Default for UrlFetcher {
    fn default() -> Self {
        Self::new(defaults::FETCH_INTERVAL)
    }
}

impl Fetch for UrlFetcher {
    fn fetch(&mut self, url: &str, pacer: &dyn Pacer) -> ScreenResult<String> {
        if let Some(body) = self.cached(url) {
            debug!(url, "Reusing cached response");
            return Ok(body.to_string());
        }

        info!(url, "Connecting");
        let request = get(&self.client, url, &self.user_agent);
        let bytes = runtime::block_on(until_interrupted(request, pacer))?;
        if bytes.contains(&0) {
            return Err(ScreenError::url(url, "Fetched data is binary."));
        }

        let body = String::from_utf8_lossy(&bytes).into_owned();
        self.cache = Some(Cached {
            url: url.to_string(),
            at: Instant::now(),
            body: body.clone(),
        });
        Ok(body)
    }
}

/// Drive `fut` to completion unless the pacer reports an interrupt first.
pub async fn until_interrupted<F, T>(fut: F, pacer: &dyn Pacer) -> ScreenResult<T>
where
    F: Future<Output = ScreenResult<T>>,
{
    tokio::pin!(fut);
    let mut poll = tokio::time::interval(INTERRUPT_POLL);
    loop {
        tokio::select! {
            result = &mut fut => return result,
            _ = poll.tick() => pacer.check()?,
        }
    }
}

async fn get(client: &reqwest::Client, url: &str, agent: &str) -> ScreenResult<Vec<u8>> {
    let resp = client
        .get(url)
        .header(USER_AGENT, agent)
        .send()
        .await
        .map_err(|e| ScreenError::url(url, format!("Could not connect: {e}")))?;

    let status = resp.status();
    if !status.is_success() {
        return Err(ScreenError::url(
            url,
            format!("Fetched URL returned error {}.", status.as_u16()),
        ));
    }

    let bytes = resp
        .bytes()
        .await
        .map_err(|e| ScreenError::url(url, format!("Could not read response: {e}")))?;
    Ok(bytes.to_vec())
}

/// Normalize user input into a fetchable URL: `http://` is assumed when no scheme is given
/// and an empty path becomes `/`.
pub fn fix_uri(text: &str) -> ScreenResult<String> {
    let text = text.trim();
    if text.is_empty() {
        return Err(ScreenError::url(text, "URL can not be blank"));
    }

    let candidate = if text.contains("://") {
        text.to_string()
    } else {
        format!("http://{text}")
    };

    let url = Url::parse(&candidate).map_err(|e| ScreenError::url(text, e.to_string()))?;
    if url.host_str().is_none() {
        return Err(ScreenError::url(text, "The URL has no host."));
    }
    // The url crate already renders an empty path as "/".
    Ok(url.to_string())
}

/// Validate a mandatory `--url` option and normalize it.
pub fn url_option(raw: Option<&str>, help: &str) -> ScreenResult<String> {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        None => Err(ScreenError::mandatory("url", Some(help.to_string()))),
        Some(text) => fix_uri(text).map_err(|e| match e {
            ScreenError::Url { reason, .. } => ScreenError::invalid_option("url", reason),
            other => other,
        }),
    }
}
