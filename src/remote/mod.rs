//! # Remote fetchers
//!
//! Thin async client for the three services the start page reads from: a
//! quote service, a search-suggestion service and a random image service.
//!
//! Every call returns a [`RemoteError`] on failure. None of them is fatal:
//! the caller logs the error and keeps whatever it showed before.

mod error;

use std::time::Duration;

use image::RgbImage;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, USER_AGENT};
use serde::Deserialize;

use crate::quotes::Quote;
use crate::search::engine::{encode_component, QUERY_PLACEHOLDER};
use crate::search::parse_suggestions;
use crate::ui::config::Endpoints;

pub use error::{RemoteError, Result};

/// User agent string for all requests.
const USER_AGENT_VALUE: &str = concat!("focus-tab/", env!("CARGO_PKG_VERSION"));

/// Timeout for the small JSON services.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Images are larger and slower.
const IMAGE_TIMEOUT: Duration = Duration::from_secs(30);

/// Decoded wallpapers are shrunk to fit this box. A terminal cell grid never
/// needs more.
const MAX_IMAGE_WIDTH: u32 = 640;
const MAX_IMAGE_HEIGHT: u32 = 360;

/// Hitokoto-style quote payload. Only the fields we use.
#[derive(Debug, Deserialize)]
struct QuotePayload {
    #[serde(default)]
    hitokoto: Option<String>,
    #[serde(default)]
    from: Option<String>,
    #[serde(default)]
    from_who: Option<String>,
}

impl QuotePayload {
    /// Author precedence is `from_who`, then `from`, then the anonymous
    /// default applied by [`Quote::new`].
    fn into_quote(self) -> Result<Quote> {
        let author = [self.from_who, self.from]
            .into_iter()
            .flatten()
            .find(|s| !s.trim().is_empty())
            .unwrap_or_default();
        Quote::new(self.hitokoto.unwrap_or_default(), author).ok_or(RemoteError::EmptyQuote)
    }
}

/// Parse a quote service response body.
pub fn parse_quote(body: &str) -> Result<Quote> {
    let payload: QuotePayload = serde_json::from_str(body)?;
    payload.into_quote()
}

/// Fill the `{query}` slot of a suggestion endpoint template.
pub fn suggestion_url(template: &str, query: &str) -> String {
    template.replace(QUERY_PLACEHOLDER, &encode_component(query))
}

/// Async client for the remote services.
#[derive(Debug, Clone)]
pub struct RemoteClient {
    client: reqwest::Client,
    endpoints: Endpoints,
}

impl RemoteClient {
    pub fn new(endpoints: Endpoints) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("*/*"));
        headers.insert(USER_AGENT, HeaderValue::from_static(USER_AGENT_VALUE));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .connect_timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| RemoteError::Network(format!("failed to create HTTP client: {e}")))?;

        Ok(Self { client, endpoints })
    }

    pub fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }

    /// Fetch one quote from the quote service.
    pub async fn fetch_quote(&self) -> Result<Quote> {
        tracing::debug!("Fetching quote from {}", self.endpoints.quote);
        let body = self
            .get_text("quote", &self.endpoints.quote, REQUEST_TIMEOUT)
            .await?;
        parse_quote(&body)
    }

    /// Fetch completion candidates for `query`.
    pub async fn fetch_suggestions(&self, query: &str) -> Result<Vec<String>> {
        let url = suggestion_url(&self.endpoints.suggestion, query);
        tracing::trace!("Fetching suggestions from {url}");
        let body = self.get_text("suggestion", &url, REQUEST_TIMEOUT).await?;
        Ok(parse_suggestions(&body))
    }

    /// Download and decode the image at `url`.
    ///
    /// Decoding runs on the blocking pool; the result is already shrunk to
    /// a size the painter can handle quickly.
    pub async fn fetch_wallpaper(&self, url: &str) -> Result<RgbImage> {
        tracing::debug!("Fetching wallpaper from {url}");
        let response = self.client.get(url).timeout(IMAGE_TIMEOUT).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(RemoteError::Status {
                service: "wallpaper",
                status: status.as_u16(),
            });
        }
        let bytes = response.bytes().await?;
        let image = tokio::task::spawn_blocking(move || decode_image(&bytes)).await??;
        tracing::debug!(
            width = image.width(),
            height = image.height(),
            "wallpaper decoded"
        );
        Ok(image)
    }

    async fn get_text(&self, service: &'static str, url: &str, timeout: Duration) -> Result<String> {
        let response = self.client.get(url).timeout(timeout).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(RemoteError::Status {
                service,
                status: status.as_u16(),
            });
        }
        Ok(response.text().await?)
    }
}

/// Decode image bytes and shrink them to the wallpaper working size.
pub fn decode_image(bytes: &[u8]) -> Result<RgbImage> {
    let image = image::load_from_memory(bytes)?;
    let image = if image.width() > MAX_IMAGE_WIDTH || image.height() > MAX_IMAGE_HEIGHT {
        image.thumbnail(MAX_IMAGE_WIDTH, MAX_IMAGE_HEIGHT)
    } else {
        image
    };
    Ok(image.to_rgb8())
}
