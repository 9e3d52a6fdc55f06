use std::time::Duration;

use encoding_rs::{Encoding, UTF_8};
use reqwest::blocking::Client;
use reqwest::header::CONTENT_TYPE;
use thiserror::Error;
use tracing::debug;

use crate::core::{SnapshotError, SnapshotOptions};
use crate::utils::url::{is_http_url, Url};

/// Why a page or stylesheet could not be retrieved. Never fatal on its own.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchFailure {
    #[error("server responded with status {0}")]
    Status(u16),

    #[error("request timed out")]
    Timeout,

    #[error("transport error: {0}")]
    Transport(String),

    #[error("unsupported URL scheme \"{0}\"")]
    UnsupportedScheme(String),
}

impl From<reqwest::Error> for FetchFailure {
    fn from(error: reqwest::Error) -> Self {
        if error.is_timeout() {
            FetchFailure::Timeout
        } else if let Some(status) = error.status() {
            FetchFailure::Status(status.as_u16())
        } else {
            FetchFailure::Transport(error.to_string())
        }
    }
}

/// Anything able to retrieve the text behind a URL.
///
/// [`Session`] is the HTTP implementation; tests substitute in-memory ones.
pub trait Fetcher {
    fn fetch(&self, url: &Url) -> Result<String, FetchFailure>;
}

impl<F: Fetcher + ?Sized> Fetcher for &F {
    fn fetch(&self, url: &Url) -> Result<String, FetchFailure> {
        (**self).fetch(url)
    }
}

/// Blocking HTTP session shared by every request of one snapshot run.
pub struct Session {
    client: Client,
}

impl Session {
    pub fn new(options: &SnapshotOptions) -> Result<Session, SnapshotError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(options.timeout))
            .user_agent(options.user_agent.as_str())
            .build()?;

        Ok(Session { client })
    }
}

impl Fetcher for Session {
    fn fetch(&self, url: &Url) -> Result<String, FetchFailure> {
        if !is_http_url(url) {
            return Err(FetchFailure::UnsupportedScheme(url.scheme().to_string()));
        }

        let response = self.client.get(url.as_str()).send()?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchFailure::Status(status.as_u16()));
        }

        let charset = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|header| header.to_str().ok())
            .and_then(charset_from_content_type)
            .unwrap_or_default();
        let data = response.bytes()?;

        debug!(url = %url, bytes = data.len(), "fetched");

        Ok(decode_body(&data, &charset))
    }
}

/// Extracts the `charset` parameter of a Content-Type header value.
pub fn charset_from_content_type(content_type: &str) -> Option<String> {
    content_type.split(';').skip(1).find_map(|param| {
        let (name, value) = param.split_once('=')?;
        name.trim()
            .eq_ignore_ascii_case("charset")
            .then(|| value.trim().trim_matches('"').to_string())
    })
}

/// Decodes a response body using `charset`, defaulting to UTF-8.
pub fn decode_body(data: &[u8], charset: &str) -> String {
    let encoding = Encoding::for_label(charset.as_bytes()).unwrap_or(UTF_8);
    let (text, _, _) = encoding.decode(data);

    text.into_owned()
}
