//! HTTP link preview resolver
//!
//! Turns a bare link in a starred message into an image for the star post.
//! A link counts when it serves an image directly. Other pages on the
//! metadata host (a GIF site) are read for their media URL instead.

use std::sync::LazyLock;
use std::time::Duration;

use async_trait::async_trait;
use regex::Regex;
use reqwest::Client;
use tracing::{debug, warn};
use url::Url;

use starboard_common::LinkPreviewConfig;
use starboard_core::traits::LinkPreviewFetcher;

use super::error::{ServiceError, ServiceResult};

static CONTENT_URL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"<meta[^>]+itemprop=["']contentUrl["'][^>]+content=["']([^"']+)["']"#)
        .expect("valid contentUrl regex")
});

static CONTENT_URL_RE2: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"<meta[^>]+content=["']([^"']+)["'][^>]+itemprop=["']contentUrl["']"#)
        .expect("valid contentUrl regex")
});

static OG_IMAGE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"<meta[^>]+property=["']og:image["'][^>]+content=["']([^"']+)["']"#)
        .expect("valid og:image regex")
});

static OG_IMAGE_RE2: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"<meta[^>]+content=["']([^"']+)["'][^>]+property=["']og:image["']"#)
        .expect("valid og:image regex")
});

/// reqwest-backed link preview resolver
#[derive(Debug, Clone)]
pub struct HttpLinkResolver {
    client: Client,
    metadata_host: String,
}

impl HttpLinkResolver {
    /// Create a resolver from link preview settings
    pub fn new(config: &LinkPreviewConfig) -> ServiceResult<Self> {
        let client = Client::builder()
            .user_agent(&config.user_agent)
            .timeout(config.timeout())
            .connect_timeout(Duration::from_secs(config.timeout_secs.min(5)))
            .build()
            .map_err(|e| ServiceError::internal(format!("HTTP client: {e}")))?;

        Ok(Self {
            client,
            metadata_host: config.metadata_host.to_lowercase(),
        })
    }

    fn is_metadata_host(&self, url: &Url) -> bool {
        url.host_str().is_some_and(|host| {
            let host = host.to_lowercase();
            host == self.metadata_host || host.ends_with(&format!(".{}", self.metadata_host))
        })
    }
}

/// Media URL advertised by a page, resolved against the page URL
fn extract_media_url(html: &str, base: &Url) -> Option<String> {
    let raw = [&CONTENT_URL_RE, &CONTENT_URL_RE2, &OG_IMAGE_RE, &OG_IMAGE_RE2]
        .iter()
        .find_map(|re| re.captures(html))?
        .get(1)?
        .as_str()
        .replace("&amp;", "&");

    base.join(&raw).ok().map(String::from)
}

fn is_image_content_type(content_type: &str) -> bool {
    content_type
        .trim_start()
        .to_ascii_lowercase()
        .starts_with("image/")
}

/// How a fetched link is turned into an image
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LinkKind {
    /// The link itself serves an image
    Image,
    /// A metadata host page to read for its media URL
    Page,
    Other,
}

fn classify(content_type: &str, on_metadata_host: bool) -> LinkKind {
    if is_image_content_type(content_type) {
        LinkKind::Image
    } else if on_metadata_host {
        LinkKind::Page
    } else {
        LinkKind::Other
    }
}

#[async_trait]
impl LinkPreviewFetcher for HttpLinkResolver {
    async fn resolve_image(&self, url: &str) -> Option<String> {
        let parsed = match Url::parse(url) {
            Ok(u) => u,
            Err(e) => {
                debug!(url, error = %e, "Not a URL");
                return None;
            }
        };
        if parsed.scheme() != "http" && parsed.scheme() != "https" {
            return None;
        }

        let response = match self.client.get(parsed.clone()).send().await {
            Ok(r) => r,
            Err(e) => {
                warn!(url, error = %e, "Link preview fetch failed");
                return None;
            }
        };

        if !response.status().is_success() {
            debug!(url, status = %response.status(), "Link preview returned non-success status");
            return None;
        }

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
            .to_string();

        match classify(&content_type, self.is_metadata_host(&parsed)) {
            LinkKind::Image => Some(parsed.into()),
            LinkKind::Page => {
                let body = match response.text().await {
                    Ok(b) => b,
                    Err(e) => {
                        warn!(url, error = %e, "Failed to read link preview body");
                        return None;
                    }
                };
                extract_media_url(&body, &parsed)
            }
            LinkKind::Other => {
                debug!(url, content_type = %content_type, "Link is not an image");
                None
            }
        }
    }
}
