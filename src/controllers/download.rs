use std::io;

use axum::{
    body::{Body, Bytes},
    http::{
        header::{CONTENT_DISPOSITION, CONTENT_LENGTH, CONTENT_TYPE},
        HeaderMap, HeaderValue, StatusCode,
    },
    response::{IntoResponse, Response},
};
use futures::{Stream, StreamExt};
use tracing::{debug, error, info, warn};

use super::required_url;
use crate::{
    error::ApiError,
    extractor::{ByteStream, ExtractionClient, QualitySelector, StreamOptions},
};

const CONTAINER: &str = "mp4";
const FALLBACK_NAME: &str = "video";

pub struct DownloadController;

impl DownloadController {
    /// Resolves the encoding and relays its bytes as an attachment.
    ///
    /// The upstream stream is opened before any header is sent, so every
    /// extractor failure still maps to a 500. Once the body is flowing an
    /// upstream error can only cut the transfer short.
    pub async fn download(
        client: &dyn ExtractionClient,
        url: Option<&str>,
        itag: Option<&str>,
    ) -> Result<Response, ApiError> {
        let url = required_url(url)?;
        if !client.validate(url) {
            return Err(ApiError::invalid_url());
        }
        let quality = parse_selector(itag);

        let raw = client.get_info(url).await.map_err(|e| {
            error!("Error downloading {}: {:#}", url, e);
            ApiError::DownloadFailed
        })?;
        let disposition = content_disposition(&raw.title);

        let options = StreamOptions {
            container: CONTAINER.to_string(),
            quality,
        };
        let media = client.open_stream(url, &raw, &options).await.map_err(|e| {
            error!("Error opening stream for {} ({:?}): {:#}", url, quality, e);
            ApiError::DownloadFailed
        })?;

        let mut headers = HeaderMap::new();
        let disposition = HeaderValue::from_str(&disposition).map_err(|e| {
            error!("Unusable Content-Disposition {:?}: {}", disposition, e);
            ApiError::DownloadFailed
        })?;
        headers.insert(CONTENT_DISPOSITION, disposition);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("video/mp4"));
        if let Some(len) = media.content_length {
            headers.insert(CONTENT_LENGTH, HeaderValue::from(len));
        }

        info!("Relaying {} ({:?}) for {}", CONTAINER, quality, url);
        let body = Body::from_stream(relay(media.body, url.to_string()));
        Ok((StatusCode::OK, headers, body).into_response())
    }
}

/// A selector that is absent or not a plain integer means "highest".
pub fn parse_selector(itag: Option<&str>) -> QualitySelector {
    match itag.map(str::trim).map(str::parse::<u32>) {
        Some(Ok(itag)) => QualitySelector::Itag(itag),
        _ => QualitySelector::Highest,
    }
}

/// Keeps ASCII word characters and whitespace; whitespace becomes a plain space.
pub fn sanitize_title(title: &str) -> String {
    title
        .chars()
        .filter_map(|c| {
            if c.is_ascii_alphanumeric() || c == '_' {
                Some(c)
            } else if c.is_whitespace() {
                Some(' ')
            } else {
                None
            }
        })
        .collect()
}

pub fn content_disposition(title: &str) -> String {
    let name = sanitize_title(title);
    let name = if name.trim().is_empty() {
        FALLBACK_NAME
    } else {
        name.as_str()
    };
    format!("attachment; filename=\"{}.{}\"", name, CONTAINER)
}

/// Forwards upstream chunks one at a time. Dropping the returned stream drops
/// `upstream`, which releases the upstream connection.
fn relay(
    mut upstream: ByteStream,
    source: String,
) -> impl Stream<Item = io::Result<Bytes>> + Send + 'static {
    async_stream::stream! {
        let mut relayed: u64 = 0;
        while let Some(chunk) = upstream.next().await {
            match chunk {
                Ok(bytes) => {
                    relayed += bytes.len() as u64;
                    yield Ok(bytes);
                }
                Err(e) => {
                    warn!("Upstream failed after {} bytes for {}: {}", relayed, source, e);
                    yield Err(e);
                    break;
                }
            }
        }
        debug!("Relay for {} ended after {} bytes", source, relayed);
    }
}
