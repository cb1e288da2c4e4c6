// Extraction client seam
use std::collections::HashMap;
use std::io;
use std::pin::Pin;

use async_trait::async_trait;
use axum::body::Bytes;
use futures::Stream;

pub mod link;
pub mod ytdlp;

pub use link::is_youtube_url;
pub use ytdlp::YtDlpClient;

pub type ByteStream = Pin<Box<dyn Stream<Item = io::Result<Bytes>> + Send>>;

#[derive(Debug, Clone, PartialEq)]
pub struct Thumbnail {
    pub url: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Author {
    pub name: String,
}

/// An encoding as reported by the extractor, before any filtering.
#[derive(Debug, Clone, PartialEq)]
pub struct RawFormat {
    pub quality_label: Option<String>,
    pub container: String,
    pub url: String,
    pub itag: u32,
    pub has_video: bool,
    pub has_audio: bool,
    pub height: Option<u32>,
    pub bitrate: Option<f64>,
    /// Request headers the media host expects when fetching `url`.
    pub http_headers: HashMap<String, String>,
}

impl RawFormat {
    pub fn is_combined(&self) -> bool {
        self.has_video && self.has_audio
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RawVideoInfo {
    pub title: String,
    /// Ordered smallest to largest.
    pub thumbnails: Vec<Thumbnail>,
    pub length_seconds: u64,
    pub author: Author,
    pub formats: Vec<RawFormat>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QualitySelector {
    Highest,
    Itag(u32),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamOptions {
    pub container: String,
    pub quality: QualitySelector,
}

pub struct MediaStream {
    pub content_length: Option<u64>,
    pub body: ByteStream,
}

/// Resolves video links into metadata and media bytes.
#[async_trait]
pub trait ExtractionClient: Send + Sync {
    fn validate(&self, url: &str) -> bool;

    async fn get_info(&self, url: &str) -> anyhow::Result<RawVideoInfo>;

    /// Opens the combined encoding picked by `options` out of `info`, which
    /// must come from an earlier `get_info` for the same `url`.
    async fn open_stream(
        &self,
        url: &str,
        info: &RawVideoInfo,
        options: &StreamOptions,
    ) -> anyhow::Result<MediaStream>;
}

/// Picks the combined format matching `options`.
///
/// A specific itag wins regardless of container. `Highest` only considers the
/// requested container and ranks by height, then bitrate.
pub fn choose_format<'a>(
    formats: &'a [RawFormat],
    options: &StreamOptions,
) -> Option<&'a RawFormat> {
    let mut combined = formats.iter().filter(|f| f.is_combined());
    match options.quality {
        QualitySelector::Itag(itag) => combined.find(|f| f.itag == itag),
        QualitySelector::Highest => combined
            .filter(|f| f.container.eq_ignore_ascii_case(&options.container))
            .max_by(|a, b| {
                a.height
                    .unwrap_or(0)
                    .cmp(&b.height.unwrap_or(0))
                    .then_with(|| {
                        a.bitrate
                            .unwrap_or(0.0)
                            .total_cmp(&b.bitrate.unwrap_or(0.0))
                    })
            }),
    }
}
