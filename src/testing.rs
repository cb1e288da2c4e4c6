// Stub extraction client shared by unit tests
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use anyhow::anyhow;
use async_trait::async_trait;
use axum::body::Bytes;
use futures::stream;

use crate::extractor::{
    Author, ExtractionClient, MediaStream, RawFormat, RawVideoInfo, StreamOptions, Thumbnail,
};

type StreamFactory = Box<dyn Fn() -> anyhow::Result<MediaStream> + Send + Sync>;

pub struct StubClient {
    pub valid: bool,
    pub info: Option<RawVideoInfo>,
    stream: StreamFactory,
    pub info_calls: AtomicUsize,
    pub stream_calls: AtomicUsize,
    pub last_options: Mutex<Option<StreamOptions>>,
}

impl StubClient {
    pub fn new(info: RawVideoInfo) -> Self {
        Self {
            valid: true,
            info: Some(info),
            stream: Box::new(|| Ok(bytes_stream(vec![b"media".to_vec()]))),
            info_calls: AtomicUsize::new(0),
            stream_calls: AtomicUsize::new(0),
            last_options: Mutex::new(None),
        }
    }

    pub fn failing() -> Self {
        Self {
            info: None,
            ..Self::new(sample_info())
        }
    }

    pub fn rejecting_urls(mut self) -> Self {
        self.valid = false;
        self
    }

    pub fn with_stream<F>(mut self, factory: F) -> Self
    where
        F: Fn() -> anyhow::Result<MediaStream> + Send + Sync + 'static,
    {
        self.stream = Box::new(factory);
        self
    }

    pub fn outbound_calls(&self) -> usize {
        self.info_calls.load(Ordering::SeqCst) + self.stream_calls.load(Ordering::SeqCst)
    }

    pub fn requested(&self) -> Option<StreamOptions> {
        self.last_options.lock().unwrap().clone()
    }
}

#[async_trait]
impl ExtractionClient for StubClient {
    fn validate(&self, _url: &str) -> bool {
        self.valid
    }

    async fn get_info(&self, _url: &str) -> anyhow::Result<RawVideoInfo> {
        self.info_calls.fetch_add(1, Ordering::SeqCst);
        self.info
            .clone()
            .ok_or_else(|| anyhow!("Status code: 410 sign in to confirm you're not a bot"))
    }

    async fn open_stream(
        &self,
        _url: &str,
        _info: &RawVideoInfo,
        options: &StreamOptions,
    ) -> anyhow::Result<MediaStream> {
        self.stream_calls.fetch_add(1, Ordering::SeqCst);
        *self.last_options.lock().unwrap() = Some(options.clone());
        (self.stream)()
    }
}

pub fn bytes_stream(chunks: Vec<Vec<u8>>) -> MediaStream {
    let total = chunks.iter().map(|c| c.len() as u64).sum();
    MediaStream {
        content_length: Some(total),
        body: Box::pin(stream::iter(
            chunks.into_iter().map(|c| Ok(Bytes::from(c))),
        )),
    }
}

pub fn raw_format(
    quality: &str,
    itag: u32,
    url: &str,
    has_video: bool,
    has_audio: bool,
) -> RawFormat {
    RawFormat {
        quality_label: Some(quality.to_string()),
        container: "mp4".to_string(),
        url: url.to_string(),
        itag,
        has_video,
        has_audio,
        height: quality.trim_end_matches('p').parse().ok(),
        bitrate: None,
        http_headers: HashMap::new(),
    }
}

/// The "Test Video" fixture: one combined 720p and one video-only 1080p.
pub fn sample_info() -> RawVideoInfo {
    RawVideoInfo {
        title: "Test Video".to_string(),
        thumbnails: vec![
            Thumbnail { url: "t1".to_string() },
            Thumbnail { url: "t2".to_string() },
        ],
        length_seconds: 125,
        author: Author {
            name: "Author".to_string(),
        },
        formats: vec![
            raw_format("720p", 22, "u1", true, true),
            raw_format("1080p", 37, "u2", true, false),
        ],
    }
}
