// yt-dlp backed extraction client
use std::collections::HashMap;
use std::io;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{anyhow, Context};
use async_trait::async_trait;
use futures::TryStreamExt;
use reqwest::Client;
use serde::Deserialize;
use tokio::process::Command;
use tracing::{debug, error};

use super::{
    choose_format, is_youtube_url, Author, ExtractionClient, MediaStream, RawFormat,
    RawVideoInfo, StreamOptions, Thumbnail,
};
use crate::config::ConfigManager;

#[derive(Debug, Deserialize)]
struct YtDlpVideo {
    #[serde(default)]
    title: String,
    #[serde(default)]
    thumbnails: Vec<YtDlpThumbnail>,
    thumbnail: Option<String>,
    duration: Option<f64>,
    uploader: Option<String>,
    channel: Option<String>,
    #[serde(default)]
    formats: Vec<YtDlpFormat>,
}

#[derive(Debug, Deserialize)]
struct YtDlpThumbnail {
    url: String,
}

#[derive(Debug, Deserialize)]
struct YtDlpFormat {
    format_id: String,
    ext: Option<String>,
    url: Option<String>,
    protocol: Option<String>,
    vcodec: Option<String>,
    acodec: Option<String>,
    height: Option<u32>,
    fps: Option<f64>,
    tbr: Option<f64>,
    #[serde(default)]
    http_headers: HashMap<String, String>,
}

fn has_codec(codec: &Option<String>) -> bool {
    codec.as_deref().is_some_and(|c| c != "none")
}

impl YtDlpFormat {
    /// Numeric itag, for formats that can be fetched with one plain GET.
    fn itag(&self) -> Option<u32> {
        let direct = match self.protocol.as_deref() {
            Some(p) => p == "https" || p == "http",
            None => true,
        };
        if !direct || self.url.is_none() {
            return None;
        }
        self.format_id.parse().ok()
    }

    fn quality_label(&self) -> Option<String> {
        let height = self.height?;
        match self.fps {
            Some(fps) if fps > 30.0 => Some(format!("{}p{}", height, fps.round() as u32)),
            _ => Some(format!("{}p", height)),
        }
    }

    fn to_raw(&self) -> Option<RawFormat> {
        Some(RawFormat {
            quality_label: self.quality_label(),
            container: self.ext.clone().unwrap_or_default(),
            url: self.url.clone()?,
            itag: self.itag()?,
            has_video: has_codec(&self.vcodec),
            has_audio: has_codec(&self.acodec),
            height: self.height,
            bitrate: self.tbr,
            http_headers: self.http_headers.clone(),
        })
    }
}

impl YtDlpVideo {
    fn to_raw(&self) -> RawVideoInfo {
        let mut thumbnails: Vec<Thumbnail> = self
            .thumbnails
            .iter()
            .map(|t| Thumbnail { url: t.url.clone() })
            .collect();
        if thumbnails.is_empty() {
            if let Some(url) = &self.thumbnail {
                thumbnails.push(Thumbnail { url: url.clone() });
            }
        }

        RawVideoInfo {
            title: self.title.clone(),
            thumbnails,
            length_seconds: self.duration.map(|d| d.max(0.0) as u64).unwrap_or(0),
            author: Author {
                name: self
                    .uploader
                    .clone()
                    .or_else(|| self.channel.clone())
                    .unwrap_or_default(),
            },
            formats: self.formats.iter().filter_map(YtDlpFormat::to_raw).collect(),
        }
    }
}

pub struct YtDlpClient {
    binary: PathBuf,
    timeout: Duration,
    client: Client,
}

impl YtDlpClient {
    pub fn new(
        binary: impl Into<PathBuf>,
        timeout: Duration,
        connect_timeout: Duration,
    ) -> anyhow::Result<Self> {
        let client = Client::builder()
            .connect_timeout(connect_timeout)
            .redirect(reqwest::redirect::Policy::limited(5))
            .build()?;
        Ok(Self {
            binary: binary.into(),
            timeout,
            client,
        })
    }

    pub fn from_config(config: &ConfigManager) -> anyhow::Result<Self> {
        Self::new(
            config.get("YTDLP_PATH"),
            config.extractor_timeout(),
            config.upstream_connect_timeout(),
        )
    }

    async fn dump_json(&self, url: &str) -> anyhow::Result<YtDlpVideo> {
        debug!("yt-dlp metadata for {}", url);
        let mut command = Command::new(&self.binary);
        command
            .arg("--dump-single-json")
            .arg("--no-playlist")
            .arg("--no-warnings")
            .arg("--")
            .arg(url)
            .kill_on_drop(true);

        let output = tokio::time::timeout(self.timeout, command.output())
            .await
            .map_err(|_| anyhow!("yt-dlp timed out after {:?}", self.timeout))?
            .with_context(|| format!("failed to run {}", self.binary.display()))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            error!("yt-dlp extraction failed: {}", stderr.trim());
            return Err(anyhow!("yt-dlp exited with {}: {}", output.status, stderr.trim()));
        }

        let video: YtDlpVideo = serde_json::from_slice(&output.stdout)
            .context("yt-dlp produced unreadable metadata")?;
        Ok(video)
    }
}

#[async_trait]
impl ExtractionClient for YtDlpClient {
    fn validate(&self, url: &str) -> bool {
        is_youtube_url(url)
    }

    async fn get_info(&self, url: &str) -> anyhow::Result<RawVideoInfo> {
        Ok(self.dump_json(url).await?.to_raw())
    }

    async fn open_stream(
        &self,
        url: &str,
        info: &RawVideoInfo,
        options: &StreamOptions,
    ) -> anyhow::Result<MediaStream> {
        let format = choose_format(&info.formats, options)
            .ok_or_else(|| anyhow!("no combined format matches {:?}", options))?;
        debug!(
            "streaming itag {} ({}) for {}",
            format.itag,
            format.quality_label.as_deref().unwrap_or("unknown"),
            url
        );

        let mut request = self.client.get(&format.url);
        for (name, value) in &format.http_headers {
            request = request.header(name.as_str(), value.as_str());
        }
        let response = request.send().await?.error_for_status()?;

        Ok(MediaStream {
            content_length: response.content_length(),
            body: Box::pin(response.bytes_stream().map_err(io::Error::other)),
        })
    }
}
