use tracing::{error, info};

use super::required_url;
use crate::{
    error::ApiError,
    extractor::{ExtractionClient, RawVideoInfo},
    models::video::{FormatDescriptor, VideoMetadata},
};

pub struct InfoController;

impl InfoController {
    pub async fn get_info(
        client: &dyn ExtractionClient,
        url: Option<&str>,
    ) -> Result<VideoMetadata, ApiError> {
        let url = required_url(url)?;
        if !client.validate(url) {
            return Err(ApiError::invalid_url());
        }

        let raw = client.get_info(url).await.map_err(|e| {
            error!("Error fetching info for {}: {:#}", url, e);
            ApiError::UpstreamFetchFailed
        })?;

        let metadata = Self::project(raw);
        info!(
            "Fetched info for {}: {:?}, {} combined formats",
            url,
            metadata.title,
            metadata.formats.len()
        );
        Ok(metadata)
    }

    /// Reduces extractor output to the public view, keeping only combined formats.
    pub fn project(raw: RawVideoInfo) -> VideoMetadata {
        let thumbnail = raw
            .thumbnails
            .last()
            .map(|t| t.url.clone())
            .unwrap_or_default();

        let formats = raw
            .formats
            .into_iter()
            .filter(|f| f.is_combined())
            .map(|f| FormatDescriptor {
                quality: f.quality_label,
                container: f.container,
                url: f.url,
                has_video: f.has_video,
                has_audio: f.has_audio,
                itag: f.itag,
            })
            .collect();

        VideoMetadata {
            title: raw.title,
            thumbnail,
            duration: raw.length_seconds,
            author: raw.author.name,
            formats,
        }
    }
}
