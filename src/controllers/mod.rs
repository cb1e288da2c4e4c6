pub mod download;
pub mod info;
pub use download::DownloadController;
pub use info::InfoController;

use crate::error::ApiError;

/// Rejects a missing or blank `url` parameter.
pub(crate) fn required_url(url: Option<&str>) -> Result<&str, ApiError> {
    match url.map(str::trim) {
        Some(url) if !url.is_empty() => Ok(url),
        _ => Err(ApiError::url_required()),
    }
}
