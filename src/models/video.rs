use serde::{Deserialize, Serialize};

/// Public view returned by `GET /api/info`.
#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
pub struct VideoMetadata {
    pub title: String,
    pub thumbnail: String,
    pub duration: u64,
    pub author: String,
    pub formats: Vec<FormatDescriptor>,
}

/// One selectable combined audio+video encoding.
#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FormatDescriptor {
    pub quality: Option<String>,
    pub container: String,
    pub url: String,
    pub has_video: bool,
    pub has_audio: bool,
    pub itag: u32,
}

#[derive(Deserialize, Debug, Default)]
pub struct InfoQuery {
    pub url: Option<String>,
}

/// `itag` stays a string so an unparsable selector can fall back to "highest".
#[derive(Deserialize, Debug, Default)]
pub struct DownloadQuery {
    pub url: Option<String>,
    pub itag: Option<String>,
}
