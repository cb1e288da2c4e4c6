/// Hosts where the video id travels in the `v` query parameter
const QUERY_HOSTS: &[&str] = &[
    "youtube.com",
    "www.youtube.com",
    "m.youtube.com",
    "music.youtube.com",
    "gaming.youtube.com",
];

/// Host and first path segment for links that carry the id as the next segment
const PATH_PREFIXES: &[(&str, &str)] = &[
    ("youtube.com", "embed"),
    ("youtube.com", "v"),
    ("youtube.com", "shorts"),
    ("youtube.com", "live"),
    ("youtube-nocookie.com", "embed"),
];

const SHORT_HOST: &str = "youtu.be";

fn is_video_id(id: &str) -> bool {
    id.len() == 11
        && id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

/// Extracts the 11-character video id from a YouTube link.
pub fn video_id(link: &str) -> Option<String> {
    let parsed = url::Url::parse(link.trim()).ok()?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return None;
    }
    let host = parsed.host_str()?.to_ascii_lowercase();

    let id = if QUERY_HOSTS.contains(&host.as_str()) && parsed.path() == "/watch" {
        parsed
            .query_pairs()
            .find(|(k, _)| k == "v")
            .map(|(_, v)| v.into_owned())?
    } else {
        let bare_host = host.strip_prefix("www.").unwrap_or(&host);
        let bare_host = bare_host.strip_prefix("m.").unwrap_or(bare_host);
        let mut segments = parsed.path_segments()?;
        let first = segments.next()?;
        if bare_host == SHORT_HOST {
            first.to_string()
        } else {
            PATH_PREFIXES
                .iter()
                .find(|(domain, prefix)| *domain == bare_host && *prefix == first)?;
            segments.next()?.to_string()
        }
    };

    if is_video_id(&id) { Some(id) } else { None }
}

pub fn is_youtube_url(link: &str) -> bool {
    video_id(link).is_some()
}
