//! Canonical source selection.

use crate::model::{StreamFormat, StreamSource};

/// Choose one canonical source from a provider's result set.
///
/// Priority order: a source labeled with the "default" quality sentinel,
/// then the first segmented manifest (HLS), then the first direct file
/// (MP4), then the first element in input order. Returns `None` only for
/// an empty slice; callers treat that as "no playable source", which is
/// distinct from a transport failure.
///
/// The result depends only on the input sequence, so repeated calls on the
/// same slice always pick the same source.
#[must_use]
pub fn select_best_source(sources: &[StreamSource]) -> Option<&StreamSource> {
    sources
        .iter()
        .find(|s| s.is_default_quality())
        .or_else(|| sources.iter().find(|s| s.format == StreamFormat::Hls))
        .or_else(|| sources.iter().find(|s| s.format == StreamFormat::Mp4))
        .or_else(|| sources.first())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hls(url: &str) -> StreamSource {
        StreamSource::from_url(format!("{url}.m3u8"), None)
    }

    fn mp4(url: &str) -> StreamSource {
        StreamSource::from_url(format!("{url}.mp4"), None)
    }

    fn labeled_default(url: &str) -> StreamSource {
        StreamSource::from_url(format!("{url}.mp4"), Some("default".to_string()))
    }

    #[test]
    fn test_empty_returns_none() {
        assert!(select_best_source(&[]).is_none());
    }

    #[test]
    fn test_default_label_beats_format() {
        let sources = vec![hls("https://a/ep1"), mp4("https://a/ep1"), labeled_default("https://a/ep1-d")];
        let selected = select_best_source(&sources).unwrap();
        assert!(selected.is_default_quality());
    }

    #[test]
    fn test_hls_beats_mp4() {
        let sources = vec![mp4("https://a/ep1"), hls("https://a/ep1")];
        let selected = select_best_source(&sources).unwrap();
        assert_eq!(selected.format, StreamFormat::Hls);
    }

    #[test]
    fn test_mp4_only() {
        let sources = vec![mp4("https://a/ep1")];
        let selected = select_best_source(&sources).unwrap();
        assert_eq!(selected.format, StreamFormat::Mp4);
    }

    #[test]
    fn test_first_element_fallback() {
        let sources = vec![
            StreamSource::from_url("https://a/ep1/stream", None),
            StreamSource::from_url("https://a/ep1/other", None),
        ];
        let selected = select_best_source(&sources).unwrap();
        assert_eq!(selected.url, "https://a/ep1/stream");
    }

    #[test]
    fn test_deterministic_under_reordering() {
        // Whenever a default-labeled source exists, order never matters.
        let a = labeled_default("https://a/d");
        let b = hls("https://a/h");
        let c = mp4("https://a/m");

        let one = vec![a.clone(), b.clone(), c.clone()];
        let two = vec![c, b, a.clone()];

        assert_eq!(select_best_source(&one), Some(&a));
        assert_eq!(select_best_source(&two), Some(&a));
    }

    #[test]
    fn test_repeated_calls_agree() {
        let sources = vec![hls("https://a/1"), hls("https://a/2")];
        assert_eq!(select_best_source(&sources), select_best_source(&sources));
    }
}
