//! URL-shape guess for "this page is a video we could download".
//!
//! Only the location string is inspected; there is no access to response
//! headers, so false positives and negatives are expected.

const WATCH_PAGE_MARKERS: [&str; 1] = ["youtube.com/watch"];

const VIDEO_EXTENSIONS: [&str; 2] = [".mp4", ".mov"];

pub fn is_download_eligible(location: &str) -> bool {
    WATCH_PAGE_MARKERS
        .iter()
        .chain(VIDEO_EXTENSIONS.iter())
        .any(|marker| location.contains(marker))
}
