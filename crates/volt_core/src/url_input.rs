use url::form_urlencoded;

/// Location shown before anything has been navigated.
pub const HOME_LOCATION: &str = "volt://newtab";

/// Prefix of locations served by the shell itself.
pub const INTERNAL_SCHEME: &str = "volt://";

/// Endpoint used for anything typed into the address bar that is not a URL.
pub const SEARCH_ENDPOINT: &str = "https://www.google.com/search";

const PASSTHROUGH_PREFIXES: [&str; 3] = ["http://", "https://", INTERNAL_SCHEME];

/// Shortcuts offered on the home screen, in display order.
pub const QUICK_ACCESS_SITES: [&str; 8] = [
    "Google",
    "YouTube",
    "GitHub",
    "Twitter",
    "Reddit",
    "Wikipedia",
    "Stack Overflow",
    "LinkedIn",
];

/// Turns raw address-bar text into something the content surface can load.
///
/// Text that already carries an `http://`, `https://` or internal scheme prefix
/// is returned untouched; anything else becomes a search query against
/// [`SEARCH_ENDPOINT`]. Callers reject blank input before calling this.
pub fn normalize_address(raw: &str) -> String {
    if PASSTHROUGH_PREFIXES
        .iter()
        .any(|prefix| raw.starts_with(prefix))
    {
        return raw.to_string();
    }

    let query = form_urlencoded::Serializer::new(String::new())
        .append_pair("q", raw)
        .finish();
    format!("{SEARCH_ENDPOINT}?{query}")
}

/// Location a quick-access shortcut navigates to: `https://www.<name>.com`.
pub fn shortcut_location(site: &str) -> String {
    let host: String = site
        .to_lowercase()
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect();
    format!("https://www.{host}.com")
}

pub fn is_home(location: &str) -> bool {
    location == HOME_LOCATION
}
