use url::Url;

const FALLBACK_OWNER: &str = "timeline";

/// Export filename for the page at `location`: `{owner}-{item}.tsv` for
/// `/owner/status/item`, `{owner}.tsv` when there is no item segment.
///
/// `location` may be a full URL or just its path.
pub fn export_filename(location: &str) -> String {
    let path = match Url::parse(location) {
        Ok(url) => url.path().to_string(),
        Err(_) => {
            let path = location.split(['?', '#']).next().unwrap_or_default();
            if path.starts_with('/') {
                path.to_string()
            } else {
                format!("/{path}")
            }
        }
    };

    let segments: Vec<&str> = path.split('/').collect();
    let owner = segments.get(1).map(|s| sanitize_segment(s)).filter(|s| !s.is_empty());
    let item = segments.get(3).map(|s| sanitize_segment(s)).filter(|s| !s.is_empty());

    match (owner, item) {
        (Some(owner), Some(item)) => format!("{owner}-{item}.tsv"),
        (Some(owner), None) => format!("{owner}.tsv"),
        (None, _) => format!("{FALLBACK_OWNER}.tsv"),
    }
}

fn sanitize_segment(input: &str) -> String {
    let cleaned: String = input
        .chars()
        .map(|c| if is_forbidden(c) { '_' } else { c })
        .collect();
    let mut cleaned = cleaned.trim_matches(&['_', ' ', '.'][..]).to_string();
    if is_reserved_windows_name(&cleaned) {
        cleaned.push('_');
    }
    cleaned
}

fn is_forbidden(c: char) -> bool {
    matches!(c,
        '\\' | '/' | ':' | '*' | '?' | '"' | '<' | '>' | '|' | '\0'..='\u{1F}'
    )
}

fn is_reserved_windows_name(name: &str) -> bool {
    const RESERVED: &[&str] = &[
        "CON", "PRN", "AUX", "NUL", "COM1", "COM2", "COM3", "COM4", "COM5", "COM6", "COM7", "COM8",
        "COM9", "LPT1", "LPT2", "LPT3", "LPT4", "LPT5", "LPT6", "LPT7", "LPT8", "LPT9",
    ];
    RESERVED.iter().any(|r| r.eq_ignore_ascii_case(name))
}
