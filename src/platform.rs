use url::Url;

pub const UNKNOWN_PLATFORM: &str = "Unknown";

/// Host fragments with a fixed display name. Anything else gets a
/// best-effort label derived from its first host label.
const PLATFORM_DOMAINS: &[(&str, &str)] = &[
    ("udemy.com", "Udemy"),
    ("coursera.org", "Coursera"),
    ("edx.org", "edX"),
    ("platzi.com", "Platzi"),
];

/// Canonical platform label for a course URL. Anything that is not a web
/// URL, or fails to parse, maps to `"Unknown"` rather than erroring.
pub fn normalize_platform(url: Option<&str>) -> String {
    let Some(raw) = url else {
        return UNKNOWN_PLATFORM.to_string();
    };
    if !raw.starts_with("http") {
        return UNKNOWN_PLATFORM.to_string();
    }

    let Ok(parsed) = Url::parse(raw) else {
        return UNKNOWN_PLATFORM.to_string();
    };
    let Some(host) = parsed.host_str() else {
        return UNKNOWN_PLATFORM.to_string();
    };

    for (fragment, name) in PLATFORM_DOMAINS {
        if host.contains(fragment) {
            return (*name).to_string();
        }
    }

    match host.trim_start_matches("www.").split('.').next() {
        Some(label) if !label.is_empty() => capitalize(label),
        _ => UNKNOWN_PLATFORM.to_string(),
    }
}

fn capitalize(label: &str) -> String {
    let mut chars = label.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}
