use chrono::{ DateTime, Utc };

/// `$1.23M`, `$4.56K`, `$789`. With `no_decimals` the suffixed forms are rounded.
pub fn format_currency(value: f64, no_decimals: bool) -> String {
    let precision = if no_decimals { 0 } else { 2 };
    if value >= 1_000_000.0 {
        return format!("${:.*}M", precision, value / 1_000_000.0);
    }
    if value >= 1_000.0 {
        return format!("${:.*}K", precision, value / 1_000.0);
    }
    format!("${:.0}", value)
}

pub fn format_number(value: u64) -> String {
    if value >= 1_000 {
        return format!("{:.1}K", (value as f64) / 1_000.0);
    }
    value.to_string()
}

/// Compact age: `42s`, `17m`, `5h`.
pub fn format_time_ago(created_at: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let seconds = (now - created_at).num_seconds().max(0);
    if seconds < 60 {
        return format!("{}s", seconds);
    }
    let minutes = seconds / 60;
    if minutes < 60 {
        return format!("{}m", minutes);
    }
    format!("{}h", minutes / 60)
}

/// Host part of an image URL, `None` when there is none to show.
pub fn image_host(url: &str) -> Option<&str> {
    let rest = url.split_once("://").map_or(url, |(_, rest)| rest);
    let host = rest.split('/').next().unwrap_or_default().trim();
    if host.is_empty() { None } else { Some(host) }
}

/// `abcd...wxyz` for ids longer than eight characters.
pub fn short_id(id: &str) -> String {
    let chars: Vec<char> = id.chars().collect();
    if chars.len() <= 8 {
        return id.to_string();
    }
    let head: String = chars[..4].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{}...{}", head, tail)
}
