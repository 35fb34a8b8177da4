use std::time::{SystemTime, UNIX_EPOCH};

/// Return the current unix timestamp in seconds.
pub fn now_unix_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |duration| duration.as_secs())
}

/// Discord timestamp markup, e.g. `<t:1700000000:F>`.
pub fn discord_timestamp(unix_secs: i64, style: char) -> String {
    format!("<t:{unix_secs}:{style}>")
}

/// Absolute plus relative Discord timestamp markup.
pub fn discord_timestamp_with_relative(unix_secs: i64) -> String {
    format!(
        "{} ({})",
        discord_timestamp(unix_secs, 'F'),
        discord_timestamp(unix_secs, 'R')
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_discord_markup() {
        assert_eq!(discord_timestamp(42, 'f'), "<t:42:f>");
        assert_eq!(
            discord_timestamp_with_relative(42),
            "<t:42:F> (<t:42:R>)"
        );
    }
}
