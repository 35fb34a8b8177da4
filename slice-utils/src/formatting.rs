use std::time::Duration;

/// Discord's limit on a single embed field value.
pub const EMBED_FIELD_LIMIT: usize = 1024;

/// Format seconds into a compact human-readable duration (e.g. 59s, 1m, 1h 30m, 1d 1h).
pub fn format_compact_duration(total_seconds: u64) -> String {
    let days = total_seconds / 86_400;
    let hours = (total_seconds % 86_400) / 3_600;
    let minutes = (total_seconds % 3_600) / 60;
    let seconds = total_seconds % 60;

    if days > 0 {
        return if hours > 0 {
            format!("{}d {}h", days, hours)
        } else {
            format!("{}d", days)
        };
    }

    let parts: Vec<String> = [(hours, 'h'), (minutes, 'm'), (seconds, 's')]
        .into_iter()
        .filter(|(value, _)| *value > 0)
        .map(|(value, unit)| format!("{}{}", value, unit))
        .collect();

    if parts.is_empty() {
        "0s".to_owned()
    } else {
        parts.join(" ")
    }
}

/// Long-form uptime, e.g. "1 day, 2 hours, 3 minutes, 4 seconds".
///
/// Zero components are skipped; seconds are always shown when nothing else is.
pub fn format_uptime(total_seconds: u64) -> String {
    let days = total_seconds / 86_400;
    let hours = (total_seconds % 86_400) / 3_600;
    let minutes = (total_seconds % 3_600) / 60;
    let seconds = total_seconds % 60;

    let mut parts = Vec::new();
    for (value, unit) in [(days, "day"), (hours, "hour"), (minutes, "minute")] {
        if value > 0 {
            parts.push(pluralize(value, unit));
        }
    }
    if seconds > 0 || parts.is_empty() {
        parts.push(pluralize(seconds, "second"));
    }

    parts.join(", ")
}

fn pluralize(value: u64, unit: &str) -> String {
    if value == 1 {
        format!("{} {}", value, unit)
    } else {
        format!("{} {}s", value, unit)
    }
}

/// Cooldown rejection message with one decimal of remaining time.
pub fn format_retry_after(remaining: Duration) -> String {
    format!("slow down, try again in {:.1}s", remaining.as_secs_f64())
}

/// Join mentions, or summarise with a count when the list would overflow a field.
pub fn join_mentions_or_count(mentions: &[String], noun: &str) -> String {
    let joined = mentions.join(", ");
    if joined.len() <= EMBED_FIELD_LIMIT {
        joined
    } else {
        format!("{} {}", mentions.len(), noun)
    }
}

pub fn user_mention(id: u64) -> String {
    format!("<@{}>", id)
}

pub fn role_mention(id: u64) -> String {
    format!("<@&{}>", id)
}

pub fn channel_mention(id: u64) -> String {
    format!("<#{}>", id)
}

/// Convert `SCREAMING_SNAKE` feature flags to title case ("ANIMATED_ICON" -> "Animated Icon").
pub fn title_case_identifier(raw: &str) -> String {
    raw.trim()
        .split('_')
        .filter(|part| !part.is_empty())
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => format!(
                    "{}{}",
                    first.to_uppercase(),
                    chars.as_str().to_ascii_lowercase()
                ),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compact_duration_formatting() {
        assert_eq!(format_compact_duration(0), "0s");
        assert_eq!(format_compact_duration(59), "59s");
        assert_eq!(format_compact_duration(60), "1m");
        assert_eq!(format_compact_duration(61), "1m 1s");
        assert_eq!(format_compact_duration(3600), "1h");
        assert_eq!(format_compact_duration(3605), "1h 5s");
        assert_eq!(format_compact_duration(3670), "1h 1m 10s");
        assert_eq!(format_compact_duration(90000), "1d 1h");
        assert_eq!(format_compact_duration(28 * 86_400), "28d");
    }

    #[test]
    fn uptime_wording() {
        assert_eq!(format_uptime(0), "0 seconds");
        assert_eq!(format_uptime(1), "1 second");
        assert_eq!(format_uptime(60), "1 minute");
        assert_eq!(
            format_uptime(86_400 + 2 * 3_600 + 3 * 60 + 4),
            "1 day, 2 hours, 3 minutes, 4 seconds"
        );
        assert_eq!(format_uptime(2 * 86_400), "2 days");
    }

    #[test]
    fn retry_after_has_one_decimal() {
        assert_eq!(
            format_retry_after(Duration::from_secs(2)),
            "slow down, try again in 2.0s"
        );
        assert_eq!(
            format_retry_after(Duration::from_millis(1_300)),
            "slow down, try again in 1.3s"
        );
    }

    #[test]
    fn overflowing_mentions_collapse_to_count() {
        let short = vec![role_mention(1), role_mention(2)];
        assert_eq!(join_mentions_or_count(&short, "roles"), "<@&1>, <@&2>");

        let long: Vec<String> = (0..200).map(|id| role_mention(10_000_000 + id)).collect();
        assert_eq!(join_mentions_or_count(&long, "roles"), "200 roles");
    }

    #[test]
    fn identifiers_become_title_case() {
        assert_eq!(title_case_identifier("ANIMATED_ICON"), "Animated Icon");
        assert_eq!(title_case_identifier("COMMUNITY"), "Community");
        assert_eq!(title_case_identifier(""), "");
    }
}
