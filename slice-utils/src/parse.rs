use std::collections::HashSet;

/// Parse a compact duration like `30s`, `10m`, `2h`, `1d`, `1h30m`, or plain seconds.
///
/// A bare number is only accepted on its own; once a unit appears every
/// segment needs one. Zero and overflowing totals are rejected.
pub fn parse_duration_seconds(raw: &str) -> Option<u64> {
    let compact: String = raw.chars().filter(|ch| !ch.is_whitespace()).collect();
    if compact.is_empty() {
        return None;
    }

    if compact.bytes().all(|byte| byte.is_ascii_digit()) {
        return compact.parse::<u64>().ok().filter(|seconds| *seconds > 0);
    }

    let mut total = 0_u64;
    let mut digits = String::new();

    for ch in compact.chars() {
        if ch.is_ascii_digit() {
            digits.push(ch);
            continue;
        }

        let unit_seconds = match ch.to_ascii_lowercase() {
            's' => 1_u64,
            'm' => 60,
            'h' => 3_600,
            'd' => 86_400,
            _ => return None,
        };

        let value = digits.parse::<u64>().ok().filter(|value| *value > 0)?;
        digits.clear();
        total = total.checked_add(value.checked_mul(unit_seconds)?)?;
    }

    if !digits.is_empty() || total == 0 {
        return None;
    }

    Some(total)
}

/// Parse a user, role or channel mention, or a raw snowflake.
pub fn parse_snowflake(raw: &str) -> Option<u64> {
    let trimmed = raw.trim();
    let inner = trimmed
        .strip_prefix('<')
        .and_then(|rest| rest.strip_suffix('>'))
        .map(|rest| rest.trim_start_matches(['@', '#', '!', '&']))
        .unwrap_or(trimmed);

    inner.parse::<u64>().ok().filter(|id| *id > 0)
}

/// Parse a list of guild ids separated by commas and/or whitespace.
///
/// Invalid tokens are skipped.
pub fn parse_id_list(raw: &str) -> HashSet<u64> {
    raw.split(|ch: char| ch == ',' || ch.is_whitespace())
        .filter(|token| !token.is_empty())
        .filter_map(|token| token.parse::<u64>().ok())
        .collect()
}

/// Interpret an environment flag value.
pub fn parse_flag(raw: &str) -> bool {
    matches!(
        raw.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "y" | "on"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_compact_durations() {
        assert_eq!(parse_duration_seconds("30s"), Some(30));
        assert_eq!(parse_duration_seconds("10m"), Some(600));
        assert_eq!(parse_duration_seconds("2H"), Some(7_200));
        assert_eq!(parse_duration_seconds("1d"), Some(86_400));
        assert_eq!(parse_duration_seconds("1h 30m"), Some(5_400));
        assert_eq!(parse_duration_seconds("45"), Some(45));
    }

    #[test]
    fn rejects_bad_durations() {
        assert_eq!(parse_duration_seconds(""), None);
        assert_eq!(parse_duration_seconds("0"), None);
        assert_eq!(parse_duration_seconds("0m"), None);
        assert_eq!(parse_duration_seconds("10x"), None);
        assert_eq!(parse_duration_seconds("1h30"), None);
        assert_eq!(parse_duration_seconds("m"), None);
        assert_eq!(parse_duration_seconds("99999999999999999999d"), None);
    }

    #[test]
    fn parses_mentions_and_ids() {
        assert_eq!(parse_snowflake("123"), Some(123));
        assert_eq!(parse_snowflake("<@123>"), Some(123));
        assert_eq!(parse_snowflake("<@!123>"), Some(123));
        assert_eq!(parse_snowflake("<@&77>"), Some(77));
        assert_eq!(parse_snowflake(" <#9> "), Some(9));
        assert_eq!(parse_snowflake("abc"), None);
        assert_eq!(parse_snowflake("0"), None);
    }

    #[test]
    fn id_lists_skip_garbage() {
        let ids = parse_id_list("1, 2 3,,nope 4");
        assert_eq!(ids, HashSet::from([1, 2, 3, 4]));
        assert!(parse_id_list("").is_empty());
    }

    #[test]
    fn flags() {
        for yes in ["1", "true", "YES", " y ", "on"] {
            assert!(parse_flag(yes));
        }
        for no in ["0", "false", "", "nah"] {
            assert!(!parse_flag(no));
        }
    }
}
