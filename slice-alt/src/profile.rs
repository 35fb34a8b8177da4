use serde_json::{Map, Value};

/// Keys that are dropped from provider payloads before anything is read.
const SENSITIVE_KEYS: &[&str] = &[
    "password",
    "pass",
    "pwd",
    "token",
    "roblosecurity",
    ".roblosecurity",
    "cookie",
    "session",
    "otp",
    "2fa",
    "auth",
    "secret",
    "email",
];

const QUOTA_PHRASES: &[&str] = &[
    "quota",
    "token",
    "limit",
    "exceeded",
    "insufficient",
    "balance",
];

pub const NOTE_MAX_CHARS: usize = 150;

/// The public half of a provider account. Never holds credentials.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AltProfile {
    pub username: String,
    pub display_name: Option<String>,
    pub user_id: Option<String>,
    pub created_at: Option<String>,
    pub avatar_url: Option<String>,
    pub bio: Option<String>,
    pub note: Option<String>,
    pub expires_at: Option<String>,
}

impl AltProfile {
    /// Reduce a raw provider payload; `None` when it carries no username.
    pub fn from_value(raw: &Value) -> Option<Self> {
        let sanitized = sanitize(raw);
        let Value::Object(map) = &sanitized else {
            return None;
        };

        let username = first_string(map, &["username", "name", "user"])?;
        let meta = map.get("meta").and_then(Value::as_object);
        let note = meta
            .and_then(|meta| first_string(meta, &["note"]))
            .or_else(|| first_string(map, &["note"]))
            .map(|note| note.chars().take(NOTE_MAX_CHARS).collect());
        let expires_at = meta
            .and_then(|meta| first_string(meta, &["expiresAt", "expires_at"]))
            .or_else(|| first_string(map, &["expiresAt", "expires_at"]));

        Some(Self {
            username,
            display_name: first_string(map, &["displayName", "display_name"]),
            user_id: first_string(map, &["userId", "id", "userid"]),
            created_at: first_string(map, &["createdAt", "creationDate", "created_at", "created"])
                .map(|raw| normalize_date(&raw)),
            avatar_url: first_string(map, &["avatarUrl", "avatar_url"]),
            bio: first_string(map, &["bio", "description"]),
            note,
            expires_at,
        })
    }

    pub fn title(&self) -> &str {
        self.display_name.as_deref().unwrap_or(&self.username)
    }
}

fn is_sensitive(key: &str) -> bool {
    let lowered = key.to_ascii_lowercase();
    SENSITIVE_KEYS.contains(&lowered.as_str())
}

/// Recursively drop credential-like keys.
pub fn sanitize(value: &Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(
            map.iter()
                .filter(|(key, _)| !is_sensitive(key))
                .map(|(key, value)| (key.clone(), sanitize(value)))
                .collect(),
        ),
        Value::Array(items) => Value::Array(items.iter().map(sanitize).collect()),
        other => other.clone(),
    }
}

fn first_string(map: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|key| match map.get(*key)? {
        Value::String(text) => Some(text.trim().to_owned()).filter(|text| !text.is_empty()),
        Value::Number(number) => Some(number.to_string()),
        _ => None,
    })
}

/// `2021-04-03T10:00:00Z` -> `2021-04-03`; anything else is passed through.
fn normalize_date(raw: &str) -> String {
    let date = raw.get(..10).unwrap_or(raw);
    let bytes = date.as_bytes();
    let iso_like = bytes.len() == 10
        && bytes[4] == b'-'
        && bytes[7] == b'-'
        && bytes
            .iter()
            .enumerate()
            .all(|(index, byte)| index == 4 || index == 7 || byte.is_ascii_digit());

    if iso_like {
        date.to_owned()
    } else {
        raw.to_owned()
    }
}

pub(crate) fn mentions_quota(text: &str) -> bool {
    let lowered = text.to_ascii_lowercase();
    QUOTA_PHRASES.iter().any(|phrase| lowered.contains(phrase))
}

/// A 2xx body can still report an exhausted balance through `error`/`message`.
pub(crate) fn body_reports_quota(value: &Value) -> bool {
    let Value::Object(map) = value else {
        return false;
    };

    ["error", "message"]
        .iter()
        .filter_map(|key| map.get(*key).and_then(Value::as_str))
        .any(mentions_quota)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn credentials_never_survive() {
        let raw = json!({
            "username": "builder_42",
            "password": "hunter2",
            "Cookie": "abc",
            "meta": { ".ROBLOSECURITY": "secret", "note": "fresh" },
            "accounts": [{ "token": "x", "name": "kept" }]
        });

        let sanitized = sanitize(&raw);
        let text = sanitized.to_string();
        assert!(!text.contains("hunter2"));
        assert!(!text.contains("abc"));
        assert!(!text.to_ascii_lowercase().contains("roblosecurity"));
        assert!(!text.contains("\"token\""));
        assert!(text.contains("kept"));
    }

    #[test]
    fn profile_picks_aliases() {
        let raw = json!({
            "name": "builder_42",
            "userid": 123456,
            "creationDate": "2021-04-03T10:00:00.000Z",
            "avatar_url": "https://cdn.example/a.png",
            "pwd": "nope",
            "meta": { "note": "starter account" }
        });

        let profile = AltProfile::from_value(&raw).unwrap();
        assert_eq!(profile.username, "builder_42");
        assert_eq!(profile.user_id.as_deref(), Some("123456"));
        assert_eq!(profile.created_at.as_deref(), Some("2021-04-03"));
        assert_eq!(profile.avatar_url.as_deref(), Some("https://cdn.example/a.png"));
        assert_eq!(profile.note.as_deref(), Some("starter account"));
        assert_eq!(profile.title(), "builder_42");
    }

    #[test]
    fn expiry_comes_from_meta_first() {
        let raw = json!({
            "username": "u",
            "expires_at": "top-level",
            "meta": { "expiresAt": "2030-01-01T00:00:00Z" }
        });
        let profile = AltProfile::from_value(&raw).unwrap();
        assert_eq!(profile.expires_at.as_deref(), Some("2030-01-01T00:00:00Z"));

        let raw = json!({ "username": "u", "meta": { "expires_at": 1_900_000_000 } });
        let profile = AltProfile::from_value(&raw).unwrap();
        assert_eq!(profile.expires_at.as_deref(), Some("1900000000"));

        let raw = json!({ "username": "u" });
        assert!(AltProfile::from_value(&raw).unwrap().expires_at.is_none());
    }

    #[test]
    fn missing_username_is_rejected() {
        assert!(AltProfile::from_value(&json!({ "password": "x" })).is_none());
        assert!(AltProfile::from_value(&json!({ "username": "  " })).is_none());
        assert!(AltProfile::from_value(&json!(["username"])).is_none());
    }

    #[test]
    fn long_notes_are_truncated() {
        let raw = json!({ "username": "u", "note": "x".repeat(400) });
        let profile = AltProfile::from_value(&raw).unwrap();
        assert_eq!(profile.note.unwrap().chars().count(), NOTE_MAX_CHARS);
    }

    #[test]
    fn dates_pass_through_when_not_iso() {
        assert_eq!(normalize_date("04/03/2021"), "04/03/2021");
        assert_eq!(normalize_date("2021-04-03"), "2021-04-03");
    }

    #[test]
    fn quota_detection() {
        assert!(mentions_quota("Insufficient balance"));
        assert!(mentions_quota("daily LIMIT exceeded"));
        assert!(!mentions_quota("invalid api key"));

        assert!(body_reports_quota(&json!({ "error": "quota exceeded" })));
        assert!(body_reports_quota(&json!({ "message": "no balance left" })));
        assert!(!body_reports_quota(&json!({ "username": "limit_breaker" })));
    }
}
