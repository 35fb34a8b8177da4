/// Generic embed builders shared across commands.
pub mod embed;
/// Shared formatting helpers (durations, uptime, mentions).
pub mod formatting;
/// Role-hierarchy permission validation.
pub mod hierarchy;
/// Pure parser helpers.
pub mod parse;
/// Permission helper utilities.
pub mod permissions;
/// Shared time helpers.
pub mod time;

/// Default message-command prefix, overridable at startup and via `setprefix`.
pub const DEFAULT_COMMAND_PREFIX: &str = "!";
