//! In-process and Redis-backed state for the bot.

pub mod cooldown;
pub mod registry;
pub mod snipe;

pub use cooldown::{CooldownKey, CooldownTracker};
pub use registry::{RegistryKind, RegistryStore};
pub use snipe::{DeletedMessage, RecentMessage, SnipeCache};

pub const DEFAULT_KEY_PREFIX: &str = "slice:prod";
