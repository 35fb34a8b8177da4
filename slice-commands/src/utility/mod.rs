pub mod avatar;
pub(crate) mod embeds;
pub mod help;
pub mod ping;
pub mod roleinfo;
pub mod serverinfo;
pub mod uptime;
pub mod usage;
pub mod userinfo;
