pub mod forceleave;
pub mod reloadblacklist;
pub mod sync;
