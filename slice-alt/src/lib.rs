//! Client for the public alt-account provider.

pub mod client;
pub mod profile;

pub use client::{AltError, AltService};
pub use profile::AltProfile;
