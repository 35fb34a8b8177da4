pub mod guild;
pub mod snipe;
