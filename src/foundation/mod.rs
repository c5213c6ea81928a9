/// Color parsing and conversion.
pub mod color;
/// Core value types shared across modules.
pub mod core;
/// Error type and result alias.
pub mod error;
