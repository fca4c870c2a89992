/// Error taxonomy and result alias.
pub mod error;

/// Geographic window and color primitives.
pub mod core;

/// Fixed-capacity dataset color palette.
pub mod palette;
