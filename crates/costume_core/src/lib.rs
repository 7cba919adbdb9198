//! Foundational types shared by every costume crate.
//!
//! - [`Tag`]: four-character component type identifiers
//! - [`CostumeError`] / [`Result`]: the engine-wide error type
//! - [`CostumeSettings`]: load and update configuration

pub mod errors;
pub mod settings;
pub mod tag;

pub use errors::{CostumeError, Result};
pub use settings::{CostumeSettings, DEFAULT_COLORMAP};
pub use tag::Tag;
