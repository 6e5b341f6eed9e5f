//! Provides the file formats on both sides of a conversion.
//!
//! Geometry readers implement [`traits::GeometrySource`] and are selected by
//! file extension through [`registry::SourceRegistry`]. Job decks are produced
//! by [`traits::JobWriter`] implementations driven by an explicit
//! [`settings::JobSettings`].

pub(crate) mod elements;
pub mod error;
pub mod gaussian_input;
pub mod gaussian_log;
pub mod registry;
pub mod settings;
pub mod traits;
pub mod xyz;
