//! Read-only SQLite query engine over in-memory database images.
//!
//! A [`DatabaseImage`] is a complete SQLite database file held in memory: an
//! export handed over by a user, or a file pulled out of an archive. Loading
//! an image produces an [`Engine`]: a private, read-only connection that owns
//! its copy of the data and is never shared.
//!
//! # Lifecycle
//! 1. [`DatabaseImage::new`] validates the SQLite header.
//! 2. [`DatabaseImage::load`] consumes the image and opens an [`Engine`].
//! 3. [`Engine::fetch_all`] / [`Engine::fetch_pairs`] run read-only queries.
//! 4. [`Engine::close`] releases the connection and the staged image.
//!
//! Rows come back as [`Row`]s of dynamically typed [`Value`]s, because the
//! schema of a user-supplied database is not known at compile time.

mod engine;
pub mod error;
#[cfg(any(test, feature = "fixtures"))]
pub mod fixtures;
mod image;
mod row;
mod value;

pub use crate::engine::{Engine, quote_identifier};
pub use crate::image::DatabaseImage;
pub use crate::row::Row;
pub use crate::value::Value;
