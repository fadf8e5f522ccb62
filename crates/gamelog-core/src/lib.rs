//! Core domain model for gamelog.
//!
//! This crate defines the game and platform records, the cover-source
//! precedence rules, sort preferences, and the SQLite-backed local store
//! (schema management, record collections, and the image blob store).

#![deny(unsafe_code)]
#![warn(missing_debug_implementations)]

pub mod error;
pub mod model;
pub mod schema;

pub use error::{Error, Result};
