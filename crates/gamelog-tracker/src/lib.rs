//! Library state and persistence rules for gamelog.
//!
//! [`Tracker`] owns the in-memory games and platforms and routes every
//! mutation through the store so blobs, records and platform order stay
//! consistent. The codec turns that state into a portable JSON snapshot and
//! back.

#![deny(unsafe_code)]
#![warn(missing_debug_implementations)]

pub mod codec;
pub mod config;
pub mod cover;
pub mod data_uri;
pub mod error;
pub mod library;
pub mod tracker;

pub use codec::{export_file_name, ImportSummary, Snapshot};
pub use config::Config;
pub use cover::prepare_cover;
pub use error::{CoverError, CoverResult};
pub use library::{LibraryView, YearGroup};
pub use tracker::Tracker;
