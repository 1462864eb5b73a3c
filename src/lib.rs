//! Two-pane bookmark commander: a pair of directory listings over a
//! bookmark tree, with batch commands that move, copy, sort, sync and
//! trash entries between them.

pub mod app;
pub mod config;
pub mod entry;
pub mod error;
pub mod input;
pub mod io;
pub mod message;
pub mod model;
pub mod state;
pub mod sync;
pub mod tree;
pub mod validate;
pub mod view;

#[cfg(test)]
mod testing;

pub use app::{Commander, Frame};
pub use config::Config;
pub use error::{CommandError, Result, StoreError};
