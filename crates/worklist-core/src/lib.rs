//! worklist-core library.
//!
//! Data flows one way: the remote platform returns records, [`urgency`]
//! fills in anything it left out, [`filter`] narrows, [`sort`] orders and
//! [`view::render`] projects rows and summary cards. User edits go the other
//! way through [`assign`].
//!
//! # Conventions
//!
//! - **Errors**: `thiserror` enums at the remote and submit seams, `anyhow::Result` for loaders.
//! - **Logging**: Use `tracing` macros (`info!`, `warn!`, `error!`, `debug!`, `trace!`).
//! - **Dates**: every computation takes `today` explicitly; nothing reads the clock.

pub mod assign;
pub mod config;
pub mod error;
pub mod filter;
pub mod model;
pub mod remote;
pub mod sort;
pub mod urgency;
pub mod view;

pub use model::item::{UrgencyLevel, WorkItem};
pub use remote::RemoteSource;
