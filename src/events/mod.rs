//! Job events: types and broadcast bus.
//!
//! This module groups the event **data model** and the **bus** a job uses to
//! report admission decisions and task settlements to external observers.
//!
//! ## Contents
//! - [`EventKind`], [`Event`] event classification and payload metadata
//! - [`Bus`] thin wrapper over `tokio::sync::broadcast`

mod bus;
mod event;

pub use bus::Bus;
pub use event::{Event, EventKind};
