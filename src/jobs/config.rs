//! # Job configuration.
//!
//! Provides [`JobConfig`], the settings a [`Job`](crate::Job) is built with.
//!
//! ## Sentinel values
//! - `bus_capacity = 0` → clamped to 1 by the bus
//! - `runtime = None` → started tasks spawn on the ambient Tokio runtime

use std::borrow::Cow;

use tokio::runtime::Handle;

use crate::policies::ConcurrencyMode;

/// Configuration for a job.
///
/// ## Field semantics
/// - `name`: label used in logs and on every [`Event`](crate::Event)
/// - `mode`: what `perform()` does while a task is pending
/// - `bus_capacity`: event ring buffer size (min 1; clamped by Bus)
/// - `runtime`: execution context for the job's tasks
#[derive(Clone, Debug)]
pub struct JobConfig {
    /// Job name for logs and events.
    pub name: Cow<'static, str>,

    /// Concurrency mode applied when `perform()` finds a pending task.
    pub mode: ConcurrencyMode,

    /// Capacity of the job's event bus.
    ///
    /// Receivers lagging more than `bus_capacity` events observe `Lagged`
    /// and skip older items.
    pub bus_capacity: usize,

    /// Runtime to spawn task operations on (`None` = ambient runtime).
    pub runtime: Option<Handle>,
}

impl JobConfig {
    /// Default configuration with the given mode.
    pub fn with_mode(mode: ConcurrencyMode) -> Self {
        Self {
            mode,
            ..Self::default()
        }
    }

    /// Returns a config with updated name.
    pub fn named(mut self, name: impl Into<Cow<'static, str>>) -> Self {
        self.name = name.into();
        self
    }

    /// Returns a bus capacity clamped to a minimum of 1.
    #[inline]
    pub fn bus_capacity_clamped(&self) -> usize {
        self.bus_capacity.max(1)
    }
}

impl Default for JobConfig {
    /// Default configuration:
    ///
    /// - `name = "job"`
    /// - `mode = ConcurrencyMode::Drop`
    /// - `bus_capacity = 64`
    /// - `runtime = None` (ambient runtime)
    fn default() -> Self {
        Self {
            name: Cow::Borrowed("job"),
            mode: ConcurrencyMode::default(),
            bus_capacity: 64,
            runtime: None,
        }
    }
}
