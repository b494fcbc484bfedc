//! Background tasks and scheduled jobs.
//!
//! Each submodule provides a long-running async `run` function intended to
//! be spawned via `tokio::spawn`, plus a `run_once` pass that does one tick
//! of work. All tasks accept a [`CancellationToken`] for graceful shutdown.
//!
//! [`CancellationToken`]: tokio_util::sync::CancellationToken

pub mod post_dispatcher;
pub mod reminders;
pub mod session_cleanup;
