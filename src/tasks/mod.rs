//! Background Tasks Module
//!
//! Contains background tasks that run periodically during operation.
//!
//! # Tasks
//! - TTL Cleanup: Sweeps expired cache entries at configured intervals

mod cleanup;

pub use cleanup::spawn_cleanup_task;
