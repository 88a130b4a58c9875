//! Background Jobs Module
//!
//! Periodic tasks registered with the scheduler. Each job gets a cloned
//! `JobContext` and reports a `JobResult` for uniform logging.
//!
//! # Available Jobs
//!
//! - `alert_check_job` - Polls current prices against persisted price
//!   alerts, fires notifications and removes triggered alerts
//!
//! Jobs are fault-tolerant: a failed cycle is logged and retried on the
//! next tick, never surfaced to the user.

pub mod alert_check_job;
