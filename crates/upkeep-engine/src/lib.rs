#![deny(missing_docs)]

//! # upkeep-engine — Upkeep Check Engine
//!
//! Evaluates every asset against two fixed rule groups (service,
//! expiration), each with two fixed conditions (upcoming, overdue), in a
//! single pass sharing one captured instant. Candidate events are checked
//! against a [`DedupIndex`] before staging so a run never records an event
//! that already exists.
//!
//! ## Evaluation Model
//!
//! Deterministic and side-effect free: [`evaluate`] takes the run's
//! [`CheckWindow`], a snapshot of assets, and the dedup index built from
//! existing records, and returns a [`CheckBatch`] of staged records. The
//! caller owns commit — all-or-nothing — and publishes the batch only after
//! the commit succeeds.
//!
//! This engine is deliberately not a general rules system: the two event
//! kinds and two conditions are fixed, and invocation is synchronous,
//! triggered by a caller rather than self-scheduled.

pub mod dedup;
pub mod engine;
pub mod window;

pub use dedup::DedupIndex;
pub use engine::{evaluate, CheckBatch, CheckReport};
pub use window::CheckWindow;
