#![deny(missing_docs)]

//! # upkeep-core — Foundational Types for the Upkeep Service
//!
//! This crate defines the types every other crate in the workspace depends
//! on. It has no internal crate dependencies — only `serde`, `thiserror`,
//! `chrono`, and `uuid` from the external ecosystem.
//!
//! ## Design Principles
//!
//! 1. **Validated newtypes for domain primitives.** [`AssetName`] enforces
//!    its format constraints at construction time; an invalid name is
//!    unrepresentable downstream.
//!
//! 2. **UTC everywhere.** All timestamps are `chrono::DateTime<Utc>`.
//!    Wire-format parsing lives in [`temporal`] and accepts ISO 8601 with
//!    or without an explicit offset.
//!
//! 3. **Time is a capability.** Nothing in this workspace reads ambient
//!    wall-clock time directly except [`SystemClock`]. Components take a
//!    [`Clock`] (or an explicit instant) so behavior is reproducible in
//!    tests.
//!
//! 4. **Structured errors with `thiserror`.** No `Box<dyn Error>`, no
//!    `.unwrap()` outside tests.

pub mod asset;
pub mod clock;
pub mod error;
pub mod event;
pub mod temporal;

// Re-export primary types at crate root for ergonomic imports.
pub use asset::{Asset, AssetName};
pub use clock::{Clock, ManualClock, SystemClock};
pub use error::ValidationError;
pub use event::{EventKind, Notification, Violation};
pub use temporal::{canonical_string, parse_timestamp};
