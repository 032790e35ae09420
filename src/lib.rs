//! # campus-voice
//!
//! Backend core for a university complaint/suggestion system: accounts,
//! complaint triage with an exactly-once response, suggestion review,
//! notification fan-out, and visibility-based identity redaction.
//!
//! ## Architecture
//!
//! - [`store`]: SQLite persistence; the sole source of truth. Per-record
//!   atomicity (write-once response, unique emails) is enforced here with
//!   conditional updates and constraints, never with check-then-write pairs.
//! - [`service`]: lifecycle orchestration — who gets notified, which role may
//!   act, which config knobs apply.
//! - [`policy`]: the single authoritative visibility rule; every projection
//!   resolves submitter identity through it.
//! - [`projection`]: outward views — redacted identities, formatted dates,
//!   canonical enum strings.
//! - [`http`]: thin hyper boundary mapping errors onto status codes.
//!
//! Everything takes an explicitly constructed [`Store`] handle; there is no
//! ambient global state.

pub mod config;
pub mod error;
pub mod filestore;
pub mod hasher;
pub mod http;
pub mod models;
pub mod policy;
pub mod projection;
pub mod service;
pub mod store;
pub mod types;

pub use error::{Error, Result};
pub use store::Store;
