//! Domain types shared across commands and services.
//!
//! ## Files
//! - `models.rs` — session state, output envelopes and report structs.
//!
//! ## Conventions
//! - Types here are plain data; behavior lives in `services/*`.
//! - Serialized field names are part of the output contract; see
//!   `docs/contracts/` before renaming anything.

pub mod models;
