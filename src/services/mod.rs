//! Service layer containing the sync protocol and side-effect helpers.
//!
//! ## Service map
//! - `sync.rs` — pull/push round trips and the gallery source abstraction.
//! - `cookies.rs` — cookie-jar persistence of the selection, scoped by
//!   domain/path/expiry.
//! - `session.rs` — page-load orchestration, url parsing, restore.
//! - `storage.rs` — session/prefs persistence + audit log.
//! - `output.rs` — JSON/text output helpers and alerts.
//!
//! ## Conventions
//! - Prefer pure helpers where possible.
//! - Side effects should be explicit and localized.
//! - Keep command handlers thin; delegate to services.

pub mod cookies;
pub mod output;
pub mod session;
pub mod storage;
pub mod sync;
