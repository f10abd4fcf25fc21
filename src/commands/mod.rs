//! Command handler layer.
//!
//! This module owns CLI-oriented orchestration and output wiring.
//!
//! ## Files
//! - `gallery.rs` — open/toggle/save/navigation/jar command handling.
//! - `account.rs` — signin/createUser form submission.
//!
//! ## Principles
//! - Parse/match CLI inputs here.
//! - Delegate business logic to `services/*`.
//! - Keep behavior and output schema stable.

pub mod account;
pub mod gallery;

pub use account::handle_account_commands;
pub use gallery::handle_gallery_commands;
