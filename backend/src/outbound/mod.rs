//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! - **persistence**: JSON file-backed gate pass repository
//! - **mail**: SMTP-backed gate pass notifier
//!
//! Adapters are thin translators that convert between domain types and
//! infrastructure-specific representations. They contain no business logic.

pub mod mail;
pub mod persistence;
