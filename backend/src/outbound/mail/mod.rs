//! Email adapters for the gate pass notifier port.

mod smtp_notifier;
mod template;

pub use smtp_notifier::{SmtpGatePassNotifier, SmtpSettings};
