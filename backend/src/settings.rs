//! Service configuration loaded via OrthoConfig.
//!
//! Every value can come from the command line, a configuration file or a
//! `GATEPASS_`-prefixed environment variable. Unset values fall back to the
//! defaults exposed by the accessors below.

use std::net::{Ipv4Addr, SocketAddr, SocketAddrV4};
use std::time::Duration;

use camino::Utf8PathBuf;
use ortho_config::OrthoConfig;
use serde::Deserialize;

use crate::domain::{DEFAULT_RETENTION_DAYS, RetentionPolicy};
use crate::outbound::mail::SmtpSettings;

const DEFAULT_PORT: u16 = 5000;
const DEFAULT_DATA_FILE: &str = "gatepass_data.json";
const DEFAULT_SMTP_HOST: &str = "smtp.gmail.com";
const DEFAULT_SMTP_PORT: u16 = 465;
const DEFAULT_SMTP_TIMEOUT_SECS: u64 = 10;

/// Configuration values for the gate pass service.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "GATEPASS")]
pub struct GatePassSettings {
    /// Socket address the HTTP server binds to.
    pub bind_addr: Option<SocketAddr>,
    /// Path of the JSON store.
    pub data_file: Option<String>,
    /// SMTP relay host.
    pub smtp_host: Option<String>,
    /// SMTP relay port.
    pub smtp_port: Option<u16>,
    /// SMTP login; also the default sender.
    pub smtp_username: Option<String>,
    /// SMTP secret.
    pub smtp_password: Option<String>,
    /// `From` address override.
    pub sender: Option<String>,
    /// Comma-separated addresses copied on every notification.
    pub cc_recipients: Option<String>,
    /// Upper bound for each SMTP network operation, in seconds.
    pub smtp_timeout_secs: Option<u64>,
    /// Retention window in days; `0` disables the startup sweep.
    pub retention_days: Option<u32>,
}

impl GatePassSettings {
    /// Return the bind address, defaulting to `0.0.0.0:5000`.
    #[must_use]
    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr.unwrap_or(SocketAddr::V4(SocketAddrV4::new(
            Ipv4Addr::UNSPECIFIED,
            DEFAULT_PORT,
        )))
    }

    /// Return the store path, defaulting to `gatepass_data.json`.
    #[must_use]
    pub fn data_file(&self) -> Utf8PathBuf {
        Utf8PathBuf::from(self.data_file.as_deref().unwrap_or(DEFAULT_DATA_FILE))
    }

    /// Return the CC list with blanks removed.
    #[must_use]
    pub fn cc_recipients(&self) -> Vec<String> {
        self.cc_recipients
            .as_deref()
            .unwrap_or_default()
            .split(',')
            .map(str::trim)
            .filter(|address| !address.is_empty())
            .map(str::to_owned)
            .collect()
    }

    /// Return the retention policy, defaulting to 45 days.
    #[must_use]
    pub fn retention_policy(&self) -> RetentionPolicy {
        RetentionPolicy::new(self.retention_days.unwrap_or(DEFAULT_RETENTION_DAYS))
    }

    /// Return relay settings when both credentials are configured.
    ///
    /// `None` means notifications cannot be delivered.
    #[must_use]
    pub fn smtp_settings(&self) -> Option<SmtpSettings> {
        let username = non_blank(self.smtp_username.as_deref())?;
        let password = non_blank(self.smtp_password.as_deref())?;
        let sender = non_blank(self.sender.as_deref()).unwrap_or(username);

        Some(SmtpSettings {
            host: self
                .smtp_host
                .clone()
                .unwrap_or_else(|| DEFAULT_SMTP_HOST.to_owned()),
            port: self.smtp_port.unwrap_or(DEFAULT_SMTP_PORT),
            username: username.to_owned(),
            password: password.to_owned(),
            sender: sender.to_owned(),
            cc: self.cc_recipients(),
            timeout: Duration::from_secs(
                self.smtp_timeout_secs.unwrap_or(DEFAULT_SMTP_TIMEOUT_SECS),
            ),
        })
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|value| !value.is_empty())
}
