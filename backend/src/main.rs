//! Service entry-point: loads configuration, prunes the store and serves the
//! gate pass API.

mod server;

use std::io;
use std::sync::Arc;

use actix_web::web;
use mockable::{Clock, DefaultClock};
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use gatepass::domain::GatePassSubmissionServiceImpl;
use gatepass::domain::ports::{DisabledGatePassNotifier, GatePassNotifier};
use gatepass::domain::run_retention_sweep;
use gatepass::inbound::http::health::HealthState;
use gatepass::outbound::mail::SmtpGatePassNotifier;
use gatepass::outbound::persistence::JsonFileGatePassRepository;
use gatepass::settings::GatePassSettings;
use server::{ServerConfig, create_server};

fn build_notifier(settings: &GatePassSettings) -> io::Result<Arc<dyn GatePassNotifier>> {
    let Some(smtp) = settings.smtp_settings() else {
        warn!("SMTP credentials not configured; gate pass emails will not be sent");
        return Ok(Arc::new(DisabledGatePassNotifier::new(
            "SMTP credentials are not configured",
        )));
    };
    info!(host = %smtp.host, port = smtp.port, cc = smtp.cc.len(), "SMTP notifier configured");
    let notifier = SmtpGatePassNotifier::new(smtp)
        .map_err(|e| io::Error::other(format!("invalid SMTP configuration: {e}")))?;
    Ok(Arc::new(notifier))
}

/// Application bootstrap.
#[actix_web::main]
async fn main() -> io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = GatePassSettings::load_from_iter(std::env::args_os())
        .map_err(|e| io::Error::other(format!("failed to load configuration: {e}")))?;

    let repository = Arc::new(JsonFileGatePassRepository::open(settings.data_file())?);
    let clock: Arc<dyn Clock> = Arc::new(DefaultClock);
    if let Err(e) =
        run_retention_sweep(repository.as_ref(), settings.retention_policy(), clock.utc()).await
    {
        warn!(error = %e, path = %repository.path(), "retention sweep failed; continuing");
    }

    let notifier = build_notifier(&settings)?;
    let submission = Arc::new(GatePassSubmissionServiceImpl::new(
        repository, notifier, clock,
    ));

    let bind_addr = settings.bind_addr();
    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state, ServerConfig::new(bind_addr, submission))?;
    info!(%bind_addr, "gate pass service listening");
    server.await
}
