//! Logging and error-reporting initialization
//!
//! One-shot setup of the `tracing` subscriber plus the Sentry client.
//! Instead of module-level singletons, the Sentry registration lives in the
//! [`Telemetry`] value returned from [`init`]; the composing application
//! holds it for the lifetime of the process.

use sentry::types::Dsn;
use sentry::{ClientInitGuard, ClientOptions};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

use crate::config::Settings;

/// Handle to the initialized telemetry stack.
///
/// Dropping it flushes and closes the Sentry client. Keep it alive for the
/// whole process (typically a `let _telemetry = ...` in `main` or the
/// Lambda entry point).
pub struct Telemetry {
    sentry: Option<ClientInitGuard>,
}

impl Telemetry {
    /// Whether a Sentry client was registered and is accepting events.
    pub fn sentry_enabled(&self) -> bool {
        self.sentry.as_ref().map(|g| g.is_enabled()).unwrap_or(false)
    }
}

/// Initialize the tracing subscriber and the Sentry integration.
///
/// The log filter comes from `RUST_LOG` when set, otherwise from
/// `settings.log_level`. Output is JSON on the console (what CloudWatch
/// ingests). The Sentry layer is always installed; it is inert until a
/// client is bound.
///
/// Calling this twice is safe: the second subscriber registration is a
/// no-op, which keeps repeated cold-start style initialization harmless.
pub fn init(settings: &Settings) -> Telemetry {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(settings.log_level.as_filter_directive()));

    let console_layer = fmt::layer().json().with_filter(filter);

    let _ = tracing_subscriber::registry()
        .with(console_layer)
        .with(sentry::integrations::tracing::layer())
        .try_init();

    let sentry = settings.sentry_dsn.as_deref().and_then(init_sentry);

    Telemetry { sentry }
}

/// Bind the Sentry client for the given DSN.
///
/// A malformed DSN is logged and skipped rather than aborting startup;
/// a well-formed DSN registers locally even when the endpoint is
/// unreachable (no network round trip happens here).
fn init_sentry(raw_dsn: &str) -> Option<ClientInitGuard> {
    let dsn = match raw_dsn.parse::<Dsn>() {
        Ok(dsn) => dsn,
        Err(error) => {
            tracing::warn!(%error, "Skipping Sentry registration, bad DSN");
            return None;
        }
    };

    Some(sentry::init(ClientOptions {
        dsn: Some(dsn),
        release: sentry::release_name!(),
        ..Default::default()
    }))
}

/// Report an error to Sentry.
///
/// No-op when no client is bound, so call sites do not need to care
/// whether error reporting is configured.
pub fn capture_error<E: std::error::Error + ?Sized>(error: &E) {
    sentry::capture_error(error);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LogLevel;

    #[test]
    fn test_valid_dsn_parses() {
        assert!("https://abc123@example.invalid/1".parse::<Dsn>().is_ok());
    }

    #[test]
    fn test_dsn_without_key_is_rejected() {
        assert!("https://example.invalid/1".parse::<Dsn>().is_err());
    }

    #[test]
    fn test_init_with_bad_dsn_does_not_panic() {
        let settings = Settings {
            sentry_dsn: Some("https://example.invalid/1".to_string()),
            ..Settings::default()
        };
        let telemetry = init(&settings);
        assert!(!telemetry.sentry_enabled());
    }

    #[test]
    fn test_init_registers_unreachable_endpoint() {
        // Registration is local configuration, not a network round trip.
        let settings = Settings {
            sentry_dsn: Some("https://abc123@example.invalid/1".to_string()),
            ..Settings::default()
        };
        let telemetry = init(&settings);
        assert!(telemetry.sentry_enabled());
    }

    #[test]
    fn test_init_twice_is_harmless() {
        let settings = Settings {
            log_level: LogLevel::Debug,
            ..Settings::default()
        };
        let _first = init(&settings);
        let _second = init(&settings);
    }

    #[test]
    fn test_capture_error_without_client_is_noop() {
        let err = std::io::Error::new(std::io::ErrorKind::Other, "boom");
        capture_error(&err);
    }
}
