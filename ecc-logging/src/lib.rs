//! Structured logging setup for the libecc tools
//!
//! Logs always go to stderr; stdout belongs to the tools' own output.
//! Every event is recorded inside a root `ecc` span carrying the service
//! name, so JSON and console lines both say which tool wrote them.

use serde::Deserialize;
use tracing::span::EnteredSpan;
use tracing::Subscriber;
use tracing_subscriber::{
    fmt::{self, MakeWriter},
    layer::SubscriberExt,
    util::{SubscriberInitExt, TryInitError},
    EnvFilter, Layer, Registry,
};

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable lines
    Console,
    /// One JSON object per line
    Json,
}

/// `RUST_LOG` wins over the configured level
fn env_filter(default_level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level))
}

fn subscriber<W>(
    format: LogFormat,
    filter: EnvFilter,
    writer: W,
) -> impl Subscriber + Send + Sync
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    let layer: Box<dyn Layer<Registry> + Send + Sync> = match format {
        LogFormat::Json => fmt::layer()
            .json()
            .with_writer(writer)
            .with_target(true)
            .with_file(true)
            .with_line_number(true)
            .with_current_span(true)
            .with_span_list(false)
            .boxed(),
        LogFormat::Console => fmt::layer()
            .with_writer(writer)
            .with_target(true)
            .with_file(true)
            .with_line_number(true)
            .boxed(),
    };

    Registry::default().with(layer).with(filter)
}

fn service_span(service_name: &str) -> tracing::Span {
    tracing::info_span!("ecc", service = service_name)
}

/// Install the global subscriber for `service_name`
///
/// The returned guard keeps the service span entered; hold it for the
/// lifetime of `main`.
pub fn init_logging(
    service_name: &str,
    format: LogFormat,
    default_level: &str,
) -> Result<EnteredSpan, TryInitError> {
    subscriber(format, env_filter(default_level), std::io::stderr).try_init()?;

    let guard = service_span(service_name).entered();
    tracing::info!(?format, "Logging initialized");
    Ok(guard)
}

/// Install a subscriber for tests; repeated calls are ignored
pub fn init_test_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter("debug"))
        .with_test_writer()
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Vec<u8>>>);

    impl io::Write for Captured {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl Captured {
        fn text(&self) -> String {
            String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
        }
    }

    fn capture(format: LogFormat, level: &str, emit: impl FnOnce()) -> String {
        let captured = Captured::default();
        let writer = captured.clone();
        let subscriber = subscriber(format, EnvFilter::new(level), move || writer.clone());
        tracing::subscriber::with_default(subscriber, || {
            let _guard = service_span("ecc-test").entered();
            emit();
        });
        captured.text()
    }

    #[test]
    fn test_json_lines_carry_service_name() {
        let output = capture(LogFormat::Json, "info", || {
            tracing::info!(curve = "P-256", "Generated key pair")
        });

        let line: serde_json::Value = serde_json::from_str(output.lines().next().unwrap()).unwrap();
        assert_eq!(line["span"]["service"], "ecc-test");
        assert_eq!(line["fields"]["message"], "Generated key pair");
        assert_eq!(line["fields"]["curve"], "P-256");
    }

    #[test]
    fn test_console_lines_carry_service_name() {
        let output = capture(LogFormat::Console, "info", || {
            tracing::warn!("Rejected key generation request")
        });
        assert!(output.contains("service=\"ecc-test\"") || output.contains("service=ecc-test"));
        assert!(output.contains("Rejected key generation request"));
    }

    #[test]
    fn test_level_filter_applies() {
        let output = capture(LogFormat::Console, "warn", || tracing::info!("hidden"));
        assert!(output.is_empty());
    }
}
