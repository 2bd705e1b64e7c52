//! Logging setup and the tracing-backed event sink.

use std::sync::Once;

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::traits::{ReconciliationEvent, ReconciliationSink};

static INIT: Once = Once::new();

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    /// JSON structured logs (for production).
    Json,
    /// Pretty-printed logs (for development).
    #[default]
    Pretty,
}

/// Installs the global subscriber. Subsequent calls are no-ops.
///
/// `RUST_LOG` controls levels and defaults to `info`.
pub fn init_logging(format: LogFormat) {
    INIT.call_once(|| {
        let env_filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

        match format {
            LogFormat::Json => {
                tracing_subscriber::registry()
                    .with(env_filter)
                    .with(fmt::layer().json())
                    .init();
            }
            LogFormat::Pretty => {
                tracing_subscriber::registry()
                    .with(env_filter)
                    .with(fmt::layer().pretty())
                    .init();
            }
        }
    });
}

/// Forwards reconciliation events to `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl ReconciliationSink for TracingSink {
    fn emit(&self, event: ReconciliationEvent) {
        match event {
            ReconciliationEvent::BatchStarted {
                batch_id,
                total_items,
            } => {
                tracing::info!(%batch_id, total_items, "batch_started");
            }
            ReconciliationEvent::Classified { file_name, kind } => {
                tracing::info!(%file_name, %kind, "transmission_classified");
            }
            ReconciliationEvent::StatusResolved {
                file_name,
                record_id,
                status_before,
                status_after,
            } => {
                tracing::info!(
                    %file_name,
                    record_id,
                    %status_before,
                    %status_after,
                    "status_resolved"
                );
            }
            ReconciliationEvent::AuditAppended {
                file_name,
                record_id,
            } => {
                tracing::info!(%file_name, record_id, "audit_appended");
            }
            ReconciliationEvent::ItemProcessed { file_name } => {
                tracing::info!(%file_name, "item_processed");
            }
            ReconciliationEvent::ItemFailed { file_name, error } => {
                if error.counts_as_failure() {
                    tracing::error!(%file_name, %error, "item_failed");
                } else {
                    tracing::warn!(%file_name, %error, "audit_write_failed");
                }
            }
            ReconciliationEvent::BatchCompleted { summary } => {
                let processed = summary.processed_count();
                if summary.success {
                    tracing::info!(
                        batch_id = %summary.batch_id,
                        total_items = summary.total_items,
                        processed,
                        audit_write_failures = summary.audit_write_failures,
                        "batch_completed"
                    );
                } else {
                    tracing::warn!(
                        batch_id = %summary.batch_id,
                        total_items = summary.total_items,
                        processed,
                        error_count = summary.error_count,
                        audit_write_failures = summary.audit_write_failures,
                        "batch_completed_with_errors"
                    );
                }
            }
        }
    }
}
