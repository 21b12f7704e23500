/// Diagnostic reporting for validation results.
///
/// In production posture a result with errors aborts the build with
/// `CatalogError::ValidationFailed`. Everything else (development posture, or
/// warnings only) is written to the diagnostic sink and the build continues.
use std::sync::{Arc, Mutex, PoisonError};

use tracing::{error, warn};

use crate::error::CatalogError;
use crate::validate::ValidationResult;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Posture {
    Production,
    #[default]
    Development,
}

impl Posture {
    /// `production` (case-insensitive) selects production; anything else is development.
    pub fn parse(value: &str) -> Self {
        if value.trim().eq_ignore_ascii_case("production") {
            Self::Production
        } else {
            Self::Development
        }
    }
}

/// Render a result as a marker line followed by `   - [field] message` bullets,
/// errors before warnings.
pub fn format_report(context: &str, result: &ValidationResult) -> String {
    let mut lines = Vec::new();

    if !result.errors.is_empty() {
        lines.push(format!("❌ Validation FAILED for \"{context}\":"));
        for err in &result.errors {
            lines.push(format!("   - [{}] {}", err.field, err.message));
        }
    }

    if !result.warnings.is_empty() {
        if result.errors.is_empty() {
            lines.push(format!("⚠️  Validation warnings for \"{context}\":"));
        }
        for warning in &result.warnings {
            lines.push(format!("   - [{}] {}", warning.field, warning.message));
        }
    }

    lines.join("\n")
}

/// Destination for formatted diagnostic blocks.
pub trait DiagnosticSink: Send + Sync {
    fn emit(&self, context: &str, report: &str, has_errors: bool);
}

/// Forwards diagnostic blocks to `tracing`.
#[derive(Debug, Default)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn emit(&self, context: &str, report: &str, has_errors: bool) {
        if has_errors {
            error!(context, "\n{report}");
        } else {
            warn!(context, "\n{report}");
        }
    }
}

/// Keeps diagnostic blocks in memory.
#[derive(Debug, Default)]
pub struct MemorySink {
    reports: Mutex<Vec<String>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reports(&self) -> Vec<String> {
        self.reports
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl DiagnosticSink for MemorySink {
    fn emit(&self, _context: &str, report: &str, _has_errors: bool) {
        self.reports
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(report.to_string());
    }
}

#[derive(Clone)]
pub struct Reporter {
    posture: Posture,
    sink: Arc<dyn DiagnosticSink>,
}

impl Reporter {
    pub fn new(posture: Posture, sink: Arc<dyn DiagnosticSink>) -> Self {
        Self { posture, sink }
    }

    pub fn tracing(posture: Posture) -> Self {
        Self::new(posture, Arc::new(TracingSink))
    }

    pub fn posture(&self) -> Posture {
        self.posture
    }

    /// Report `result` under `context`. Returns `Err` only for errors in production.
    pub fn handle(&self, context: &str, result: &ValidationResult) -> Result<(), CatalogError> {
        if !result.has_diagnostics() {
            return Ok(());
        }

        let report = format_report(context, result);
        if !result.valid && self.posture == Posture::Production {
            return Err(CatalogError::ValidationFailed {
                context: context.to_string(),
                report,
            });
        }

        self.sink.emit(context, &report, !result.valid);
        Ok(())
    }
}

impl std::fmt::Debug for Reporter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Reporter")
            .field("posture", &self.posture)
            .finish_non_exhaustive()
    }
}
