use serde::Serialize;

use super::{Diagnostic, Severity};

/// Receiver for diagnostics produced while planning.
pub trait DiagnosticSink {
    fn report(&mut self, diagnostic: Diagnostic);

    fn report_all(&mut self, diagnostics: impl IntoIterator<Item = Diagnostic>)
    where
        Self: Sized,
    {
        for diagnostic in diagnostics {
            self.report(diagnostic);
        }
    }
}

impl DiagnosticSink for Vec<Diagnostic> {
    fn report(&mut self, diagnostic: Diagnostic) {
        self.push(diagnostic);
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SeverityCounts {
    pub info: usize,
    pub warning: usize,
    pub error: usize,
}

/// Accumulates diagnostics in report order.
#[derive(Debug, Clone, Default)]
pub struct CollectingSink {
    diagnostics: Vec<Diagnostic>,
}

impl CollectingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.diagnostics
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(Diagnostic::is_error)
    }

    pub fn counts(&self) -> SeverityCounts {
        count_by_severity(&self.diagnostics)
    }
}

impl DiagnosticSink for CollectingSink {
    fn report(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }
}

pub fn count_by_severity(diagnostics: &[Diagnostic]) -> SeverityCounts {
    diagnostics
        .iter()
        .fold(SeverityCounts::default(), |mut counts, d| {
            match d.severity {
                Severity::Info => counts.info += 1,
                Severity::Warning => counts.warning += 1,
                Severity::Error => counts.error += 1,
            }
            counts
        })
}

/// Forwards every diagnostic to `tracing` and keeps a copy.
#[derive(Debug, Clone, Default)]
pub struct TracingSink {
    inner: CollectingSink,
}

impl TracingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.inner.into_diagnostics()
    }

    pub fn has_errors(&self) -> bool {
        self.inner.has_errors()
    }
}

impl DiagnosticSink for TracingSink {
    fn report(&mut self, diagnostic: Diagnostic) {
        let code = diagnostic.code.as_str();
        let context = diagnostic.plugin_context.as_str();
        match diagnostic.severity {
            Severity::Info => tracing::info!(code, context, "{}", diagnostic.message),
            Severity::Warning => tracing::warn!(code, context, "{}", diagnostic.message),
            Severity::Error => tracing::error!(code, context, "{}", diagnostic.message),
        }
        self.inner.report(diagnostic);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::DiagnosticCode;

    #[test]
    fn test_collecting_sink_counts() {
        let mut sink = CollectingSink::new();
        sink.report_all([
            Diagnostic::info(DiagnosticCode::REL_SHARED_TARGET, "shared"),
            Diagnostic::warning(DiagnosticCode::TYPE_UNMAPPABLE, "unmappable"),
            Diagnostic::error(DiagnosticCode::ID_STRATEGY_INCOMPATIBLE, "bad strategy"),
        ]);

        assert!(sink.has_errors());
        assert_eq!(
            sink.counts(),
            SeverityCounts {
                info: 1,
                warning: 1,
                error: 1
            }
        );
    }

    #[test]
    fn test_tracing_sink_keeps_copies() {
        let mut sink = TracingSink::new();
        sink.report(Diagnostic::warning(DiagnosticCode::TYPE_UNMAPPABLE, "unmappable"));
        assert!(!sink.has_errors());
        assert_eq!(sink.into_diagnostics().len(), 1);
    }
}
