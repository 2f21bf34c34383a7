//! Per-invocation diagnostics.
//!
//! Builder and classifier take a `&mut Diagnostics` instead of writing to a
//! process-wide sink. Every entry is also echoed through `log`.

use serde::Serialize;

#[derive(Clone, Copy, Serialize, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Warning,
}

#[derive(Clone, Serialize, Debug, PartialEq, Eq)]
pub struct Diagnostic {
    pub severity: Severity,
    pub node_id: Option<String>,
    pub record_index: Option<usize>,
    pub message: String,
}

#[derive(Clone, Serialize, Debug, Default)]
pub struct Diagnostics {
    entries: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, diagnostic: Diagnostic) {
        match diagnostic.severity {
            Severity::Warning => log::warn!("{}", diagnostic.message),
            Severity::Info => log::debug!("{}", diagnostic.message),
        }
        self.entries.push(diagnostic);
    }

    /// Warning about a specific node.
    pub fn warn_node(&mut self, node_id: &str, message: impl Into<String>) {
        self.push(Diagnostic {
            severity: Severity::Warning,
            node_id: Some(node_id.to_string()),
            record_index: None,
            message: message.into(),
        });
    }

    /// Warning about an input record that never became a node.
    pub fn warn_record(&mut self, index: usize, message: impl Into<String>) {
        self.push(Diagnostic {
            severity: Severity::Warning,
            node_id: None,
            record_index: Some(index),
            message: message.into(),
        });
    }

    pub fn info_node(&mut self, node_id: &str, message: impl Into<String>) {
        self.push(Diagnostic {
            severity: Severity::Info,
            node_id: Some(node_id.to_string()),
            record_index: None,
            message: message.into(),
        });
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.entries.iter()
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Diagnostic> {
        self.entries
            .iter()
            .filter(|d| d.severity == Severity::Warning)
    }

    pub fn warning_count(&self) -> usize {
        self.warnings().count()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn into_vec(self) -> Vec<Diagnostic> {
        self.entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accumulates_in_order() {
        let mut diags = Diagnostics::new();
        diags.warn_record(3, "skipped");
        diags.info_node("1:2", "orphaned");
        diags.warn_node("1:3", "root fallback");

        assert_eq!(diags.len(), 3);
        assert_eq!(diags.warning_count(), 2);
        let first = diags.iter().next().unwrap();
        assert_eq!(first.record_index, Some(3));
        assert!(first.node_id.is_none());
    }

    #[test]
    fn test_empty() {
        let diags = Diagnostics::new();
        assert!(diags.is_empty());
        assert_eq!(diags.warning_count(), 0);
    }
}
