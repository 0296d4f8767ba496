//! Non-fatal diagnostics.
//!
//! Warnings never abort a transform. They are handed to whatever sink the
//! caller supplies.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Warning {
    pub message: String,
}

impl Warning {
    pub fn new(message: impl Into<String>) -> Self {
        Warning {
            message: message.into(),
        }
    }
}

pub trait DiagnosticSink {
    fn warning(&mut self, warning: Warning);
}

impl DiagnosticSink for Vec<Warning> {
    fn warning(&mut self, warning: Warning) {
        self.push(warning);
    }
}

/// Forwards every warning to `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn warning(&mut self, warning: Warning) {
        tracing::warn!(message = %warning.message, "template diagnostic");
    }
}

/// Drops every warning.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl DiagnosticSink for NullSink {
    fn warning(&mut self, _warning: Warning) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::check_root_name;
    use crate::scan::RootScope;

    fn scope() -> RootScope {
        let mut scope = RootScope::default();
        scope.variables.insert("user".to_string());
        scope
    }

    #[test]
    fn test_sinks_do_not_change_the_verdict() {
        let scope = scope();

        assert!(check_root_name("user.name", &scope, &mut NullSink));
        assert!(!check_root_name("missing", &scope, &mut NullSink));

        assert!(check_root_name("user", &scope, &mut TracingSink));
        assert!(!check_root_name("missing.field", &scope, &mut TracingSink));

        let mut collected: Vec<Warning> = Vec::new();
        assert!(!check_root_name("missing", &scope, &mut collected));
        assert_eq!(collected.len(), 1);
    }

    #[test]
    fn test_sinks_as_trait_objects() {
        let mut sinks: Vec<Box<dyn DiagnosticSink>> = vec![Box::new(NullSink), Box::new(TracingSink)];
        for sink in sinks.iter_mut() {
            sink.warning(Warning::new("unused"));
        }
    }
}
