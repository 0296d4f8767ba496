use serde::{Deserialize, Serialize};

// ═══════════════════════════════════════════════════════════════════════════════
// ERROR CODES
// ═══════════════════════════════════════════════════════════════════════════════

pub const ERR_PARSE: &str = "R-ERR-PARSE-001";
pub const ERR_EXPORT_DECLARATION: &str = "R-ERR-EXPORT-001";
pub const ERR_WATCH_STATEMENT: &str = "R-ERR-WATCH-001";
pub const ERR_WATCH_OPERATOR: &str = "R-ERR-WATCH-002";
pub const ERR_WATCH_TARGET: &str = "R-ERR-WATCH-003";
pub const ERR_WATCH_EXPRESSION: &str = "R-ERR-WATCH-004";
pub const ERR_WATCH_CALLBACK: &str = "R-ERR-WATCH-005";
pub const ERR_WATCH_DEPENDENCIES: &str = "R-ERR-WATCH-006";
pub const ERR_WRAPPED_EXPRESSION: &str = "R-ERR-EXPR-001";
pub const ERR_OPTION_NAME: &str = "R-ERR-OPTION-001";

fn get_rule(code: &str) -> &'static str {
    match code {
        ERR_PARSE => "Script blocks must be valid ES module source.",
        ERR_EXPORT_DECLARATION => {
            "Only `export let`/`export const`/`export var` of plain identifiers become component props."
        }
        ERR_WATCH_STATEMENT => "A `$:` statement must be a single expression statement.",
        ERR_WATCH_OPERATOR => "Reactive assignments use plain `=`.",
        ERR_WATCH_TARGET => "Reactive assignments target an identifier or a member path.",
        ERR_WATCH_EXPRESSION => "Watched values must be identifiers, member paths or expressions.",
        ERR_WATCH_CALLBACK => "The last element of a `$:` sequence must be a function.",
        ERR_WATCH_DEPENDENCIES => "A `$:` sequence needs at least one dependency before its callback.",
        ERR_WRAPPED_EXPRESSION => "Template expressions are wrapped in exactly one `{...}` pair.",
        ERR_OPTION_NAME => "The component factory name must be a bare identifier.",
        _ => "Unknown rule.",
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// COMPILER ERROR
// ═══════════════════════════════════════════════════════════════════════════════

/// A fatal transform error.
///
/// `context` holds the exact source text of the offending statement. The
/// rewritten tree no longer carries positions, so the snippet is the only
/// way back to the author's code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
#[serde(rename_all = "camelCase")]
#[error("{message}{}", context_suffix(.context))]
pub struct CompilerError {
    pub code: String,
    pub message: String,
    pub rule: String,
    pub context: Option<String>,
}

fn context_suffix(context: &Option<String>) -> String {
    match context {
        Some(snippet) => format!(": {}", snippet),
        None => String::new(),
    }
}

impl CompilerError {
    pub fn new(code: &str, message: &str) -> Self {
        CompilerError {
            code: code.to_string(),
            message: message.to_string(),
            rule: get_rule(code).to_string(),
            context: None,
        }
    }

    pub fn with_context(mut self, snippet: &str) -> Self {
        self.context = Some(snippet.to_string());
        self
    }

    pub fn is_parse_error(&self) -> bool {
        self.code == ERR_PARSE
    }
}

pub type CompileResult<T> = Result<T, CompilerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_appends_snippet() {
        let err = CompilerError::new(ERR_WATCH_OPERATOR, "Wrong operator")
            .with_context("$: a += 1;");
        assert_eq!(err.to_string(), "Wrong operator: $: a += 1;");
        assert_eq!(err.rule, "Reactive assignments use plain `=`.");
    }

    #[test]
    fn test_display_without_snippet() {
        let err = CompilerError::new(ERR_PARSE, "Unexpected token");
        assert_eq!(err.to_string(), "Unexpected token");
        assert!(err.is_parse_error());
    }
}
