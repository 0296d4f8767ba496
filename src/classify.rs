//! Expression classification helpers used by the template side of the
//! compiler: identifier tests, `{...}` unwrapping and root-name checks.

use lazy_static::lazy_static;
#[cfg(feature = "napi")]
use napi_derive::napi;
use oxc_allocator::Allocator;
use oxc_ast::ast::{Expression, Statement};
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::diagnostics::{DiagnosticSink, Warning};
use crate::error::{CompileResult, CompilerError, ERR_WRAPPED_EXPRESSION};
use crate::scan::RootScope;
use crate::script::parse_program;

lazy_static! {
    static ref SIMPLE_NAME_RE: Regex = Regex::new(r"^([A-Za-z0-9_$][A-Za-z0-9_$]*)$").unwrap();
    static ref ROOT_NAME_RE: Regex = Regex::new(r"^([A-Za-z0-9_$][A-Za-z0-9_$]*)").unwrap();
    static ref WRAPPED_RE: Regex = Regex::new(r"^\{(.*)\}$").unwrap();
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExpressionKind {
    /// A bare identifier or a member path ending in an identifier.
    Identifier,
    /// A single arrow function.
    Function,
    Unclassified,
}

pub fn is_simple_name(name: &str) -> bool {
    SIMPLE_NAME_RE.is_match(name)
}

/// Classify a template expression. Malformed source is a parse error,
/// anything well-formed but not recognised is `Unclassified`.
pub fn detect_expression_type(code: &str) -> CompileResult<ExpressionKind> {
    if is_simple_name(code) {
        return Ok(ExpressionKind::Identifier);
    }

    let allocator = Allocator::default();
    let source = allocator.alloc_str(code);
    let program = parse_program(&allocator, source)?;

    let expression = match program.body.as_slice() {
        [Statement::ExpressionStatement(stmt)] => &stmt.expression,
        _ => return Ok(ExpressionKind::Unclassified),
    };

    let kind = match expression {
        Expression::Identifier(_) => ExpressionKind::Identifier,
        Expression::StaticMemberExpression(_) => ExpressionKind::Identifier,
        Expression::ComputedMemberExpression(member)
            if matches!(member.expression, Expression::Identifier(_)) =>
        {
            ExpressionKind::Identifier
        }
        Expression::ArrowFunctionExpression(_) => ExpressionKind::Function,
        _ => ExpressionKind::Unclassified,
    };
    Ok(kind)
}

/// Strip the `{` `}` pair around a template expression.
pub fn unwrap_expression(code: &str) -> CompileResult<&str> {
    if code.is_empty() {
        return Err(CompilerError::new(
            ERR_WRAPPED_EXPRESSION,
            "Empty expression",
        ));
    }
    WRAPPED_RE
        .captures(code)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
        .ok_or_else(|| {
            CompilerError::new(
                ERR_WRAPPED_EXPRESSION,
                &format!("Wrong expression: {}", code),
            )
        })
}

/// Check that the leading name of a template path is declared at the top level
/// of the script. Misses are reported to `sink`, never raised.
pub fn check_root_name(name: &str, scope: &RootScope, sink: &mut dyn DiagnosticSink) -> bool {
    let root = match ROOT_NAME_RE.captures(name).and_then(|caps| caps.get(1)) {
        Some(m) => m.as_str(),
        None => {
            sink.warning(Warning::new(format!("Error name: {}", name)));
            return false;
        }
    };

    if scope.is_declared(root) {
        return true;
    }
    sink.warning(Warning::new(format!("No name: {}", name)));
    false
}

/// Escape backticks for embedding into a generated template literal.
pub fn quote_backticks(s: &str) -> String {
    s.replace('`', "\\`")
}

/// Like [`quote_backticks`] but also keeps the literal on one line.
pub fn quote_backticks_multiline(s: &str) -> String {
    quote_backticks(s).replace('\n', "\\n")
}

#[cfg(feature = "napi")]
#[napi]
pub fn detect_expression_type_native(code: String) -> napi::Result<String> {
    let kind = detect_expression_type(&code)
        .map_err(|e| napi::Error::from_reason(format!("[{}] {}", e.code, e)))?;
    serde_json::to_string(&kind)
        .map_err(|e| napi::Error::from_reason(format!("Serialize error: {}", e)))
}
