//! Compiles `$:` statements into change-detection watchers.
//!
//! Every piece of user code that ends up in a watcher is sliced out of the
//! original source by span, so the emitted snippets keep the author's exact
//! formatting.

use oxc_ast::ast::{AssignmentTarget, Expression, LabeledStatement, Statement};
use oxc_span::GetSpan;
use oxc_syntax::operator::AssignmentOperator;
use serde::{Deserialize, Serialize};

use crate::error::{
    CompileResult, CompilerError, ERR_WATCH_CALLBACK, ERR_WATCH_DEPENDENCIES,
    ERR_WATCH_EXPRESSION, ERR_WATCH_OPERATOR, ERR_WATCH_STATEMENT, ERR_WATCH_TARGET,
};
use crate::scan::RootScope;

/// Label that marks a reactive statement.
pub const REACTIVE_LABEL: &str = "$";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum Watcher {
    /// Re-runs `target = expression` before every refresh cycle.
    Prefix { target: String, expression: String },
    /// Calls `callback` when the dependency values change.
    ///
    /// `dependency_source` is the source text spanning all dependencies. With
    /// more than one dependency the values are compared as an array.
    Tracked {
        dependencies: Vec<String>,
        dependency_source: String,
        callback: String,
    },
}

impl Watcher {
    pub fn render(&self) -> String {
        match self {
            Watcher::Prefix { target, expression } => {
                format!("$cd.prefix.push(() => {{{} = {};}});", target, expression)
            }
            Watcher::Tracked {
                dependencies,
                dependency_source,
                callback,
            } => {
                if dependencies.len() == 1 {
                    format!("$watch($cd, () => ({}), {});", dependency_source, callback)
                } else {
                    format!(
                        "$watch($cd, () => [{}], ($args) => {{ ({}).apply(null, $args); }}, {{cmp: $$compareArray}});",
                        dependency_source, callback
                    )
                }
            }
        }
    }
}

/// A compiled `$:` statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReactiveStatement {
    pub watcher: Watcher,
    /// Set when the assignment target is not declared at the top level and
    /// needs a `var` in the component body.
    pub declares: Option<String>,
}

pub fn is_reactive_label(labeled: &LabeledStatement) -> bool {
    labeled.label.name == REACTIVE_LABEL
}

/// Values a watcher can observe. Constants never change, so literals are
/// rejected along with `new.target`/`import.meta`.
fn is_watchable(expr: &Expression) -> bool {
    !matches!(
        expr,
        Expression::BooleanLiteral(_)
            | Expression::NullLiteral(_)
            | Expression::NumericLiteral(_)
            | Expression::BigIntLiteral(_)
            | Expression::RegExpLiteral(_)
            | Expression::StringLiteral(_)
            | Expression::TemplateLiteral(_)
            | Expression::MetaProperty(_)
            | Expression::Super(_)
    )
}

fn slice<'s>(source: &'s str, node: &impl GetSpan) -> &'s str {
    node.span().source_text(source)
}

fn assert_watchable(expr: &Expression, source: &str) -> CompileResult<()> {
    if is_watchable(expr) {
        return Ok(());
    }
    Err(CompilerError::new(
        ERR_WATCH_EXPRESSION,
        &format!("Wrong expression `{}`", slice(source, expr)),
    ))
}

/// Build the watcher for one `$:` statement. `source` is the text the
/// statement was parsed from.
pub fn build_watcher(
    labeled: &LabeledStatement,
    source: &str,
    scope: &RootScope,
) -> CompileResult<ReactiveStatement> {
    let expression = match &labeled.body {
        Statement::ExpressionStatement(stmt) => &stmt.expression,
        _ => {
            return Err(CompilerError::new(
                ERR_WATCH_STATEMENT,
                "Reactive statement must be an expression",
            ))
        }
    };

    let reactive = match expression {
        Expression::AssignmentExpression(assign) => {
            if assign.operator != AssignmentOperator::Assign {
                return Err(CompilerError::new(
                    ERR_WATCH_OPERATOR,
                    &format!("Wrong operator `{}`", assign.operator.as_str()),
                ));
            }

            let (target, declares) = match &assign.left {
                AssignmentTarget::AssignmentTargetIdentifier(ident) => {
                    let name = ident.name.to_string();
                    let declares = if scope.variables.contains(&name) {
                        None
                    } else {
                        Some(name.clone())
                    };
                    (name, declares)
                }
                left @ (AssignmentTarget::StaticMemberExpression(_)
                | AssignmentTarget::ComputedMemberExpression(_)
                | AssignmentTarget::PrivateFieldExpression(_)) => {
                    (slice(source, left).to_string(), None)
                }
                other => {
                    return Err(CompilerError::new(
                        ERR_WATCH_TARGET,
                        &format!("Wrong assignment target `{}`", slice(source, other)),
                    ))
                }
            };

            assert_watchable(&assign.right, source)?;
            ReactiveStatement {
                watcher: Watcher::Prefix {
                    target,
                    expression: slice(source, &assign.right).to_string(),
                },
                declares,
            }
        }
        Expression::SequenceExpression(seq) => {
            let (callback, dependencies) = match seq.expressions.split_last() {
                Some(parts) => parts,
                None => {
                    return Err(CompilerError::new(
                        ERR_WATCH_DEPENDENCIES,
                        "Reactive sequence is empty",
                    ))
                }
            };
            if !matches!(
                callback,
                Expression::ArrowFunctionExpression(_) | Expression::FunctionExpression(_)
            ) {
                return Err(CompilerError::new(
                    ERR_WATCH_CALLBACK,
                    &format!("Last element `{}` is not a function", slice(source, callback)),
                ));
            }

            let (first, last) = match (dependencies.first(), dependencies.last()) {
                (Some(first), Some(last)) => (first, last),
                _ => {
                    return Err(CompilerError::new(
                        ERR_WATCH_DEPENDENCIES,
                        "Reactive callback has no dependencies",
                    ))
                }
            };
            for dep in dependencies {
                assert_watchable(dep, source)?;
            }

            let start = first.span().start as usize;
            let end = last.span().end as usize;
            ReactiveStatement {
                watcher: Watcher::Tracked {
                    dependencies: dependencies
                        .iter()
                        .map(|dep| slice(source, dep).to_string())
                        .collect(),
                    dependency_source: source[start..end].to_string(),
                    callback: slice(source, callback).to_string(),
                },
                declares: None,
            }
        }
        other => {
            return Err(CompilerError::new(
                ERR_WATCH_STATEMENT,
                &format!("Unsupported reactive expression `{}`", slice(source, other)),
            ))
        }
    };

    tracing::debug!(watcher = ?reactive.watcher, "built watcher");
    Ok(reactive)
}
