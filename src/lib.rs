//! # Reactive Compiler
//!
//! Reactivity pass of the component compiler. It turns a component's script
//! block into a factory function that keeps the UI in sync with state.
//!
//! ## Script Invariants
//!
//! 1. **Refresh on entry**: every non-empty function or arrow body starts with
//!    `$$apply()`. Exceptions are callbacks passed straight to
//!    `forEach`/`map`/`filter`, and `$onDestroy` callbacks when the hook is
//!    synthesized.
//!
//! 2. **Manual control**: a `// !check-stop` line inside a body becomes
//!    `$$apply(false)`, and that body gets no automatic refresh.
//!
//! 3. **Suspension points**: in a named `async function`, a bare `await expr;`
//!    at the top of the body is followed by `$$apply()`.
//!
//! 4. **Props**: `export let x` stays a local and is wired through
//!    `$$makeProp`. `$attributes` is declared exactly once.
//!
//! 5. **Watchers**: `$:` statements never reach the output body. They come
//!    back as snippet text, sliced verbatim from the source.
//!
//! 6. **Root scope**: top-level names are scanned once from the original
//!    script, before anything is rewritten.
//!
//! ## Template Compaction
//!
//! `compact_dom` trims whitespace text in a parsed template tree, one
//! children list at a time.

mod classify;
mod compact;
mod diagnostics;
mod error;
mod inject;
mod rewrite;
mod scan;
mod script;
mod template;
mod transform;
mod visitor;
mod walker;
mod watcher;

#[cfg(test)]
mod watcher_tests;

pub use classify::{
    check_root_name, detect_expression_type, is_simple_name, quote_backticks,
    quote_backticks_multiline, unwrap_expression, ExpressionKind,
};
pub use compact::compact_dom;
pub use diagnostics::{DiagnosticSink, NullSink, TracingSink, Warning};
pub use error::*;
pub use scan::RootScope;
pub use template::{AwaitNode, BlockNode, Container, ElementNode, IfNode, TemplateNode, TextNode};
pub use transform::{
    transform_script, transform_scripts, ScriptInput, TransformOptions, TransformResult,
    DEFAULT_COMPONENT_NAME,
};
pub use visitor::{walk_children, walk_node, walk_root, TemplateVisitor};
pub use watcher::Watcher;

#[cfg(feature = "napi")]
pub use classify::detect_expression_type_native;
#[cfg(feature = "napi")]
pub use compact::compact_template_native;
#[cfg(feature = "napi")]
pub use transform::transform_script_native;
