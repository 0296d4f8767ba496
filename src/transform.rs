#[cfg(feature = "napi")]
use napi_derive::napi;
use oxc_allocator::Allocator;
use oxc_ast::AstBuilder;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::error::CompileResult;
use crate::inject::StatementInjector;
use crate::rewrite::{build_module, TopLevelRewriter};
use crate::scan::RootScope;
use crate::script::{mark_check_stop, parse_program, print_program};
use crate::walker::TreeWalker;
use crate::watcher::Watcher;

// ═══════════════════════════════════════════════════════════════════════════════
// TRANSFORM INPUT / OUTPUT
// ═══════════════════════════════════════════════════════════════════════════════

pub const DEFAULT_COMPONENT_NAME: &str = "widget";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TransformOptions {
    /// Name of the generated factory function.
    pub name: String,
    pub export_default: bool,
}

impl Default for TransformOptions {
    fn default() -> Self {
        TransformOptions {
            name: DEFAULT_COMPONENT_NAME.to_string(),
            export_default: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransformResult {
    /// Rendered watcher statements, in source order.
    pub watchers: Vec<String>,
    pub watcher_descriptors: Vec<Watcher>,
    /// Local names of default imports.
    pub imports: Vec<String>,
    pub props: Vec<String>,
    pub root_variables: BTreeSet<String>,
    pub root_functions: BTreeSet<String>,
    pub on_mount: bool,
    pub on_destroy: bool,
    pub code: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScriptInput {
    pub code: String,
    #[serde(default)]
    pub options: TransformOptions,
}

// ═══════════════════════════════════════════════════════════════════════════════
// SCRIPT TRANSFORM
// ═══════════════════════════════════════════════════════════════════════════════

/// Compile one component script into its factory module.
///
/// The pipeline is: mark `// !check-stop` lines, parse, scan root names,
/// inject refresh calls, rewrite the top level, print.
pub fn transform_script(code: &str, options: &TransformOptions) -> CompileResult<TransformResult> {
    tracing::debug!(
        name = %options.name,
        export_default = options.export_default,
        bytes = code.len(),
        "transforming script"
    );

    let allocator = Allocator::default();
    let source: &str = allocator.alloc_str(&mark_check_stop(code));
    let mut program = parse_program(&allocator, source)?;

    let scope = RootScope::scan(&program);

    let mut walker = TreeWalker::new(StatementInjector::new(
        &allocator,
        scope.needs_destroy_hook(),
    ));
    walker.walk(&mut program);
    let injected = walker.into_rule().injected;

    let ast = AstBuilder::new(&allocator);
    let statements = std::mem::replace(&mut program.body, ast.vec());
    let mut output = TopLevelRewriter::new(&allocator, source, &scope).rewrite(statements)?;
    program.body = build_module(&allocator, &options.name, options.export_default, &mut output)?;
    // Snippet statements carry spans from their own sources, so comment
    // positions no longer line up with the tree.
    program.comments = ast.vec();

    let code = print_program(&program);

    tracing::debug!(
        props = output.props.len(),
        watchers = output.watchers.len(),
        imports = output.default_imports.len(),
        injected,
        "transformed script"
    );

    Ok(TransformResult {
        watchers: output.watchers.iter().map(Watcher::render).collect(),
        watcher_descriptors: output.watchers,
        imports: output.default_imports,
        props: output.props,
        on_mount: scope.has_on_mount(),
        on_destroy: scope.has_on_destroy(),
        root_variables: scope.variables,
        root_functions: scope.functions,
        code,
    })
}

/// Transform independent scripts in parallel. Results keep input order.
pub fn transform_scripts(inputs: &[ScriptInput]) -> Vec<CompileResult<TransformResult>> {
    inputs
        .par_iter()
        .map(|input| transform_script(&input.code, &input.options))
        .collect()
}

// ═══════════════════════════════════════════════════════════════════════════════
// NAPI WRAPPERS
// ═══════════════════════════════════════════════════════════════════════════════

#[cfg(feature = "napi")]
#[napi]
pub fn transform_script_native(code: String, options_json: Option<String>) -> napi::Result<String> {
    let options: TransformOptions = match options_json {
        Some(json) => serde_json::from_str(&json)
            .map_err(|e| napi::Error::from_reason(format!("Options parse error: {}", e)))?,
        None => TransformOptions::default(),
    };
    let result = transform_script(&code, &options)
        .map_err(|e| napi::Error::from_reason(format!("[{}] {}", e.code, e)))?;
    serde_json::to_string(&result)
        .map_err(|e| napi::Error::from_reason(format!("Serialize error: {}", e)))
}
