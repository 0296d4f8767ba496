use oxc_allocator::{Allocator, Vec as ArenaVec};
use oxc_ast::ast::*;
use oxc_ast::AstBuilder;

use crate::classify::is_simple_name;
use crate::error::{CompileResult, CompilerError, ERR_EXPORT_DECLARATION, ERR_OPTION_NAME};
use crate::scan::RootScope;
use crate::script::parse_statement;
use crate::watcher::{build_watcher, is_reactive_label, Watcher};

// ═══════════════════════════════════════════════════════════════════════════════
// TOP-LEVEL REWRITER
// Turns the walked top-level statements into the body of the component
// factory: imports hoisted, exports wired as props, `$:` statements compiled
// to watchers, runtime scaffolding around everything else
// ═══════════════════════════════════════════════════════════════════════════════

const HEADER: [&str; 5] = [
    "if(!$option) $option = {}",
    "if(!$option.events) $option.events = {}",
    "const $props = $option.props || {}",
    "const $component = $$makeComponent($element, $option);",
    "const $$apply = $$makeApply($component.$cd)",
];
const PROPLESS_HEADER: [&str; 2] = ["$component.push = $$apply", "const $attributes = $props"];
const EMITTER_DECLARATION: &str = "const $emit = $makeEmitter($option);";
const DESTROY_HOOK_DECLARATION: &str = "function $onDestroy(fn) {$component.$cd.d(fn);}";
const LEFTOVER_ATTRIBUTES: &str =
    "let $attributes = $$componentCompleteProps($component, $$apply, $props)";
const FOOTER: &str = "$$runtime()";

fn prop_registration(name: &str) -> String {
    format!(
        "$$makeProp($component, $props, $option.boundProps || {{}}, '{n}', () => {n}, _{n} => {{{n} = _{n}; $$apply();}})",
        n = name
    )
}

pub struct RewriteOutput<'a> {
    /// Import declarations in source order.
    pub imports: ArenaVec<'a, Statement<'a>>,
    /// Statements of the factory function.
    pub body: ArenaVec<'a, Statement<'a>>,
    pub default_imports: Vec<String>,
    pub props: Vec<String>,
    pub watchers: Vec<Watcher>,
}

pub struct TopLevelRewriter<'a, 's> {
    allocator: &'a Allocator,
    ast: AstBuilder<'a>,
    source: &'s str,
    scope: &'s RootScope,
    imports: ArenaVec<'a, Statement<'a>>,
    body: ArenaVec<'a, Statement<'a>>,
    default_imports: Vec<String>,
    props: Vec<String>,
    watchers: Vec<Watcher>,
    /// Index in `body` right after the last prop registration.
    last_prop_index: Option<usize>,
}

impl<'a, 's> TopLevelRewriter<'a, 's> {
    /// `source` is the text the statements were parsed from and `scope` the
    /// root names scanned before the walk.
    pub fn new(allocator: &'a Allocator, source: &'s str, scope: &'s RootScope) -> Self {
        let ast = AstBuilder::new(allocator);
        Self {
            allocator,
            ast,
            source,
            scope,
            imports: ast.vec(),
            body: ast.vec(),
            default_imports: Vec::new(),
            props: Vec::new(),
            watchers: Vec::new(),
            last_prop_index: None,
        }
    }

    pub fn rewrite(
        mut self,
        statements: ArenaVec<'a, Statement<'a>>,
    ) -> CompileResult<RewriteOutput<'a>> {
        for stmt in statements.into_iter() {
            match stmt {
                Statement::ImportDeclaration(import_decl) => self.hoist_import(import_decl),
                Statement::ExportNamedDeclaration(export) => self.register_props(export)?,
                Statement::LabeledStatement(labeled) if is_reactive_label(&labeled) => {
                    self.add_watcher(&labeled)?
                }
                other => self.body.push(other),
            }
        }
        self.body.push(parse_statement(self.allocator, FOOTER)?);

        let mut header = Vec::new();
        for line in HEADER {
            header.push(parse_statement(self.allocator, line)?);
        }
        match self.last_prop_index {
            Some(index) => {
                let leftover = parse_statement(self.allocator, LEFTOVER_ATTRIBUTES)?;
                self.body.insert(index, leftover);
            }
            None => {
                for line in PROPLESS_HEADER {
                    header.push(parse_statement(self.allocator, line)?);
                }
            }
        }
        if self.scope.needs_emitter() {
            header.push(parse_statement(self.allocator, EMITTER_DECLARATION)?);
        }
        if self.scope.needs_destroy_hook() {
            header.push(parse_statement(self.allocator, DESTROY_HOOK_DECLARATION)?);
        }

        let mut body = self.ast.vec_with_capacity(header.len() + self.body.len());
        for stmt in header {
            body.push(stmt);
        }
        for stmt in self.body.into_iter() {
            body.push(stmt);
        }

        Ok(RewriteOutput {
            imports: self.imports,
            body,
            default_imports: self.default_imports,
            props: self.props,
            watchers: self.watchers,
        })
    }

    fn hoist_import(&mut self, import_decl: oxc_allocator::Box<'a, ImportDeclaration<'a>>) {
        if let Some(specifiers) = &import_decl.specifiers {
            for specifier in specifiers {
                if let ImportDeclarationSpecifier::ImportDefaultSpecifier(s) = specifier {
                    let name = s.local.name.to_string();
                    if !self.default_imports.contains(&name) {
                        self.default_imports.push(name);
                    }
                }
            }
        }
        self.imports.push(Statement::ImportDeclaration(import_decl));
    }

    fn register_props(
        &mut self,
        export: oxc_allocator::Box<'a, ExportNamedDeclaration<'a>>,
    ) -> CompileResult<()> {
        let snippet = export.span.source_text(self.source);
        let export = export.unbox();
        let decl = match export.declaration {
            Some(Declaration::VariableDeclaration(decl)) => decl,
            _ => {
                return Err(
                    CompilerError::new(ERR_EXPORT_DECLARATION, "Wrong export").with_context(snippet)
                )
            }
        };

        let mut names = Vec::with_capacity(decl.declarations.len());
        for declarator in &decl.declarations {
            match &declarator.id {
                BindingPattern::BindingIdentifier(id) => names.push(id.name.to_string()),
                _ => {
                    return Err(CompilerError::new(
                        ERR_EXPORT_DECLARATION,
                        "Exported props must be plain identifiers",
                    )
                    .with_context(snippet))
                }
            }
        }

        self.body.push(Statement::VariableDeclaration(decl));
        for name in names {
            self.body
                .push(parse_statement(self.allocator, &prop_registration(&name))?);
            self.last_prop_index = Some(self.body.len());
            self.props.push(name);
        }
        Ok(())
    }

    fn add_watcher(&mut self, labeled: &LabeledStatement<'a>) -> CompileResult<()> {
        let reactive = build_watcher(labeled, self.source, self.scope)
            .map_err(|err| err.with_context(labeled.span.source_text(self.source)))?;
        if let Some(name) = reactive.declares {
            self.body
                .push(parse_statement(self.allocator, &format!("var {};", name))?);
        }
        self.watchers.push(reactive.watcher);
        Ok(())
    }
}

/// Wrap `body` into `function NAME($element, $option) { ... }`, default
/// exported when asked, and put it after the hoisted imports.
pub fn build_module<'a>(
    allocator: &'a Allocator,
    name: &str,
    export_default: bool,
    output: &mut RewriteOutput<'a>,
) -> CompileResult<ArenaVec<'a, Statement<'a>>> {
    if !is_simple_name(name) {
        return Err(CompilerError::new(
            ERR_OPTION_NAME,
            &format!("Wrong component name `{}`", name),
        ));
    }

    let shell = format!(
        "{}function {}($element, $option) {{}}",
        if export_default { "export default " } else { "" },
        name
    );
    let mut factory = parse_statement(allocator, &shell)?;
    let function_body = match &mut factory {
        Statement::FunctionDeclaration(func) => func.body.as_mut(),
        Statement::ExportDefaultDeclaration(export) => match &mut export.declaration {
            ExportDefaultDeclarationKind::FunctionDeclaration(func) => func.body.as_mut(),
            _ => None,
        },
        _ => None,
    };
    if let Some(function_body) = function_body {
        let ast = AstBuilder::new(allocator);
        function_body.statements = std::mem::replace(&mut output.body, ast.vec());
    }

    let ast = AstBuilder::new(allocator);
    let mut module = std::mem::replace(&mut output.imports, ast.vec());
    module.push(factory);
    Ok(module)
}
