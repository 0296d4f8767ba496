use std::collections::BTreeSet;

use oxc_ast::ast::{BindingPattern, Declaration, Program, Statement, VariableDeclaration};
use serde::{Deserialize, Serialize};

pub const ON_MOUNT: &str = "onMount";
pub const ON_DESTROY: &str = "onDestroy";
pub const DESTROY_HOOK: &str = "$onDestroy";
pub const EMITTER: &str = "$emit";

/// Names declared at the top level of the original script.
///
/// Computed once before any rewriting and never updated afterwards, even
/// though the rewrite adds declarations of its own.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RootScope {
    pub variables: BTreeSet<String>,
    pub functions: BTreeSet<String>,
}

impl RootScope {
    pub fn scan(program: &Program) -> Self {
        let mut scope = RootScope::default();
        for stmt in &program.body {
            match stmt {
                Statement::FunctionDeclaration(func) => {
                    if let Some(id) = &func.id {
                        scope.functions.insert(id.name.to_string());
                    }
                }
                Statement::VariableDeclaration(decl) => scope.add_variables(decl),
                Statement::ExportNamedDeclaration(export) => match &export.declaration {
                    Some(Declaration::VariableDeclaration(decl)) => scope.add_variables(decl),
                    Some(Declaration::FunctionDeclaration(func)) => {
                        if let Some(id) = &func.id {
                            scope.functions.insert(id.name.to_string());
                        }
                    }
                    _ => {}
                },
                _ => {}
            }
        }
        scope
    }

    fn add_variables(&mut self, decl: &VariableDeclaration) {
        for declarator in &decl.declarations {
            collect_binding_names(&declarator.id, &mut self.variables);
        }
    }

    pub fn is_declared(&self, name: &str) -> bool {
        self.variables.contains(name) || self.functions.contains(name)
    }

    pub fn has_on_mount(&self) -> bool {
        self.functions.contains(ON_MOUNT)
    }

    pub fn has_on_destroy(&self) -> bool {
        self.functions.contains(ON_DESTROY)
    }

    /// True when the runtime's default `$onDestroy` must be synthesized, which
    /// also means callbacks handed to it are left alone by the injector.
    pub fn needs_destroy_hook(&self) -> bool {
        !self.is_declared(DESTROY_HOOK)
    }

    pub fn needs_emitter(&self) -> bool {
        !self.is_declared(EMITTER)
    }
}

fn collect_binding_names(pattern: &BindingPattern, names: &mut BTreeSet<String>) {
    match pattern {
        BindingPattern::BindingIdentifier(id) => {
            names.insert(id.name.to_string());
        }
        BindingPattern::ObjectPattern(obj) => {
            for prop in &obj.properties {
                collect_binding_names(&prop.value, names);
            }
            if let Some(rest) = &obj.rest {
                collect_binding_names(&rest.argument, names);
            }
        }
        BindingPattern::ArrayPattern(arr) => {
            for elem in arr.elements.iter().flatten() {
                collect_binding_names(elem, names);
            }
            if let Some(rest) = &arr.rest {
                collect_binding_names(&rest.argument, names);
            }
        }
        BindingPattern::AssignmentPattern(assign) => collect_binding_names(&assign.left, names),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::script::parse_program;
    use oxc_allocator::Allocator;

    fn scan(code: &str) -> RootScope {
        let allocator = Allocator::default();
        let source = allocator.alloc_str(code);
        let program = parse_program(&allocator, source).unwrap();
        RootScope::scan(&program)
    }

    #[test]
    fn test_scan_top_level_only() {
        let scope = scan(
            "let a = 1, b; const { c, d: [e] } = obj; function f() { let inner; } \
             if (x) { var hidden; } export let prop = 2;",
        );
        let vars: Vec<&str> = scope.variables.iter().map(|s| s.as_str()).collect();
        assert_eq!(vars, vec!["a", "b", "c", "e", "prop"]);
        assert!(scope.functions.contains("f"));
        assert!(!scope.is_declared("inner"));
        assert!(!scope.is_declared("hidden"));
    }

    #[test]
    fn test_lifecycle_flags() {
        let scope = scan("function onMount() {} const onDestroy = () => {};");
        assert!(scope.has_on_mount());
        assert!(!scope.has_on_destroy());
        assert!(scope.needs_destroy_hook());
        assert!(scope.needs_emitter());
    }

    #[test]
    fn test_user_declared_hooks() {
        let scope = scan("let $onDestroy = x; function $emit() {}");
        assert!(!scope.needs_destroy_hook());
        assert!(!scope.needs_emitter());
    }
}
