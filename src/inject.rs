use oxc_allocator::{Allocator, Box as oxc_box};
use oxc_ast::ast::*;
use oxc_ast::AstBuilder;
use oxc_span::SPAN;

use crate::script::is_check_stop;
use crate::walker::{Ancestor, Callee, Flow, NodeRule, ScriptNode};

// ═══════════════════════════════════════════════════════════════════════════════
// STATEMENT INJECTOR
// Schedules a UI refresh at the start of every function body and after
// top-level awaits in named async functions
// ═══════════════════════════════════════════════════════════════════════════════

pub const APPLY: &str = "$$apply";

pub struct StatementInjector<'a> {
    pub ast: AstBuilder<'a>,
    /// `$onDestroy(...)` callbacks are left alone when the hook is synthesized.
    skip_destroy_callbacks: bool,
    pub injected: usize,
}

impl<'a> StatementInjector<'a> {
    pub fn new(allocator: &'a Allocator, skip_destroy_callbacks: bool) -> Self {
        Self {
            ast: AstBuilder::new(allocator),
            skip_destroy_callbacks,
            injected: 0,
        }
    }

    /// `$$apply()`, or `$$apply(false)` for a manual stop.
    fn apply_statement(&self, stop: bool) -> Statement<'a> {
        let mut args = self.ast.vec();
        if stop {
            args.push(Argument::from(self.ast.expression_boolean_literal(SPAN, false)));
        }
        let call = self.ast.expression_call(
            SPAN,
            self.ast.expression_identifier(SPAN, APPLY),
            None::<oxc_box<TSTypeParameterInstantiation>>,
            args,
            false,
        );
        self.ast.statement_expression(SPAN, call)
    }

    fn is_destroy_callback(&self, parents: &[Ancestor]) -> bool {
        self.skip_destroy_callbacks && parents.last() == Some(&Ancestor::Call(Callee::DestroyHook))
    }

    /// Rule shared by functions and block-bodied arrows. Empty bodies are
    /// never touched.
    fn inject_body(&mut self, body: &mut FunctionBody<'a>, parents: &[Ancestor]) -> Flow<'a> {
        if body.statements.is_empty() {
            return Flow::Continue;
        }
        if self.is_destroy_callback(parents) {
            return Flow::Stop;
        }

        if let Some(marker) = body.statements.iter_mut().find(|stmt| is_check_stop(stmt)) {
            *marker = self.apply_statement(true);
            return Flow::Stop;
        }

        if !is_iteration_callback(parents) {
            let apply = self.apply_statement(false);
            body.statements.insert(0, apply);
            self.injected += 1;
        }
        Flow::Continue
    }

    fn enter_arrow(
        &mut self,
        arrow: &mut ArrowFunctionExpression<'a>,
        parents: &[Ancestor],
    ) -> Flow<'a> {
        if !arrow.expression {
            if arrow.body.statements.is_empty() && self.is_destroy_callback(parents) {
                return Flow::Stop;
            }
            return self.inject_body(&mut arrow.body, parents);
        }

        if self.is_destroy_callback(parents) {
            return Flow::Stop;
        }
        if is_iteration_callback(parents) {
            return Flow::Continue;
        }

        // `x => expr` becomes `x => { return expr; }`
        let expression = match arrow.body.statements.pop() {
            Some(Statement::ExpressionStatement(stmt)) => stmt.unbox().expression,
            Some(other) => {
                arrow.body.statements.push(other);
                return Flow::Continue;
            }
            None => return Flow::Continue,
        };
        let ret = self.ast.statement_return(SPAN, Some(expression));
        arrow.body.statements.push(ret);
        arrow.expression = false;

        self.inject_body(&mut arrow.body, parents)
    }

    fn enter_await(&mut self, parents: &[Ancestor]) -> Flow<'a> {
        match parents {
            [.., Ancestor::Function {
                declaration: true,
                is_async: true,
            }, Ancestor::FunctionBody, Ancestor::ExpressionStatement] => {
                self.injected += 1;
                Flow::InsertAfter(self.apply_statement(false))
            }
            _ => Flow::Continue,
        }
    }
}

fn is_iteration_callback(parents: &[Ancestor]) -> bool {
    parents.last() == Some(&Ancestor::Call(Callee::IterationMethod))
}

impl<'a> NodeRule<'a> for StatementInjector<'a> {
    fn enter(&mut self, node: ScriptNode<'_, 'a>, parents: &[Ancestor]) -> Flow<'a> {
        match node {
            ScriptNode::Function(func) => match func.body.as_mut() {
                Some(body) => self.inject_body(body, parents),
                None => Flow::Continue,
            },
            ScriptNode::ArrowFunction(arrow) => self.enter_arrow(arrow, parents),
            ScriptNode::Await(_) => self.enter_await(parents),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::script::{mark_check_stop, parse_program, print_program};
    use crate::walker::TreeWalker;

    fn inject(code: &str, skip_destroy_callbacks: bool) -> String {
        let allocator = Allocator::default();
        let marked = mark_check_stop(code);
        let source = allocator.alloc_str(&marked);
        let mut program = parse_program(&allocator, source).unwrap();
        let mut walker = TreeWalker::new(StatementInjector::new(&allocator, skip_destroy_callbacks));
        walker.walk(&mut program);
        squash(&print_program(&program))
    }

    fn squash(code: &str) -> String {
        code.split_whitespace().collect::<Vec<_>>().join(" ")
    }

    #[test]
    fn test_apply_first_in_function() {
        let out = inject("function inc() { count++; }", true);
        assert_eq!(out, "function inc() { $$apply(); count++; }");
    }

    #[test]
    fn test_empty_function_untouched() {
        let out = inject("function noop() {}", true);
        assert_eq!(out, "function noop() {}");
    }

    #[test]
    fn test_nested_functions_get_their_own_apply() {
        let out = inject("function outer() { const f = function() { a = 1; }; }", true);
        assert_eq!(out.matches("$$apply()").count(), 2);
        assert!(out.starts_with("function outer() { $$apply();"));
        assert!(out.contains("function() { $$apply(); a = 1;"));
    }

    #[test]
    fn test_iteration_callbacks_skipped() {
        let out = inject(
            "function run() { list.forEach((x) => { total += x; }); list.map((x) => x * 2); \
             list.filter((x) => x > 1); list.filter(function (x) { return x.ok; }); }",
            true,
        );
        assert_eq!(out.matches("$$apply()").count(), 1);
        assert!(out.contains("total += x;"));
        assert!(out.contains("(x) => x * 2"));
        assert!(out.contains("(x) => x > 1"));
        assert!(out.contains("return x.ok;"));
    }

    #[test]
    fn test_expression_arrow_becomes_block() {
        let out = inject("const double = (x) => x * 2;", true);
        assert_eq!(out, "const double = (x) => { $$apply(); return x * 2; };");
    }

    #[test]
    fn test_check_stop_replaced() {
        let out = inject("function save() {\n  a = 1;\n  // !check-stop\n  b = 2;\n}", true);
        assert_eq!(out, "function save() { a = 1; $$apply(false); b = 2; }");
    }

    #[test]
    fn test_destroy_callback_left_alone() {
        let out = inject("$onDestroy(() => { clearInterval(t); });", true);
        assert!(!out.contains("$$apply"));

        let out = inject("$onDestroy(() => { clearInterval(t); });", false);
        assert!(out.contains("$$apply()"));
    }

    #[test]
    fn test_await_in_async_declaration() {
        let out = inject(
            "async function load() { await fetch(url); items = await res.json(); }",
            true,
        );
        assert_eq!(
            out,
            "async function load() { $$apply(); await fetch(url); $$apply(); items = await res.json(); }"
        );
    }

    #[test]
    fn test_await_in_async_arrow_ignored() {
        let out = inject("const load = async () => { await fetch(url); };", true);
        assert_eq!(out.matches("$$apply()").count(), 1);
    }

    #[test]
    fn test_nested_await_does_not_leak_to_outer_body() {
        let out = inject(
            "async function outer() { run(async function inner() { await a; }); b = 1; }",
            true,
        );
        assert_eq!(
            out,
            "async function outer() { $$apply(); run(async function inner() { $$apply(); await a; }); b = 1; }"
        );
    }
}
