//! Depth-first walk over a script `Program` that keeps track of each node's
//! structural parent.
//!
//! oxc nodes have no parent pointers, so the walker keeps an ancestor stack
//! instead. The stack is rebuilt from scratch on every walk and is never part
//! of the tree, so it cannot leak into printing or comparison.
//!
//! Only shapes the rules care about are recorded precisely. Every other
//! statement or expression is pushed as [`Ancestor::Other`] so "direct parent"
//! checks never look through an unrelated node.

use oxc_ast::ast::{
    ArrowFunctionExpression, AwaitExpression, CallExpression, Expression, ExpressionStatement,
    Function, FunctionBody, FunctionType, Program, Statement,
};
use oxc_ast_visit::walk_mut::{
    walk_arrow_function_expression, walk_await_expression, walk_call_expression,
    walk_expression, walk_expression_statement, walk_function, walk_statement,
};
use oxc_ast_visit::VisitMut;
use oxc_syntax::scope::ScopeFlags;

/// Array methods whose callbacks run once per element.
pub const ITERATION_METHODS: [&str; 3] = ["forEach", "map", "filter"];

/// What a call expression is calling, as far as the rules care.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Callee {
    /// `<expr>.forEach(...)`, `<expr>.map(...)`, `<expr>.filter(...)`
    IterationMethod,
    /// `$onDestroy(...)`
    DestroyHook,
    Other,
}

impl Callee {
    pub fn of(callee: &Expression) -> Self {
        match callee {
            Expression::StaticMemberExpression(member)
                if ITERATION_METHODS.contains(&member.property.name.as_str()) =>
            {
                Callee::IterationMethod
            }
            Expression::Identifier(ident) if ident.name == crate::scan::DESTROY_HOOK => {
                Callee::DestroyHook
            }
            _ => Callee::Other,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ancestor {
    Call(Callee),
    ExpressionStatement,
    FunctionBody,
    Function { declaration: bool, is_async: bool },
    ArrowFunction,
    Other,
}

/// A node the rules can act on, handed over mutably before its children are
/// visited.
pub enum ScriptNode<'n, 'a> {
    Function(&'n mut Function<'a>),
    ArrowFunction(&'n mut ArrowFunctionExpression<'a>),
    Await(&'n mut AwaitExpression<'a>),
}

pub enum Flow<'a> {
    Continue,
    /// Skip the node's subtree.
    Stop,
    /// Visit the subtree, then insert `statement` right after the statement
    /// that encloses this node in the nearest function body.
    InsertAfter(Statement<'a>),
}

pub trait NodeRule<'a> {
    /// `parents` is the ancestor chain of `node`, innermost last.
    fn enter(&mut self, node: ScriptNode<'_, 'a>, parents: &[Ancestor]) -> Flow<'a>;
}

pub struct TreeWalker<'a, R: NodeRule<'a>> {
    rule: R,
    ancestors: Vec<Ancestor>,
    pending_insert: Option<Statement<'a>>,
}

impl<'a, R: NodeRule<'a>> TreeWalker<'a, R> {
    pub fn new(rule: R) -> Self {
        TreeWalker {
            rule,
            ancestors: Vec::new(),
            pending_insert: None,
        }
    }

    pub fn walk(&mut self, program: &mut Program<'a>) {
        self.ancestors.clear();
        self.pending_insert = None;
        self.visit_program(program);
    }

    pub fn into_rule(self) -> R {
        self.rule
    }

    fn with_ancestor(&mut self, ancestor: Ancestor, f: impl FnOnce(&mut Self)) {
        self.ancestors.push(ancestor);
        f(self);
        self.ancestors.pop();
    }
}

impl<'a, R: NodeRule<'a>> VisitMut<'a> for TreeWalker<'a, R> {
    fn visit_statement(&mut self, stmt: &mut Statement<'a>) {
        match stmt {
            // These push their own, more precise ancestor.
            Statement::ExpressionStatement(_) | Statement::FunctionDeclaration(_) => {
                walk_statement(self, stmt)
            }
            _ => self.with_ancestor(Ancestor::Other, |walker| walk_statement(walker, stmt)),
        }
    }

    fn visit_expression(&mut self, expr: &mut Expression<'a>) {
        match expr {
            Expression::CallExpression(_)
            | Expression::FunctionExpression(_)
            | Expression::ArrowFunctionExpression(_)
            | Expression::AwaitExpression(_) => walk_expression(self, expr),
            _ => self.with_ancestor(Ancestor::Other, |walker| walk_expression(walker, expr)),
        }
    }

    fn visit_expression_statement(&mut self, stmt: &mut ExpressionStatement<'a>) {
        self.with_ancestor(Ancestor::ExpressionStatement, |walker| {
            walk_expression_statement(walker, stmt)
        });
    }

    fn visit_call_expression(&mut self, call: &mut CallExpression<'a>) {
        let callee = Callee::of(&call.callee);
        self.with_ancestor(Ancestor::Call(callee), |walker| {
            walk_call_expression(walker, call)
        });
    }

    fn visit_function(&mut self, func: &mut Function<'a>, flags: ScopeFlags) {
        if let Flow::Stop = self.rule.enter(ScriptNode::Function(&mut *func), &self.ancestors) {
            return;
        }
        let ancestor = Ancestor::Function {
            declaration: func.r#type == FunctionType::FunctionDeclaration,
            is_async: func.r#async,
        };
        self.with_ancestor(ancestor, |walker| walk_function(walker, func, flags));
    }

    fn visit_arrow_function_expression(&mut self, arrow: &mut ArrowFunctionExpression<'a>) {
        if let Flow::Stop = self.rule.enter(ScriptNode::ArrowFunction(&mut *arrow), &self.ancestors) {
            return;
        }
        self.with_ancestor(Ancestor::ArrowFunction, |walker| {
            walk_arrow_function_expression(walker, arrow)
        });
    }

    fn visit_function_body(&mut self, body: &mut FunctionBody<'a>) {
        self.ancestors.push(Ancestor::FunctionBody);
        let mut index = 0;
        while index < body.statements.len() {
            self.visit_statement(&mut body.statements[index]);
            if let Some(stmt) = self.pending_insert.take() {
                body.statements.insert(index + 1, stmt);
                index += 1;
            }
            index += 1;
        }
        self.ancestors.pop();
    }

    fn visit_await_expression(&mut self, expr: &mut AwaitExpression<'a>) {
        match self.rule.enter(ScriptNode::Await(&mut *expr), &self.ancestors) {
            Flow::Stop => {}
            Flow::Continue => walk_await_expression(self, expr),
            Flow::InsertAfter(stmt) => {
                walk_await_expression(self, expr);
                // Set only after the subtree so nested bodies cannot claim it.
                self.pending_insert = Some(stmt);
            }
        }
    }
}
