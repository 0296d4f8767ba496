//! Script parsing and printing on top of oxc.
//!
//! Everything that touches `oxc_parser` or `oxc_codegen` goes through here so
//! the rewrite passes only ever see an already-built `Program`.

use lazy_static::lazy_static;
use oxc_allocator::Allocator;
use oxc_ast::ast::{Expression, Program, Statement};
use oxc_codegen::Codegen;
use oxc_parser::{ParseOptions, Parser};
use oxc_span::SourceType;
use regex::Regex;

use crate::error::{CompileResult, CompilerError, ERR_PARSE};

/// Identifier a `// !check-stop` comment is rewritten to before parsing.
pub const CHECK_STOP_MARKER: &str = "$$_checkStop";

lazy_static! {
    static ref LINE_COMMENT_RE: Regex = Regex::new(r"^(\s*)//(.*)$").unwrap();
}

/// Rewrite every `// !check-stop` line into a marker expression statement,
/// keeping its indentation. All other lines pass through untouched.
pub fn mark_check_stop(code: &str) -> String {
    code.split('\n')
        .map(|line| match LINE_COMMENT_RE.captures(line) {
            Some(caps) if caps[2].trim() == "!check-stop" => {
                format!("{}{};", &caps[1], CHECK_STOP_MARKER)
            }
            _ => line.to_string(),
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn is_check_stop(stmt: &Statement) -> bool {
    match stmt {
        Statement::ExpressionStatement(expr_stmt) => matches!(
            &expr_stmt.expression,
            Expression::Identifier(ident) if ident.name == CHECK_STOP_MARKER
        ),
        _ => false,
    }
}

fn parse_options() -> ParseOptions {
    // Parenthesized expressions are dropped so spans match the bare expression
    // and parent checks never see a wrapper node.
    ParseOptions {
        preserve_parens: false,
        ..ParseOptions::default()
    }
}

/// Parse a whole ES module.
pub fn parse_program<'a>(allocator: &'a Allocator, source: &'a str) -> CompileResult<Program<'a>> {
    let ret = Parser::new(allocator, source, SourceType::mjs())
        .with_options(parse_options())
        .parse();

    if let Some(error) = ret.errors.first() {
        return Err(CompilerError::new(ERR_PARSE, &error.to_string()));
    }
    Ok(ret.program)
}

/// Parse a snippet that must contain exactly one statement.
///
/// The snippet text is copied into the arena so the returned statement lives
/// as long as the rest of the tree.
pub fn parse_statement<'a>(allocator: &'a Allocator, code: &str) -> CompileResult<Statement<'a>> {
    let source: &'a str = allocator.alloc_str(code);
    let program = parse_program(allocator, source)?;
    let mut body = program.body;
    if body.len() != 1 {
        return Err(CompilerError::new(
            ERR_PARSE,
            &format!("Expected a single statement in snippet: {}", code),
        ));
    }
    body.pop()
        .ok_or_else(|| CompilerError::new(ERR_PARSE, "Empty snippet"))
}

pub fn print_program(program: &Program) -> String {
    Codegen::new().build(program).code
}
