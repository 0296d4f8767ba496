use oxc_allocator::Allocator;
use oxc_ast::ast::Statement;

use crate::error::*;
use crate::scan::RootScope;
use crate::script::parse_program;
use crate::watcher::{build_watcher, ReactiveStatement, Watcher};

fn build(code: &str, declared: &[&str]) -> CompileResult<ReactiveStatement> {
    let allocator = Allocator::default();
    let source = allocator.alloc_str(code);
    let program = parse_program(&allocator, source).unwrap();
    let mut scope = RootScope::default();
    for name in declared {
        scope.variables.insert(name.to_string());
    }
    match program.body.first() {
        Some(Statement::LabeledStatement(labeled)) => build_watcher(labeled, source, &scope),
        _ => panic!("expected a labeled statement"),
    }
}

fn error_code(code: &str) -> String {
    build(code, &[]).unwrap_err().code
}

#[test]
fn test_assignment_declares_new_target() {
    let reactive = build("$: total = a + b;", &[]).unwrap();
    assert_eq!(reactive.declares.as_deref(), Some("total"));
    assert_eq!(
        reactive.watcher,
        Watcher::Prefix {
            target: "total".to_string(),
            expression: "a + b".to_string(),
        }
    );
    assert_eq!(reactive.watcher.render(), "$cd.prefix.push(() => {total = a + b;});");
}

#[test]
fn test_assignment_to_declared_variable() {
    let reactive = build("$: total = a + b;", &["total"]).unwrap();
    assert_eq!(reactive.declares, None);
}

#[test]
fn test_member_target_keeps_source_text() {
    let reactive = build("$: user . name = first+' '+last;", &[]).unwrap();
    assert_eq!(reactive.declares, None);
    assert_eq!(
        reactive.watcher.render(),
        "$cd.prefix.push(() => {user . name = first+' '+last;});"
    );
}

#[test]
fn test_single_dependency() {
    let reactive = build("$: value, (v) => console.log(v);", &[]).unwrap();
    assert_eq!(
        reactive.watcher.render(),
        "$watch($cd, () => (value), (v) => console.log(v));"
    );
}

#[test]
fn test_multiple_dependencies_compare_as_array() {
    let reactive = build("$: a, b.c, (x, y) => f(x, y);", &[]).unwrap();
    match &reactive.watcher {
        Watcher::Tracked {
            dependencies,
            dependency_source,
            callback,
        } => {
            assert_eq!(dependencies, &vec!["a".to_string(), "b.c".to_string()]);
            assert_eq!(dependency_source, "a, b.c");
            assert_eq!(callback, "(x, y) => f(x, y)");
        }
        other => panic!("expected tracked watcher, got {:?}", other),
    }
    assert_eq!(
        reactive.watcher.render(),
        "$watch($cd, () => [a, b.c], ($args) => { ((x, y) => f(x, y)).apply(null, $args); }, {cmp: $$compareArray});"
    );
}

#[test]
fn test_function_expression_callback() {
    let reactive = build("$: count, function(c) { log(c); };", &[]).unwrap();
    assert_eq!(
        reactive.watcher.render(),
        "$watch($cd, () => (count), function(c) { log(c); });"
    );
}

#[test]
fn test_watcher_errors() {
    assert_eq!(error_code("$: if (a) b();"), ERR_WATCH_STATEMENT);
    assert_eq!(error_code("$: run();"), ERR_WATCH_STATEMENT);
    assert_eq!(error_code("$: total += 1;"), ERR_WATCH_OPERATOR);
    assert_eq!(error_code("$: [a, b] = pair;"), ERR_WATCH_TARGET);
    assert_eq!(error_code("$: total = 5;"), ERR_WATCH_EXPRESSION);
    assert_eq!(error_code("$: 'a', (x) => x;"), ERR_WATCH_EXPRESSION);
    assert_eq!(error_code("$: a, b;"), ERR_WATCH_CALLBACK);
}

#[test]
fn test_descriptor_serialization() {
    let reactive = build("$: a, b, (x, y) => x;", &[]).unwrap();
    let json = serde_json::to_value(&reactive.watcher).unwrap();
    assert_eq!(json["kind"], "tracked");
    assert_eq!(json["dependencySource"], "a, b");
    assert_eq!(json["dependencies"][1], "b");
}
