/// Integration tests for the thicket interpreter.
///
/// These run complete `.thicket` programs from `tests/integration/` and
/// check the emitted forest's shape against the documented worked examples
/// for meta-node expansion, input defaults, and `@load`.
use std::path::Path;

use thicket_lang::{BuiltNode, Forest, Interpreter, Lexer, Parser};

fn run_file(path: &str) -> Forest {
    let source = std::fs::read_to_string(path).unwrap_or_else(|e| panic!("reading {path}: {e}"));
    let tokens = Lexer::new(&source).tokenize().unwrap_or_else(|e| panic!("lexing {path}: {e}"));
    let program = Parser::new(tokens)
        .parse_program()
        .unwrap_or_else(|e| panic!("parsing {path}: {e}"));
    let base_dir = Path::new(path).parent().unwrap().to_path_buf();
    Interpreter::with_base_dir(base_dir)
        .run(&program, &[])
        .unwrap_or_else(|e| panic!("running {path}: {e}"))
}

fn behavior_args(node: &BuiltNode) -> &[String] {
    match node {
        BuiltNode::Behavior { args, .. } => args,
        other => panic!("expected Behavior, got {other:?}"),
    }
}

#[test]
fn input_default_flows_into_behavior_leaf() {
    let forest = run_file("tests/integration/01_input_default.thicket");
    assert_eq!(forest.roots.len(), 1);
    match &forest.roots[0] {
        BuiltNode::And(children) => {
            assert_eq!(behavior_args(&children[0]), &["3".to_string()]);
        }
        other => panic!("expected And, got {other:?}"),
    }
}

#[test]
fn if_true_flattens_its_children_into_the_parent() {
    let forest = run_file("tests/integration/02_if_true_flattens.thicket");
    match &forest.roots[0] {
        BuiltNode::Then(children) => {
            let args: Vec<_> = children.iter().map(|c| behavior_args(c)[0].clone()).collect();
            assert_eq!(args, vec!["1", "2", "3"]);
        }
        other => panic!("expected Then, got {other:?}"),
    }
}

#[test]
fn if_false_contributes_nothing() {
    let forest = run_file("tests/integration/03_if_false_contributes_nothing.thicket");
    match &forest.roots[0] {
        BuiltNode::Then(children) => {
            assert_eq!(children.len(), 1);
            assert_eq!(behavior_args(&children[0]), &["2".to_string()]);
        }
        other => panic!("expected Then, got {other:?}"),
    }
}

#[test]
fn for_expands_once_per_element_in_order() {
    let forest = run_file("tests/integration/04_for_expands_per_element.thicket");
    match &forest.roots[0] {
        BuiltNode::And(children) => {
            let args: Vec<_> = children.iter().map(|c| behavior_args(c)[0].clone()).collect();
            assert_eq!(args, vec!["0", "1", "2"]);
        }
        other => panic!("expected And, got {other:?}"),
    }
}

#[test]
fn function_call_result_feeds_a_behavior_leaf() {
    let forest = run_file("tests/integration/05_function_call_in_leaf.thicket");
    match &forest.roots[0] {
        BuiltNode::Or(children) => {
            assert_eq!(behavior_args(&children[0]), &["5".to_string()]);
        }
        other => panic!("expected Or, got {other:?}"),
    }
}

#[test]
fn load_inlines_the_sub_programs_forest_unwrapped() {
    let forest = run_file("tests/integration/06_load_sub.thicket");
    match &forest.roots[0] {
        BuiltNode::And(children) => {
            // the loaded sub-program's single root is spliced in directly,
            // alongside the trailing Behavior(99), keeping whatever shape
            // that root has (here a Then wrapping the bound input) rather
            // than being flattened into its own parent's children
            assert_eq!(children.len(), 2);
            match &children[0] {
                BuiltNode::Then(inner) => {
                    assert_eq!(behavior_args(&inner[0]), &["0".to_string()]);
                }
                other => panic!("expected Then, got {other:?}"),
            }
            assert_eq!(behavior_args(&children[1]), &["99".to_string()]);
        }
        other => panic!("expected And, got {other:?}"),
    }
}
