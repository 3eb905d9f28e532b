mod common;

use common::*;
use fairy_lights_compiler::ast::Node;
use fairy_lights_compiler::compiler::sequence::splice;
use serde_json::json;

fn sleep_node(ms: i64) -> Node {
    Node::Sleep {
        delay: Box::new(Node::Literal { value: ms as f64 }),
    }
}

#[test]
fn test_single_statement_is_not_wrapped() {
    let program = compile(sleep(42)).unwrap();
    assert_eq!(program.body, sleep_node(42));
}

#[test]
fn test_chains_compile_to_one_flat_sequence() {
    for length in 2..=8 {
        let blocks = (1..=length).map(sleep).collect();
        let program = compile(chain(blocks)).unwrap();
        let expected = Node::Sequence {
            items: (1..=length).map(sleep_node).collect(),
        };
        assert_eq!(program.body, expected, "chain of {}", length);
        assert!(program.validate().is_ok());
    }
}

#[test]
fn test_flat_sequence_stays_unchanged() {
    let program = compile(chain((1..=4).map(sleep).collect())).unwrap();
    let Node::Sequence { items } = program.body.clone() else {
        panic!("expected a sequence");
    };
    let mut items = items.into_iter();
    let head = items.next().unwrap();
    let rest = Node::Sequence {
        items: items.collect(),
    };
    assert_eq!(splice(head, rest), program.body);
}

#[test]
fn test_long_chain() {
    let length = 2_000;
    let program = compile(chain((0..length).map(|_| flow("CONTINUE")).collect())).unwrap();
    match program.body {
        Node::Sequence { items } => {
            assert_eq!(items.len(), length);
            assert!(items.iter().all(|item| *item == Node::Continue));
        }
        other => panic!("expected sequence, got {:?}", other.tag()),
    }
}

#[test]
fn test_chain_inside_statement_socket_is_unwrapped_when_single() {
    let root = json!({
        "type": "controls_repeat_ext",
        "inputs": { "TIMES": connect(integer(2)), "DO": connect(sleep(9)) }
    });
    insta::assert_snapshot!(
        body_json(root),
        @r#"{"type":"repeat","times":{"type":"literal","value":2},"body":{"type":"sleep","delay":{"type":"literal","value":9}}}"#
    );
}
