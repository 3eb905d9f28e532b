mod common;

use common::*;
use fairy_lights_compiler::ast::{IfBranch, Node};
use serde_json::json;

fn compare(op: &str, a: i64, b: i64) -> serde_json::Value {
    json!({
        "type": "logic_compare",
        "fields": { "OP": op },
        "inputs": { "A": connect(integer(a)), "B": connect(integer(b)) }
    })
}

#[test]
fn test_if_with_else_if_and_else() {
    let root = json!({
        "type": "controls_if",
        "id": "branching",
        "extraState": { "elseIfCount": 1, "hasElse": true },
        "inputs": {
            "IF0": connect(compare("LT", 1, 2)),
            "DO0": connect(sleep(10)),
            "IF1": connect(boolean(true)),
            "DO1": connect(sleep(20)),
            "ELSE": connect(sleep(30))
        }
    });
    insta::assert_snapshot!(
        body_json(root),
        @r#"{"type":"if","branches":[{"condition":{"type":"lt","op1":{"type":"literal","value":1},"op2":{"type":"literal","value":2}},"body":{"type":"sleep","delay":{"type":"literal","value":10}}},{"condition":{"type":"literal_boolean","value":true},"body":{"type":"sleep","delay":{"type":"literal","value":20}}},{"condition":null,"body":{"type":"sleep","delay":{"type":"literal","value":30}}}]}"#
    );
}

#[test]
fn test_if_without_else_has_no_null_branch() {
    let root = json!({
        "type": "controls_if",
        "extraState": { "elseIfCount": 1 },
        "inputs": {
            "IF0": connect(boolean(true)),
            "DO0": connect(sleep(1)),
            "IF1": connect(boolean(false)),
            "DO1": connect(sleep(2))
        }
    });
    let program = compile(root).unwrap();
    match program.body {
        Node::If { branches } => {
            assert_eq!(branches.len(), 2);
            assert!(branches.iter().all(|branch| branch.condition.is_some()));
        }
        other => panic!("expected if, got {:?}", other),
    }
}

#[test]
fn test_if_branch_bodies_are_flattened() {
    let root = json!({
        "type": "controls_if",
        "inputs": {
            "IF0": connect(boolean(true)),
            "DO0": connect(chain(vec![sleep(1), sleep(2), sleep(3)]))
        }
    });
    let program = compile(root).unwrap();
    let expected = Node::If {
        branches: vec![IfBranch {
            condition: Some(Box::new(Node::LiteralBoolean { value: true })),
            body: Box::new(Node::Sequence {
                items: (1..=3)
                    .map(|ms| Node::Sleep {
                        delay: Box::new(Node::Literal { value: ms as f64 }),
                    })
                    .collect(),
            }),
        }],
    };
    assert_eq!(program.body, expected);
}

#[test]
fn test_repeat() {
    let root = json!({
        "type": "controls_repeat_ext",
        "inputs": {
            "TIMES": connect(integer(10)),
            "DO": connect(chain(vec![set_pixel(0, 1, 1, 1), sleep(100)]))
        }
    });
    insta::assert_snapshot!(
        body_json(root),
        @r#"{"type":"repeat","times":{"type":"literal","value":10},"body":{"type":"sequence","items":[{"type":"set","index":{"type":"literal","value":0},"red":{"type":"literal","value":1},"green":{"type":"literal","value":1},"blue":{"type":"literal","value":1}},{"type":"sleep","delay":{"type":"literal","value":100}}]}}"#
    );
}

#[test]
fn test_while_and_until() {
    for (mode, tag) in [("WHILE", "while"), ("UNTIL", "until")] {
        let root = json!({
            "type": "controls_whileUntil",
            "fields": { "MODE": mode },
            "inputs": {
                "BOOL": connect(boolean(false)),
                "DO": connect(sleep(5))
            }
        });
        let body = compile(root).unwrap().body;
        let value = serde_json::to_value(&body).unwrap();
        assert_eq!(value["type"], tag);
        assert_eq!(value["condition"], json!({ "type": "literal_boolean", "value": false }));
        assert_eq!(value["body"]["type"], "sleep");
    }
}

#[test]
fn test_for_loop_with_break_and_continue() {
    let body = chain(vec![
        json!({
            "type": "controls_if",
            "inputs": {
                "IF0": connect(json!({
                    "type": "logic_compare",
                    "fields": { "OP": "GT" },
                    "inputs": { "A": connect(get_var("i")), "B": connect(integer(5)) }
                })),
                "DO0": connect(flow("BREAK"))
            }
        }),
        flow("CONTINUE"),
    ]);
    let root = json!({
        "type": "controls_for",
        "fields": { "VAR": { "id": "i" } },
        "inputs": {
            "FROM": connect(integer(0)),
            "TO": connect(json!({ "type": "len" })),
            "BY": connect(integer(1)),
            "DO": connect(body)
        }
    });
    let program = compile_with(root, json!([{ "name": "i", "id": "i" }])).unwrap();
    assert_eq!(program.variables, vec!["i"]);
    insta::assert_snapshot!(
        serde_json::to_string(&program.body).unwrap(),
        @r#"{"type":"for","variable":"i","from":{"type":"literal","value":0},"to":{"type":"len"},"by":{"type":"literal","value":1},"body":{"type":"sequence","items":[{"type":"if","branches":[{"condition":{"type":"gt","op1":{"type":"get_variable","variable":"i"},"op2":{"type":"literal","value":5}},"body":{"type":"break"}}]},{"type":"continue"}]}}"#
    );
}

#[test]
fn test_nested_loops_keep_their_own_bodies() {
    let inner = json!({
        "type": "controls_repeat_ext",
        "inputs": {
            "TIMES": connect(integer(2)),
            "DO": connect(chain(vec![sleep(1), sleep(2)]))
        }
    });
    let root = json!({
        "type": "controls_repeat_ext",
        "inputs": {
            "TIMES": connect(integer(3)),
            "DO": connect(chain(vec![inner, sleep(3)]))
        }
    });
    let program = compile(root).unwrap();
    assert!(program.validate().is_ok());
    let value = serde_json::to_value(&program.body).unwrap();
    let items = value["body"]["items"].as_array().unwrap();
    assert_eq!(items.len(), 2);
    assert_eq!(items[0]["type"], "repeat");
    assert_eq!(items[0]["body"]["type"], "sequence");
    assert_eq!(items[0]["body"]["items"].as_array().unwrap().len(), 2);
    assert_eq!(items[1]["type"], "sleep");
}
