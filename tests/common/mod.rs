#![allow(dead_code)]

use fairy_lights_compiler::ast::Program;
use fairy_lights_compiler::compiler::{CompileError, Compiler};
use fairy_lights_compiler::parser::parse_content;
use fairy_lights_compiler::workspace::Workspace;
use serde_json::{json, Value};

/// Wraps a root block (and variable declarations) into a workspace document.
pub fn workspace(root: Value, variables: Value) -> Workspace {
    parse_content(json!({
        "blocks": { "languageVersion": 0, "blocks": [root] },
        "variables": variables
    }))
    .unwrap()
}

pub fn compile(root: Value) -> Result<Program, CompileError> {
    compile_with(root, json!([]))
}

pub fn compile_with(root: Value, variables: Value) -> Result<Program, CompileError> {
    Compiler::new().compile_workspace(&workspace(root, variables))
}

/// Compact wire JSON of the compiled program body.
pub fn body_json(root: Value) -> String {
    serde_json::to_string(&compile(root).unwrap().body).unwrap()
}

pub fn connect(block: Value) -> Value {
    json!({ "block": block })
}

pub fn number(value: f64) -> Value {
    json!({ "type": "math_number", "fields": { "NUM": value } })
}

pub fn integer(value: i64) -> Value {
    json!({ "type": "math_number", "fields": { "NUM": value } })
}

pub fn boolean(value: bool) -> Value {
    let text = if value { "TRUE" } else { "FALSE" };
    json!({ "type": "logic_boolean", "fields": { "BOOL": text } })
}

pub fn get_var(id: &str) -> Value {
    json!({ "type": "variables_get", "fields": { "VAR": { "id": id } } })
}

pub fn sleep(ms: i64) -> Value {
    json!({ "type": "sleep", "id": format!("sleep-{}", ms), "inputs": { "delay": connect(integer(ms)) } })
}

pub fn set_pixel(index: i64, r: i64, g: i64, b: i64) -> Value {
    json!({
        "type": "set",
        "inputs": {
            "index": connect(integer(index)),
            "r": connect(integer(r)),
            "g": connect(integer(g)),
            "b": connect(integer(b))
        }
    })
}

pub fn flow(kind: &str) -> Value {
    json!({ "type": "controls_flow_statements", "fields": { "FLOW": kind } })
}

/// Links statement blocks through their `next` connections.
pub fn chain(blocks: Vec<Value>) -> Value {
    let mut iter = blocks.into_iter().rev();
    let mut tail = iter.next().expect("chain needs at least one block");
    for mut block in iter {
        block["next"] = connect(tail);
        tail = block;
    }
    tail
}
