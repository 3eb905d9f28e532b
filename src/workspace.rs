//! The block editor's JSON serialization, as saved by the UI.

use indexmap::IndexMap;
use serde::Deserialize;
use serde_json::Value;

use crate::graph::{BlockNode, FieldValue, VariableDeclaration};

/// A serialized editor workspace.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Workspace {
    #[serde(default)]
    pub blocks: TopBlocks,
    #[serde(default)]
    pub variables: Vec<VariableDeclaration>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TopBlocks {
    #[serde(default)]
    pub blocks: Vec<Block>,
}

impl Workspace {
    /// Blocks not attached to any other block.
    pub fn top_blocks(&self) -> &[Block] {
        &self.blocks.blocks
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Block {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub fields: IndexMap<String, FieldValue>,
    #[serde(default)]
    pub inputs: IndexMap<String, Connection>,
    #[serde(default)]
    pub next: Option<Box<Connection>>,
    #[serde(default)]
    pub extra_state: Option<Value>,
}

/// What is plugged into an input or a next connection.
///
/// A real block hides the shadow block beneath it.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Connection {
    #[serde(default)]
    pub block: Option<Block>,
    #[serde(default)]
    pub shadow: Option<Block>,
}

impl Connection {
    pub fn target(&self) -> Option<&Block> {
        self.block.as_ref().or(self.shadow.as_ref())
    }
}

impl Block {
    fn input(&self, name: &str) -> Option<&Block> {
        self.inputs.get(name).and_then(Connection::target)
    }

    fn extra_count(&self, key: &str) -> usize {
        self.extra_state
            .as_ref()
            .and_then(|state| state.get(key))
            .and_then(Value::as_u64)
            .map_or(0, |count| count as usize)
    }

    fn extra_flag(&self, key: &str) -> bool {
        self.extra_state
            .as_ref()
            .and_then(|state| state.get(key))
            .and_then(Value::as_bool)
            .unwrap_or(false)
    }

    /// Sockets of `controls_if`: `IF0`/`DO0` plus one pair per else-if, and
    /// `ELSE` when the mutator enabled it.
    fn if_shape_has(&self, name: &str) -> bool {
        if name == "ELSE" {
            return self.extra_flag("hasElse");
        }
        name.strip_prefix("IF")
            .or_else(|| name.strip_prefix("DO"))
            .and_then(|index| index.parse::<usize>().ok())
            .is_some_and(|index| index <= self.extra_count("elseIfCount"))
    }
}

/// Chains are unlinked one block at a time so dropping a long chain does not
/// recurse once per block.
impl Drop for Block {
    fn drop(&mut self) {
        let mut next = self.next.take();
        while let Some(mut connection) = next {
            next = connection.block.as_mut().and_then(|block| block.next.take());
        }
    }
}

impl BlockNode for Block {
    fn kind(&self) -> &str {
        &self.kind
    }

    fn id(&self) -> &str {
        &self.id
    }

    fn field_value(&self, name: &str) -> Option<&FieldValue> {
        self.fields.get(name)
    }

    fn value_input(&self, name: &str) -> Option<&Block> {
        self.input(name)
    }

    fn statement_input(&self, name: &str) -> Option<&Block> {
        self.input(name)
    }

    fn next(&self) -> Option<&Block> {
        self.next.as_deref().and_then(Connection::target)
    }

    fn has_input(&self, name: &str) -> bool {
        if self.inputs.contains_key(name) {
            return true;
        }
        match self.kind.as_str() {
            "controls_if" => self.if_shape_has(name),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn block(value: Value) -> Block {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_real_block_hides_shadow() {
        let set = block(json!({
            "type": "sleep",
            "id": "s",
            "inputs": {
                "delay": {
                    "shadow": { "type": "math_number", "id": "shadow", "fields": { "NUM": 10 } },
                    "block": { "type": "len", "id": "real" }
                }
            }
        }));
        assert_eq!(set.value_input("delay").map(|b| b.id()), Some("real"));
    }

    #[test]
    fn test_shadow_used_when_nothing_else_plugged() {
        let set = block(json!({
            "type": "sleep",
            "inputs": {
                "delay": { "shadow": { "type": "math_number", "id": "shadow", "fields": { "NUM": 10 } } }
            }
        }));
        assert_eq!(set.value_input("delay").map(|b| b.id()), Some("shadow"));
        assert!(set.value_input("missing").is_none());
    }

    #[test]
    fn test_if_shape_follows_extra_state() {
        let plain = block(json!({ "type": "controls_if" }));
        assert!(plain.has_input("IF0"));
        assert!(plain.has_input("DO0"));
        assert!(!plain.has_input("IF1"));
        assert!(!plain.has_input("ELSE"));

        let mutated = block(json!({
            "type": "controls_if",
            "extraState": { "elseIfCount": 2, "hasElse": true }
        }));
        assert!(mutated.has_input("IF2"));
        assert!(!mutated.has_input("IF3"));
        assert!(mutated.has_input("ELSE"));
    }

    #[test]
    fn test_geometry_and_flags_are_ignored() {
        let parsed = block(json!({
            "type": "len",
            "id": "abc",
            "x": 120,
            "y": -40,
            "collapsed": true,
            "deletable": false
        }));
        assert_eq!(parsed.kind(), "len");
        assert!(parsed.next().is_none());
    }
}
