//! Read-only view of a block graph.
//!
//! The compiler walks blocks exclusively through [`BlockNode`]; it never sees
//! geometry, rendering state or any other editor metadata.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A literal chosen directly in the editor, stored in a block field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Boolean(bool),
    Number(f64),
    Text(String),
    Variable(VariableRef),
}

/// A field pointing at a declared variable by its internal id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariableRef {
    pub id: String,
}

impl FieldValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            FieldValue::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        let number = match self {
            FieldValue::Number(number) => *number,
            FieldValue::Text(text) => text.trim().parse().ok()?,
            _ => return None,
        };
        number.is_finite().then_some(number)
    }

    /// Variable fields are serialized as `{ "id": ... }`; older documents store
    /// the bare id string.
    pub fn variable_id(&self) -> Option<&str> {
        match self {
            FieldValue::Variable(variable) => Some(&variable.id),
            FieldValue::Text(text) => Some(text),
            _ => None,
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Boolean(value) => write!(f, "{}", value),
            FieldValue::Number(value) => write!(f, "{}", value),
            FieldValue::Text(value) => f.write_str(value),
            FieldValue::Variable(variable) => write!(f, "variable {}", variable.id),
        }
    }
}

/// A variable declared by the workspace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariableDeclaration {
    pub id: String,
    pub name: String,
    #[serde(default, rename = "type")]
    pub kind: String,
}

impl VariableDeclaration {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        VariableDeclaration {
            id: id.into(),
            name: name.into(),
            kind: String::new(),
        }
    }
}

/// The capabilities the compiler needs from a block.
pub trait BlockNode {
    /// The block type tag selecting a translation rule.
    fn kind(&self) -> &str;

    /// Stable identity, used only to point errors at a block.
    fn id(&self) -> &str;

    fn field_value(&self, name: &str) -> Option<&FieldValue>;

    /// The block wired into a value socket.
    fn value_input(&self, name: &str) -> Option<&Self>;

    /// The head of the chain wired into a statement socket.
    fn statement_input(&self, name: &str) -> Option<&Self>;

    /// The next block in the same chain.
    fn next(&self) -> Option<&Self>;

    /// Whether the block's current shape declares a socket, connected or not.
    ///
    /// Only needed for blocks whose socket list varies (`controls_if`).
    fn has_input(&self, name: &str) -> bool {
        self.value_input(name).is_some() || self.statement_input(name).is_some()
    }
}
