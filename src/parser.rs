use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

use crate::workspace::Workspace;

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("invalid workspace JSON at line {line}, column {column}: {source}")]
    Syntax {
        line: usize,
        column: usize,
        source: serde_json::Error,
    },
    #[error("saved content is not a workspace: {0}")]
    Content(#[source] serde_json::Error),
}

impl ParseError {
    /// Line and column (both 1-based) of a syntax error.
    pub fn location(&self) -> Option<(usize, usize)> {
        match self {
            ParseError::Syntax { line, column, .. } => Some((*line, *column)),
            ParseError::Content(_) => None,
        }
    }
}

/// Decodes JSON text whose nesting depth is not bounded.
///
/// Statement chains nest one level per block, so the reader's nesting limit is
/// lifted and the stack grows on demand while descending.
pub fn decode<T: DeserializeOwned>(source: &str) -> serde_json::Result<T> {
    let mut reader = serde_json::Deserializer::from_str(source);
    reader.disable_recursion_limit();
    let value = T::deserialize(serde_stacker::Deserializer::new(&mut reader))?;
    reader.end()?;
    Ok(value)
}

/// Parses a workspace from its JSON text.
pub fn parse_workspace(source: &str) -> Result<Workspace, ParseError> {
    decode(source).map_err(|source: serde_json::Error| ParseError::Syntax {
        line: source.line(),
        column: source.column(),
        source,
    })
}

/// Reads a workspace out of the `content` of a saved program.
///
/// The content is normally the workspace object itself, but a JSON string
/// holding the serialized workspace is accepted as well.
pub fn parse_content(content: Value) -> Result<Workspace, ParseError> {
    match content {
        Value::String(text) => parse_workspace(&text),
        other => Workspace::deserialize(serde_stacker::Deserializer::new(other)).map_err(ParseError::Content),
    }
}
