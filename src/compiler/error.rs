use std::fmt;

use thiserror::Error;

use crate::graph::BlockNode;

/// Identifies the block an error was raised for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockRef {
    pub id: String,
    pub kind: String,
}

impl BlockRef {
    pub fn of<N: BlockNode>(node: &N) -> Self {
        BlockRef {
            id: node.id().to_string(),
            kind: node.kind().to_string(),
        }
    }
}

impl fmt::Display for BlockRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.id.is_empty() {
            write!(f, "'{}'", self.kind)
        } else {
            write!(f, "'{}' ({})", self.kind, self.id)
        }
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum CompileError {
    #[error("block {block} has no field '{field}'")]
    MissingField { block: BlockRef, field: String },
    #[error("block {block} has nothing connected to '{socket}'")]
    MissingOperand { block: BlockRef, socket: String },
    #[error("block {block} has unknown {field} value '{value}'")]
    UnknownOperator {
        block: BlockRef,
        field: String,
        value: String,
    },
    #[error("block {block} has no conditional branches")]
    EmptyBranchSet { block: BlockRef },
    #[error("expected exactly one top-level block, found {count}")]
    InvalidRootArity { count: usize },
    #[error("unknown block type {block}")]
    UnknownBlockType { block: BlockRef },
    #[error("block {block} refers to undeclared variable '{id}'")]
    UnknownVariable { block: BlockRef, id: String },
    #[error("block {block} has invalid number '{value}' in field '{field}'")]
    InvalidLiteral {
        block: BlockRef,
        field: String,
        value: String,
    },
    #[error("block {block} is a statement but a value is expected here")]
    ExpectedExpression { block: BlockRef },
    #[error("block {block} is a value but a statement is expected here")]
    ExpectedStatement { block: BlockRef },
}

impl CompileError {
    /// The block the error points at, if there is one.
    pub fn block(&self) -> Option<&BlockRef> {
        match self {
            CompileError::MissingField { block, .. }
            | CompileError::MissingOperand { block, .. }
            | CompileError::UnknownOperator { block, .. }
            | CompileError::EmptyBranchSet { block }
            | CompileError::UnknownBlockType { block }
            | CompileError::UnknownVariable { block, .. }
            | CompileError::InvalidLiteral { block, .. }
            | CompileError::ExpectedExpression { block }
            | CompileError::ExpectedStatement { block } => Some(block),
            CompileError::InvalidRootArity { .. } => None,
        }
    }
}
