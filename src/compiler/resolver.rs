//! Socket and field access shared by every translation rule.

use crate::ast::Node;
use crate::compiler::error::{BlockRef, CompileError};
use crate::compiler::registry;
use crate::compiler::sequence;
use crate::compiler::variables::VariableNames;
use crate::graph::{BlockNode, FieldValue};

/// Binding strength of an expression result.
///
/// Every expression in the AST is structurally delimited, so this is always
/// `Atomic`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Order {
    Atomic,
}

/// What a rule produces for a single block.
#[derive(Debug, Clone, PartialEq)]
pub enum Translated {
    Expression(Node, Order),
    Statement(Node),
}

impl Translated {
    pub fn expression(node: Node) -> Self {
        Translated::Expression(node, Order::Atomic)
    }
}

pub struct Resolver<'a> {
    variables: &'a mut VariableNames,
}

impl<'a> Resolver<'a> {
    pub fn new(variables: &'a mut VariableNames) -> Self {
        Resolver { variables }
    }

    /// Translates one block, ignoring whatever is chained after it.
    pub fn translate<N: BlockNode>(&mut self, node: &N) -> Result<Translated, CompileError> {
        registry::translate(node, self)
    }

    pub fn expression_of<N: BlockNode>(&mut self, node: &N) -> Result<Node, CompileError> {
        match self.translate(node)? {
            Translated::Expression(ast, Order::Atomic) => Ok(ast),
            Translated::Statement(_) => Err(CompileError::ExpectedExpression {
                block: BlockRef::of(node),
            }),
        }
    }

    pub fn statement_of<N: BlockNode>(&mut self, node: &N) -> Result<Node, CompileError> {
        match self.translate(node)? {
            Translated::Statement(ast) => Ok(ast),
            Translated::Expression(..) => Err(CompileError::ExpectedStatement {
                block: BlockRef::of(node),
            }),
        }
    }

    /// Compiles the expression wired into a value socket.
    pub fn expression<N: BlockNode>(&mut self, node: &N, socket: &str) -> Result<Node, CompileError> {
        let child = node
            .value_input(socket)
            .ok_or_else(|| missing_operand(node, socket))?;
        self.expression_of(child)
    }

    /// Compiles the chain wired into a statement socket.
    pub fn statement<N: BlockNode>(&mut self, node: &N, socket: &str) -> Result<Node, CompileError> {
        let head = node
            .statement_input(socket)
            .ok_or_else(|| missing_operand(node, socket))?;
        sequence::flatten(head, self)
    }

    pub fn field<'n, N: BlockNode>(&self, node: &'n N, name: &str) -> Result<&'n FieldValue, CompileError> {
        node.field_value(name).ok_or_else(|| CompileError::MissingField {
            block: BlockRef::of(node),
            field: name.to_string(),
        })
    }

    /// Looks a field value up in an opcode table.
    pub fn operator<N: BlockNode, T: Copy>(
        &self,
        node: &N,
        field: &str,
        table: &[(&str, T)],
    ) -> Result<T, CompileError> {
        let value = self.field(node, field)?;
        value
            .as_str()
            .and_then(|raw| {
                table
                    .iter()
                    .find(|(name, _)| *name == raw)
                    .map(|(_, op)| *op)
            })
            .ok_or_else(|| CompileError::UnknownOperator {
                block: BlockRef::of(node),
                field: field.to_string(),
                value: value.to_string(),
            })
    }

    pub fn number<N: BlockNode>(&self, node: &N, field: &str) -> Result<f64, CompileError> {
        let value = self.field(node, field)?;
        value.as_number().ok_or_else(|| CompileError::InvalidLiteral {
            block: BlockRef::of(node),
            field: field.to_string(),
            value: value.to_string(),
        })
    }

    /// Resolves a variable field to the name used in the AST.
    pub fn variable<N: BlockNode>(&mut self, node: &N, field: &str) -> Result<String, CompileError> {
        let value = self.field(node, field)?;
        let id = value.variable_id().ok_or_else(|| CompileError::UnknownVariable {
            block: BlockRef::of(node),
            id: value.to_string(),
        })?;
        self.variables
            .resolve(id)
            .ok_or_else(|| CompileError::UnknownVariable {
                block: BlockRef::of(node),
                id: id.to_string(),
            })
    }
}

fn missing_operand<N: BlockNode>(node: &N, socket: &str) -> CompileError {
    CompileError::MissingOperand {
        block: BlockRef::of(node),
        socket: socket.to_string(),
    }
}
