//! Rules for blocks that produce a value.

use crate::ast::{BinaryOperator, Color, Node};
use crate::compiler::error::CompileError;
use crate::compiler::resolver::{Resolver, Translated};
use crate::graph::{BlockNode, FieldValue};

/// `logic_compare` field `OP`.
pub const COMPARE_OPERATORS: &[(&str, BinaryOperator)] = &[
    ("EQ", BinaryOperator::Eq),
    ("NEQ", BinaryOperator::Neq),
    ("LT", BinaryOperator::Lt),
    ("LTE", BinaryOperator::Lte),
    ("GT", BinaryOperator::Gt),
    ("GTE", BinaryOperator::Gte),
];

/// `logic_operation` field `OP`.
pub const LOGIC_OPERATORS: &[(&str, BinaryOperator)] = &[
    ("AND", BinaryOperator::And),
    ("OR", BinaryOperator::Or),
];

/// `math_arithmetic` field `OP`.
pub const ARITHMETIC_OPERATORS: &[(&str, BinaryOperator)] = &[
    ("ADD", BinaryOperator::Add),
    ("MINUS", BinaryOperator::Sub),
    ("MULTIPLY", BinaryOperator::Mul),
    ("DIVIDE", BinaryOperator::Div),
    ("POWER", BinaryOperator::Pow),
];

/// `get` field `type`.
pub const CHANNELS: &[(&str, Color)] = &[
    ("r", Color::Red),
    ("g", Color::Green),
    ("b", Color::Blue),
];

/// Shared shape of the `A op B` blocks. The operator is checked before the
/// operands are compiled.
fn binary<N: BlockNode>(
    node: &N,
    resolver: &mut Resolver<'_>,
    table: &[(&str, BinaryOperator)],
) -> Result<Translated, CompileError> {
    let op = resolver.operator(node, "OP", table)?;
    let op1 = resolver.expression(node, "A")?;
    let op2 = resolver.expression(node, "B")?;
    Ok(Translated::expression(Node::binary(op, op1, op2)))
}

pub fn logic_compare<N: BlockNode>(node: &N, resolver: &mut Resolver<'_>) -> Result<Translated, CompileError> {
    binary(node, resolver, COMPARE_OPERATORS)
}

pub fn logic_operation<N: BlockNode>(node: &N, resolver: &mut Resolver<'_>) -> Result<Translated, CompileError> {
    binary(node, resolver, LOGIC_OPERATORS)
}

pub fn logic_negate<N: BlockNode>(node: &N, resolver: &mut Resolver<'_>) -> Result<Translated, CompileError> {
    let value = resolver.expression(node, "BOOL")?;
    Ok(Translated::expression(Node::Not {
        value: Box::new(value),
    }))
}

pub fn logic_boolean<N: BlockNode>(node: &N, resolver: &mut Resolver<'_>) -> Result<Translated, CompileError> {
    let value = match resolver.field(node, "BOOL")? {
        FieldValue::Boolean(value) => *value,
        other => other.as_str() == Some("TRUE"),
    };
    Ok(Translated::expression(Node::LiteralBoolean { value }))
}

pub fn math_number<N: BlockNode>(node: &N, resolver: &mut Resolver<'_>) -> Result<Translated, CompileError> {
    let value = resolver.number(node, "NUM")?;
    Ok(Translated::expression(Node::Literal { value }))
}

pub fn math_arithmetic<N: BlockNode>(node: &N, resolver: &mut Resolver<'_>) -> Result<Translated, CompileError> {
    binary(node, resolver, ARITHMETIC_OPERATORS)
}

pub fn math_modulo<N: BlockNode>(node: &N, resolver: &mut Resolver<'_>) -> Result<Translated, CompileError> {
    let op1 = resolver.expression(node, "DIVIDEND")?;
    let op2 = resolver.expression(node, "DIVISOR")?;
    Ok(Translated::expression(Node::binary(BinaryOperator::Mod, op1, op2)))
}

pub fn math_constrain<N: BlockNode>(node: &N, resolver: &mut Resolver<'_>) -> Result<Translated, CompileError> {
    let value = resolver.expression(node, "VALUE")?;
    let low = resolver.expression(node, "LOW")?;
    let high = resolver.expression(node, "HIGH")?;
    Ok(Translated::expression(Node::Between {
        value: Box::new(value),
        low: Box::new(low),
        high: Box::new(high),
    }))
}

pub fn math_random_int<N: BlockNode>(node: &N, resolver: &mut Resolver<'_>) -> Result<Translated, CompileError> {
    let min = resolver.expression(node, "FROM")?;
    let max = resolver.expression(node, "TO")?;
    Ok(Translated::expression(Node::Rand {
        min: Box::new(min),
        max: Box::new(max),
    }))
}

pub fn variables_get<N: BlockNode>(node: &N, resolver: &mut Resolver<'_>) -> Result<Translated, CompileError> {
    let variable = resolver.variable(node, "VAR")?;
    Ok(Translated::expression(Node::GetVariable { variable }))
}

pub fn len<N: BlockNode>(_node: &N, _resolver: &mut Resolver<'_>) -> Result<Translated, CompileError> {
    Ok(Translated::expression(Node::Len))
}

pub fn get<N: BlockNode>(node: &N, resolver: &mut Resolver<'_>) -> Result<Translated, CompileError> {
    let color = resolver.operator(node, "type", CHANNELS)?;
    let index = resolver.expression(node, "index")?;
    Ok(Translated::expression(Node::Get {
        index: Box::new(index),
        color,
    }))
}
