//! Rules for blocks that perform an action.
//!
//! Bodies are statement sockets compiled through the chain flattener, so a
//! body holding one block is that block's node and longer bodies are a single
//! `sequence`.

use crate::ast::{IfBranch, Node};
use crate::compiler::error::{BlockRef, CompileError};
use crate::compiler::resolver::{Resolver, Translated};
use crate::graph::BlockNode;

/// Loop kinds selected by `controls_whileUntil` field `MODE`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopMode {
    While,
    Until,
}

pub const LOOP_MODES: &[(&str, LoopMode)] = &[("WHILE", LoopMode::While), ("UNTIL", LoopMode::Until)];

/// Jumps selected by `controls_flow_statements` field `FLOW`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Break,
    Continue,
}

pub const FLOWS: &[(&str, Flow)] = &[("BREAK", Flow::Break), ("CONTINUE", Flow::Continue)];

pub fn controls_if<N: BlockNode>(node: &N, resolver: &mut Resolver<'_>) -> Result<Translated, CompileError> {
    let mut branches = Vec::new();

    for index in 0.. {
        let condition_socket = format!("IF{}", index);
        if !node.has_input(&condition_socket) {
            break;
        }
        let condition = resolver.expression(node, &condition_socket)?;
        let body = resolver.statement(node, &format!("DO{}", index))?;
        branches.push(IfBranch {
            condition: Some(Box::new(condition)),
            body: Box::new(body),
        });
    }

    if branches.is_empty() {
        return Err(CompileError::EmptyBranchSet {
            block: BlockRef::of(node),
        });
    }

    if node.has_input("ELSE") {
        let body = resolver.statement(node, "ELSE")?;
        branches.push(IfBranch {
            condition: None,
            body: Box::new(body),
        });
    }

    Ok(Translated::Statement(Node::If { branches }))
}

pub fn controls_repeat_ext<N: BlockNode>(node: &N, resolver: &mut Resolver<'_>) -> Result<Translated, CompileError> {
    let times = resolver.expression(node, "TIMES")?;
    let body = resolver.statement(node, "DO")?;
    Ok(Translated::Statement(Node::Repeat {
        times: Box::new(times),
        body: Box::new(body),
    }))
}

pub fn controls_while_until<N: BlockNode>(node: &N, resolver: &mut Resolver<'_>) -> Result<Translated, CompileError> {
    let mode = resolver.operator(node, "MODE", LOOP_MODES)?;
    let condition = Box::new(resolver.expression(node, "BOOL")?);
    let body = Box::new(resolver.statement(node, "DO")?);
    let ast = match mode {
        LoopMode::While => Node::While { condition, body },
        LoopMode::Until => Node::Until { condition, body },
    };
    Ok(Translated::Statement(ast))
}

pub fn controls_for<N: BlockNode>(node: &N, resolver: &mut Resolver<'_>) -> Result<Translated, CompileError> {
    let variable = resolver.variable(node, "VAR")?;
    let from = resolver.expression(node, "FROM")?;
    let to = resolver.expression(node, "TO")?;
    let by = resolver.expression(node, "BY")?;
    let body = resolver.statement(node, "DO")?;
    Ok(Translated::Statement(Node::For {
        variable,
        from: Box::new(from),
        to: Box::new(to),
        by: Box::new(by),
        body: Box::new(body),
    }))
}

pub fn controls_flow_statements<N: BlockNode>(
    node: &N,
    resolver: &mut Resolver<'_>,
) -> Result<Translated, CompileError> {
    let ast = match resolver.operator(node, "FLOW", FLOWS)? {
        Flow::Break => Node::Break,
        Flow::Continue => Node::Continue,
    };
    Ok(Translated::Statement(ast))
}

pub fn variables_set<N: BlockNode>(node: &N, resolver: &mut Resolver<'_>) -> Result<Translated, CompileError> {
    let variable = resolver.variable(node, "VAR")?;
    let value = resolver.expression(node, "VALUE")?;
    Ok(Translated::Statement(Node::SetVariable {
        variable,
        value: Box::new(value),
    }))
}

pub fn set<N: BlockNode>(node: &N, resolver: &mut Resolver<'_>) -> Result<Translated, CompileError> {
    let index = resolver.expression(node, "index")?;
    let red = resolver.expression(node, "r")?;
    let green = resolver.expression(node, "g")?;
    let blue = resolver.expression(node, "b")?;
    Ok(Translated::Statement(Node::Set {
        index: Box::new(index),
        red: Box::new(red),
        green: Box::new(green),
        blue: Box::new(blue),
    }))
}

pub fn sleep<N: BlockNode>(node: &N, resolver: &mut Resolver<'_>) -> Result<Translated, CompileError> {
    let delay = resolver.expression(node, "delay")?;
    Ok(Translated::Statement(Node::Sleep {
        delay: Box::new(delay),
    }))
}
