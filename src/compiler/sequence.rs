//! Statement chains become one flat `sequence`.

use crate::ast::Node;
use crate::compiler::error::CompileError;
use crate::compiler::resolver::Resolver;
use crate::graph::BlockNode;

/// Compiles the chain starting at `head`.
///
/// A chain of one block compiles to that block's own node; longer chains
/// become a single `sequence` with no sequence directly inside it.
pub fn flatten<N: BlockNode>(head: &N, resolver: &mut Resolver<'_>) -> Result<Node, CompileError> {
    let first = resolver.statement_of(head)?;
    continue_chain(first, head.next(), resolver)
}

/// Appends the chain starting at `next` to an already compiled first node.
pub fn continue_chain<N: BlockNode>(
    first: Node,
    next: Option<&N>,
    resolver: &mut Resolver<'_>,
) -> Result<Node, CompileError> {
    let Some(mut current) = next else {
        return Ok(first);
    };
    let mut items = Vec::new();
    push_flat(&mut items, first);
    loop {
        push_flat(&mut items, resolver.statement_of(current)?);
        match current.next() {
            Some(following) => current = following,
            None => break,
        }
    }
    Ok(Node::Sequence { items })
}

/// Joins a compiled head with its compiled tail, splicing the tail's items
/// when it already is a sequence.
pub fn splice(head: Node, tail: Node) -> Node {
    let mut items = Vec::new();
    push_flat(&mut items, head);
    push_flat(&mut items, tail);
    Node::Sequence { items }
}

fn push_flat(items: &mut Vec<Node>, node: Node) {
    match node {
        Node::Sequence { items: inner } => items.extend(inner),
        other => items.push(other),
    }
}
