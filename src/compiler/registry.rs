//! Block type tags and the rule each one dispatches to.

use tracing::trace;

use crate::compiler::error::{BlockRef, CompileError};
use crate::compiler::generators::{expression, statement};
use crate::compiler::resolver::{Resolver, Translated};
use crate::graph::BlockNode;

/// Every block type the compiler knows how to translate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlockKind {
    ControlsIf,
    ControlsRepeatExt,
    ControlsWhileUntil,
    ControlsFor,
    ControlsFlowStatements,
    LogicCompare,
    LogicOperation,
    LogicNegate,
    LogicBoolean,
    MathNumber,
    MathArithmetic,
    MathModulo,
    MathConstrain,
    MathRandomInt,
    VariablesGet,
    VariablesSet,
    Len,
    Get,
    Set,
    Sleep,
}

const TAGS: &[(&str, BlockKind)] = &[
    ("controls_if", BlockKind::ControlsIf),
    ("controls_repeat_ext", BlockKind::ControlsRepeatExt),
    ("controls_whileUntil", BlockKind::ControlsWhileUntil),
    ("controls_for", BlockKind::ControlsFor),
    ("controls_flow_statements", BlockKind::ControlsFlowStatements),
    ("logic_compare", BlockKind::LogicCompare),
    ("logic_operation", BlockKind::LogicOperation),
    ("logic_negate", BlockKind::LogicNegate),
    ("logic_boolean", BlockKind::LogicBoolean),
    ("math_number", BlockKind::MathNumber),
    ("math_arithmetic", BlockKind::MathArithmetic),
    ("math_modulo", BlockKind::MathModulo),
    ("math_constrain", BlockKind::MathConstrain),
    ("math_random_int", BlockKind::MathRandomInt),
    ("variables_get", BlockKind::VariablesGet),
    ("variables_set", BlockKind::VariablesSet),
    ("len", BlockKind::Len),
    ("get", BlockKind::Get),
    ("set", BlockKind::Set),
    ("sleep", BlockKind::Sleep),
];

impl BlockKind {
    pub fn from_tag(tag: &str) -> Option<BlockKind> {
        TAGS.iter()
            .find(|(name, _)| *name == tag)
            .map(|(_, kind)| *kind)
    }

    pub fn tag(self) -> &'static str {
        TAGS.iter()
            .find(|(_, kind)| *kind == self)
            .map_or("", |(name, _)| *name)
    }

    pub fn all() -> impl Iterator<Item = BlockKind> {
        TAGS.iter().map(|(_, kind)| *kind)
    }
}

/// Translates a single block through the rule for its type.
pub fn translate<N: BlockNode>(node: &N, resolver: &mut Resolver<'_>) -> Result<Translated, CompileError> {
    let kind = BlockKind::from_tag(node.kind()).ok_or_else(|| CompileError::UnknownBlockType {
        block: BlockRef::of(node),
    })?;
    trace!(block = node.id(), kind = kind.tag(), "translating block");

    match kind {
        BlockKind::ControlsIf => statement::controls_if(node, resolver),
        BlockKind::ControlsRepeatExt => statement::controls_repeat_ext(node, resolver),
        BlockKind::ControlsWhileUntil => statement::controls_while_until(node, resolver),
        BlockKind::ControlsFor => statement::controls_for(node, resolver),
        BlockKind::ControlsFlowStatements => statement::controls_flow_statements(node, resolver),
        BlockKind::LogicCompare => expression::logic_compare(node, resolver),
        BlockKind::LogicOperation => expression::logic_operation(node, resolver),
        BlockKind::LogicNegate => expression::logic_negate(node, resolver),
        BlockKind::LogicBoolean => expression::logic_boolean(node, resolver),
        BlockKind::MathNumber => expression::math_number(node, resolver),
        BlockKind::MathArithmetic => expression::math_arithmetic(node, resolver),
        BlockKind::MathModulo => expression::math_modulo(node, resolver),
        BlockKind::MathConstrain => expression::math_constrain(node, resolver),
        BlockKind::MathRandomInt => expression::math_random_int(node, resolver),
        BlockKind::VariablesGet => expression::variables_get(node, resolver),
        BlockKind::VariablesSet => statement::variables_set(node, resolver),
        BlockKind::Len => expression::len(node, resolver),
        BlockKind::Get => expression::get(node, resolver),
        BlockKind::Set => statement::set(node, resolver),
        BlockKind::Sleep => statement::sleep(node, resolver),
    }
}
