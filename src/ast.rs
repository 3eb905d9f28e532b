use std::collections::HashSet;

use num_traits::ToPrimitive;
use serde::{Deserialize, Serialize, Serializer};
use thiserror::Error;

/// A compiled program: the variables it touches and a single root node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Program {
    pub variables: Vec<String>,
    pub body: Node,
}

/// The binary operators, keyed by the tag they serialize under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOperator {
    Eq,
    Neq,
    Lt,
    Lte,
    Gt,
    Gte,
    And,
    Or,
    Add,
    Sub,
    Mul,
    Div,
    Pow,
    Mod,
}

impl BinaryOperator {
    pub const ALL: [BinaryOperator; 14] = [
        BinaryOperator::Eq,
        BinaryOperator::Neq,
        BinaryOperator::Lt,
        BinaryOperator::Lte,
        BinaryOperator::Gt,
        BinaryOperator::Gte,
        BinaryOperator::And,
        BinaryOperator::Or,
        BinaryOperator::Add,
        BinaryOperator::Sub,
        BinaryOperator::Mul,
        BinaryOperator::Div,
        BinaryOperator::Pow,
        BinaryOperator::Mod,
    ];

    pub fn tag(self) -> &'static str {
        match self {
            BinaryOperator::Eq => "eq",
            BinaryOperator::Neq => "neq",
            BinaryOperator::Lt => "lt",
            BinaryOperator::Lte => "lte",
            BinaryOperator::Gt => "gt",
            BinaryOperator::Gte => "gte",
            BinaryOperator::And => "and",
            BinaryOperator::Or => "or",
            BinaryOperator::Add => "add",
            BinaryOperator::Sub => "sub",
            BinaryOperator::Mul => "mul",
            BinaryOperator::Div => "div",
            BinaryOperator::Pow => "pow",
            BinaryOperator::Mod => "mod",
        }
    }
}

/// Color channel read by `get`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    Red,
    Green,
    Blue,
}

/// One arm of an `if`. A `None` condition is the else arm.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IfBranch {
    #[serde(default)]
    pub condition: Option<Box<Node>>,
    pub body: Box<Node>,
}

/// The light-strip language AST.
///
/// Serializes to the wire format read by the execution engine: an object whose
/// `type` member holds the snake_case variant name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Node {
    Literal {
        #[serde(serialize_with = "serialize_number")]
        value: f64,
    },
    LiteralBoolean {
        value: bool,
    },
    Eq {
        op1: Box<Node>,
        op2: Box<Node>,
    },
    Neq {
        op1: Box<Node>,
        op2: Box<Node>,
    },
    Lt {
        op1: Box<Node>,
        op2: Box<Node>,
    },
    Lte {
        op1: Box<Node>,
        op2: Box<Node>,
    },
    Gt {
        op1: Box<Node>,
        op2: Box<Node>,
    },
    Gte {
        op1: Box<Node>,
        op2: Box<Node>,
    },
    And {
        op1: Box<Node>,
        op2: Box<Node>,
    },
    Or {
        op1: Box<Node>,
        op2: Box<Node>,
    },
    Add {
        op1: Box<Node>,
        op2: Box<Node>,
    },
    Sub {
        op1: Box<Node>,
        op2: Box<Node>,
    },
    Mul {
        op1: Box<Node>,
        op2: Box<Node>,
    },
    Div {
        op1: Box<Node>,
        op2: Box<Node>,
    },
    Pow {
        op1: Box<Node>,
        op2: Box<Node>,
    },
    Mod {
        op1: Box<Node>,
        op2: Box<Node>,
    },
    Not {
        value: Box<Node>,
    },
    Between {
        value: Box<Node>,
        low: Box<Node>,
        high: Box<Node>,
    },
    Rand {
        min: Box<Node>,
        max: Box<Node>,
    },
    GetVariable {
        variable: String,
    },
    SetVariable {
        variable: String,
        value: Box<Node>,
    },
    If {
        branches: Vec<IfBranch>,
    },
    Repeat {
        times: Box<Node>,
        body: Box<Node>,
    },
    While {
        condition: Box<Node>,
        body: Box<Node>,
    },
    Until {
        condition: Box<Node>,
        body: Box<Node>,
    },
    For {
        variable: String,
        from: Box<Node>,
        to: Box<Node>,
        by: Box<Node>,
        body: Box<Node>,
    },
    Break,
    Continue,
    Len,
    Get {
        index: Box<Node>,
        color: Color,
    },
    Set {
        index: Box<Node>,
        red: Box<Node>,
        green: Box<Node>,
        blue: Box<Node>,
    },
    Sleep {
        delay: Box<Node>,
    },
    Sequence {
        items: Vec<Node>,
    },
    Naked {
        value: Box<Node>,
    },
}

impl Node {
    pub fn binary(op: BinaryOperator, op1: Node, op2: Node) -> Node {
        let op1 = Box::new(op1);
        let op2 = Box::new(op2);
        match op {
            BinaryOperator::Eq => Node::Eq { op1, op2 },
            BinaryOperator::Neq => Node::Neq { op1, op2 },
            BinaryOperator::Lt => Node::Lt { op1, op2 },
            BinaryOperator::Lte => Node::Lte { op1, op2 },
            BinaryOperator::Gt => Node::Gt { op1, op2 },
            BinaryOperator::Gte => Node::Gte { op1, op2 },
            BinaryOperator::And => Node::And { op1, op2 },
            BinaryOperator::Or => Node::Or { op1, op2 },
            BinaryOperator::Add => Node::Add { op1, op2 },
            BinaryOperator::Sub => Node::Sub { op1, op2 },
            BinaryOperator::Mul => Node::Mul { op1, op2 },
            BinaryOperator::Div => Node::Div { op1, op2 },
            BinaryOperator::Pow => Node::Pow { op1, op2 },
            BinaryOperator::Mod => Node::Mod { op1, op2 },
        }
    }

    /// Splits a binary node back into its operator and operands.
    pub fn as_binary(&self) -> Option<(BinaryOperator, &Node, &Node)> {
        let (op, op1, op2) = match self {
            Node::Eq { op1, op2 } => (BinaryOperator::Eq, op1, op2),
            Node::Neq { op1, op2 } => (BinaryOperator::Neq, op1, op2),
            Node::Lt { op1, op2 } => (BinaryOperator::Lt, op1, op2),
            Node::Lte { op1, op2 } => (BinaryOperator::Lte, op1, op2),
            Node::Gt { op1, op2 } => (BinaryOperator::Gt, op1, op2),
            Node::Gte { op1, op2 } => (BinaryOperator::Gte, op1, op2),
            Node::And { op1, op2 } => (BinaryOperator::And, op1, op2),
            Node::Or { op1, op2 } => (BinaryOperator::Or, op1, op2),
            Node::Add { op1, op2 } => (BinaryOperator::Add, op1, op2),
            Node::Sub { op1, op2 } => (BinaryOperator::Sub, op1, op2),
            Node::Mul { op1, op2 } => (BinaryOperator::Mul, op1, op2),
            Node::Div { op1, op2 } => (BinaryOperator::Div, op1, op2),
            Node::Pow { op1, op2 } => (BinaryOperator::Pow, op1, op2),
            Node::Mod { op1, op2 } => (BinaryOperator::Mod, op1, op2),
            _ => return None,
        };
        Some((op, op1, op2))
    }

    /// The wire `type` tag of this node.
    pub fn tag(&self) -> &'static str {
        match self {
            Node::Literal { .. } => "literal",
            Node::LiteralBoolean { .. } => "literal_boolean",
            Node::Eq { .. } => "eq",
            Node::Neq { .. } => "neq",
            Node::Lt { .. } => "lt",
            Node::Lte { .. } => "lte",
            Node::Gt { .. } => "gt",
            Node::Gte { .. } => "gte",
            Node::And { .. } => "and",
            Node::Or { .. } => "or",
            Node::Add { .. } => "add",
            Node::Sub { .. } => "sub",
            Node::Mul { .. } => "mul",
            Node::Div { .. } => "div",
            Node::Pow { .. } => "pow",
            Node::Mod { .. } => "mod",
            Node::Not { .. } => "not",
            Node::Between { .. } => "between",
            Node::Rand { .. } => "rand",
            Node::GetVariable { .. } => "get_variable",
            Node::SetVariable { .. } => "set_variable",
            Node::If { .. } => "if",
            Node::Repeat { .. } => "repeat",
            Node::While { .. } => "while",
            Node::Until { .. } => "until",
            Node::For { .. } => "for",
            Node::Break => "break",
            Node::Continue => "continue",
            Node::Len => "len",
            Node::Get { .. } => "get",
            Node::Set { .. } => "set",
            Node::Sleep { .. } => "sleep",
            Node::Sequence { .. } => "sequence",
            Node::Naked { .. } => "naked",
        }
    }
}

/// Integral numbers go on the wire without a fractional part (`500`, not `500.0`).
fn serialize_number<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    if value.fract() == 0.0 {
        if let Some(integer) = value.to_i64() {
            return serializer.serialize_i64(integer);
        }
    }
    serializer.serialize_f64(*value)
}

#[derive(Debug, Error, PartialEq)]
pub enum ValidationError {
    #[error("sequence nested directly inside another sequence")]
    NestedSequence,
    #[error("if statement has no branches")]
    EmptyBranches,
    #[error("else branch at position {0} is not the last branch")]
    MisplacedElse(usize),
    #[error("variable '{0}' is not declared in the program")]
    UndeclaredVariable(String),
    #[error("naked expression below the program root")]
    MisplacedNaked,
    #[error("'{0}' used where a statement is expected")]
    ExpressionAsStatement(&'static str),
    #[error("'{0}' used where a value is expected")]
    StatementAsExpression(&'static str),
}

impl Program {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_json(source: &str) -> serde_json::Result<Program> {
        serde_json::from_str(source)
    }

    /// Checks the structural invariants every program handed across the
    /// wire must satisfy.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let declared: HashSet<&str> = self.variables.iter().map(String::as_str).collect();
        let validator = Validator { declared };
        match &self.body {
            Node::Naked { value } => validator.expression(value),
            body => validator.statement(body),
        }
    }
}

struct Validator<'a> {
    declared: HashSet<&'a str>,
}

impl Validator<'_> {
    fn variable(&self, name: &str) -> Result<(), ValidationError> {
        if self.declared.contains(name) {
            Ok(())
        } else {
            Err(ValidationError::UndeclaredVariable(name.to_string()))
        }
    }

    fn statement(&self, node: &Node) -> Result<(), ValidationError> {
        match node {
            Node::Sequence { items } => {
                for item in items {
                    if matches!(item, Node::Sequence { .. }) {
                        return Err(ValidationError::NestedSequence);
                    }
                    self.statement(item)?;
                }
                Ok(())
            }
            Node::SetVariable { variable, value } => {
                self.variable(variable)?;
                self.expression(value)
            }
            Node::If { branches } => {
                if branches.is_empty() {
                    return Err(ValidationError::EmptyBranches);
                }
                let last = branches.len() - 1;
                for (index, branch) in branches.iter().enumerate() {
                    match &branch.condition {
                        Some(condition) => self.expression(condition)?,
                        None if index != last => {
                            return Err(ValidationError::MisplacedElse(index));
                        }
                        None => {}
                    }
                    self.statement(&branch.body)?;
                }
                Ok(())
            }
            Node::Repeat { times, body } => {
                self.expression(times)?;
                self.statement(body)
            }
            Node::While { condition, body } | Node::Until { condition, body } => {
                self.expression(condition)?;
                self.statement(body)
            }
            Node::For {
                variable,
                from,
                to,
                by,
                body,
            } => {
                self.variable(variable)?;
                self.expression(from)?;
                self.expression(to)?;
                self.expression(by)?;
                self.statement(body)
            }
            Node::Break | Node::Continue => Ok(()),
            Node::Set {
                index,
                red,
                green,
                blue,
            } => {
                self.expression(index)?;
                self.expression(red)?;
                self.expression(green)?;
                self.expression(blue)
            }
            Node::Sleep { delay } => self.expression(delay),
            Node::Naked { .. } => Err(ValidationError::MisplacedNaked),
            other => Err(ValidationError::ExpressionAsStatement(other.tag())),
        }
    }

    fn expression(&self, node: &Node) -> Result<(), ValidationError> {
        if let Some((_, op1, op2)) = node.as_binary() {
            self.expression(op1)?;
            return self.expression(op2);
        }
        match node {
            Node::Literal { .. } | Node::LiteralBoolean { .. } | Node::Len => Ok(()),
            Node::Not { value } => self.expression(value),
            Node::Between { value, low, high } => {
                self.expression(value)?;
                self.expression(low)?;
                self.expression(high)
            }
            Node::Rand { min, max } => {
                self.expression(min)?;
                self.expression(max)
            }
            Node::GetVariable { variable } => self.variable(variable),
            Node::Get { index, .. } => self.expression(index),
            Node::Naked { .. } => Err(ValidationError::MisplacedNaked),
            other => Err(ValidationError::StatementAsExpression(other.tag())),
        }
    }
}
