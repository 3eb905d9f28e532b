//! Block graph compiler.
//!
//! ## Architecture
//! - `registry`: block type tag to translation rule dispatch
//! - `generators`: the translation rules themselves
//! - `resolver`: socket/field access and expression/statement type checks
//! - `sequence`: statement chain flattening
//! - `variables`: variable id to name resolution
//!
//! A [`Compiler`] owns the only state that survives between rules, the
//! variable name table, and rebuilds it on every call.

pub mod error;
pub mod generators;
pub mod registry;
pub mod resolver;
pub mod sequence;
pub mod variables;

use tracing::debug;

use crate::ast::{Node, Program};
use crate::graph::{BlockNode, VariableDeclaration};
use crate::workspace::Workspace;

pub use error::{BlockRef, CompileError};
pub use resolver::{Order, Resolver, Translated};
use variables::VariableNames;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    Idle,
    Compiling,
}

/// Compiles block graphs into [`Program`]s.
///
/// One compile runs at a time per instance; `compile` takes `&mut self`.
/// Use separate instances to compile concurrently.
#[derive(Debug)]
pub struct Compiler {
    state: State,
    variables: VariableNames,
}

impl Default for Compiler {
    fn default() -> Self {
        Self::new()
    }
}

impl Compiler {
    pub fn new() -> Self {
        Self {
            state: State::Idle,
            variables: VariableNames::new(),
        }
    }

    pub fn state(&self) -> State {
        self.state
    }

    /// Compiles the single top-level block of a workspace.
    pub fn compile_workspace(&mut self, workspace: &Workspace) -> Result<Program, CompileError> {
        match workspace.top_blocks() {
            [root] => self.compile(Some(root), &workspace.variables),
            blocks => Err(CompileError::InvalidRootArity {
                count: blocks.len(),
            }),
        }
    }

    /// Compiles the graph hanging off `root`.
    ///
    /// Statement roots compile together with the chain that follows them; an
    /// expression root is wrapped in `naked`. Nothing of a failed compile is
    /// kept.
    pub fn compile<N: BlockNode>(
        &mut self,
        root: Option<&N>,
        declarations: &[VariableDeclaration],
    ) -> Result<Program, CompileError> {
        let root = root.ok_or(CompileError::InvalidRootArity { count: 0 })?;
        debug!(
            root = root.id(),
            kind = root.kind(),
            declared = declarations.len(),
            "compiling block graph"
        );

        self.state = State::Compiling;
        self.variables.rebuild(declarations);

        let result = Self::translate_root(root, &mut self.variables);
        let variables = self.variables.finish();
        self.state = State::Idle;

        match result {
            Ok(body) => {
                debug!(variables = variables.len(), body = body.tag(), "compiled block graph");
                Ok(Program { variables, body })
            }
            Err(error) => {
                debug!(%error, "compile failed");
                Err(error)
            }
        }
    }

    fn translate_root<N: BlockNode>(root: &N, variables: &mut VariableNames) -> Result<Node, CompileError> {
        let mut resolver = Resolver::new(variables);
        match resolver.translate(root)? {
            Translated::Expression(value, Order::Atomic) => Ok(Node::Naked {
                value: Box::new(value),
            }),
            Translated::Statement(first) => sequence::continue_chain(first, root.next(), &mut resolver),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::FieldValue;
    use std::collections::HashMap;

    /// Minimal in-memory block exposing only the read capabilities.
    #[derive(Default)]
    struct TestBlock {
        kind: &'static str,
        fields: HashMap<&'static str, FieldValue>,
        values: HashMap<&'static str, TestBlock>,
        statements: HashMap<&'static str, TestBlock>,
        next: Option<Box<TestBlock>>,
    }

    impl TestBlock {
        fn new(kind: &'static str) -> Self {
            TestBlock {
                kind,
                ..Default::default()
            }
        }

        fn field(mut self, name: &'static str, value: FieldValue) -> Self {
            self.fields.insert(name, value);
            self
        }

        fn value(mut self, name: &'static str, block: TestBlock) -> Self {
            self.values.insert(name, block);
            self
        }

        fn then(mut self, block: TestBlock) -> Self {
            self.next = Some(Box::new(block));
            self
        }
    }

    impl BlockNode for TestBlock {
        fn kind(&self) -> &str {
            self.kind
        }

        fn id(&self) -> &str {
            ""
        }

        fn field_value(&self, name: &str) -> Option<&FieldValue> {
            self.fields.get(name)
        }

        fn value_input(&self, name: &str) -> Option<&Self> {
            self.values.get(name)
        }

        fn statement_input(&self, name: &str) -> Option<&Self> {
            self.statements.get(name)
        }

        fn next(&self) -> Option<&Self> {
            self.next.as_deref()
        }
    }

    fn number(value: f64) -> TestBlock {
        TestBlock::new("math_number").field("NUM", FieldValue::Number(value))
    }

    fn sleep(ms: f64) -> TestBlock {
        TestBlock::new("sleep").value("delay", number(ms))
    }

    #[test]
    fn test_absent_root_is_rejected() {
        let mut compiler = Compiler::new();
        let result = compiler.compile::<TestBlock>(None, &[]);
        assert_eq!(result, Err(CompileError::InvalidRootArity { count: 0 }));
        assert_eq!(compiler.state(), State::Idle);
    }

    #[test]
    fn test_if_without_declared_branches_is_empty_branch_set() {
        let mut compiler = Compiler::new();
        let result = compiler.compile(Some(&TestBlock::new("controls_if")), &[]);
        assert!(matches!(result, Err(CompileError::EmptyBranchSet { .. })));
    }

    #[test]
    fn test_expression_root_is_naked() {
        let mut compiler = Compiler::new();
        let program = compiler.compile(Some(&number(7.0)), &[]).unwrap();
        assert_eq!(
            program.body,
            Node::Naked {
                value: Box::new(Node::Literal { value: 7.0 })
            }
        );
        assert!(program.variables.is_empty());
    }

    #[test]
    fn test_statement_root_takes_its_chain() {
        let root = sleep(1.0).then(sleep(2.0).then(sleep(3.0)));
        let mut compiler = Compiler::new();
        let program = compiler.compile(Some(&root), &[]).unwrap();
        match program.body {
            Node::Sequence { items } => assert_eq!(items.len(), 3),
            other => panic!("expected sequence, got {:?}", other),
        }
    }

    #[test]
    fn test_failed_compile_leaves_no_state_behind() {
        let mut compiler = Compiler::new();
        let declarations = [VariableDeclaration::new("v", "counter")];
        let broken = TestBlock::new("variables_set")
            .field("VAR", FieldValue::Text("v".to_string()));
        assert!(compiler.compile(Some(&broken), &declarations).is_err());
        assert_eq!(compiler.state(), State::Idle);

        let read = TestBlock::new("variables_get").field("VAR", FieldValue::Text("v".to_string()));
        let result = compiler.compile(Some(&read), &[]);
        assert!(matches!(result, Err(CompileError::UnknownVariable { .. })));
    }
}
