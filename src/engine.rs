//! Handoff to the execution engine.
//!
//! The engine turns a [`Program`] into its own artifact. Its errors are its
//! own business and travel back to the caller untouched.

use std::convert::Infallible;

use thiserror::Error;
use tracing::debug;

use crate::ast::Program;
use crate::compiler::{CompileError, Compiler};
use crate::workspace::Workspace;

pub trait ExecutionEngine {
    type Artifact;
    type Error: std::error::Error + 'static;

    fn load(&mut self, program: &Program) -> Result<Self::Artifact, Self::Error>;
}

#[derive(Debug, Error)]
pub enum PipelineError<E: std::error::Error + 'static> {
    #[error(transparent)]
    Compile(#[from] CompileError),
    #[error(transparent)]
    Engine(E),
}

/// Compiles a workspace and hands the program to `engine`.
pub fn compile_and_load<E: ExecutionEngine>(
    compiler: &mut Compiler,
    workspace: &Workspace,
    engine: &mut E,
) -> Result<E::Artifact, PipelineError<E::Error>> {
    let program = compiler.compile_workspace(workspace)?;
    debug!(variables = program.variables.len(), "handing program to engine");
    engine.load(&program).map_err(PipelineError::Engine)
}

/// Engine that just encodes programs in the wire format.
#[derive(Debug, Default, Clone, Copy)]
pub struct WireEncoder {
    pub pretty: bool,
}

impl ExecutionEngine for WireEncoder {
    type Artifact = String;
    type Error = serde_json::Error;

    fn load(&mut self, program: &Program) -> Result<String, serde_json::Error> {
        if self.pretty {
            program.to_json_pretty()
        } else {
            program.to_json()
        }
    }
}

/// Engine that keeps the program as is.
#[derive(Debug, Default, Clone, Copy)]
pub struct Passthrough;

impl ExecutionEngine for Passthrough {
    type Artifact = Program;
    type Error = Infallible;

    fn load(&mut self, program: &Program) -> Result<Program, Infallible> {
        Ok(program.clone())
    }
}
