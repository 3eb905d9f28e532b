pub mod api;
pub mod ast;
pub mod compiler;
pub mod config;
pub mod engine;
pub mod error;
pub mod graph;
pub mod logging;
pub mod parser;
pub mod workspace;
