use std::fs;
use std::io::{self, Read};
use std::process::ExitCode;

use clap::Parser;
use serde_json::Value;
use tracing::info;

use fairy_lights_compiler::api::{ApiError, Client};
use fairy_lights_compiler::ast::Program;
use fairy_lights_compiler::compiler::Compiler;
use fairy_lights_compiler::config::{CheckArgs, Command, CompileArgs, Config, FetchArgs};
use fairy_lights_compiler::engine::{compile_and_load, PipelineError, WireEncoder};
use fairy_lights_compiler::error::{display_compile_error, display_parse_error, display_validation_error, fallback};
use fairy_lights_compiler::logging;
use fairy_lights_compiler::parser::{parse_content, parse_workspace};
use fairy_lights_compiler::workspace::Workspace;

fn main() -> ExitCode {
    let config = Config::parse();
    if let Err(e) = logging::init(&config) {
        eprintln!("warning: logging disabled: {}", e);
    }

    match &config.command {
        Command::Compile(args) => do_compile(args),
        Command::Check(args) => do_check(args),
        Command::Fetch(args) => do_fetch(&config, args),
        Command::List => do_list(&config),
    }
}

fn read_source(file: &str) -> io::Result<String> {
    if file == "-" {
        let mut source = String::new();
        io::stdin().read_to_string(&mut source)?;
        Ok(source)
    } else {
        fs::read_to_string(file)
    }
}

fn do_compile(args: &CompileArgs) -> ExitCode {
    let source = match read_source(&args.file) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("error: cannot read '{}': {}", args.file, e);
            return ExitCode::FAILURE;
        }
    };

    let workspace = match parse_workspace(&source) {
        Ok(w) => w,
        Err(e) => {
            fallback(display_parse_error(&source, &args.file, &e), &e, &mut io::stderr());
            return ExitCode::FAILURE;
        }
    };

    let output = match encode(&workspace, args.pretty, &source, &args.file) {
        Some(output) => output,
        None => return ExitCode::FAILURE,
    };

    match &args.output {
        Some(path) => {
            if let Err(e) = fs::write(path, output) {
                eprintln!("error: cannot write '{}': {}", path.display(), e);
                return ExitCode::FAILURE;
            }
            info!(path = %path.display(), "program written");
        }
        None => println!("{}", output),
    }
    ExitCode::SUCCESS
}

/// Compiles and encodes a workspace, reporting errors against `source`.
fn encode(workspace: &Workspace, pretty: bool, source: &str, filename: &str) -> Option<String> {
    let mut compiler = Compiler::new();
    let mut encoder = WireEncoder { pretty };
    match compile_and_load(&mut compiler, workspace, &mut encoder) {
        Ok(output) => Some(output),
        Err(PipelineError::Compile(e)) => {
            fallback(display_compile_error(source, filename, &e), &e, &mut io::stderr());
            None
        }
        Err(PipelineError::Engine(e)) => {
            eprintln!("error: cannot encode program: {}", e);
            None
        }
    }
}

fn do_check(args: &CheckArgs) -> ExitCode {
    let source = match read_source(&args.file) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("error: cannot read '{}': {}", args.file, e);
            return ExitCode::FAILURE;
        }
    };

    let program = match Program::from_json(&source) {
        Ok(p) => p,
        Err(e) => {
            eprintln!("error: '{}' is not a program: {}", args.file, e);
            return ExitCode::FAILURE;
        }
    };

    match program.validate() {
        Ok(()) => {
            eprintln!("ok: {} is a valid program", args.file);
            ExitCode::SUCCESS
        }
        Err(e) => {
            fallback(display_validation_error(&source, &args.file, &e), &e, &mut io::stderr());
            ExitCode::FAILURE
        }
    }
}

fn do_fetch(config: &Config, args: &FetchArgs) -> ExitCode {
    let saved = match Client::new(&config.api_url).and_then(|client| client.read(&args.id)) {
        Ok(saved) => saved,
        Err(e) => return report_api_error(&e),
    };

    let source = match &saved.content {
        Value::String(text) => text.clone(),
        other => serde_json::to_string_pretty(other).unwrap_or_default(),
    };
    let label = format!("{} ({})", saved.name, saved.id);
    let workspace = match parse_content(saved.content) {
        Ok(w) => w,
        Err(e) => {
            eprintln!("error: {}: {}", label, e);
            return ExitCode::FAILURE;
        }
    };

    match encode(&workspace, args.pretty, &source, &label) {
        Some(output) => {
            println!("{}", output);
            ExitCode::SUCCESS
        }
        None => ExitCode::FAILURE,
    }
}

fn do_list(config: &Config) -> ExitCode {
    match Client::new(&config.api_url).and_then(|client| client.list()) {
        Ok(programs) => {
            for program in programs {
                println!("{}\t{}", program.id, program.name);
            }
            ExitCode::SUCCESS
        }
        Err(e) => report_api_error(&e),
    }
}

fn report_api_error(error: &ApiError) -> ExitCode {
    eprintln!("error: {}", error);
    ExitCode::FAILURE
}
