use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "fairy-lights", version, about = "Compile light-strip block programs")]
pub struct Config {
    /// Log filter used when RUST_LOG is not set
    #[arg(long, global = true, env = "FAIRY_LOG", default_value = "warn")]
    pub log_level: String,

    /// Base URL of the saved-programs API
    #[arg(
        long,
        global = true,
        env = "FAIRY_API_URL",
        default_value = "http://localhost:8080/api"
    )]
    pub api_url: String,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Compile a saved workspace into a program
    Compile(CompileArgs),

    /// Validate a compiled program
    Check(CheckArgs),

    /// Fetch a saved program from the API and compile it
    Fetch(FetchArgs),

    /// List saved programs
    List,
}

#[derive(Args, Debug)]
pub struct CompileArgs {
    /// Workspace JSON file, or `-` for stdin
    pub file: String,

    /// Indent the output
    #[arg(long)]
    pub pretty: bool,

    /// Write the program here instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Program JSON file, or `-` for stdin
    pub file: String,
}

#[derive(Args, Debug)]
pub struct FetchArgs {
    /// Id of the saved program
    pub id: String,

    /// Indent the output
    #[arg(long)]
    pub pretty: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compile_defaults() {
        let config = Config::try_parse_from(["fairy-lights", "compile", "program.json"]).unwrap();
        match config.command {
            Command::Compile(args) => {
                assert_eq!(args.file, "program.json");
                assert!(!args.pretty);
                assert!(args.output.is_none());
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_global_options_after_subcommand() {
        let config = Config::try_parse_from([
            "fairy-lights",
            "fetch",
            "65f0",
            "--api-url",
            "http://example.test/api",
            "--log-level",
            "debug",
        ])
        .unwrap();
        assert_eq!(config.api_url, "http://example.test/api");
        assert_eq!(config.log_level, "debug");
        assert!(matches!(config.command, Command::Fetch(FetchArgs { ref id, .. }) if id == "65f0"));
    }

    #[test]
    fn test_missing_subcommand_is_an_error() {
        assert!(Config::try_parse_from(["fairy-lights"]).is_err());
    }
}
