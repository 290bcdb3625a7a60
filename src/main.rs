// Jutsu: lexer and parser driver

use std::fs;
use std::io::{self, BufRead, Read, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{CommandFactory, Parser as _};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use jutsu::parser::lexer::Lexer;
use jutsu::parser::{Parser, SyntaxError};
use jutsu::VERSION;

#[derive(clap::Parser, Debug)]
#[command(
    name = "jutsu",
    version,
    about = "Tokenize and parse Jutsu programs",
    after_help = "At the interactive prompt, `help` prints this message and `quit` exits."
)]
struct Cli {
    /// Program read from script file; `-` reads stdin. Without a file an
    /// interactive prompt is started.
    file: Option<PathBuf>,

    /// Also print the token stream and enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

/// Install the tracing subscriber. `RUST_LOG` overrides the default filter.
fn init_logging(verbose: bool) {
    let default = if verbose { "warn,jutsu=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

/// Lex and parse `source`, printing the tokens (verbose only) and the AST.
fn execute(source: &str, verbose: bool) -> Result<(), SyntaxError> {
    let tokens = Lexer::new(source).tokenize()?;

    if verbose {
        println!("TOKENS");
        let rendered: Vec<String> = tokens.iter().map(|t| t.to_string()).collect();
        println!("[{}]", rendered.join(", "));
    }

    let program = Parser::new(tokens).parse()?;

    println!("AST");
    println!("{}", program);
    Ok(())
}

fn read_source(file: &PathBuf) -> io::Result<String> {
    if file.as_os_str() == "-" {
        let mut source = String::new();
        io::stdin().read_to_string(&mut source)?;
        Ok(source)
    } else {
        fs::read_to_string(file)
    }
}

/// Interactive prompt: every line is parsed as a program of its own.
fn repl(verbose: bool) -> io::Result<()> {
    println!("Jutsu {}", VERSION);
    println!("Type \"help\" for more information.");

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    loop {
        print!(">>> ");
        io::stdout().flush()?;

        let Some(line) = lines.next().transpose()? else {
            println!();
            break;
        };

        match line.trim() {
            "help" => println!("{}", Cli::command().render_help()),
            "quit" => break,
            _ => {
                if let Err(e) = execute(&format!("{}\n", line), verbose) {
                    eprintln!("{}", e);
                }
            }
        }
    }

    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    debug!(?cli, "starting");

    let Some(file) = cli.file else {
        return match repl(cli.verbose) {
            Ok(()) => ExitCode::SUCCESS,
            Err(e) => {
                eprintln!("Error: {}", e);
                ExitCode::FAILURE
            }
        };
    };

    let source = match read_source(&file) {
        Ok(source) => source,
        Err(e) => {
            eprintln!("Error: cannot read '{}': {}", file.display(), e);
            return ExitCode::FAILURE;
        }
    };

    info!(file = %file.display(), bytes = source.len(), "parsing");
    match execute(&source, cli.verbose) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", e);
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser as _;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_help_lists_options_and_prompt_commands() {
        let help = Cli::command().render_help().to_string();

        assert!(help.contains("--verbose"));
        assert!(help.contains("--version"));
        assert!(help.contains("`quit` exits"));
    }

    #[test]
    fn test_parse_arguments() {
        let cli = Cli::try_parse_from(["jutsu", "-v", "prog.ju"]).unwrap();
        assert!(cli.verbose);
        assert_eq!(cli.file, Some(PathBuf::from("prog.ju")));

        let cli = Cli::try_parse_from(["jutsu"]).unwrap();
        assert!(!cli.verbose);
        assert!(cli.file.is_none());
    }
}
