use clap::{Parser as ClapParser, Subcommand};
use ottl_lang::cli::{self, CheckOptions, CheckResult, CliError};
use std::io::{self, Read};
use tracing_subscriber::EnvFilter;

#[derive(ClapParser)]
#[command(name = "ottl")]
#[command(about = "ottl - run transformation statements against JSON records")]
#[command(version)]
struct Cli {
    /// Log filter, overrides OTTL_LOG (e.g. "debug", "ottl_lang=trace")
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate statements and run them against a record
    Check {
        /// Statements to run, in order
        #[arg(required = true)]
        statements: Vec<String>,

        /// JSON record (reads from stdin if not provided)
        #[arg(short, long)]
        input: Option<String>,

        /// Pretty-print the output
        #[arg(short, long)]
        pretty: bool,

        /// Only validate syntax, don't execute
        #[arg(long)]
        syntax_only: bool,

        /// Print each parsed statement in canonical form
        #[arg(long)]
        ast: bool,

        /// Enum symbol available to statements, NAME=INTEGER
        #[arg(long = "enum", value_name = "NAME=VALUE", value_parser = parse_symbol)]
        symbols: Vec<(String, i64)>,
    },
}

fn parse_symbol(definition: &str) -> Result<(String, i64), String> {
    cli::parse_symbol(definition).map_err(|e| e.to_string())
}

fn init_tracing(level: Option<&str>) {
    let filter = match level {
        Some(level) => EnvFilter::new(level),
        None => EnvFilter::try_from_env("OTTL_LOG").unwrap_or_else(|_| EnvFilter::new("warn")),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.log_level.as_deref());

    let result = match cli.command {
        Commands::Check {
            statements,
            input,
            pretty,
            syntax_only,
            ast,
            symbols,
        } => run_check(CheckOptions {
            statements,
            input,
            pretty,
            syntax_only,
            ast,
            symbols,
        }),
    };

    if let Err(e) = result {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}

fn run_check(mut options: CheckOptions) -> Result<(), CliError> {
    let needs_input = !(options.syntax_only || options.ast);
    if needs_input && options.input.is_none() && !atty::is(atty::Stream::Stdin) {
        let mut buffer = String::new();
        io::stdin().read_to_string(&mut buffer)?;
        options.input = Some(buffer);
    }

    match cli::execute_check(&options)? {
        CheckResult::SyntaxValid => println!("Syntax is valid"),
        CheckResult::Ast(rendered) => {
            for statement in rendered {
                println!("{}", statement);
            }
        }
        CheckResult::Success { record, matched } => {
            tracing::debug!(matched, "statements matched");
            let json = if options.pretty {
                serde_json::to_string_pretty(&record)
            } else {
                serde_json::to_string(&record)
            }?;
            println!("{}", json);
        }
    }
    Ok(())
}
