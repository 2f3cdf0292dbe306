use std::{fs, io::Read, path::PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};

use cfg_toolkit::{
    grammar::nullable_first_follow::{FollowTable, NullableFirstFollow},
    Grammar,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Task {
    /// Terminals, then non-terminals, in order of appearance
    #[value(alias = "1")]
    Symbols,
    /// Nullable non-terminals
    #[value(alias = "2")]
    Nullable,
    /// FIRST sets
    #[value(alias = "3")]
    First,
    /// FOLLOW sets
    #[value(alias = "4")]
    Follow,
    /// Left factored grammar
    #[value(alias = "5")]
    LeftFactor,
    /// Grammar with left recursion eliminated
    #[value(alias = "6")]
    EliminateLeftRecursion,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Plain,
    Latex,
    Json,
}

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// What to compute
    #[arg(value_enum)]
    task: Task,

    /// File containing the grammar (default: stdin)
    file: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Plain)]
    format: OutputFormat,
}

fn read_input(file: Option<&PathBuf>) -> Result<String> {
    match file {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display())),
        None => {
            let mut input = String::new();
            std::io::stdin()
                .read_to_string(&mut input)
                .context("failed to read stdin")?;
            Ok(input)
        }
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let input = read_input(cli.file.as_ref())?;
    let g = Grammar::parse(&input).context("invalid grammar")?;

    let output = match cli.task {
        Task::Symbols => {
            let t = g.to_symbols_output();
            match cli.format {
                OutputFormat::Plain => t.to_plaintext(),
                OutputFormat::Latex => t.to_latex(),
                OutputFormat::Json => t.to_json(),
            }
        }
        Task::Nullable | Task::First | Task::Follow => {
            let nullable = g.calculate_nullable();
            let first = g.calculate_first(&nullable);
            // an empty grammar still has (empty) nullable and FIRST results
            let follow = match (g.calculate_follow(&nullable, &first), cli.task) {
                (Ok(follow), _) => follow,
                (Err(e), Task::Follow) => return Err(e.into()),
                (Err(_), _) => FollowTable::new(),
            };
            let nff = NullableFirstFollow {
                nullable,
                first,
                follow,
            };
            let t = g.to_non_terminal_output_vec(&nff);
            match (cli.format, cli.task) {
                (OutputFormat::Latex, _) => t.to_latex(),
                (OutputFormat::Json, _) => t.to_json(),
                (OutputFormat::Plain, Task::Nullable) => t.to_nullable_plaintext(),
                (OutputFormat::Plain, Task::First) => t.to_first_plaintext(),
                (OutputFormat::Plain, _) => t.to_follow_plaintext(),
            }
        }
        Task::LeftFactor | Task::EliminateLeftRecursion => {
            let transformed = if cli.task == Task::LeftFactor {
                g.left_factor()
            } else {
                g.eliminate_left_recursion()
            };
            let t = transformed.to_production_output_vec();
            match cli.format {
                OutputFormat::Plain => t.to_plaintext(),
                OutputFormat::Latex => t.to_latex(),
                OutputFormat::Json => t.to_json(),
            }
        }
    };

    println!("{}", output);
    Ok(())
}
