//! quizmill CLI — the user-facing command-line interface.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "quizmill", version, about = "Quiz scoring and session engine")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a scripted quiz session
    Run {
        /// Path to .toml quiz file or directory
        #[arg(long)]
        quiz: PathBuf,

        /// Path to .toml response script
        #[arg(long)]
        responses: PathBuf,

        /// Output directory
        #[arg(long, default_value = "./quizmill-results")]
        output: PathBuf,

        /// Output format: json, markdown, html, all
        #[arg(long, default_value = "json")]
        format: String,

        /// Include solutions and explanations in result records
        #[arg(long)]
        include_solution_detail: bool,
    },

    /// Validate quiz TOML files
    Validate {
        /// Path to quiz file or directory
        #[arg(long)]
        quiz: PathBuf,
    },

    /// Create a starter quiz and response script
    Init,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("quizmill=info".parse().unwrap()),
        )
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Run {
            quiz,
            responses,
            output,
            format,
            include_solution_detail,
        } => commands::run::execute(quiz, responses, output, format, include_solution_detail),
        Commands::Validate { quiz } => commands::validate::execute(quiz),
        Commands::Init => commands::init::execute(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
