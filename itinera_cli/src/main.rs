use clap::{Parser, Subcommand};

use mimalloc::MiMalloc;

use crate::{matrix::MatrixArgs, plan::PlanArgs};

mod cache_snapshot;
mod matrix;
mod oracle_args;
mod parsers;
mod plan;
mod resolve;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[derive(Parser)]
#[clap(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    #[arg(short, long)]
    debug: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Orders the destinations into a short trip from the starting city
    #[command(visible_alias = "p")]
    Plan {
        #[command(flatten)]
        args: PlanArgs,
    },
    /// Prints the distance matrix between cities as JSON
    #[command(visible_alias = "m")]
    Matrix {
        #[command(flatten)]
        args: MatrixArgs,
    },
}

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    tracing_subscriber::fmt()
        .with_max_level(if cli.debug {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        })
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Some(Commands::Plan { args }) => plan::run(args).await?,
        Some(Commands::Matrix { args }) => matrix::run(args).await?,
        None => {
            // Handle no command provided
        }
    }

    Ok(())
}
