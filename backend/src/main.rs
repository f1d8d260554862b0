//! gridcalc CLI - serve the matrix API or run an operation locally
//!
//! ```bash
//! gridcalc serve                       # Start HTTP server (127.0.0.1:8080)
//! gridcalc serve --host 0.0.0.0 -p 80  # Listen on all interfaces
//! gridcalc run sum matrix.csv          # Apply an operation to a local file
//! gridcalc operations                  # List operations and their routes
//! ```
//!
//! Settings also come from `GRIDCALC_*` environment variables and a `.env`
//! file; flags win.

use clap::{Parser, Subcommand};
use gridcalc::{api, run_path, Operation, ServerConfig};
use std::fs;
use std::net::IpAddr;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "gridcalc")]
#[command(about = "Echo, invert, flatten, sum or multiply CSV matrices", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start HTTP server
    Serve {
        /// Interface to bind
        #[arg(long)]
        host: Option<IpAddr>,

        /// Port to listen on
        #[arg(short, long)]
        port: Option<u16>,

        /// Largest accepted upload in bytes
        #[arg(long)]
        max_upload_bytes: Option<usize>,
    },

    /// Run an operation on a local CSV file
    Run {
        /// echo, invert, flatten, sum or multiply
        operation: Operation,

        /// Input CSV file
        input: PathBuf,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Show available operations
    Operations,
}

#[tokio::main]
async fn main() {
    // Load .env file (if present)
    dotenvy::dotenv().ok();
    api::init_logging();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Serve {
            host,
            port,
            max_upload_bytes,
        } => cmd_serve(host, port, max_upload_bytes).await,

        Commands::Run {
            operation,
            input,
            output,
        } => cmd_run(operation, &input, output.as_deref()),

        Commands::Operations => cmd_operations(),
    };

    if let Err(e) = result {
        eprintln!("❌ Error: {}", e);
        std::process::exit(1);
    }
}

async fn cmd_serve(
    host: Option<IpAddr>,
    port: Option<u16>,
    max_upload_bytes: Option<usize>,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = ServerConfig::from_env()?;
    if let Some(host) = host {
        config.host = host;
    }
    if let Some(port) = port {
        config.port = port;
    }
    if let Some(limit) = max_upload_bytes {
        config.max_upload_bytes = limit;
    }

    api::start_server(config).await?;
    Ok(())
}

fn cmd_run(
    operation: Operation,
    input: &Path,
    output: Option<&Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    tracing::debug!(%operation, input = %input.display(), "running operation");
    let result = run_path(operation, input)?;
    write_output(&result, output)?;

    Ok(())
}

fn cmd_operations() -> Result<(), Box<dyn std::error::Error>> {
    for op in Operation::ALL {
        println!("  {:<9} POST {:<10} {}", op.name(), op.route(), op.description());
    }
    Ok(())
}

fn write_output(content: &str, path: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    match path {
        Some(p) => {
            fs::write(p, content)?;
            eprintln!("💾 Output written to: {}", p.display());
        }
        None => {
            print!("{}", content);
        }
    }
    Ok(())
}
