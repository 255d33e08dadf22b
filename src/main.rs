//! # Cofounder CLI
//!
//! ## Usage
//!
//! ```bash
//! # Run the HTTP API
//! cofounder serve --listen 0.0.0.0:8080
//!
//! # Process an assistant reply read from a file (or stdin)
//! cofounder reply --request "draw 3 rectangles" reply.txt
//! ```

use clap::{Parser, Subcommand};
use std::io::Read;
use std::path::PathBuf;

use cofounder::{CofounderError, ServerConfig, process_assistant_reply, server, store::MemoryBackend};

/// Cofounder - AI co-founder chat backend
#[derive(Parser, Debug)]
#[command(name = "cofounder")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the HTTP API server
    Serve {
        #[command(flatten)]
        config: ServerConfig,
    },

    /// Run an assistant reply through the directive pipeline and print the result
    Reply {
        /// The user message that prompted the reply (enables fallback drawing)
        #[arg(long)]
        request: Option<String>,

        /// Owner id recorded on created shapes
        #[arg(long, default_value = "cli-user")]
        owner: String,

        /// File holding the raw reply (reads stdin when omitted)
        file: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<(), CofounderError> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Serve { config } => server::serve(config).await,
        Commands::Reply {
            request,
            owner,
            file,
        } => {
            let raw = match file {
                Some(path) => std::fs::read_to_string(path)?,
                None => {
                    let mut buf = String::new();
                    std::io::stdin().read_to_string(&mut buf)?;
                    buf
                }
            };

            let store = MemoryBackend::new();
            let processed = process_assistant_reply(&store, &raw, &owner, request.as_deref()).await;
            for skipped in &processed.skipped {
                eprintln!("skipped {}: {}", skipped.raw, skipped.reason);
            }

            let json = serde_json::to_string_pretty(&processed)
                .map_err(|e| CofounderError::InvalidRequest(e.to_string()))?;
            println!("{}", json);
            Ok(())
        }
    }
}
