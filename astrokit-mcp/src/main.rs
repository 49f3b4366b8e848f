//! Astrokit MCP Server
//!
//! Line-delimited JSON-RPC over stdio. Logs go to stderr so stdout
//! carries nothing but protocol messages.

mod config;
mod convert;
mod protocol;
mod registry;

use tokio::io::{self, AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::{debug, error, info};
use tracing_subscriber::EnvFilter;

use config::ServerConfig;
use protocol::{Server, PROTOCOL_VERSION, SERVER_VERSION};

fn init_tracing(config: &ServerConfig) {
    let filter = EnvFilter::try_new(&config.log_filter).unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();
}

#[tokio::main]
async fn main() -> io::Result<()> {
    let config = ServerConfig::from_env();
    init_tracing(&config);

    let server = Server::new(registry::standard_registry(), config.warnings_as_errors);
    info!(
        version = SERVER_VERSION,
        protocol = PROTOCOL_VERSION,
        functions = server.function_count(),
        strict = config.warnings_as_errors,
        "astrokit MCP server started"
    );

    let mut lines = BufReader::new(io::stdin()).lines();
    let mut stdout = io::stdout();

    while let Some(line) = lines.next_line().await? {
        let Some(response) = server.handle_line(&line) else {
            continue;
        };
        match serde_json::to_string(&response) {
            Ok(json) => {
                debug!(bytes = json.len(), "sending response");
                stdout.write_all(json.as_bytes()).await?;
                stdout.write_all(b"\n").await?;
                stdout.flush().await?;
            }
            Err(e) => error!(error = %e, "failed to serialize response"),
        }
    }

    info!("client disconnected (EOF)");
    Ok(())
}
