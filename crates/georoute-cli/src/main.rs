//! # Georoute CLI Entry Point
//!
//! Main binary for the georoute proximity routing controller. Provides a
//! command-line interface for running a controller and for driving its
//! JSON-RPC control API from scripts.
//!
//! ## Usage
//!
//! ```bash
//! # Run a controller with a geolocation table
//! georoute serve --geo-table geo.json --control-bind 127.0.0.1:5000
//!
//! # Load a node set over the control API
//! georoute call http://127.0.0.1:5000 loadNodes -a '["1.1.1.1","2.2.2.2"]'
//!
//! # Start the serving endpoint and check it took
//! georoute call http://127.0.0.1:5000 start
//! georoute call http://127.0.0.1:5000 status
//! ```
//!
//! ## URL Format
//!
//! Control API URLs must include the `http://` or `https://` prefix:
//! - ✅ `http://127.0.0.1:5000`
//! - ❌ `127.0.0.1:5000`

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use argh::FromArgs;
use http_body_util::{BodyExt, Full};
use hyper::body::Bytes;
use hyper_util::client::legacy::Client;
use hyper_util::rt::TokioExecutor;
use serde_json::json;

use georoute_common::protocol::{JsonRpcRequest, JsonRpcResponse};
use georoute_controller::{ControlServer, Controller, ControllerConfig, ProbeConfig, StaticGeoResolver};

/// Validates that a URL string starts with http:// or https://
fn validate_http_url(url: &str, description: &str) -> Result<()> {
    if url.starts_with("http://") || url.starts_with("https://") {
        Ok(())
    } else {
        Err(anyhow::anyhow!(
            "Invalid {}: '{}' must start with http:// or https://",
            description,
            url
        ))
    }
}

/// Main CLI structure parsed from command-line arguments.
#[derive(FromArgs)]
/// Georoute - geo-proximity routing controller
struct Cli {
    #[argh(subcommand)]
    command: Commands,
}

#[derive(FromArgs)]
#[argh(subcommand)]
enum Commands {
    Serve(ServeArgs),
    Call(CallArgs),
}

/// Arguments for running a georoute controller.
///
/// The controller exposes its JSON-RPC control API on `--control-bind` and,
/// once started via the `start` method, answers routing queries on
/// `--serve-bind`. Edge node liveness is probed by TCP connect on
/// `--probe-port` every rebuild cycle.
///
/// # Example
///
/// ```bash
/// georoute serve --geo-table geo.json \
///   --control-bind 127.0.0.1:5000 \
///   --serve-bind 0.0.0.0:8080
/// ```
#[derive(FromArgs)]
#[argh(subcommand, name = "serve")]
/// run a georoute controller
struct ServeArgs {
    /// path to the JSON geolocation table mapping IPs to coordinates
    ///
    /// Each entry maps an IP address to `{"lat": .., "lon": ..}`. Addresses
    /// absent from the table cannot be geolocated and are dropped from
    /// submitted node sets.
    #[argh(option, long = "geo-table")]
    geo_table: PathBuf,

    /// address to bind the JSON-RPC control API to
    ///
    /// Defaults to "127.0.0.1:5000". The control API accepts POST requests
    /// at the /rpc path.
    #[argh(option, long = "control-bind", default = "\"127.0.0.1:5000\".into()")]
    control_bind: String,

    /// address to bind the serving endpoint to once started
    ///
    /// Defaults to "127.0.0.1:8080". The endpoint answers GET /closest with
    /// the nearest online node for the requesting client.
    #[argh(option, long = "serve-bind", default = "\"127.0.0.1:8080\".into()")]
    serve_bind: String,

    /// TCP port probed on each edge node to determine liveness
    ///
    /// Defaults to 8080, the port edge nodes serve content on.
    #[argh(option, long = "probe-port", default = "8080")]
    probe_port: u16,

    /// timeout for each liveness probe in milliseconds
    ///
    /// A node that does not accept a connection within this window is
    /// treated as offline for the cycle. Defaults to 1000ms.
    #[argh(option, long = "probe-timeout-ms", default = "1000")]
    probe_timeout_ms: u64,

    /// interval between index rebuild cycles in milliseconds
    ///
    /// Each cycle re-probes the registered fleet and publishes a fresh
    /// spatial index. Defaults to 2000ms.
    #[argh(option, long = "rebuild-interval-ms", default = "2000")]
    rebuild_interval_ms: u64,
}

/// Arguments for calling a control API method.
///
/// Makes one JSON-RPC call and writes the raw JSON result to stdout, which
/// makes it suitable for scripting (piping to `jq`, etc.). Errors are
/// reported to stderr with a non-zero exit code.
///
/// # Examples
///
/// ```bash
/// georoute call http://127.0.0.1:5000 status
/// georoute call http://127.0.0.1:5000 loadNodes -a '["1.1.1.1"]'
/// georoute call http://127.0.0.1:5000 status | jq '.running'
/// ```
#[derive(FromArgs)]
#[argh(subcommand, name = "call")]
/// call a control API method
struct CallArgs {
    /// address of the controller's control API
    ///
    /// Must include the http:// or https:// prefix (e.g., http://127.0.0.1:5000).
    #[argh(positional)]
    server_address: String,

    /// name of the control method to call
    ///
    /// One of: start, stop, status, loadNodes.
    #[argh(positional)]
    method: String,

    /// JSON string containing parameters for the method
    ///
    /// Must be valid JSON. Defaults to `{}`. For loadNodes, pass an array
    /// of IP address strings.
    #[argh(option, short = 'a', long = "args", default = "\"{}\".into()")]
    args: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli: Cli = argh::from_env();

    // Initialize tracing only for serve; call keeps stdout clean for
    // unix tool usage (piping to jq, etc.).
    if !matches!(cli.command, Commands::Call(_)) {
        let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .init();
    }

    match cli.command {
        Commands::Serve(args) => run_serve(args).await,
        Commands::Call(args) => run_call(args).await,
    }
}

async fn run_serve(args: ServeArgs) -> Result<()> {
    let resolver = StaticGeoResolver::from_file(&args.geo_table)
        .map_err(|e| anyhow::anyhow!("Failed to load geo table {}: {}", args.geo_table.display(), e))?;
    tracing::info!("Loaded geolocation table with {} entries", resolver.len());

    let control_addr: SocketAddr = args.control_bind.parse()
        .map_err(|e| anyhow::anyhow!("Invalid control bind address {}: {}", args.control_bind, e))?;
    let serve_bind: SocketAddr = args.serve_bind.parse()
        .map_err(|e| anyhow::anyhow!("Invalid serve bind address {}: {}", args.serve_bind, e))?;

    let config = ControllerConfig {
        serve_bind,
        probe: ProbeConfig {
            port: args.probe_port,
            timeout: Duration::from_millis(args.probe_timeout_ms),
        },
        rebuild_interval: Duration::from_millis(args.rebuild_interval_ms),
    };
    tracing::info!(
        "Probing port {} with {}ms timeout, rebuilding every {}ms",
        args.probe_port,
        args.probe_timeout_ms,
        args.rebuild_interval_ms
    );

    let controller = Controller::new(Arc::new(resolver), config);
    let server = ControlServer::new(controller);
    server.run(control_addr).await?;

    Ok(())
}

/// Executes the `call` subcommand.
///
/// Posts a single JSON-RPC request to `{server}/rpc` and prints the raw
/// result to stdout. A JSON-RPC error becomes a non-zero exit.
async fn run_call(args: CallArgs) -> Result<()> {
    validate_http_url(&args.server_address, "server address")?;

    let params: serde_json::Value = serde_json::from_str(&args.args)
        .map_err(|e| anyhow::anyhow!("Invalid JSON in args: {}", e))?;

    let request = JsonRpcRequest {
        jsonrpc: "2.0".into(),
        method: args.method.clone(),
        params,
        id: json!(1),
    };
    let body = serde_json::to_vec(&request)?;

    let http_request = hyper::Request::builder()
        .method("POST")
        .uri(format!("{}/rpc", args.server_address.trim_end_matches('/')))
        .header("Content-Type", "application/json")
        .body(Full::new(Bytes::from(body)))
        .map_err(|e| anyhow::anyhow!("Failed to build request: {}", e))?;

    let client = Client::builder(TokioExecutor::new()).build_http();
    let response = client
        .request(http_request)
        .await
        .map_err(|e| anyhow::anyhow!("Request to {} failed: {}", args.server_address, e))?;
    let bytes = response.into_body().collect().await?.to_bytes();

    let response: JsonRpcResponse = serde_json::from_slice(&bytes)
        .map_err(|e| anyhow::anyhow!("Invalid JSON-RPC response: {}", e))?;

    if let Some(error) = response.error {
        return Err(anyhow::anyhow!("RPC error {}: {}", error.code, error.message));
    }

    println!("{}", serde_json::to_string(&response.result.unwrap_or(serde_json::Value::Null))?);
    Ok(())
}

/// CLI argument parsing tests.
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse_serve_defaults() {
        let args: Cli = Cli::from_args(&["georoute"], &["serve", "--geo-table", "geo.json"]).unwrap();
        match args.command {
            Commands::Serve(ServeArgs {
                geo_table,
                control_bind,
                serve_bind,
                probe_port,
                probe_timeout_ms,
                rebuild_interval_ms,
            }) => {
                assert_eq!(geo_table, PathBuf::from("geo.json"));
                assert_eq!(control_bind, "127.0.0.1:5000");
                assert_eq!(serve_bind, "127.0.0.1:8080");
                assert_eq!(probe_port, 8080);
                assert_eq!(probe_timeout_ms, 1000);
                assert_eq!(rebuild_interval_ms, 2000);
            }
            _ => panic!("Expected Serve command"),
        }
    }

    #[test]
    fn test_cli_parse_serve_overrides() {
        let args: Cli = Cli::from_args(
            &["georoute"],
            &[
                "serve",
                "--geo-table", "table.json",
                "--control-bind", "0.0.0.0:6000",
                "--probe-port", "9090",
                "--rebuild-interval-ms", "500",
            ],
        )
        .unwrap();
        match args.command {
            Commands::Serve(ServeArgs { control_bind, probe_port, rebuild_interval_ms, .. }) => {
                assert_eq!(control_bind, "0.0.0.0:6000");
                assert_eq!(probe_port, 9090);
                assert_eq!(rebuild_interval_ms, 500);
            }
            _ => panic!("Expected Serve command"),
        }
    }

    #[test]
    fn test_cli_parse_call() {
        let args: Cli = Cli::from_args(
            &["georoute"],
            &["call", "http://127.0.0.1:5000", "status"],
        )
        .unwrap();
        match args.command {
            Commands::Call(CallArgs { server_address, method, args }) => {
                assert_eq!(server_address, "http://127.0.0.1:5000");
                assert_eq!(method, "status");
                assert_eq!(args, "{}"); // default
            }
            _ => panic!("Expected Call command"),
        }
    }

    #[test]
    fn test_cli_parse_call_with_args() {
        let args: Cli = Cli::from_args(
            &["georoute"],
            &[
                "call",
                "http://127.0.0.1:5000",
                "loadNodes",
                "-a", "[\"1.1.1.1\",\"2.2.2.2\"]",
            ],
        )
        .unwrap();
        match args.command {
            Commands::Call(CallArgs { method, args, .. }) => {
                assert_eq!(method, "loadNodes");
                assert_eq!(args, "[\"1.1.1.1\",\"2.2.2.2\"]");
            }
            _ => panic!("Expected Call command"),
        }
    }

    #[test]
    fn test_validate_http_url() {
        assert!(validate_http_url("http://127.0.0.1:5000", "server address").is_ok());
        assert!(validate_http_url("https://example.com", "server address").is_ok());
        assert!(validate_http_url("127.0.0.1:5000", "server address").is_err());
    }
}
