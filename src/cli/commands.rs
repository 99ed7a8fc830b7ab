use anyhow::Context as _;
use clap::{Parser, Subcommand};
use http::StatusCode;
use serde_json::json;
use tracing::info;

use crate::context::handler_fn;
use crate::engine::Engine;
use crate::group::Routes;
use crate::logging::{init_logging, LogConfig};
use crate::middleware::logger;
use crate::router::RouteError;
use crate::runtime_config::RuntimeConfig;

/// Command-line interface for rum
#[derive(Parser, Debug)]
#[command(name = "rum")]
#[command(about = "Radix-tree HTTP router demo server", long_about = None)]
#[command(version)]
pub struct Cli {
    /// The subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Serve the demo routes over HTTP
    Serve {
        /// Address to bind to (overrides RUM_ADDR)
        #[arg(short, long)]
        addr: Option<String>,
    },
    /// Print the demo route table
    Routes,
}

/// Build the engine behind `rum serve`
///
/// # Errors
///
/// Returns a [`RouteError`] if the demo route table is inconsistent.
pub fn demo_engine() -> Result<Engine, RouteError> {
    let mut engine = Engine::new();
    engine.use_middleware(logger());

    engine
        .get(
            "/",
            vec![handler_fn(|c| c.string(StatusCode::OK, "rum says hello\n"))],
        )?
        .get(
            "/ping",
            vec![handler_fn(|c| c.json(StatusCode::OK, &json!({ "message": "pong" })))],
        )?
        .get(
            "/static/*filepath",
            vec![handler_fn(|c| {
                let file = c.param("filepath").unwrap_or_default().to_owned();
                c.string(StatusCode::OK, format!("static file: {}\n", file));
            })],
        )?;

    {
        let mut users = engine.group("/users", vec![]);
        users
            .get(
                "/list",
                vec![handler_fn(|c| c.json(StatusCode::OK, &json!(["ada", "grace", "linus"])))],
            )?
            .get(
                "/:id",
                vec![handler_fn(|c| {
                    let id = c.param("id").unwrap_or_default().to_owned();
                    c.json(StatusCode::OK, &json!({ "id": id }));
                })],
            )?
            .get(
                "/:id/posts/:post",
                vec![handler_fn(|c| {
                    let body = json!({
                        "user": c.param("id"),
                        "post": c.param("post"),
                    });
                    c.json(StatusCode::OK, &body);
                })],
            )?
            .post(
                "/",
                vec![handler_fn(|c| match c.bind_json::<serde_json::Value>() {
                    Ok(user) => c.json(StatusCode::CREATED, &user),
                    Err(err) => {
                        c.string(StatusCode::BAD_REQUEST, format!("invalid body: {}\n", err));
                        c.error(err);
                    }
                })],
            )?;
    }

    Ok(engine)
}

/// Execute the parsed command
///
/// # Errors
///
/// Returns an error if logging cannot be initialized, the demo routes fail to
/// register, or the server fails to start.
pub fn run_cli(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Commands::Serve { addr } => {
            let _log_guard = init_logging(&LogConfig::from_env())?;
            let mut config = RuntimeConfig::from_env();
            if let Some(addr) = addr {
                config.addr = addr;
            }
            config.apply();

            let engine = demo_engine().context("Failed to register demo routes")?;
            engine.dump_routes();
            info!(
                addr = %config.addr,
                stack_size = config.stack_size,
                workers = config.workers,
                "Starting server"
            );
            engine
                .run(config.addr.as_str())
                .with_context(|| format!("Server on {} stopped with an error", config.addr))
        }
        Commands::Routes => {
            let engine = demo_engine().context("Failed to register demo routes")?;
            for route in engine.routes() {
                println!("{:<7} {:<24} ({} handlers)", route.method, route.path, route.handlers);
            }
            Ok(())
        }
    }
}
