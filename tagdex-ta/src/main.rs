//! tagdex-ta (Tag Analytics) - tag taxonomy and voting analytics service
//!
//! Records media↔tag associations and per-user votes against the shared
//! SQLite database and serves the derived analytics views over HTTP.

use anyhow::Result;
use clap::Parser;
use tagdex_common::config::{database_path, resolve_root_folder};
use tagdex_common::db::init::init_database;
use tagdex_ta::{build_router, AppState};
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "tagdex-ta", about = "Tag taxonomy and voting analytics service")]
struct Args {
    /// Root data folder (overrides TAGDEX_ROOT and the config file)
    #[arg(long)]
    root_folder: Option<String>,

    /// Listen port
    #[arg(long, default_value_t = 5741)]
    port: u16,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    info!(
        "Starting Tagdex Tag Analytics (tagdex-ta) v{}",
        env!("CARGO_PKG_VERSION")
    );

    let args = Args::parse();
    let root_folder = resolve_root_folder(args.root_folder.as_deref());
    let db_path = database_path(&root_folder);
    info!("Database path: {}", db_path.display());

    let pool = init_database(&db_path).await?;

    let state = AppState::new(pool);
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(("127.0.0.1", args.port)).await?;
    info!("tagdex-ta listening on http://127.0.0.1:{}", args.port);
    info!("Health check: http://127.0.0.1:{}/health", args.port);

    axum::serve(listener, app).await?;

    Ok(())
}
