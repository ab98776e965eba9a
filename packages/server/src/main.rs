use std::net::SocketAddr;

use tracing::{Level, info, warn};

use server::config::AppConfig;
use server::mailer::Mailer;
use server::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_max_level(Level::INFO).init();

    let config = AppConfig::load()?;

    let db = match config.database.url.as_deref() {
        Some(url) => match server::database::init_db(url).await {
            Ok(db) => {
                server::seed::ensure_indexes(&db).await?;
                Some(db)
            }
            Err(e) => {
                warn!(error = %e, "Could not reach the store; submissions fall back to mail");
                None
            }
        },
        None => {
            warn!("No database configured; submissions fall back to mail");
            None
        }
    };

    let mailer = match config.email.as_ref() {
        Some(cfg) => match Mailer::from_config(cfg) {
            Ok(mailer) => Some(mailer),
            Err(e) => {
                warn!(error = %e, "Mailer configuration is invalid; the mail sink is disabled");
                None
            }
        },
        None => None,
    };

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;
    let state = AppState { db, mailer, config };
    let app = server::build_router(state);

    info!("Server running at http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
