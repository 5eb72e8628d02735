use anyhow::Context;

use hemmy_auth::RouteGuard;
use hemmy_web::{app, config::WebConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    hemmy_observability::init();

    let config = WebConfig::from_env()?;
    let app = app::build_app(app::shell_pages(), RouteGuard::default());

    let listener = tokio::net::TcpListener::bind(config.addr)
        .await
        .with_context(|| format!("failed to bind {}", config.addr))?;

    tracing::info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;
    Ok(())
}
