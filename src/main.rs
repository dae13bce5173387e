use std::sync::Arc;

use customer_admin::modules::customers::adapters::outbound::shopify::ShopifyDirectory;
use customer_admin::shell::{http, state::AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "customer_admin=info,tower_http=info".into()),
        )
        .init();

    let directory = Arc::new(ShopifyDirectory::from_env());
    if !directory.is_configured() {
        tracing::warn!(
            "SHOPIFY_STORE_DOMAIN / SHOPIFY_ADMIN_API_TOKEN are not set; \
             every page fetch will fail until they are"
        );
    }

    let state = AppState::new(directory.clone(), directory);
    let router = http::router(state);

    let port = std::env::var("PORT").unwrap_or_else(|_| "3000".into());
    let addr = format!("0.0.0.0:{port}");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(%addr, "customer admin api listening");
    axum::serve(listener, router).await?;
    Ok(())
}
