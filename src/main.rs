use std::net::SocketAddr;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use zendesk_phone_reconciler::config::Config;
use zendesk_phone_reconciler::server::{self, AppState};
use zendesk_phone_reconciler::zendesk::ZendeskClient;

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "zendesk_phone_reconciler=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(error) => {
            eprintln!("configuration error: {error}");
            std::process::exit(1);
        }
    };

    let client = ZendeskClient::new(&config);
    let app = server::build_router(AppState::new(client));

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!(
        %addr,
        subdomain = %config.subdomain,
        "phone reconciler listening"
    );

    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
    server::serve(listener, app, server::DRAIN_DEADLINE)
        .await
        .unwrap();
}
