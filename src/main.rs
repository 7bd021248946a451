use {
    paygate::{
        AppState,
        adapters::{cardconnect::CardConnectGateway, payload::PayloadGateway},
        config::AppConfig,
        domain::identity::GatewayKind,
        services::{audit::TracingAuditSink, dispatcher::Dispatcher, registry::AdapterRegistry},
    },
    std::{sync::Arc, time::Duration},
    tokio::signal,
};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    dotenvy::dotenv().ok();
    let config = AppConfig::from_env();

    let client = reqwest::Client::builder()
        .connect_timeout(Duration::from_secs(5))
        .build()
        .expect("failed to build http client");

    let mut registry = AdapterRegistry::new();
    registry.register(
        GatewayKind::Payload.type_id(),
        GatewayKind::Payload.name(),
        Arc::new(PayloadGateway::new(client.clone(), &config.payload_api_url)),
    );
    registry.register(
        GatewayKind::CardConnect.type_id(),
        GatewayKind::CardConnect.name(),
        Arc::new(CardConnectGateway::new(
            client,
            config.cardconnect_hostname.as_deref(),
        )),
    );
    tracing::info!(gateways = registry.len(), "adapter registry initialized");

    let dispatcher = Dispatcher::new(
        Arc::new(registry),
        Arc::new(TracingAuditSink),
        config.gateway_call_timeout,
    );
    let state = AppState {
        dispatcher: Arc::new(dispatcher),
    };
    // Give the HTTP layer headroom over the gateway timeout so slow-gateway
    // reporting stays the dispatcher's job.
    let app = paygate::router(state, config.gateway_call_timeout + Duration::from_secs(10));

    let listener = tokio::net::TcpListener::bind(&config.bind_addr)
        .await
        .expect("failed to bind listener");
    tracing::info!("listening on {}", config.bind_addr);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .unwrap();
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c().await.expect("failed to listen for ctrl+c");
    };

    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to listen for SIGTERM")
            .recv()
            .await;
    };

    tokio::select! {
        _ = ctrl_c => tracing::info!("received ctrl+c, shutting down"),
        _ = terminate => tracing::info!("received SIGTERM, shutting down"),
    }
}
