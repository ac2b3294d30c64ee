use std::sync::Arc;

use mento_onboarding::api::BackendClient;
use mento_onboarding::config::{ClientConfig, ServerConfig};
use mento_onboarding::onboarding::{
    FileProfileSource, OnboardingRouteState, ProfileManager, ProfileSource, onboarding_routes,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let server_config = ServerConfig::from_env()?;

    eprintln!("Mento onboarding v{}", env!("CARGO_PKG_VERSION"));

    let source: Arc<dyn ProfileSource> = match &server_config.profile_file {
        Some(path) => {
            eprintln!("   Profile: {}", path.display());
            Arc::new(FileProfileSource::new(path.clone()))
        }
        None => {
            let client_config = ClientConfig::from_env()?;
            let client = BackendClient::new(&client_config)?;
            eprintln!("   Backend: {}", client.base_url());
            if client_config.access_token.is_none() {
                eprintln!("   Warning: MENTO_ACCESS_TOKEN not set, profile requests will be rejected");
            }
            Arc::new(client)
        }
    };

    let manager = Arc::new(ProfileManager::new(source));

    // A failed first load is not fatal; clients can POST /api/onboarding/refresh.
    match manager.load().await {
        Ok(status) => eprintln!(
            "   Worker: {} | Job seeker: {}",
            status.flow_state, status.job_flow_state
        ),
        Err(e) => eprintln!("   Warning: initial profile load failed: {e}"),
    }

    let app = onboarding_routes(OnboardingRouteState {
        manager: Arc::clone(&manager),
    });

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", server_config.port)).await?;
    eprintln!("   Status API: http://0.0.0.0:{}/api/onboarding/status\n", server_config.port);
    tracing::info!(port = server_config.port, "Onboarding status server started");

    axum::serve(listener, app).await?;
    Ok(())
}
