use user_auth::{
    app,
    config::{AppConfig, Environment},
    state::AppState,
};

fn init_tracing(env: Environment) {
    let default_filter = match env {
        Environment::Prod => "user_auth=info,tower_http=info",
        Environment::Local | Environment::Dev => "user_auth=debug,tower_http=info",
    };
    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| default_filter.to_string());
    let json_logs = std::env::var("LOG_FORMAT")
        .map(|v| v == "json")
        .unwrap_or(env != Environment::Local);

    if json_logs {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(false)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(env_filter).init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = AppConfig::from_env()?;
    init_tracing(config.env);
    tracing::info!(env = ?config.env, storage = ?config.storage, "starting user-auth");

    let bind_address = config.bind_address();
    let state = AppState::init(config).await?;
    let app = app::build_app(state.clone());

    let served = app::serve(app, &bind_address).await;
    state.close().await;
    served
}
