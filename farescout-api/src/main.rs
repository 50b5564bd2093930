use std::net::SocketAddr;
use std::sync::Arc;

use farescout_api::{app, AppState};
use farescout_core::collaborators::{
    ExplanationSource, FxRates, HistoryStore, NoopExplanation, NoopHistory,
};
use farescout_engine::{AnalyzerSettings, TravelAnalyzer};
use farescout_store::{ChatExplanationClient, HttpFlightSearch, HttpFxRates, PgHistoryStore};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "farescout_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = farescout_store::app_config::Config::load().expect("Failed to load config");
    tracing::info!("Starting farescout API on port {}", config.server.port);

    let search = Arc::new(HttpFlightSearch::new(
        config.search.base_url.clone(),
        config.search.api_key.clone(),
    ));

    let fx: Option<Arc<dyn FxRates>> = config
        .fx
        .url
        .as_deref()
        .map(|url| Arc::new(HttpFxRates::new(url)) as Arc<dyn FxRates>);

    let explainer: Arc<dyn ExplanationSource> = match config.explanation.api_url.as_deref() {
        Some(api_url) => Arc::new(ChatExplanationClient::new(
            api_url,
            config.explanation.api_key.clone(),
            config.explanation.model.clone(),
        )),
        None => Arc::new(NoopExplanation),
    };

    let history: Arc<dyn HistoryStore> = match config.history.database_url.as_deref() {
        Some(url) => {
            let store = PgHistoryStore::connect(url)
                .await
                .expect("Failed to connect to history database");
            store
                .ensure_schema()
                .await
                .expect("Failed to prepare history schema");
            Arc::new(store)
        }
        None => Arc::new(NoopHistory),
    };

    let analyzer = TravelAnalyzer::with_collaborators(
        search,
        fx,
        explainer,
        history,
        AnalyzerSettings {
            window_days: config.analysis.window_days,
            cache_capacity: config.analysis.cache_capacity,
        },
    );

    let app = app(AppState {
        analyzer: Arc::new(analyzer),
    });

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind listener");
    axum::serve(listener, app).await.expect("Server error");
}
