use farescout_engine::TravelAnalyzer;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub analyzer: Arc<TravelAnalyzer>,
}
