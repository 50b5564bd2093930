pub mod app_config;
pub mod flight_client;
pub mod fx_client;
pub mod history;
pub mod llm_client;

pub use flight_client::HttpFlightSearch;
pub use fx_client::HttpFxRates;
pub use history::PgHistoryStore;
pub use llm_client::ChatExplanationClient;
