pub mod analyzer;
pub mod currency;
pub mod explain;
pub mod filter;
pub mod ranking;
pub mod stats;
pub mod sweep;

pub use analyzer::{AnalyzerSettings, TravelAnalyzer};
pub use currency::CurrencyNormalizer;
pub use sweep::{OfferSweeper, SweepKey};
