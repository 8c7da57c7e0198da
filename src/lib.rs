pub mod charts;
pub mod config;
pub mod data_provider;
pub mod errors;
pub mod models;
pub mod normalizer;
pub mod resolver;
pub mod scrapers;
pub mod services;
pub mod terminal;
pub mod util;
pub mod view;
pub mod web;

pub use charts::build_charts;
pub use data_provider::MockDataProvider;
pub use errors::{DashboardError, FetchError, Result};
pub use models::quote::RawQuote;
pub use models::stock::StockRecord;
pub use models::ticker::Ticker;
pub use normalizer::Normalizer;
pub use resolver::InputResolver;
pub use services::{Dashboard, DashboardService};
