pub mod config;
pub mod config_loader;
pub mod records;
pub mod store;

pub use config::{AppConfig, DatabaseConfig, ServerConfig};
pub use config_loader::ConfigLoader;
pub use records::{CdrRecord, CostByCurrency, DailySummary, TopCaller};
pub use store::CdrStore;
