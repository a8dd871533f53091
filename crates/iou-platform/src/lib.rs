pub mod config;
pub mod db;
pub mod store;
pub mod telemetry;

pub use config::ServiceConfig;
pub use db::{connect_database, migrate};
pub use store::PgProjectionStore;
pub use telemetry::init_tracing;
