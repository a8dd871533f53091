pub mod projection;
pub mod service;
pub mod vault;

pub use projection::InMemoryProjectionStore;
pub use service::LedgerService;
pub use vault::{InMemoryVault, VaultError};
