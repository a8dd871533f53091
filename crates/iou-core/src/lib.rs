pub mod amount;
pub mod identity;
pub mod ledger;
pub mod state;

pub use amount::{Amount, AmountError, Chf, Currency, Eur, Gbp, Jpy, Usd};
pub use identity::{Party, UniqueIdentifier};
pub use ledger::{
    IouCommand, LedgerTransaction, StateAndRef, StateRef, StateVault, TransactionVerifier,
    VerificationError,
};
pub use state::IouState;
