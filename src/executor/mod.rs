// Jupiter swap flow
pub mod swap;

// Decode and sign the transaction returned by /swap
pub mod builder;

pub use builder::TransactionBuilder;
pub use swap::SwapExecutor;
