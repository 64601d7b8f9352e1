pub mod client;
pub mod errors;
pub mod model;
pub mod prompt;

pub use client::{Oracle, OracleClient, OracleCredential};
pub use errors::OracleError;
pub use model::{DEFAULT_SHIPPING_CATEGORY, OracleJudgment, parse_judgment};
