pub mod client;
pub mod decode;
pub mod errors;
pub mod types;

pub use client::{HttpFetcher, USER_AGENT};
pub use errors::FetchError;
pub use types::{Charset, MarkupSource, PageResponse};
