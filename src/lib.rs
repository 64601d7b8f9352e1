pub mod api;
pub mod app_state;
pub mod config;
pub mod extractor;
pub mod fetcher;
pub mod health;
pub mod oracle;
pub mod pipeline;
pub mod scoring;
pub mod telemetry;
