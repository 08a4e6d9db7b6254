pub mod analyzers;
pub mod collector;
pub mod config;
pub mod error;
pub mod fetch;
pub mod infra;
pub mod loader;
pub mod output;
pub mod parser;
pub mod players;
pub mod record;
pub mod report;
pub mod services;
