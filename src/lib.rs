pub mod cli;
pub mod client;
pub mod config;
pub mod constants;
pub mod extract;
pub mod extractor;
pub mod logging;
pub mod persist;
pub mod poller;
pub mod query;
pub mod shutdown;
