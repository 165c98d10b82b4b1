pub mod cli;
pub mod config;
pub mod export;
pub mod frontend;
pub mod http_cache;
pub mod http_client;
pub mod loader;
pub mod records;
pub mod report;
pub mod rounds;
pub mod sample;
pub mod source;
pub mod state;
pub mod store;
pub mod table;
pub mod trends;
