pub mod commands;
pub mod config;
pub mod fetch;
pub mod keys;
pub mod models;
pub mod monitor;
pub mod report;
pub mod shutdown;
pub mod store;
pub mod utils;
pub mod validation;
