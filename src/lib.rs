//! Incremental, de-duplicated loading of paginated post feeds.

pub mod cli;
pub mod config;
pub mod domain;
pub mod errors;
pub mod services;
pub mod sources;
