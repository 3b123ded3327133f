pub mod analyzer;
pub mod catalog;
pub mod config;
pub mod importers;
pub mod metrics;
pub mod persistence;
pub mod services;
pub mod table;
pub mod utils;
