pub mod config;
pub mod registry;
pub mod tracking;
