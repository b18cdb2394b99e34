pub mod backends;
pub mod bootstrap;
pub mod config;
pub mod confirm;
