pub mod config;
pub mod encoding;
pub mod plural;
pub mod qa;
pub mod resolver;
pub mod store;
