pub mod defaults;
pub mod exporter;
pub mod generator;
pub mod loader;
pub mod models;
pub mod validation;
