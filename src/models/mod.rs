pub mod configuration;
pub mod token;
