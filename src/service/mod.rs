pub mod client;
pub mod configuration;
pub mod export;
pub mod session;
pub mod task;
