//! HTTP and configuration adapters for kbchat.

pub mod client;
pub mod config;

pub use client::HttpServiceClient;
pub use config::{AppConfig, EndpointConfig, load_config, load_effective_config};
