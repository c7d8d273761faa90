// HTTP endpoint for parameter analysis

pub mod config;
pub mod error;
pub mod handler;
pub mod server;

pub use config::ServerConfig;
pub use error::{Error, Result};
pub use handler::ApiHandler;
pub use server::ApiServer;
