use std::net::{IpAddr, Ipv4Addr, SocketAddr};

pub const DEFAULT_PORT: u16 = 8888;

fn default_max_body_bytes() -> usize {
    64 * 1024
}

/// Settings for the analysis endpoint
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Interface to bind
    pub host: IpAddr,
    /// Port to bind; 0 picks a free port
    pub port: u16,
    /// Largest accepted `POST /api` body
    pub max_body_bytes: usize,
    /// Indent JSON response bodies
    pub pretty: bool,
}

impl ServerConfig {
    pub fn new(host: IpAddr, port: u16) -> Self {
        Self {
            host,
            port,
            ..Self::default()
        }
    }

    pub fn addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::LOCALHOST),
            port: DEFAULT_PORT,
            max_body_bytes: default_max_body_bytes(),
            pretty: true,
        }
    }
}
