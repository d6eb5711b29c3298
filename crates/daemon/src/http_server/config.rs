use std::net::SocketAddr;

use super::MAX_BODY_SIZE_BYTES;

#[derive(Debug, Clone)]
pub struct Config {
    pub listen_addr: SocketAddr,
    /// Level of the per-request trace lines
    pub log_level: tracing::Level,
    /// Requests with a larger body are rejected with 413 before any handler
    ///  runs
    pub max_body_bytes: usize,
}

impl Config {
    pub fn new(listen_addr: SocketAddr, log_level: tracing::Level) -> Self {
        tracing::debug!(%listen_addr, "creating HTTP server config");
        Self {
            listen_addr,
            log_level,
            max_body_bytes: MAX_BODY_SIZE_BYTES,
        }
    }
}
