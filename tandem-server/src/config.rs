use crate::error::ConfigError;
use std::net::SocketAddr;
use tandem_core::IceServerConfig;

pub const DEFAULT_STUN_URL: &str = "stun:stun.l.google.com:19302";
pub const DEFAULT_PORT: u16 = 5000;

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind: SocketAddr,
    /// Advertised to every endpoint in its `Welcome` frame.
    pub ice_servers: Vec<IceServerConfig>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: SocketAddr::from(([0, 0, 0, 0], DEFAULT_PORT)),
            ice_servers: vec![IceServerConfig::stun(DEFAULT_STUN_URL)],
        }
    }
}

impl ServerConfig {
    /// Build from flat settings, the way the binary receives them.
    pub fn from_parts(
        bind: SocketAddr,
        stun_urls: Vec<String>,
        turn_url: Option<String>,
        turn_username: Option<String>,
        turn_credential: Option<String>,
    ) -> Result<Self, ConfigError> {
        let mut ice_servers: Vec<IceServerConfig> = stun_urls
            .into_iter()
            .filter(|url| !url.trim().is_empty())
            .map(IceServerConfig::stun)
            .collect();

        match turn_url {
            Some(url) => ice_servers.push(IceServerConfig {
                urls: vec![url],
                username: turn_username,
                credential: turn_credential,
            }),
            None if turn_username.is_some() || turn_credential.is_some() => {
                return Err(ConfigError::OrphanTurnCredentials);
            }
            None => {}
        }

        if ice_servers.is_empty() {
            return Err(ConfigError::NoIceServers);
        }

        Ok(Self { bind, ice_servers })
    }
}
