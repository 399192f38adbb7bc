use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Deserialize)]
pub struct Config {
    pub udp: UdpConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UdpConfig {
    pub bind: String,
    /// Receive buffer size; longer datagrams are truncated
    #[serde(default = "default_max_datagram")]
    pub max_datagram: usize,
}

#[derive(Debug, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
}

fn default_max_datagram() -> usize {
    2048
}

impl Config {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Failed to read config file {:?}: {}", path, e))?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> anyhow::Result<Self> {
        let config: Config = toml::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse config file: {}", e))?;
        Ok(config)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            udp: UdpConfig {
                bind: "0.0.0.0:44444".to_string(),
                max_datagram: default_max_datagram(),
            },
            logging: LoggingConfig {
                level: "info".to_string(),
            },
        }
    }
}
