use serde::Deserialize;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Address the listener binds to.
    #[serde(default = "default_listen_addr")]
    pub listen_addr: String,

    /// Bytes reserved in the receive buffer ahead of each socket read.
    #[serde(default = "default_read_buffer_size")]
    pub read_buffer_size: usize,

    /// Cap on unconsumed receive-buffer growth before the request is
    /// rejected.
    #[serde(default = "default_max_buffer_bytes")]
    pub max_buffer_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: default_listen_addr(),
            read_buffer_size: default_read_buffer_size(),
            max_buffer_bytes: default_max_buffer_bytes(),
        }
    }
}

fn default_listen_addr() -> String {
    "127.0.0.1:8080".to_string()
}

fn default_read_buffer_size() -> usize {
    4096
}

fn default_max_buffer_bytes() -> usize {
    64 * 1024
}

impl Config {
    /// Loads configuration from the YAML file named by `WICKET_CONFIG`
    /// (default `wicket.yaml`). A missing file yields the built-in
    /// defaults.
    pub fn load() -> anyhow::Result<Self> {
        let path =
            std::env::var("WICKET_CONFIG").unwrap_or_else(|_| "wicket.yaml".to_string());
        match std::fs::read_to_string(&path) {
            Ok(raw) => Ok(serde_yaml::from_str(&raw)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Config::default()),
            Err(e) => Err(e.into()),
        }
    }
}
