use serde::Deserialize;

const ENV_PREFIX: &str = "ASSET_TRENDS";

#[derive(Debug, Deserialize, Clone)]
pub struct InfluxConfig {
    pub influx: InfluxSettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct InfluxSettings {
    pub host: String,
    pub token: String,
    pub database: String,
    pub retention_policy: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    #[serde(default)]
    pub server: ServerSettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerSettings {
    #[serde(default = "default_bind")]
    pub bind: String,
    #[serde(default = "default_hours")]
    pub default_hours: u32,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            default_hours: default_hours(),
        }
    }
}

fn default_bind() -> String {
    "0.0.0.0:8080".to_string()
}

fn default_hours() -> u32 {
    24
}

fn builder(file: &str, required: bool) -> config::ConfigBuilder<config::builder::DefaultState> {
    config::Config::builder()
        .add_source(config::File::with_name(file).required(required))
        .add_source(config::Environment::with_prefix(ENV_PREFIX).separator("__"))
}

pub fn load_influx_config() -> anyhow::Result<InfluxConfig> {
    let settings = builder("config/influx", true).build()?;

    Ok(settings.try_deserialize()?)
}

/// Server settings are optional; missing file or keys fall back to defaults.
pub fn load_server_config() -> anyhow::Result<ServerConfig> {
    let settings = builder("config/server", false).build()?;

    Ok(settings.try_deserialize()?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_settings_defaults() {
        let config: ServerConfig = config::Config::builder()
            .set_override("server.bind", "127.0.0.1:9000")
            .unwrap()
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert_eq!(config.server.bind, "127.0.0.1:9000");
        assert_eq!(config.server.default_hours, 24);
    }
}
