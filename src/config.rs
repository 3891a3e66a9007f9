use serde::Deserialize;

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Path to the dish catalog (JSON array of dishes)
    #[serde(default = "default_catalog_path")]
    pub catalog_path: String,

    /// Path to the fitted categorical encoder artifact
    #[serde(default = "default_encoder_path")]
    pub encoder_path: String,

    /// Path to the fitted classifier artifact
    #[serde(default = "default_model_path")]
    pub model_path: String,

    /// Number of dishes recommended per meal slot
    #[serde(default = "default_top_k")]
    pub top_k: usize,

    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_catalog_path() -> String {
    "data/meal_dishes.json".to_string()
}

fn default_encoder_path() -> String {
    "data/encoder.json".to_string()
}

fn default_model_path() -> String {
    "data/model.json".to_string()
}

fn default_top_k() -> usize {
    5
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    5000
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        let config = envy::from_env::<Config>()
            .map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))?;
        config.validate()?;
        Ok(config)
    }

    /// Rejects values the pipeline cannot serve with
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.top_k == 0 {
            anyhow::bail!("TOP_K must be at least 1");
        }
        Ok(())
    }

    /// Socket address the server binds to
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
