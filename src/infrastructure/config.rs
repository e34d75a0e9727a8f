use crate::domain::farm::Farm;
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub server: ServerSettings,
    pub polling: PollingSettings,
    pub provider: ProviderSettings,
    pub storage: StorageSettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerSettings {
    pub bind: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct PollingSettings {
    pub poll_period_secs: u64,
    pub cooldown_secs: i64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ProviderSettings {
    pub base_url: String,
    pub api_key: String,
    pub model: String,
    pub timeout_secs: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct StorageSettings {
    /// Directory holding the per-farm cooldown files.
    pub cooldown_dir: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct FarmsConfig {
    #[serde(default)]
    pub farms: Vec<FarmConfig>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct FarmConfig {
    pub id: String,
    pub name: String,
    pub location: String,
    pub crop: String,
}

impl FarmConfig {
    pub fn into_farm(self) -> Farm {
        Farm {
            id: self.id,
            name: self.name,
            location: self.location,
            crop: self.crop,
        }
    }
}

pub fn load_app_config() -> anyhow::Result<AppConfig> {
    let settings = config::Config::builder()
        .add_source(config::File::with_name("config/app"))
        .build()?;

    Ok(settings.try_deserialize()?)
}

pub fn load_farms_config() -> anyhow::Result<FarmsConfig> {
    let settings = config::Config::builder()
        .add_source(config::File::with_name("config/farms"))
        .build()?;

    Ok(settings.try_deserialize()?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_farms_config_deserializes() {
        let toml = r#"
            [[farms]]
            id = "frm_001"
            name = "Ben Ali Farm"
            location = "36.8,10.2"
            crop = "Tomato"

            [[farms]]
            id = "frm_002"
            name = "Nabeul Orchard"
            location = "Nabeul"
            crop = "Citrus"
        "#;

        let settings = config::Config::builder()
            .add_source(config::File::from_str(toml, config::FileFormat::Toml))
            .build()
            .unwrap();
        let farms: FarmsConfig = settings.try_deserialize().unwrap();

        assert_eq!(farms.farms.len(), 2);
        let farm = farms.farms[1].clone().into_farm();
        assert_eq!(farm.id, "frm_002");
        assert_eq!(farm.crop, "Citrus");
    }

    #[test]
    fn test_missing_farms_list_defaults_to_empty() {
        let settings = config::Config::builder()
            .add_source(config::File::from_str("", config::FileFormat::Toml))
            .build()
            .unwrap();
        let farms: FarmsConfig = settings.try_deserialize().unwrap();

        assert!(farms.farms.is_empty());
    }
}
