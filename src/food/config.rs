use crate::config::{ConfigError, ProviderConfig};

#[derive(Debug, Clone)]
pub struct FoodConfig {
    pub spoonacular_api_key: String,
    pub spoonacular_api_url: String,
    pub food_data_api_key: String,
    pub food_data_api_url: String,
}

impl FoodConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let spoonacular = ProviderConfig::from_env("spoonacular");
        let food_data = ProviderConfig::from_env("food_data");

        Ok(Self {
            spoonacular_api_key: spoonacular.require_key("spoonacular")?,
            spoonacular_api_url: spoonacular.api_url,
            food_data_api_key: food_data.require_key("food_data")?,
            food_data_api_url: food_data.api_url,
        })
    }
}
