//! Weather lookup and search history endpoints.

use common::ClientError;
use serde::Serialize;
use serde_json::json;

use super::client::{ApiClient, Method};

#[derive(Serialize)]
struct WeatherQuery<'a> {
    city: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    user_id: Option<u64>,
}

#[derive(Clone, Debug)]
pub struct WeatherService {
    client: ApiClient,
}

impl WeatherService {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// Current weather for `city`, optionally recorded against `user_id`.
    pub async fn get_weather(
        &self,
        city: &str,
        user_id: Option<u64>,
    ) -> Result<serde_json::Value, ClientError> {
        let query = WeatherQuery { city, user_id };
        self.client.call("index.php", &query, Method::Post).await
    }

    /// All recorded searches.
    ///
    /// Sent as a GET with a sealed empty object; the server decides what, if
    /// anything, to read from it.
    pub async fn search_history(&self) -> Result<serde_json::Value, ClientError> {
        self.client.call("history.php", &json!({}), Method::Get).await
    }
}
