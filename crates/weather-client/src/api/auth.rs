//! Authentication endpoints.

use common::ClientError;
use serde::Serialize;

use super::client::{ApiClient, Method};

#[derive(Serialize)]
struct Credentials<'a> {
    username: &'a str,
    password: &'a str,
}

/// Login and registration, both POSTed under the auth path.
#[derive(Clone, Debug)]
pub struct AuthService {
    client: ApiClient,
    auth_path: String,
}

impl AuthService {
    pub fn new(client: ApiClient, auth_path: &str) -> Self {
        Self {
            client,
            auth_path: auth_path.trim_matches('/').to_owned(),
        }
    }

    /// Authenticate and return the decrypted session payload.
    pub async fn login(
        &self,
        username: &str,
        password: &str,
    ) -> Result<serde_json::Value, ClientError> {
        self.send("login.php", username, password).await
    }

    /// Create an account and return the decrypted result.
    pub async fn register(
        &self,
        username: &str,
        password: &str,
    ) -> Result<serde_json::Value, ClientError> {
        self.send("register.php", username, password).await
    }

    async fn send(
        &self,
        endpoint: &str,
        username: &str,
        password: &str,
    ) -> Result<serde_json::Value, ClientError> {
        let credentials = Credentials { username, password };
        self.client
            .call(&self.endpoint(endpoint), &credentials, Method::Post)
            .await
    }

    fn endpoint(&self, name: &str) -> String {
        if self.auth_path.is_empty() {
            name.to_owned()
        } else {
            format!("{}/{name}", self.auth_path)
        }
    }
}
