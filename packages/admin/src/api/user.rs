use common::user::{CreateUserRequest, SignInRequest, SignInResponse, UserResponse};

use crate::client::ApiClient;
use crate::error::ApiError;

impl ApiClient {
    pub async fn create_user(&self, payload: &CreateUserRequest) -> Result<UserResponse, ApiError> {
        self.send(self.client.post(self.url("/user/create")).json(payload))
            .await
    }

    /// Sign in and keep the returned token for subsequent calls.
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<SignInResponse, ApiError> {
        let payload = SignInRequest {
            email: email.to_string(),
            password: password.to_string(),
        };
        let response: SignInResponse = self
            .send(self.client.post(self.url("/user/sign-in")).json(&payload))
            .await?;

        self.set_token(Some(response.user.token.clone())).await;
        tracing::debug!(user_id = %response.user.id, "Signed in");
        Ok(response)
    }

    /// Ask the server who the stored token belongs to.
    pub async fn is_auth(&self) -> Result<UserResponse, ApiError> {
        if self.token().await.is_none() {
            return Err(ApiError::new("Invalid token!"));
        }
        let request = self.client.get(self.url("/user/is-auth"));
        self.send(self.authorized(request).await).await
    }

    pub async fn sign_out(&self) {
        self.set_token(None).await;
    }
}
