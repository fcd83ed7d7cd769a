//! SeaTalk Open API HTTP client.

use std::time::Duration;

use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::Serialize;

use dutybot_config::SeaTalkConfig;

use crate::error::{Result, SeaTalkError};
use crate::token::AccessToken;
use crate::types::{
    ApiErrorBody, SendGroupMessage, SendMessageResponse, SendSubscriberMessage, TokenRequest,
    TokenResponse,
};

/// HTTP client for the SeaTalk Open API.
pub struct SeaTalkApi {
    client: Client,
    app_id: String,
    app_secret: String,
    auth_url: String,
    single_chat_url: String,
    group_chat_url: String,
}

impl SeaTalkApi {
    /// Create a client from the configured app credentials and endpoints.
    pub fn new(config: &SeaTalkConfig) -> Result<Self> {
        Self::from_parts(
            &config.app_id,
            &config.app_secret,
            &config.auth_endpoint(),
            &config.single_chat_endpoint(),
            &config.group_chat_endpoint(),
        )
    }

    pub fn from_parts(
        app_id: &str,
        app_secret: &str,
        auth_url: &str,
        single_chat_url: &str,
        group_chat_url: &str,
    ) -> Result<Self> {
        let client = Client::builder().timeout(Duration::from_secs(30)).build()?;
        Ok(Self {
            client,
            app_id: app_id.to_string(),
            app_secret: app_secret.to_string(),
            auth_url: auth_url.to_string(),
            single_chat_url: single_chat_url.to_string(),
            group_chat_url: group_chat_url.to_string(),
        })
    }

    /// Request a new app access token.
    pub async fn fetch_token(&self) -> Result<AccessToken> {
        let resp = self
            .client
            .post(&self.auth_url)
            .json(&TokenRequest {
                app_id: &self.app_id,
                app_secret: &self.app_secret,
            })
            .send()
            .await?;

        if !resp.status().is_success() {
            return Err(SeaTalkError::Status {
                status: resp.status().as_u16(),
            });
        }

        let body: TokenResponse = resp.json().await.map_err(SeaTalkError::Decode)?;
        if body.code != 0 {
            return Err(SeaTalkError::Api {
                code: body.code,
                message: "failed to get token".into(),
            });
        }

        // An unrepresentable expiry is treated as already expired.
        let expires_at = DateTime::from_timestamp(body.expire, 0).unwrap_or_else(Utc::now);
        Ok(AccessToken::new(body.app_access_token, expires_at))
    }

    /// Send a message to a group chat the bot is in.
    pub async fn send_to_group(
        &self,
        token: &AccessToken,
        params: &SendGroupMessage,
    ) -> Result<SendMessageResponse> {
        self.post_message(&self.group_chat_url, token, params).await
    }

    /// Send a 1:1 message to a bot subscriber.
    pub async fn send_to_subscriber(
        &self,
        token: &AccessToken,
        params: &SendSubscriberMessage,
    ) -> Result<SendMessageResponse> {
        self.post_message(&self.single_chat_url, token, params)
            .await
    }

    async fn post_message<T: Serialize>(
        &self,
        url: &str,
        token: &AccessToken,
        params: &T,
    ) -> Result<SendMessageResponse> {
        let resp = self
            .client
            .post(url)
            .bearer_auth(&token.value)
            .json(params)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            return match resp.json::<ApiErrorBody>().await {
                Ok(body) => Err(SeaTalkError::Api {
                    code: body.code,
                    message: body.message,
                }),
                Err(_) => Err(SeaTalkError::Status {
                    status: status.as_u16(),
                }),
            };
        }

        let body: SendMessageResponse = resp.json().await.map_err(SeaTalkError::Decode)?;
        if body.code != 0 {
            return Err(SeaTalkError::Api {
                code: body.code,
                message: "send message rejected".into(),
            });
        }
        Ok(body)
    }
}
