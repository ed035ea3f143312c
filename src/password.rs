// SPDX-FileCopyrightText: 2026 Noah Fontes
//
// SPDX-License-Identifier: Apache-2.0

use async_trait::async_trait;
use secrecy::SecretString;
use tokio::task;

use crate::{
    error::{self, Result},
    metadata,
};

#[async_trait]
pub(crate) trait Prompt: Send + Sync {
    async fn prompt(&self, username: &str) -> Result<Option<SecretString>>;
}

#[async_trait]
impl<T: Prompt + ?Sized> Prompt for Box<T> {
    async fn prompt(&self, username: &str) -> Result<Option<SecretString>> {
        (**self).prompt(username).await
    }
}

#[async_trait]
impl<T: Prompt> Prompt for Vec<T> {
    async fn prompt(&self, username: &str) -> Result<Option<SecretString>> {
        for candidate in self {
            if let r @ (Ok(Some(_)) | Err(_)) = candidate.prompt(username).await {
                return r;
            }
        }

        Ok(None)
    }
}

/// Asks each prompt in turn until one produces a password.
pub(crate) async fn require<P: Prompt + ?Sized>(prompt: &P, username: &str) -> Result<SecretString> {
    prompt
        .prompt(username)
        .await?
        .ok_or_else(|| error::Password::NoPrompt.into())
}

/// A password supplied up front, e.g. from the command line or environment.
pub(crate) struct Fixed(Option<SecretString>);

impl Fixed {
    pub(crate) const fn new(password: Option<SecretString>) -> Self {
        Self(password)
    }
}

#[async_trait]
impl Prompt for Fixed {
    async fn prompt(&self, _username: &str) -> Result<Option<SecretString>> {
        Ok(self.0.clone())
    }
}

pub(crate) struct RpasswordPrompt;

#[async_trait]
impl Prompt for RpasswordPrompt {
    async fn prompt(&self, username: &str) -> Result<Option<SecretString>> {
        let message = format!(
            "{} password for {}: ",
            *metadata::CLIENT_DISPLAY_NAME,
            username
        );

        Ok(Some(
            task::spawn_blocking(move || rpassword::prompt_password(message).map(SecretString::new))
                .await??,
        ))
    }
}
