//! Authenticated session
//!
//! A session pairs an API client with the token it was built from and the
//! login the token belongs to. Workflow edits reuse the token for cloning.

use crate::error::{ManagerError, Result};
use crate::prompt::Prompter;
use gh_client::{GitHubClient, TokenResolver};
use std::fmt;
use std::sync::Arc;

pub struct Session {
    client: Arc<dyn GitHubClient>,
    token: String,
    username: String,
}

impl Session {
    /// Verify the token by asking who it belongs to
    pub async fn authenticate(client: Arc<dyn GitHubClient>, token: String) -> Result<Self> {
        let username = client
            .authenticated_user()
            .await
            .map_err(|e| ManagerError::Authentication(format!("{:#}", e)))?;

        log::info!("Authenticated as {}", username);
        Ok(Self {
            client,
            token,
            username,
        })
    }

    pub fn client(&self) -> &dyn GitHubClient {
        self.client.as_ref()
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    pub fn username(&self) -> &str {
        &self.username
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("username", &self.username)
            .field("token", &"***")
            .finish()
    }
}

/// Find a token, asking the user when none is configured
pub async fn resolve_token(
    prompter: &mut dyn Prompter,
    resolver: &TokenResolver,
) -> Result<String> {
    if let Some(token) = resolver.get_token(None).await {
        return Ok(token);
    }

    log::debug!("No token configured, asking the user");
    let token = prompter.secret("Please enter your GitHub access token")?;
    let token = token.trim().to_string();
    if token.is_empty() {
        return Err(ManagerError::Authentication("no token entered".to_string()));
    }
    Ok(token)
}

/// Resolve a token, build the API client and verify the credentials
pub async fn bootstrap(prompter: &mut dyn Prompter, resolver: &TokenResolver) -> Result<Session> {
    prompter.print("🔐  Please configure credentials and configuration")?;

    let token = resolve_token(prompter, resolver).await?;
    let client = gh_client::build_client(&token, None)
        .map_err(|e| ManagerError::Authentication(format!("{:#}", e)))?;

    Session::authenticate(Arc::new(client), token).await
}
