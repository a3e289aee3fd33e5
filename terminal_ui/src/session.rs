use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use reqwest::Method;
use taskdeck_shared::User;
use tracing::{debug, info, instrument, warn};

use crate::error::Result;
use crate::http::ApiClient;

pub const SESSION_FILE_NAME: &str = "session";

/// Access to the externally issued session.
#[async_trait]
pub trait SessionProvider: Send + Sync {
    fn auth_token(&self) -> Option<String>;

    /// Resolves the user owning `token`. `Ok(None)` means the session is not
    /// valid anymore.
    async fn user_from_server(&self, token: &str) -> Result<Option<User>>;

    fn logout(&self);
}

/// Session backed by a token file in the data directory. A token given on
/// the command line takes precedence over the stored one.
#[derive(Debug, Clone)]
pub struct FileSession {
    path: PathBuf,
    override_token: Option<String>,
    client: ApiClient,
}

impl FileSession {
    pub fn new(data_dir: &Path, client: ApiClient) -> Self {
        Self {
            path: data_dir.join(SESSION_FILE_NAME),
            override_token: None,
            client,
        }
    }

    pub fn with_override_token(mut self, token: Option<String>) -> Self {
        self.override_token = token.filter(|t| !t.trim().is_empty());
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    #[instrument(skip(self, token), fields(path = %self.path.display()))]
    pub fn store_token(&self, token: &str) -> io::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, token.trim())?;
        info!("session token stored");
        Ok(())
    }

    fn read_stored_token(&self) -> Option<String> {
        match fs::read_to_string(&self.path) {
            Ok(contents) => {
                let token = contents.trim();
                (!token.is_empty()).then(|| token.to_string())
            }
            Err(err) if err.kind() == io::ErrorKind::NotFound => None,
            Err(err) => {
                warn!(path = %self.path.display(), error = %err, "failed to read session file");
                None
            }
        }
    }
}

#[async_trait]
impl SessionProvider for FileSession {
    fn auth_token(&self) -> Option<String> {
        self.override_token
            .clone()
            .or_else(|| self.read_stored_token())
    }

    #[instrument(skip_all)]
    async fn user_from_server(&self, token: &str) -> Result<Option<User>> {
        self.client.set_token(Some(token.to_string()));
        let request = self.client.request::<()>(Method::GET, "auth/me", &[], None)?;
        match self.client.send_json::<User>(request).await {
            Ok(user) => {
                debug!(user_id = user.id, "session resolved");
                Ok(Some(user))
            }
            Err(err) if err.is_unauthorized() => {
                info!(status = ?err.status(), "session rejected by server");
                self.client.set_token(None);
                Ok(None)
            }
            Err(err) => Err(err),
        }
    }

    #[instrument(skip(self), fields(path = %self.path.display()))]
    fn logout(&self) {
        self.client.set_token(None);
        match fs::remove_file(&self.path) {
            Ok(()) => info!("session cleared"),
            Err(err) if err.kind() == io::ErrorKind::NotFound => debug!("no stored session"),
            Err(err) => warn!(error = %err, "failed to remove session file"),
        }
    }
}
