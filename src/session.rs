use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf};

use crate::config::config_dir;
use crate::stories::User;

/// Login remembered between runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub username: String,
    pub token: String,
}

impl Session {
    pub fn from_user(user: &User) -> Self {
        Self {
            username: user.username.clone(),
            token: user.login_token.clone(),
        }
    }
}

pub struct SessionStore {
    path: Option<PathBuf>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self {
            path: config_dir().map(|d| d.join("session.json")),
        }
    }

    #[cfg(test)]
    pub(crate) fn at(path: PathBuf) -> Self {
        Self { path: Some(path) }
    }

    /// Missing or unreadable files mean "logged out".
    pub fn load(&self) -> Option<Session> {
        let path = self.path.as_ref()?;
        let contents = fs::read_to_string(path).ok()?;
        serde_json::from_str(&contents).ok()
    }

    pub fn save(&self, session: &Session) -> Result<()> {
        let Some(path) = &self.path else { return Ok(()) };
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(session)?;
        fs::write(path, json).with_context(|| format!("failed to write {}", path.display()))
    }

    pub fn clear(&self) -> Result<()> {
        match &self.path {
            Some(path) if path.is_file() => fs::remove_file(path)
                .with_context(|| format!("failed to remove {}", path.display())),
            _ => Ok(()),
        }
    }
}
