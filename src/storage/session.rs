//! Signed-in session persisted next to the cache.
//!
//! Token issuance happens elsewhere; this module only reads and writes the
//! `token`, `user`, `userId` and `userFullName` items.

use anyhow::Result;
use log::warn;
use serde::{Deserialize, Serialize};

use crate::constants::{SESSION_KEY_TOKEN, SESSION_KEY_USER, SESSION_KEY_USER_FULL_NAME, SESSION_KEY_USER_ID};
use crate::storage::LocalStorage;

/// Minimal profile of the signed-in user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionUser {
    #[serde(alias = "_id")]
    pub id: String,
    #[serde(default)]
    pub full_name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Session {
    pub token: Option<String>,
    pub user: Option<SessionUser>,
    pub user_id: Option<String>,
    pub user_full_name: Option<String>,
}

impl Session {
    /// Build a session for a freshly authenticated user.
    pub fn new(token: String, user: SessionUser) -> Self {
        Self {
            token: Some(token),
            user_id: Some(user.id.clone()),
            user_full_name: Some(user.full_name.clone()),
            user: Some(user),
        }
    }

    /// Read the session items. A corrupt `user` item is ignored.
    pub async fn load(storage: &LocalStorage) -> Result<Self> {
        let token = storage.get_item(SESSION_KEY_TOKEN).await?;
        let user = match storage.get_item(SESSION_KEY_USER).await? {
            Some(raw) => match serde_json::from_str::<SessionUser>(&raw) {
                Ok(user) => Some(user),
                Err(e) => {
                    warn!("⚠️  Ignoring unreadable stored user: {e}");
                    None
                }
            },
            None => None,
        };
        let user_id = storage.get_item(SESSION_KEY_USER_ID).await?;
        let user_full_name = storage.get_item(SESSION_KEY_USER_FULL_NAME).await?;

        Ok(Self {
            token,
            user_id: user_id.or_else(|| user.as_ref().map(|u| u.id.clone())),
            user_full_name: user_full_name.or_else(|| user.as_ref().map(|u| u.full_name.clone())),
            user,
        })
    }

    /// Persist every present field and remove absent ones.
    pub async fn save(&self, storage: &LocalStorage) -> Result<()> {
        let user_json = self.user.as_ref().map(serde_json::to_string).transpose()?;
        let items = [
            (SESSION_KEY_TOKEN, self.token.clone()),
            (SESSION_KEY_USER, user_json),
            (SESSION_KEY_USER_ID, self.user_id.clone()),
            (SESSION_KEY_USER_FULL_NAME, self.user_full_name.clone()),
        ];

        for (key, value) in items {
            match value {
                Some(value) => storage.set_item(key, &value).await?,
                None => {
                    storage.remove_item(key).await?;
                }
            }
        }
        Ok(())
    }

    /// Remove the session items (sign out).
    pub async fn clear(storage: &LocalStorage) -> Result<()> {
        for key in [SESSION_KEY_TOKEN, SESSION_KEY_USER, SESSION_KEY_USER_ID, SESSION_KEY_USER_FULL_NAME] {
            storage.remove_item(key).await?;
        }
        Ok(())
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.as_deref().is_some_and(|token| !token.is_empty())
    }

    pub fn is_admin(&self) -> bool {
        self.user.as_ref().and_then(|u| u.role.as_deref()) == Some("admin")
    }
}
