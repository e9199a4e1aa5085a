//! Network records and the fetcher that loads them.
//!
//! Every connectable server lives under `<network_dir>/<address>/` as three
//! JSON documents: `manifest.json` (the server itself), `userlist.json` (its
//! user directory) and `mailserver.json` (its mailbox). The field names keep
//! the camelCase of the game's data files so existing content loads as-is.
//!
//! [`Network`] is the only component that touches the filesystem at runtime.
//! Fetch failures are deliberately collapsed into
//! [`TermError::AddressNotFound`]: from inside the fiction there is no
//! difference between a dead address and a broken one.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use log::debug;
use serde::{Deserialize, Serialize};

use crate::errors::TermError;

/// A connected endpoint, as described by its `manifest.json`.
///
/// Immutable once loaded; a (re)connect replaces the whole record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerRecord {
    #[serde(rename = "serverAddress")]
    pub address: String,
    #[serde(rename = "serverName")]
    pub name: String,
    /// User bound to anonymous sessions, when the server allows them.
    #[serde(rename = "defaultUser", default)]
    pub default_user: Option<UserRecord>,
    #[serde(rename = "terminalID", default)]
    pub terminal_id: String,
    #[serde(rename = "iconName", default)]
    pub icon_name: String,
    #[serde(rename = "iconClass", default)]
    pub icon_class: Option<String>,
    /// Opaque extra header payload, rendered verbatim.
    #[serde(rename = "headerExtraHTML", default)]
    pub header_extra: Option<String>,
    /// Seed history for the terminal widget; parsed but unused here, the
    /// widget owns history.
    #[serde(rename = "initialHistory", default)]
    pub initial_history: Option<Vec<String>>,
    /// In-game date overrides for the header and the `data` command.
    #[serde(default)]
    pub day: Option<u32>,
    #[serde(default)]
    pub month: Option<u32>,
    #[serde(default)]
    pub year: Option<i32>,
    #[serde(default)]
    pub reference: Option<String>,
}

/// One entry of a server's user directory.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserRecord {
    #[serde(rename = "userId")]
    pub user_id: String,
    /// Empty or absent means the account is open.
    #[serde(default)]
    pub password: Option<String>,
    /// Arbitrary profile fields, kept for `dumpdb` and story content.
    #[serde(flatten)]
    pub profile: BTreeMap<String, serde_json::Value>,
}

impl UserRecord {
    /// Whether `candidate` unlocks this account. Accounts with an empty or
    /// absent password accept anything.
    pub fn accepts_password(&self, candidate: &str) -> bool {
        match self.password.as_deref() {
            None | Some("") => true,
            Some(stored) => stored == candidate,
        }
    }
}

/// One mailbox entry. `to` is a recipient list of user ids.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MailMessage {
    pub from: String,
    pub to: Vec<String>,
    pub title: String,
    /// Paragraphs are delimited by a double space, as in the game data.
    pub body: String,
}

impl MailMessage {
    pub fn is_addressed_to(&self, user_id: &str) -> bool {
        self.to.iter().any(|recipient| recipient == user_id)
    }

    /// Body split into display paragraphs.
    pub fn paragraphs(&self) -> Vec<String> {
        self.body.split("  ").map(str::to_string).collect()
    }
}

/// Loads server manifests, user directories and mailboxes from the network
/// data tree.
#[derive(Debug, Clone)]
pub struct Network {
    base_dir: PathBuf,
}

impl Network {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Network {
            base_dir: base_dir.into(),
        }
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Fetch the manifest for `address`. Any failure (missing directory,
    /// unreadable file, bad JSON) reads as "address not found".
    pub async fn manifest(&self, address: &str) -> Result<ServerRecord, TermError> {
        self.fetch(address, "manifest.json").await
    }

    /// Fetch the user directory for `address`.
    pub async fn userlist(&self, address: &str) -> Result<Vec<UserRecord>, TermError> {
        self.fetch(address, "userlist.json").await
    }

    /// Fetch the mailbox for `address`.
    pub async fn mailbox(&self, address: &str) -> Result<Vec<MailMessage>, TermError> {
        self.fetch(address, "mailserver.json").await
    }

    async fn fetch<T: serde::de::DeserializeOwned>(
        &self,
        address: &str,
        file: &str,
    ) -> Result<T, TermError> {
        let path = self.base_dir.join(address).join(file);
        let raw = tokio::fs::read(&path).await.map_err(|err| {
            debug!("fetch {} failed: {err}", path.display());
            TermError::AddressNotFound(address.to_string())
        })?;
        serde_json::from_slice(&raw).map_err(|err| {
            debug!("parse {} failed: {err}", path.display());
            TermError::AddressNotFound(address.to_string())
        })
    }
}
