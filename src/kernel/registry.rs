//! The merged command registry: data-driven softwares plus builtins.
//!
//! The software side is loaded once at startup from a JSON mapping of
//! command name to descriptor. An explicit `null` value means the name is
//! reserved/disabled: it stays visible to the resolver (so it can shadow a
//! builtin) but can never run. Resolution is a tagged
//! [`RegistryEntry`], never a presence/null guessing game.
//!
//! Builtins are looked up under dot-to-underscore normalization, so a typed
//! command like `scan.exe` reaches a handler registered as `scan_exe`.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::errors::TermError;
use crate::kernel::session::SessionState;

/// Static output of a data-driven software: one line or several.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MessageText {
    One(String),
    Many(Vec<String>),
}

impl MessageText {
    pub fn lines(&self) -> Vec<String> {
        match self {
            MessageText::One(line) => vec![line.clone()],
            MessageText::Many(lines) => lines.clone(),
        }
    }
}

/// A data-driven command definition from the software registry file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SoftwareDescriptor {
    /// Static output; softwares without one must have a registered script.
    #[serde(default)]
    pub message: Option<MessageText>,
    /// Milliseconds between output lines.
    #[serde(default)]
    pub delayed: Option<u64>,
    /// Server addresses where the command exists. Absent = everywhere.
    #[serde(default)]
    pub location: Option<Vec<String>>,
    /// User ids allowed to see the command. Absent = everyone.
    #[serde(default)]
    pub protection: Option<Vec<String>>,
    /// Hidden from the `ajuda` listing.
    #[serde(rename = "secretCommand", default)]
    pub secret: bool,
    /// Clear the screen (and redraw the header) before output.
    #[serde(rename = "limpar", default)]
    pub clear: bool,
    /// Help text shown by `ajuda <name>`.
    #[serde(rename = "ajuda", default)]
    pub help: Option<String>,
}

impl SoftwareDescriptor {
    /// Access filter: visible iff no `location` restriction or the current
    /// server is listed, and no `protection` restriction or the current
    /// user is listed.
    fn visible_to(&self, session: &SessionState) -> bool {
        if let Some(locations) = &self.location {
            match session.current_server() {
                Some(server) if locations.iter().any(|a| *a == server.address) => {}
                _ => return false,
            }
        }
        if let Some(protection) = &self.protection {
            match session.user_id() {
                Some(user_id) if protection.iter().any(|u| u == user_id) => {}
                _ => return false,
            }
        }
        true
    }
}

/// Result of resolving a typed name against the software registry.
#[derive(Debug)]
pub enum RegistryEntry<'a> {
    /// Explicitly reserved: blocks same-named builtins, never runs.
    Disabled,
    /// A visible data-driven command.
    Custom(&'a SoftwareDescriptor),
    /// Not in the registry, or filtered out by access rules; builtins may
    /// still match.
    Absent,
}

/// The data-driven half of the command registry.
#[derive(Debug, Clone, Default)]
pub struct SoftwareRegistry {
    entries: BTreeMap<String, Option<SoftwareDescriptor>>,
}

impl SoftwareRegistry {
    pub fn empty() -> Self {
        SoftwareRegistry::default()
    }

    pub fn from_entries(entries: BTreeMap<String, Option<SoftwareDescriptor>>) -> Self {
        SoftwareRegistry { entries }
    }

    /// Load the registry file. This runs once at startup; failures here are
    /// bootstrap failures, not in-game ones.
    pub async fn load(path: impl AsRef<Path>) -> Result<Self, TermError> {
        let path = path.as_ref();
        let raw = tokio::fs::read(path).await.map_err(|err| {
            TermError::RemoteFetchFailed(format!("lendo {}: {err}", path.display()))
        })?;
        let entries = serde_json::from_slice(&raw).map_err(|err| {
            TermError::RemoteFetchFailed(format!("interpretando {}: {err}", path.display()))
        })?;
        Ok(SoftwareRegistry { entries })
    }

    /// Resolve `name` under the current session's access filters.
    pub fn resolve(&self, name: &str, session: &SessionState) -> RegistryEntry<'_> {
        match self.entries.get(name) {
            None => RegistryEntry::Absent,
            Some(None) => RegistryEntry::Disabled,
            Some(Some(descriptor)) if descriptor.visible_to(session) => {
                RegistryEntry::Custom(descriptor)
            }
            Some(Some(_)) => RegistryEntry::Absent,
        }
    }

    /// Names of visible, non-secret softwares, for the help listing.
    pub fn visible_names(&self, session: &SessionState) -> Vec<&str> {
        self.entries
            .iter()
            .filter_map(|(name, entry)| match entry {
                Some(descriptor) if descriptor.visible_to(session) && !descriptor.secret => {
                    Some(name.as_str())
                }
                _ => None,
            })
            .collect()
    }
}

/// The builtin ("native") command set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Builtin {
    Dumpdb,
    QuemSouEu,
    Limpar,
    Data,
    Intro,
    Ajuda,
    Login,
    Logout,
    Sair,
    Caixa,
    Ler,
    Ping,
    Conectar,
}

impl Builtin {
    pub const ALL: [Builtin; 13] = [
        Builtin::Dumpdb,
        Builtin::QuemSouEu,
        Builtin::Limpar,
        Builtin::Data,
        Builtin::Intro,
        Builtin::Ajuda,
        Builtin::Login,
        Builtin::Logout,
        Builtin::Sair,
        Builtin::Caixa,
        Builtin::Ler,
        Builtin::Ping,
        Builtin::Conectar,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Builtin::Dumpdb => "dumpdb",
            Builtin::QuemSouEu => "quemsoueu",
            Builtin::Limpar => "limpar",
            Builtin::Data => "data",
            Builtin::Intro => "intro",
            Builtin::Ajuda => "ajuda",
            Builtin::Login => "login",
            Builtin::Logout => "logout",
            Builtin::Sair => "sair",
            Builtin::Caixa => "caixa",
            Builtin::Ler => "ler",
            Builtin::Ping => "ping",
            Builtin::Conectar => "conectar",
        }
    }

    /// Hidden diagnostic commands stay out of the `ajuda` listing.
    pub fn hidden(self) -> bool {
        matches!(self, Builtin::Dumpdb)
    }

    /// Look up a builtin by its normalized name.
    pub fn lookup(normalized: &str) -> Option<Builtin> {
        Builtin::ALL
            .into_iter()
            .find(|builtin| builtin.name() == normalized)
    }
}

/// Map a typed command name onto the builtin namespace: the first `.`
/// becomes `_`, so `foo.bar` can be served by a `foo_bar` builtin.
pub fn normalize_name(name: &str) -> String {
    name.replacen('.', "_", 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::net::{ServerRecord, UserRecord};

    fn session_on(address: &str, user_id: &str) -> SessionState {
        let server: ServerRecord = serde_json::from_value(serde_json::json!({
            "serverAddress": address,
            "serverName": "Teste",
        }))
        .unwrap();
        let user: UserRecord =
            serde_json::from_value(serde_json::json!({ "userId": user_id })).unwrap();
        let mut session = SessionState::new();
        session.connect_authenticated(server, user, Vec::new());
        session
    }

    fn registry(json: &str) -> SoftwareRegistry {
        SoftwareRegistry::from_entries(serde_json::from_str(json).unwrap())
    }

    #[test]
    fn null_entries_resolve_as_disabled() {
        let reg = registry(r#"{ "telnet": null }"#);
        let session = session_on("a.safenet", "neo");
        assert!(matches!(
            reg.resolve("telnet", &session),
            RegistryEntry::Disabled
        ));
        assert!(matches!(reg.resolve("ssh", &session), RegistryEntry::Absent));
    }

    #[test]
    fn location_and_protection_filters_apply() {
        let reg = registry(
            r#"{
                "scan": { "message": "ok", "location": ["a.safenet"] },
                "root": { "message": "ok", "protection": ["admin"] },
                "both": { "message": "ok", "location": ["a.safenet"], "protection": ["neo"] }
            }"#,
        );
        let session = session_on("a.safenet", "neo");
        assert!(matches!(
            reg.resolve("scan", &session),
            RegistryEntry::Custom(_)
        ));
        assert!(matches!(reg.resolve("root", &session), RegistryEntry::Absent));
        assert!(matches!(
            reg.resolve("both", &session),
            RegistryEntry::Custom(_)
        ));

        let elsewhere = session_on("b.safenet", "neo");
        assert!(matches!(
            reg.resolve("scan", &elsewhere),
            RegistryEntry::Absent
        ));
        assert!(matches!(
            reg.resolve("both", &elsewhere),
            RegistryEntry::Absent
        ));
    }

    #[test]
    fn disconnected_sessions_fail_location_restrictions() {
        let reg = registry(r#"{ "scan": { "message": "ok", "location": ["a.safenet"] } }"#);
        let session = SessionState::new();
        assert!(matches!(reg.resolve("scan", &session), RegistryEntry::Absent));
    }

    #[test]
    fn visible_names_skip_secret_and_disabled() {
        let reg = registry(
            r#"{
                "telnet": null,
                "backdoor": { "message": "...", "secretCommand": true },
                "scan": { "message": "ok" }
            }"#,
        );
        let session = session_on("a.safenet", "neo");
        assert_eq!(reg.visible_names(&session), vec!["scan"]);
    }

    #[test]
    fn dotted_names_reach_builtins() {
        assert_eq!(normalize_name("foo.bar"), "foo_bar");
        assert_eq!(normalize_name("plain"), "plain");
        // Only the first dot is namespace syntax.
        assert_eq!(normalize_name("a.b.c"), "a_b.c");
        assert_eq!(Builtin::lookup("caixa"), Some(Builtin::Caixa));
        assert_eq!(Builtin::lookup("nada"), None);
    }

    #[test]
    fn message_text_accepts_both_shapes() {
        let one: MessageText = serde_json::from_str(r#""linha""#).unwrap();
        let many: MessageText = serde_json::from_str(r#"["um", "dois"]"#).unwrap();
        assert_eq!(one.lines(), vec!["linha"]);
        assert_eq!(many.lines(), vec!["um", "dois"]);
    }
}
