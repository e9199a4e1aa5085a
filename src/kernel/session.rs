//! Session and world state: which server is connected, who is logged in,
//! the server's user directory and mailbox.
//!
//! One [`SessionState`] value is the whole world model. Reads are
//! side-effect free; all mutation funnels through the `pub(crate)` methods
//! called by the lifecycle component (`connect`, `login`, `reset`), so a
//! command handler cannot half-update the session.

use crate::net::{MailMessage, ServerRecord, UserRecord};

/// Where the session stands in the connect/login state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    /// No server loaded. Only the boot sequence sees this phase.
    Disconnected,
    /// Connected under the server's default user.
    Anonymous,
    /// Connected with credentials, via `conectar user@addr` or `login`.
    Authenticated,
}

#[derive(Debug, Clone, Default)]
pub struct SessionState {
    server: Option<ServerRecord>,
    user: Option<UserRecord>,
    users: Vec<UserRecord>,
    mailbox: Vec<MailMessage>,
    authenticated: bool,
}

impl SessionState {
    pub fn new() -> Self {
        SessionState::default()
    }

    pub fn phase(&self) -> SessionPhase {
        match (&self.server, self.authenticated) {
            (None, _) => SessionPhase::Disconnected,
            (Some(_), false) => SessionPhase::Anonymous,
            (Some(_), true) => SessionPhase::Authenticated,
        }
    }

    pub fn is_connected(&self) -> bool {
        self.server.is_some()
    }

    pub fn current_server(&self) -> Option<&ServerRecord> {
        self.server.as_ref()
    }

    pub fn current_user(&self) -> Option<&UserRecord> {
        self.user.as_ref()
    }

    pub fn user_id(&self) -> Option<&str> {
        self.user.as_ref().map(|user| user.user_id.as_str())
    }

    pub fn user_directory(&self) -> &[UserRecord] {
        &self.users
    }

    pub fn mailbox(&self) -> &[MailMessage] {
        &self.mailbox
    }

    /// The mailbox as seen by the current user, recomputed on every call.
    /// Indices into this list are what `caixa` prints and `ler` accepts;
    /// they are not stable across reconnects.
    pub fn visible_mail(&self) -> Vec<&MailMessage> {
        let Some(user_id) = self.user_id() else {
            return Vec::new();
        };
        self.mailbox
            .iter()
            .filter(|mail| mail.is_addressed_to(user_id))
            .collect()
    }

    /// Bind an anonymous session to `server`'s default user. The caller
    /// guarantees the default user exists.
    pub(crate) fn connect_anonymous(&mut self, server: ServerRecord) {
        self.user = server.default_user.clone();
        self.server = Some(server);
        self.users = Vec::new();
        self.mailbox = Vec::new();
        self.authenticated = false;
    }

    /// Replace the whole world with an authenticated session.
    pub(crate) fn connect_authenticated(
        &mut self,
        server: ServerRecord,
        user: UserRecord,
        users: Vec<UserRecord>,
    ) {
        self.server = Some(server);
        self.user = Some(user);
        self.users = users;
        self.mailbox = Vec::new();
        self.authenticated = true;
    }

    /// Switch identity on the current server without refetching anything.
    pub(crate) fn login_as(&mut self, user: UserRecord) {
        self.user = Some(user);
        self.authenticated = true;
    }

    pub(crate) fn set_user_directory(&mut self, users: Vec<UserRecord>) {
        self.users = users;
    }

    pub(crate) fn set_mailbox(&mut self, mailbox: Vec<MailMessage>) {
        self.mailbox = mailbox;
    }

    /// Tear everything down. Logout is modeled as a full reset, never a
    /// partial one.
    pub(crate) fn reset(&mut self) {
        *self = SessionState::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn server(address: &str, default_user: Option<&str>) -> ServerRecord {
        serde_json::from_value(serde_json::json!({
            "serverAddress": address,
            "serverName": "Teste",
            "terminalID": "teste",
            "iconName": "icon.png",
            "defaultUser": default_user.map(|id| serde_json::json!({ "userId": id })),
        }))
        .unwrap()
    }

    fn user(id: &str) -> UserRecord {
        serde_json::from_value(serde_json::json!({ "userId": id })).unwrap()
    }

    fn mail(to: &[&str], title: &str) -> MailMessage {
        MailMessage {
            from: "anhanga".into(),
            to: to.iter().map(|s| s.to_string()).collect(),
            title: title.into(),
            body: "corpo".into(),
        }
    }

    #[test]
    fn phases_follow_the_lifecycle() {
        let mut session = SessionState::new();
        assert_eq!(session.phase(), SessionPhase::Disconnected);
        assert!(!session.is_connected());

        session.connect_anonymous(server("a.safenet", Some("visitante")));
        assert_eq!(session.phase(), SessionPhase::Anonymous);
        assert_eq!(session.user_id(), Some("visitante"));

        session.login_as(user("neo"));
        assert_eq!(session.phase(), SessionPhase::Authenticated);
        assert_eq!(session.user_id(), Some("neo"));

        session.reset();
        assert_eq!(session.phase(), SessionPhase::Disconnected);
        assert!(session.user_directory().is_empty());
        assert!(session.mailbox().is_empty());
    }

    #[test]
    fn connect_replaces_the_world_wholesale() {
        let mut session = SessionState::new();
        session.connect_authenticated(
            server("a.safenet", None),
            user("neo"),
            vec![user("neo"), user("trinity")],
        );
        session.set_mailbox(vec![mail(&["neo"], "um")]);

        session.connect_anonymous(server("b.safenet", Some("visitante")));
        assert_eq!(session.current_server().unwrap().address, "b.safenet");
        assert!(session.user_directory().is_empty());
        assert!(session.mailbox().is_empty());
        assert_eq!(session.phase(), SessionPhase::Anonymous);
    }

    #[test]
    fn visible_mail_filters_and_preserves_order() {
        let mut session = SessionState::new();
        session.connect_authenticated(server("a.safenet", None), user("neo"), vec![user("neo")]);
        session.set_mailbox(vec![
            mail(&["trinity"], "não é sua"),
            mail(&["neo", "trinity"], "primeira"),
            mail(&["neo"], "segunda"),
        ]);
        let visible = session.visible_mail();
        assert_eq!(visible.len(), 2);
        assert_eq!(visible[0].title, "primeira");
        assert_eq!(visible[1].title, "segunda");
    }

    #[test]
    fn visible_mail_is_empty_when_disconnected() {
        let session = SessionState::new();
        assert!(session.visible_mail().is_empty());
    }
}
