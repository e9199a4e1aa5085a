//! Session lifecycle: the connect/login/logout state machine.
//!
//! Transitions between `Disconnected`, anonymous and authenticated sessions
//! all live here; nothing else mutates [`crate::kernel::session::SessionState`].

use log::{info, warn};

use crate::errors::TermError;
use crate::kernel::output::Reply;
use crate::kernel::Kernel;

/// Split `user` or `user:password` credentials. More than one colon is a
/// syntax error; a missing password is an empty one.
pub fn split_credentials(creds: &str) -> Result<(String, String), TermError> {
    if !creds.contains(':') {
        return Ok((creds.to_string(), String::new()));
    }
    let mut parts = creds.split(':');
    let user = parts.next().unwrap_or_default();
    let password = parts.next().unwrap_or_default();
    if parts.next().is_some() {
        return Err(TermError::InvalidCredentialSyntax);
    }
    Ok((user.to_string(), password.to_string()))
}

impl Kernel {
    /// Connect to `address`, replacing the whole session on success.
    ///
    /// Without a username the server's default user is used, if it has one;
    /// the user directory and mailbox are then loaded best-effort (a failed
    /// load is logged, never aborts the connect). With a username the
    /// directory load is mandatory and credentials are checked against it.
    pub async fn connect_to_server(
        &mut self,
        address: &str,
        username: Option<&str>,
        password: &str,
    ) -> Result<Reply, TermError> {
        if let Some(server) = self.session.current_server() {
            if server.address == address {
                return Err(TermError::AlreadyConnected(address.to_string()));
            }
        }
        let manifest = self.network.manifest(address).await?;

        match username {
            None if manifest.default_user.is_some() => {
                let server_address = manifest.address.clone();
                self.session.connect_anonymous(manifest);
                match self.network.userlist(&server_address).await {
                    Ok(users) => self.session.set_user_directory(users),
                    Err(err) => warn!("userlist load failed for {server_address}: {err}"),
                }
                match self.network.mailbox(&server_address).await {
                    Ok(mailbox) => self.session.set_mailbox(mailbox),
                    Err(err) => warn!("mailbox load failed for {server_address}: {err}"),
                }
                info!("anonymous session on {server_address}");
                Ok(self.header_reply(Some(
                    "Usuário anônimo detectado; caso seja novo aqui, use o comando 'intro' \
                     para mais informações.",
                )))
            }
            Some(username) => {
                let users = self
                    .network
                    .userlist(&manifest.address)
                    .await
                    .map_err(|_| TermError::AddressNotFound(address.to_string()))?;
                let user = users
                    .iter()
                    .find(|user| user.user_id == username)
                    .cloned()
                    .ok_or_else(|| TermError::UnknownUser(username.to_string()))?;
                if !user.accepts_password(password) {
                    return Err(TermError::InvalidPassword(username.to_string()));
                }
                let server_address = manifest.address.clone();
                self.session.connect_authenticated(manifest, user, users);
                match self.network.mailbox(&server_address).await {
                    Ok(mailbox) => self.session.set_mailbox(mailbox),
                    Err(err) => warn!("mailbox load failed for {server_address}: {err}"),
                }
                info!("{username} connected to {server_address}");
                Ok(self.header_reply(Some("Connection successful")))
            }
            None => Err(TermError::ServerRequiresUsername(address.to_string())),
        }
    }

    /// Authenticate against the current server's user directory without
    /// refetching anything.
    pub async fn login(&mut self, creds: &str) -> Result<Reply, TermError> {
        let (username, password) = split_credentials(creds)?;
        if username.is_empty() {
            return Err(TermError::UsernameEmpty);
        }
        let user = self
            .session
            .user_directory()
            .iter()
            .find(|user| user.user_id == username)
            .cloned()
            .ok_or_else(|| TermError::UnknownUser(username.clone()))?;
        if !user.accepts_password(&password) {
            return Err(TermError::InvalidPassword(username));
        }
        info!("login as {}", user.user_id);
        self.session.login_as(user);
        Ok(self.header_reply(Some("Login successful")))
    }

    /// Tear everything down to the Disconnected shape: no server, no user,
    /// empty directory and mailbox. Never a partial teardown.
    pub fn disconnect(&mut self) {
        info!("session reset");
        self.session.reset();
    }

    /// `logout`/`sair`: full reset, then land back on the boot server, the
    /// same place the terminal starts on. Equivalent to rebooting the
    /// terminal.
    pub async fn logout(&mut self) -> Result<Reply, TermError> {
        self.disconnect();
        self.boot().await
    }
}

#[cfg(test)]
mod tests {
    use super::split_credentials;
    use crate::errors::TermError;

    #[test]
    fn splits_user_and_password() {
        assert_eq!(
            split_credentials("neo:redpill").unwrap(),
            ("neo".to_string(), "redpill".to_string())
        );
        assert_eq!(
            split_credentials("neo").unwrap(),
            ("neo".to_string(), String::new())
        );
        assert_eq!(
            split_credentials(":senha").unwrap(),
            (String::new(), "senha".to_string())
        );
    }

    #[test]
    fn rejects_extra_colons() {
        assert_eq!(
            split_credentials("a:b:c").unwrap_err(),
            TermError::InvalidCredentialSyntax
        );
    }
}
