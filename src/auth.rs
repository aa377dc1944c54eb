use thiserror::Error;

use crate::config::Credentials;

/// Shown after a successful login.
pub const LOGIN_SUCCESS_MESSAGE: &str = "Login realizado com sucesso!";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("Usuário ou senha incorretos.")]
    InvalidCredentials,
}

// ---------------------------------------------------------------------------
// AccessGate – the single credential comparison
// ---------------------------------------------------------------------------

/// Holds the one accepted credential pair.
#[derive(Debug, Clone)]
pub struct AccessGate {
    expected: Credentials,
}

impl AccessGate {
    pub fn new(expected: Credentials) -> Self {
        Self { expected }
    }

    /// Compare a submitted pair against the expected one.
    pub fn check(&self, username: &str, password: &str) -> Result<(), AuthError> {
        if username == self.expected.username && password == self.expected.password {
            Ok(())
        } else {
            Err(AuthError::InvalidCredentials)
        }
    }
}

// ---------------------------------------------------------------------------
// Session – authentication result passed to every page
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default)]
pub struct Session {
    user: Option<String>,
}

impl Session {
    /// Open the session if the gate accepts the pair; otherwise leave it closed.
    pub fn login(
        &mut self,
        gate: &AccessGate,
        username: &str,
        password: &str,
    ) -> Result<(), AuthError> {
        match gate.check(username, password) {
            Ok(()) => {
                log::info!("User '{username}' logged in");
                self.user = Some(username.to_string());
                Ok(())
            }
            Err(e) => {
                log::warn!("Rejected login attempt for '{username}'");
                Err(e)
            }
        }
    }

    pub fn logout(&mut self) {
        if let Some(user) = self.user.take() {
            log::info!("User '{user}' logged out");
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }

    pub fn user(&self) -> Option<&str> {
        self.user.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gate() -> AccessGate {
        AccessGate::new(Credentials::default())
    }

    #[test]
    fn test_expected_pair_opens_session() {
        let mut session = Session::default();
        assert!(!session.is_authenticated());

        session.login(&gate(), "admin", "1234").unwrap();
        assert!(session.is_authenticated());
        assert_eq!(session.user(), Some("admin"));
    }

    #[test]
    fn test_other_pairs_keep_session_closed() {
        let mut session = Session::default();
        for (user, pass) in [("admin", "12345"), ("Admin", "1234"), ("", ""), ("root", "1234")] {
            let err = session.login(&gate(), user, pass).unwrap_err();
            assert_eq!(err, AuthError::InvalidCredentials);
            assert_eq!(err.to_string(), "Usuário ou senha incorretos.");
            assert!(!session.is_authenticated());
        }
    }

    #[test]
    fn test_configured_pair_replaces_default() {
        let gate = AccessGate::new(Credentials {
            username: "operador".to_string(),
            password: "areia".to_string(),
        });
        assert!(gate.check("admin", "1234").is_err());
        assert!(gate.check("operador", "areia").is_ok());
    }

    #[test]
    fn test_logout_closes_session() {
        let mut session = Session::default();
        session.login(&gate(), "admin", "1234").unwrap();
        session.logout();
        assert!(!session.is_authenticated());
    }
}
