//! Local login session
//!
//! A cosmetic credential screen: "key material" is random hex the player can
//! keep or replace with their own. The identity is an opaque token - nothing
//! cryptographic is verified, and no server is involved. Any well-formed
//! token is accepted; the only user-visible failure is malformed material.

use rand::RngCore;

use crate::consts::KEY_MATERIAL_LEN;
use crate::store::{self, keys};

/// Why supplied key material was rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginError {
    Empty,
    /// Contains non-hex characters
    MalformedHex,
    WrongLength { expected: usize, got: usize },
}

impl std::fmt::Display for LoginError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LoginError::Empty => write!(f, "Key material is empty"),
            LoginError::MalformedHex => write!(f, "Key material must be hex encoded"),
            LoginError::WrongLength { expected, got } => {
                write!(f, "Key material must be {expected} hex characters (got {got})")
            }
        }
    }
}

/// Current session identity, mirrored to LocalStorage
#[derive(Debug, Clone, Default)]
pub struct Session {
    identity: Option<String>,
}

impl Session {
    /// Restore any identity persisted from a previous visit
    pub fn load() -> Self {
        let identity = store::load_string(keys::SESSION_IDENTITY);
        if identity.is_some() {
            log::info!("Restored session identity");
        }
        Self { identity }
    }

    pub fn is_logged_in(&self) -> bool {
        self.identity.is_some()
    }

    pub fn identity(&self) -> Option<&str> {
        self.identity.as_deref()
    }

    /// Generate fresh key material (hex token) for the login screen
    pub fn generate_key_material() -> String {
        let mut bytes = [0u8; KEY_MATERIAL_LEN / 2];
        rand::rng().fill_bytes(&mut bytes);
        let mut hex = String::with_capacity(KEY_MATERIAL_LEN);
        for b in bytes {
            hex.push_str(&format!("{b:02x}"));
        }
        hex
    }

    /// Log in with the given key material. Validates encoding only; the token
    /// is never proven to belong to anyone.
    pub fn login(&mut self, material: &str) -> Result<(), LoginError> {
        let material = material.trim();
        if material.is_empty() {
            return Err(LoginError::Empty);
        }
        if !material.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(LoginError::MalformedHex);
        }
        if material.len() != KEY_MATERIAL_LEN {
            return Err(LoginError::WrongLength {
                expected: KEY_MATERIAL_LEN,
                got: material.len(),
            });
        }
        let token = material.to_lowercase();
        store::save_string(keys::SESSION_IDENTITY, &token);
        self.identity = Some(token);
        log::info!("Logged in");
        Ok(())
    }

    pub fn logout(&mut self) {
        self.identity = None;
        store::remove(keys::SESSION_IDENTITY);
        log::info!("Logged out");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_material_logs_in() {
        let material = Session::generate_key_material();
        assert_eq!(material.len(), KEY_MATERIAL_LEN);

        let mut session = Session::default();
        assert!(session.login(&material).is_ok());
        assert!(session.is_logged_in());
        assert_eq!(session.identity(), Some(material.as_str()));
    }

    #[test]
    fn malformed_material_is_rejected() {
        let mut session = Session::default();
        assert_eq!(session.login("   "), Err(LoginError::Empty));
        assert_eq!(
            session.login(&"zz".repeat(KEY_MATERIAL_LEN / 2)),
            Err(LoginError::MalformedHex)
        );
        assert_eq!(
            session.login("abc123"),
            Err(LoginError::WrongLength {
                expected: KEY_MATERIAL_LEN,
                got: 6
            })
        );
        assert!(!session.is_logged_in());
    }

    #[test]
    fn uppercase_material_is_normalized() {
        let material = Session::generate_key_material().to_uppercase();
        let mut session = Session::default();
        assert!(session.login(&material).is_ok());
        assert_eq!(session.identity(), Some(material.to_lowercase().as_str()));
    }

    #[test]
    fn logout_clears_identity() {
        let mut session = Session::default();
        session.login(&Session::generate_key_material()).unwrap();
        session.logout();
        assert!(!session.is_logged_in());
    }
}
