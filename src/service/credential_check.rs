use crate::db::sqlite::{SqlitePool, UsersStorage};
use crate::error::DealerError;
use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
};
use password_hash::rand_core::OsRng;
use tracing::{debug, info};

/// Stateless username/password check. No session is issued on success.
#[derive(Clone)]
pub struct CredentialChecker {
    users: UsersStorage,
}

impl CredentialChecker {
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            users: UsersStorage::new(pool),
        }
    }

    /// Unknown user and wrong password both yield `InvalidCredentials`.
    pub async fn verify(&self, username: &str, password: &str) -> Result<(), DealerError> {
        let Some(user) = self.users.find_by_username(username).await? else {
            debug!("login rejected");
            return Err(DealerError::InvalidCredentials);
        };
        if !verify_password(password, &user.password_hash) {
            debug!("login rejected");
            return Err(DealerError::InvalidCredentials);
        }
        info!(user_id = user.id, "login accepted");
        Ok(())
    }

    /// Provision an account unless the username already exists.
    pub async fn ensure_user(&self, username: &str, password: &str) -> Result<bool, DealerError> {
        if self.users.find_by_username(username).await?.is_some() {
            return Ok(false);
        }
        let hash = hash_password(password)?;
        let created = self.users.insert_if_absent(username, &hash).await?;
        if created {
            info!(username, "admin credential provisioned");
        }
        Ok(created)
    }
}

/// Argon2 PHC string with a fresh random salt.
pub fn hash_password(password: &str) -> Result<String, DealerError> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default().hash_password(password.as_bytes(), &salt)?;
    Ok(hash.to_string())
}

/// A stored hash that fails to parse verifies as false.
pub fn verify_password(password: &str, stored_hash: &str) -> bool {
    PasswordHash::new(stored_hash)
        .map(|parsed| {
            Argon2::default()
                .verify_password(password.as_bytes(), &parsed)
                .is_ok()
        })
        .unwrap_or(false)
}
