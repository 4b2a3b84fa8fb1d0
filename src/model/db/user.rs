use std::ops::{Deref, DerefMut};

use mongodb::bson::doc;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::model::{
    api::auth::Credentials,
    common::{Role, UserId},
    mongodb::{Coll, Counter, USER_IDS},
};

/// The username of the admin account created at first launch.
pub const DEFAULT_ADMIN_USERNAME: &str = "admin";

/// Core account data.
#[derive(Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserCore {
    pub username: String,
    pub password_hash: String,
    pub role: Role,
}

impl UserCore {
    /// Check whether the given password is correct.
    pub fn verify_password<T: AsRef<[u8]>>(&self, password: T) -> bool {
        // Unwrap safe because the only way to create a UserCore is via
        // `Credentials::into_core`, so the hash is always well-formed.
        argon2::verify_encoded(&self.password_hash, password.as_ref()).unwrap()
    }
}

/// An account from the database, with its unique ID.
#[derive(Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    #[serde(rename = "_id")]
    pub id: UserId,
    #[serde(flatten)]
    pub user: UserCore,
}

impl Deref for User {
    type Target = UserCore;

    fn deref(&self) -> &Self::Target {
        &self.user
    }
}

impl DerefMut for User {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.user
    }
}

/// Ensure there is at least one admin account, creating the default one
/// with the configured password if not.
///
/// This operation is idempotent.
pub async fn ensure_admin_exists(
    users: &Coll<User>,
    counters: &Coll<Counter>,
    password: &str,
) -> Result<()> {
    let filter = doc! {
        "role": Role::Admin,
    };
    if users.find_one(filter, None).await?.is_some() {
        return Ok(());
    }

    let credentials = Credentials {
        username: DEFAULT_ADMIN_USERNAME.to_string(),
        password: password.to_string(),
    };
    let core = credentials.into_core(Role::Admin).map_err(|_| {
        crate::error::Error::Status(
            rocket::http::Status::InternalServerError,
            "Configured default admin password is too short".to_string(),
        )
    })?;
    let id = Counter::next(counters, USER_IDS).await?;
    users.insert_one(User { id, user: core }, None).await?;
    info!("Created default admin account '{DEFAULT_ADMIN_USERNAME}'");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hashed_credentials_verify() {
        let core = Credentials {
            username: "alice112".to_string(),
            password: "surveys4lyfe".to_string(),
        }
        .into_core(Role::User)
        .unwrap();

        assert_eq!(Role::User, core.role);
        assert!(core.verify_password("surveys4lyfe"));
        assert!(!core.verify_password("wrong-password"));
        // The plaintext is never stored.
        assert_ne!("surveys4lyfe", core.password_hash);
    }
}
