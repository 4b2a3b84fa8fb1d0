use argon2::Config as Argon2Config;
use chrono::{serde::ts_seconds, DateTime, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, TokenData, Validation};
use rand::Rng;
use rocket::{
    http::{Cookie, SameSite},
    outcome::{try_outcome, IntoOutcome},
    request::{FromRequest, Outcome},
    time::Duration,
    Request, State,
};
use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::error::Error;
use crate::model::{
    common::{Role, UserId},
    db::user::{User, UserCore},
};

pub const AUTH_TOKEN_COOKIE: &str = "auth_token";

pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Raw credentials, received from a client. These are never stored directly,
/// since the password is in plaintext.
#[derive(Clone, Deserialize, Serialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    /// Convert [`Credentials`] into account data with the given role by
    /// hashing the password. This enforces that the username is non-empty
    /// and the password meets the minimum length.
    pub fn into_core(self, role: Role) -> Result<UserCore, ()> {
        // Check credentials are acceptable.
        if self.username.is_empty() || self.password.len() < MIN_PASSWORD_LENGTH {
            return Err(());
        }

        // 16 bytes is recommended for password hashing:
        //  https://en.wikipedia.org/wiki/Argon2
        let mut salt = [0_u8; 16];
        rand::thread_rng().fill(&mut salt);
        let password_hash =
            argon2::hash_encoded(self.password.as_bytes(), &salt, &Argon2Config::default())
                .unwrap(); // Safe because the default `Config` is valid.
        Ok(UserCore {
            username: self.username,
            password_hash,
            role,
        })
    }
}

/// An authentication token representing a specific user with a specific role.
#[derive(Debug, Serialize, Deserialize)]
pub struct AuthToken {
    pub id: UserId,
    #[serde(rename = "rol")]
    pub role: Role,
}

impl AuthToken {
    /// Create a new [`AuthToken`] for the given user.
    pub fn new(user: &User) -> Self {
        Self {
            id: user.id,
            role: user.role,
        }
    }

    /// Does this token permit actions gated behind the given role?
    pub fn permits(&self, target: Role) -> bool {
        self.role == target
    }

    #[allow(clippy::missing_panics_doc)]
    /// Serialize this token into a cookie.
    pub fn into_cookie(self, config: &Config) -> Cookie<'static> {
        let claims = Claims {
            token: self,
            expire_at: Utc::now() + config.auth_ttl(),
        };

        let token = jsonwebtoken::encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(config.jwt_secret()),
        )
        .expect("JWT encoding is infallible with default settings");

        Cookie::build(AUTH_TOKEN_COOKIE, token)
            .max_age(Duration::seconds(config.auth_ttl().num_seconds()))
            .http_only(true)
            .same_site(SameSite::Strict)
            .finish()
    }

    /// Deserialize a token from a cookie.
    pub fn from_cookie(cookie: &Cookie<'static>, config: &Config) -> Result<Self, Error> {
        let token = jsonwebtoken::decode(
            cookie.value(),
            &DecodingKey::from_secret(config.jwt_secret()),
            &Validation::default(),
        )
        .map(|claims: TokenData<Claims>| claims.claims.token)?;
        Ok(token)
    }
}

/// Cookie claims: the token itself plus an expiry datetime.
#[derive(Serialize, Deserialize)]
struct Claims {
    #[serde(flatten)]
    token: AuthToken,
    #[serde(rename = "exp", with = "ts_seconds")]
    expire_at: DateTime<Utc>,
}

#[rocket::async_trait]
impl<'r> FromRequest<'r> for AuthToken {
    type Error = Error;

    /// Get an [`AuthToken`] from the auth cookie.
    async fn from_request(req: &'r Request<'_>) -> Outcome<Self, Self::Error> {
        // Unwrap is safe as `Config` is always managed.
        let config = req.guard::<&State<Config>>().await.unwrap();

        // Forward to any routes that do not require an authentication token.
        let cookie = try_outcome!(req.cookies().get(AUTH_TOKEN_COOKIE).or_forward(()));

        // Decode the token; expired or tampered-with tokens forward too.
        let token: Self = try_outcome!(Self::from_cookie(cookie, config).or_forward(()));

        Outcome::Success(token)
    }
}

/// An [`AuthToken`] proven to carry the admin role. Authoring and report
/// routes take this guard, so authorization is enforced server-side on
/// every request rather than trusted from the client.
#[derive(Debug)]
pub struct AdminToken(pub AuthToken);

#[rocket::async_trait]
impl<'r> FromRequest<'r> for AdminToken {
    type Error = Error;

    async fn from_request(req: &'r Request<'_>) -> Outcome<Self, Self::Error> {
        let token = try_outcome!(req.guard::<AuthToken>().await);
        if token.permits(Role::Admin) {
            Outcome::Success(Self(token))
        } else {
            Outcome::Forward(())
        }
    }
}

/// Description of an account as returned by login and registration.
#[derive(Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserDescription {
    pub id: UserId,
    pub username: String,
    pub role: Role,
}

impl From<&User> for UserDescription {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            role: user.role,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use serde_json::json;

    fn config() -> Config {
        serde_json::from_value(json!({
            "auth_ttl": 3600,
            "jwt_secret": "test-jwt-secret",
        }))
        .unwrap()
    }

    fn example_user(role: Role) -> User {
        User {
            id: 7,
            user: Credentials {
                username: "alice112".to_string(),
                password: "surveys4lyfe".to_string(),
            }
            .into_core(role)
            .unwrap(),
        }
    }

    #[test]
    fn token_round_trips_through_cookie() {
        let config = config();
        let user = example_user(Role::Admin);

        let cookie = AuthToken::new(&user).into_cookie(&config);
        assert_eq!(AUTH_TOKEN_COOKIE, cookie.name());

        let token = AuthToken::from_cookie(&cookie, &config).unwrap();
        assert_eq!(7, token.id);
        assert_eq!(Role::Admin, token.role);
        assert!(token.permits(Role::Admin));
        assert!(!token.permits(Role::User));
    }

    #[test]
    fn tampered_cookie_fails_to_decode() {
        let config = config();
        let user = example_user(Role::User);

        let cookie = AuthToken::new(&user).into_cookie(&config);
        let mut tampered = cookie.value().to_string();
        tampered.pop();
        let cookie = Cookie::new(AUTH_TOKEN_COOKIE, tampered);
        assert!(AuthToken::from_cookie(&cookie, &config).is_err());
    }

    #[test]
    fn short_passwords_are_rejected() {
        let rejected = Credentials {
            username: "bob".to_string(),
            password: "short".to_string(),
        }
        .into_core(Role::User);
        assert!(rejected.is_err());

        let no_username = Credentials {
            username: String::new(),
            password: "long-enough-password".to_string(),
        }
        .into_core(Role::User);
        assert!(no_username.is_err());
    }
}
