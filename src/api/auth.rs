use mongodb::bson::doc;
use rocket::{
    http::{Cookie, CookieJar, Status},
    serde::json::Json,
    Route, State,
};

use crate::{
    error::{Error, Result},
    model::{
        api::auth::{
            AdminToken, AuthToken, Credentials, UserDescription, AUTH_TOKEN_COOKIE,
            MIN_PASSWORD_LENGTH,
        },
        common::Role,
        db::user::User,
        mongodb::{Coll, Counter, USER_IDS},
    },
    Config,
};

pub fn routes() -> Vec<Route> {
    routes![register, login, logout, create_admin]
}

#[post("/auth/register", data = "<credentials>", format = "json")]
async fn register(
    credentials: Json<Credentials>,
    users: Coll<User>,
    counters: Coll<Counter>,
) -> Result<Json<UserDescription>> {
    create_user(credentials.0, Role::User, &users, &counters).await
}

/// Admins can only be created by an existing admin, never via open
/// registration.
#[post("/users/admins", data = "<credentials>", format = "json")]
async fn create_admin(
    _token: AdminToken,
    credentials: Json<Credentials>,
    users: Coll<User>,
    counters: Coll<Counter>,
) -> Result<Json<UserDescription>> {
    create_user(credentials.0, Role::Admin, &users, &counters).await
}

async fn create_user(
    credentials: Credentials,
    role: Role,
    users: &Coll<User>,
    counters: &Coll<Counter>,
) -> Result<Json<UserDescription>> {
    // Check username uniqueness.
    let filter = doc! {
        "username": &credentials.username,
    };
    let existing = users.find_one(filter, None).await?;
    if existing.is_some() {
        return Err(Error::Status(
            Status::BadRequest,
            format!("Username already in use: {}", credentials.username),
        ));
    }

    // Hash the password and insert the account.
    let core = credentials.into_core(role).map_err(|_| {
        Error::Status(
            Status::BadRequest,
            format!(
                "Username must be non-empty and password at least {} characters",
                MIN_PASSWORD_LENGTH
            ),
        )
    })?;
    let id = Counter::next(counters, USER_IDS).await?;
    let user = User { id, user: core };
    users.insert_one(&user, None).await?;

    Ok(Json(UserDescription::from(&user)))
}

#[post("/auth/login", data = "<credentials>", format = "json")]
async fn login(
    cookies: &CookieJar<'_>,
    credentials: Json<Credentials>,
    users: Coll<User>,
    config: &State<Config>,
) -> Result<Json<UserDescription>> {
    let with_username = doc! {
        "username": &credentials.username,
    };

    let user = users
        .find_one(with_username, None)
        .await?
        .filter(|user| user.verify_password(&credentials.password))
        .ok_or_else(|| {
            Error::Status(
                Status::Unauthorized,
                "No account found with the provided username and password combination."
                    .to_string(),
            )
        })?;

    let token = AuthToken::new(&user);
    cookies.add(token.into_cookie(config));

    Ok(Json(UserDescription::from(&user)))
}

#[delete("/auth")]
fn logout(cookies: &CookieJar) -> Status {
    cookies.remove(Cookie::named(AUTH_TOKEN_COOKIE));
    Status::Ok
}
