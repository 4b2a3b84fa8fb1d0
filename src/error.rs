use rocket::{http::Status, response::Responder};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Db(#[from] mongodb::error::Error),
    #[error(transparent)]
    Jwt(#[from] jsonwebtoken::errors::Error),
    #[error("{1}")]
    Status(Status, String),
}

impl Error {
    /// Shorthand for a 404 with a "Foo not found" message.
    pub fn not_found(what: String) -> Self {
        Self::Status(Status::NotFound, format!("{} not found", what))
    }
}

impl<'r, 'o: 'r> Responder<'r, 'o> for Error {
    fn respond_to(self, _: &'r rocket::Request<'_>) -> rocket::response::Result<'o> {
        Err(match self {
            Self::Db(ref err) => {
                error!("Database error: {err}");
                Status::InternalServerError
            }
            Self::Jwt(ref err) => {
                error!("JWT error: {err}");
                Status::InternalServerError
            }
            Self::Status(status, ref msg) => {
                warn!("{status}: {msg}");
                status
            }
        })
    }
}
