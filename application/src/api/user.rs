//! [`User`]-related REST API definitions.

use axum::{extract::rejection::JsonRejection, Extension, Json};
use common::DateTime;
use secrecy::SecretBox;
use serde::{Deserialize, Serialize};
use service::{
    command::{self, Command as _},
    document::form::FieldError,
    domain::{self, user},
};

use crate::{define_error, AsError, Error, Service};

/// A [`domain::User`] of the system.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Unique identifier of this [`User`].
    pub id: user::Id,

    /// Name of this [`User`].
    pub name: String,

    /// Email of this [`User`].
    pub email: String,

    /// [`DateTime`] when this [`User`] was created.
    pub created_at: DateTime,
}

impl From<domain::User> for User {
    fn from(user: domain::User) -> Self {
        Self {
            id: user.id,
            name: user.name.to_string(),
            email: user.email.to_string(),
            created_at: user.created_at.coerce(),
        }
    }
}

/// Body of a [`create`] request.
#[derive(Debug, Deserialize)]
pub struct NewUser {
    /// Name of the new [`User`].
    pub name: String,

    /// Email of the new [`User`].
    pub email: String,

    /// Password of the new [`User`].
    pub password: String,
}

/// Body of a [`create_session`] request.
#[derive(Debug, Deserialize)]
pub struct Credentials {
    /// Email of the [`User`].
    pub email: String,

    /// Password of the [`User`].
    pub password: String,
}

/// Result of a session creation.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedSession {
    /// Bearer token of the new session.
    pub token: String,

    /// [`DateTime`] when the new session expires.
    pub expires_at: DateTime,

    /// [`User`] the session belongs to.
    pub user: User,
}

impl From<command::create_user_session::Output> for CreatedSession {
    fn from(output: command::create_user_session::Output) -> Self {
        Self {
            token: output.token.to_string(),
            expires_at: output.expires_at.coerce(),
            user: output.user.into(),
        }
    }
}

/// Registers a new [`User`] and opens a session for it.
///
/// # Errors
///
/// Possible error codes:
/// - `INVALID_USER` - some provided value is invalid;
/// - `EMAIL_OCCUPIED` - the email belongs to another [`User`].
#[tracing::instrument(skip_all, fields(email = ?body.as_ref().ok().map(|b| &b.email)))]
pub async fn create(
    Extension(service): Extension<Service>,
    body: Result<Json<NewUser>, JsonRejection>,
) -> Result<(http::StatusCode, Json<CreatedSession>), Error> {
    let Json(NewUser {
        name,
        email,
        password,
    }) = body.map_err(AsError::into_error)?;

    let mut fields = Vec::new();
    let name = user::Name::new(name.trim());
    if name.is_none() {
        fields.push(invalid("name", "must not be empty"));
    }
    let email = user::Email::new(email.trim());
    if email.is_none() {
        fields.push(invalid("email", "must be a valid email address"));
    }
    let password = user::Password::new(password);
    if password.is_none() {
        fields.push(invalid("password", "must have at least 8 characters"));
    }
    let (Some(name), Some(email), Some(password)) = (name, email, password)
    else {
        return Err(Error {
            fields,
            ..Error::from(UserError::Invalid)
        });
    };

    let user = service
        .execute(command::CreateUser {
            name,
            email,
            password: SecretBox::init_with(move || password),
        })
        .await
        .map_err(AsError::into_error)?;
    tracing::info!(user.id = %user.id, "user registered");

    let output = service
        .execute(command::CreateUserSession::ByUserId(user.id))
        .await
        .map_err(AsError::into_error)?;

    Ok((http::StatusCode::CREATED, Json(output.into())))
}

/// Opens a new session of an existing [`User`].
///
/// # Errors
///
/// Possible error codes:
/// - `WRONG_CREDENTIALS` - the credentials don't match any [`User`].
#[tracing::instrument(skip_all, fields(email = ?body.as_ref().ok().map(|b| &b.email)))]
pub async fn create_session(
    Extension(service): Extension<Service>,
    body: Result<Json<Credentials>, JsonRejection>,
) -> Result<Json<CreatedSession>, Error> {
    let Json(Credentials { email, password }) =
        body.map_err(AsError::into_error)?;

    // Malformed credentials can't match anyone.
    let (Some(email), Some(password)) =
        (user::Email::new(email.trim()), user::Password::new(password))
    else {
        return Err(UserError::WrongCredentials.into());
    };

    service
        .execute(command::CreateUserSession::ByCredentials {
            email,
            password: SecretBox::init_with(move || password),
        })
        .await
        .map(|output| Json(output.into()))
        .map_err(AsError::into_error)
}

/// Creates a [`FieldError`] of the provided request `field`.
fn invalid(field: &str, message: &str) -> FieldError {
    FieldError {
        field: field.to_owned(),
        message: message.to_owned(),
    }
}

impl AsError for command::create_user::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::Db(e) => e.try_as_error(),
            Self::EmailOccupied(_) => Some(UserError::EmailOccupied.into()),
            Self::PasswordHash(_) => None,
        }
    }
}

impl AsError for command::create_user_session::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::Db(e) => e.try_as_error(),
            Self::WrongCredentials => Some(UserError::WrongCredentials.into()),
            Self::JsonWebTokenEncodeError(_) | Self::UserNotExists(_) => None,
        }
    }
}

define_error! {
    enum UserError {
        #[code = "INVALID_USER"]
        #[status = BAD_REQUEST]
        #[message = "Invalid `User` data"]
        Invalid,

        #[code = "EMAIL_OCCUPIED"]
        #[status = CONFLICT]
        #[message = "Provided email is occupied by another `User`"]
        EmailOccupied,

        #[code = "WRONG_CREDENTIALS"]
        #[status = UNAUTHORIZED]
        #[message = "Wrong email or password"]
        WrongCredentials,
    }
}
