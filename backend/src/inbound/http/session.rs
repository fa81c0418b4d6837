//! Session helpers to keep HTTP handlers free of framework-specific logic.
//!
//! Wraps Actix sessions so handlers only deal with domain-friendly
//! operations: persisting the logged-in user, requiring one, and clearing
//! the session at logout. Unauthenticated access to any protected handler
//! fails here with the uniform login redirect.

use actix_session::Session;
use actix_web::{dev::Payload, FromRequest, HttpRequest};
use futures_util::future::LocalBoxFuture;
use uuid::Uuid;

use crate::domain::auth_service::{LOGIN_REQUIRED, LOGIN_ROUTE};
use crate::domain::{Error, Identity, UserId};

use super::state::AppState;
use super::ApiResult;

pub(crate) const USER_ID_KEY: &str = "user_id";

fn login_required() -> Error {
    Error::unauthorized(LOGIN_REQUIRED)
        .with_details(serde_json::json!({ "redirectTo": LOGIN_ROUTE }))
}

/// Newtype wrapper that exposes higher-level session operations.
#[derive(Clone)]
pub struct SessionContext(Session);

impl SessionContext {
    /// Construct a new wrapper from the underlying Actix session.
    pub fn new(session: Session) -> Self {
        Self(session)
    }

    /// Persist the authenticated user's id in the session cookie.
    pub fn persist_user(&self, user_id: &UserId) -> Result<(), Error> {
        self.0
            .insert(USER_ID_KEY, user_id.to_string())
            .map_err(|error| Error::internal(format!("failed to persist session: {error}")))
    }

    /// Fetch the current user id from the session, if present.
    ///
    /// A tampered or unparseable id is treated as an absent session.
    pub fn user_id(&self) -> Result<Option<UserId>, Error> {
        let raw = self
            .0
            .get::<String>(USER_ID_KEY)
            .map_err(|error| Error::internal(format!("failed to read session: {error}")))?;
        match raw {
            Some(value) => match Uuid::parse_str(&value) {
                Ok(id) => Ok(Some(UserId::from_uuid(id))),
                Err(error) => {
                    tracing::warn!("invalid user id in session cookie: {error}");
                    Ok(None)
                }
            },
            None => Ok(None),
        }
    }

    /// Require an authenticated user id or fail with the login redirect.
    pub fn require_user_id(&self) -> Result<UserId, Error> {
        self.user_id()?.ok_or_else(login_required)
    }

    /// Drop every session entry (logout).
    pub fn clear(&self) {
        self.0.purge();
    }
}

impl FromRequest for SessionContext {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let fut = Session::from_request(req, payload);
        Box::pin(async move { fut.await.map(SessionContext::new) })
    }
}

/// Resolve the caller's identity from the session, or fail with the login
/// redirect.
pub(crate) async fn require_identity(
    state: &AppState,
    session: &SessionContext,
) -> ApiResult<Identity> {
    let user_id = session.require_user_id()?;
    state.auth.resolve_identity(&user_id).await
}
