//! Authentication middleware and extractors.
//!
//! Provides extractors for requiring session authentication in route
//! handlers. [`RequireAuth`] runs the full authorization guard and yields an
//! [`AuthContext`]; [`RequireSession`] only proves the session maps to a
//! live user, for the holding surfaces where pending/unprovisioned users
//! are allowed.

use axum::{
    Json,
    extract::FromRequestParts,
    http::{HeaderMap, StatusCode, header, request::Parts},
    response::{IntoResponse, Redirect, Response},
};
use serde_json::json;

use postkasir_core::SessionToken;

use crate::models::{AuthContext, CurrentUser};
use crate::services::guard::{AuthorizationGuard, GuardError};
use crate::state::AppState;

/// Session cookie name.
pub const SESSION_COOKIE_NAME: &str = "pk_session";

/// Extractor that requires a fully authorized (approved, provisioned) user.
///
/// Guard failures short-circuit before any handler logic runs: browser
/// requests get a redirect to the matching holding page, `/api/` requests
/// get a JSON error with the appropriate status code.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(
///     RequireAuth(ctx): RequireAuth,
/// ) -> impl IntoResponse {
///     format!("store {} as {}", ctx.store_id, ctx.role)
/// }
/// ```
pub struct RequireAuth(pub AuthContext);

/// Error returned when authorization fails.
pub enum AuthRejection {
    /// Redirect to a holding page (for browser requests).
    Redirect(&'static str),
    /// JSON error (for API requests).
    Api {
        /// HTTP status code.
        status: StatusCode,
        /// Client-facing error message.
        message: &'static str,
    },
    /// Guard hit a database error.
    Internal,
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        match self {
            Self::Redirect(target) => Redirect::to(target).into_response(),
            Self::Api { status, message } => {
                (status, Json(json!({ "error": message }))).into_response()
            }
            Self::Internal => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "Internal server error" })),
            )
                .into_response(),
        }
    }
}

/// Map a guard failure to the right rejection for this request.
fn reject(err: &GuardError, is_api: bool) -> AuthRejection {
    match err {
        GuardError::Unauthenticated => {
            if is_api {
                AuthRejection::Api {
                    status: StatusCode::UNAUTHORIZED,
                    message: "Authentication required",
                }
            } else {
                AuthRejection::Redirect("/login")
            }
        }
        GuardError::Unprovisioned => {
            if is_api {
                AuthRejection::Api {
                    status: StatusCode::FORBIDDEN,
                    message: "No store assigned",
                }
            } else {
                AuthRejection::Redirect("/complete-profile")
            }
        }
        GuardError::PendingApproval => {
            if is_api {
                AuthRejection::Api {
                    status: StatusCode::FORBIDDEN,
                    message: "Account pending approval",
                }
            } else {
                AuthRejection::Redirect("/pending-approval")
            }
        }
        GuardError::Repository(e) => {
            sentry::capture_error(e);
            tracing::error!(error = %e, "guard resolution failed");
            AuthRejection::Internal
        }
    }
}

impl FromRequestParts<AppState> for RequireAuth {
    type Rejection = AuthRejection;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let is_api = is_api_request(parts);

        let token = extract_token(&parts.headers)
            .ok_or_else(|| reject(&GuardError::Unauthenticated, is_api))?;

        let guard = AuthorizationGuard::new(state.pool());
        let ctx = guard
            .resolve(&token)
            .await
            .map_err(|e| reject(&e, is_api))?;

        Ok(Self(ctx))
    }
}

/// Extractor that requires a valid session but skips the provisioning and
/// approval checks.
///
/// Only the holding surfaces (`/auth/me`, logout, profile completion) use
/// this; everything store-scoped takes [`RequireAuth`].
pub struct RequireSession {
    /// The session's user, possibly pending or unprovisioned.
    pub user: CurrentUser,
    /// The presented token (logout needs it).
    pub token: SessionToken,
}

impl FromRequestParts<AppState> for RequireSession {
    type Rejection = AuthRejection;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let is_api = is_api_request(parts);

        let token = extract_token(&parts.headers)
            .ok_or_else(|| reject(&GuardError::Unauthenticated, is_api))?;

        let guard = AuthorizationGuard::new(state.pool());
        let user = guard
            .resolve_session_user(&token)
            .await
            .map_err(|e| reject(&e, is_api))?;

        Ok(Self { user, token })
    }
}

/// Whether this request should get JSON errors instead of redirects.
fn is_api_request(parts: &Parts) -> bool {
    parts.uri.path().starts_with("/api/")
}

/// Pull the session token from `Authorization: Bearer` or the session
/// cookie. Malformed tokens are treated as absent.
fn extract_token(headers: &HeaderMap) -> Option<SessionToken> {
    if let Some(value) = headers.get(header::AUTHORIZATION)
        && let Ok(value) = value.to_str()
        && let Some(raw) = value.strip_prefix("Bearer ")
        && let Ok(token) = SessionToken::parse(raw.trim())
    {
        return Some(token);
    }

    let cookies = headers.get(header::COOKIE)?.to_str().ok()?;
    cookies.split(';').find_map(|pair| {
        let (name, value) = pair.trim().split_once('=')?;
        if name == SESSION_COOKIE_NAME {
            SessionToken::parse(value).ok()
        } else {
            None
        }
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use axum::http::{HeaderMap, HeaderValue};

    const TOKEN: &str = "AAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA";

    #[test]
    fn test_extract_bearer_token() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {TOKEN}")).unwrap(),
        );
        assert_eq!(extract_token(&headers).unwrap().as_str(), TOKEN);
    }

    #[test]
    fn test_extract_cookie_token() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_str(&format!("theme=dark; pk_session={TOKEN}")).unwrap(),
        );
        assert_eq!(extract_token(&headers).unwrap().as_str(), TOKEN);
    }

    #[test]
    fn test_bearer_takes_precedence_over_cookie() {
        let other = "B".repeat(43);
        let mut headers = HeaderMap::new();
        headers.insert(
            header::AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {TOKEN}")).unwrap(),
        );
        headers.insert(
            header::COOKIE,
            HeaderValue::from_str(&format!("pk_session={other}")).unwrap(),
        );
        assert_eq!(extract_token(&headers).unwrap().as_str(), TOKEN);
    }

    #[test]
    fn test_missing_headers() {
        assert!(extract_token(&HeaderMap::new()).is_none());
    }

    #[test]
    fn test_malformed_token_is_absent() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::AUTHORIZATION,
            HeaderValue::from_static("Bearer not-a-valid-token"),
        );
        assert!(extract_token(&headers).is_none());
    }

    #[test]
    fn test_other_cookies_ignored() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_str(&format!("not_session={TOKEN}")).unwrap(),
        );
        assert!(extract_token(&headers).is_none());
    }
}
