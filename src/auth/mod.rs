pub mod context;
mod types;

pub use types::*;

use serde::{Deserialize, Serialize};

use crate::api::ApiError;

/// Claims carried by the session cookie the external auth provider sets on
/// this domain. The profile fields are optional OIDC-style claims; tokens we
/// mint for the backend APIs carry only `sub`/`exp`/`iat`.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub exp: i64,
    pub iat: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub picture: Option<String>,
}

#[cfg(feature = "ssr")]
impl Claims {
    pub fn to_user_view(&self) -> crate::models::users::UserView {
        crate::models::users::UserView {
            sub: self.sub.clone(),
            display_name: self.name.clone(),
            email: self.email.clone(),
            avatar_url: self.picture.clone(),
        }
    }
}

#[cfg(feature = "ssr")]
pub fn sign_claims(claims: &Claims, secret: &[u8]) -> Result<String, jsonwebtoken::errors::Error> {
    use jsonwebtoken::{encode, EncodingKey, Header};

    encode(&Header::default(), claims, &EncodingKey::from_secret(secret))
}

#[cfg(feature = "ssr")]
pub fn decode_claims(token: &str, secret: &[u8]) -> Result<Claims, jsonwebtoken::errors::Error> {
    use jsonwebtoken::{decode, DecodingKey, Validation};

    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret),
        &Validation::default(),
    )?;

    Ok(token_data.claims)
}

#[cfg(feature = "ssr")]
fn session_secret() -> Result<String, AuthError> {
    std::env::var("AUTH_SESSION_SECRET")
        .map_err(|_| AuthError::MissingEnvironmentVar("AUTH_SESSION_SECRET".to_string()))
}

#[cfg(feature = "ssr")]
fn api_token_secret() -> Result<String, AuthError> {
    std::env::var("API_TOKEN_SECRET")
        .map_err(|_| AuthError::MissingEnvironmentVar("API_TOKEN_SECRET".to_string()))
}

/// Reads and verifies the session cookie; any failure (absent cookie, bad
/// signature, expired) reads as "no session".
#[cfg(feature = "ssr")]
pub fn session_claims(jar: &axum_extra::extract::cookie::CookieJar) -> Option<Claims> {
    let cookie = jar.get(AUTH_COOKIE_NAME)?;
    let secret = session_secret().ok()?;
    decode_claims(cookie.value(), secret.as_bytes()).ok()
}

#[leptos::server(VerifySession, "/api")]
pub async fn verify_session() -> Result<bool, leptos::server_fn::ServerFnError> {
    #[cfg(feature = "ssr")]
    {
        use axum_extra::extract::cookie::CookieJar;
        use leptos_axum::extract;

        let jar = extract::<CookieJar>()
            .await
            .map_err(|e| leptos::server_fn::ServerFnError::new(format!("Cookie jar error: {e}")))?;

        Ok(session_claims(&jar).is_some())
    }
}

#[leptos::server(GetCurrentUser, "/api")]
pub async fn get_current_user(
) -> Result<Option<crate::models::users::UserView>, leptos::server_fn::ServerFnError> {
    #[cfg(feature = "ssr")]
    {
        use axum_extra::extract::cookie::CookieJar;
        use leptos_axum::extract;

        let jar = extract::<CookieJar>()
            .await
            .map_err(|e| leptos::server_fn::ServerFnError::new(format!("Cookie jar error: {e}")))?;

        Ok(session_claims(&jar).map(|claims| claims.to_user_view()))
    }

    #[cfg(not(feature = "ssr"))]
    {
        // Client-side stub; the session cookie can only be read on the server
        Ok(None)
    }
}

/// Mints the short-lived bearer token the data APIs expect. Requested fresh
/// for every backend call, never cached client-side.
#[leptos::server(IssueApiToken, "/api")]
pub async fn issue_api_token() -> Result<String, leptos::server_fn::ServerFnError> {
    #[cfg(feature = "ssr")]
    {
        use axum_extra::extract::cookie::CookieJar;
        use leptos_axum::extract;

        let jar = extract::<CookieJar>()
            .await
            .map_err(|e| leptos::server_fn::ServerFnError::new(format!("Cookie jar error: {e}")))?;

        let session =
            session_claims(&jar).ok_or_else(|| to_server_error(AuthError::NotAuthenticated))?;
        let secret = api_token_secret().map_err(to_server_error)?;

        let now = chrono::Utc::now();
        let claims = Claims {
            sub: session.sub,
            exp: (now + chrono::Duration::minutes(5)).timestamp(),
            iat: now.timestamp(),
            name: None,
            email: None,
            picture: None,
        };

        sign_claims(&claims, secret.as_bytes())
            .map_err(|e| to_server_error(AuthError::TokenCreation(e.to_string())))
    }
}

#[leptos::server(Logout, "/api")]
pub async fn logout() -> Result<(), leptos::server_fn::ServerFnError> {
    #[cfg(feature = "ssr")]
    {
        use axum_extra::extract::cookie::Cookie;
        use http::{HeaderName, HeaderValue};
        use leptos_axum::ResponseOptions;

        let response_options = leptos::context::use_context::<ResponseOptions>()
            .ok_or_else(|| leptos::server_fn::ServerFnError::new("Response options not found"))?;

        let cookie = Cookie::build((AUTH_COOKIE_NAME, ""))
            .path("/")
            .max_age(cookie::time::Duration::seconds(-1))
            .build();

        let cookie_value = HeaderValue::from_str(&cookie.to_string())
            .map_err(|e| leptos::server_fn::ServerFnError::new(format!("Cookie header error: {e}")))?;

        response_options.insert_header(HeaderName::from_static("set-cookie"), cookie_value);
    }

    Ok(())
}

/// `getToken` equivalent used before every data call; folds server-fn
/// failures into the API error taxonomy so callers match on one error type.
pub async fn get_token() -> Result<String, ApiError> {
    issue_api_token()
        .await
        .map_err(|e| ApiError::Token(e.to_string()))
}

#[cfg(all(test, feature = "ssr"))]
mod tests {
    use super::*;

    fn claims_for(sub: &str, offset_secs: i64) -> Claims {
        let now = chrono::Utc::now();
        Claims {
            sub: sub.to_string(),
            exp: (now + chrono::Duration::seconds(offset_secs)).timestamp(),
            iat: now.timestamp(),
            name: Some("Ada".to_string()),
            email: Some("ada@example.com".to_string()),
            picture: None,
        }
    }

    #[test]
    fn signed_claims_round_trip() {
        let claims = claims_for("user-42", 300);
        let token = sign_claims(&claims, b"test-secret").unwrap();

        let decoded = decode_claims(&token, b"test-secret").unwrap();
        assert_eq!(decoded.sub, "user-42");
        assert_eq!(decoded.name.as_deref(), Some("Ada"));
        assert_eq!(decoded.email.as_deref(), Some("ada@example.com"));
    }

    #[test]
    fn expired_tokens_are_rejected() {
        let claims = claims_for("user-42", -600);
        let token = sign_claims(&claims, b"test-secret").unwrap();

        assert!(decode_claims(&token, b"test-secret").is_err());
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let claims = claims_for("user-42", 300);
        let token = sign_claims(&claims, b"test-secret").unwrap();

        assert!(decode_claims(&token, b"other-secret").is_err());
    }

    #[test]
    fn user_view_comes_from_profile_claims() {
        let claims = claims_for("user-42", 300);
        let view = claims.to_user_view();

        assert_eq!(view.sub, "user-42");
        assert_eq!(view.display_name.as_deref(), Some("Ada"));
        assert_eq!(view.email.as_deref(), Some("ada@example.com"));
        assert_eq!(view.avatar_url, None);
        assert_eq!(view.label(), "Ada");
        assert_eq!(view.initial(), "A");
    }
}
