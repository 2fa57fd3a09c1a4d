use leptos::prelude::*;
use std::fmt;

pub const AUTH_COOKIE_NAME: &str = "session";

#[derive(Debug)]
pub enum AuthError {
    TokenCreation(String),
    MissingEnvironmentVar(String),
    NotAuthenticated,
}

impl fmt::Display for AuthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthError::TokenCreation(e) => write!(f, "Failed to create token: {}", e),
            AuthError::MissingEnvironmentVar(var) => {
                write!(f, "Missing environment variable: {}", var)
            }
            AuthError::NotAuthenticated => write!(f, "Not authenticated"),
        }
    }
}

pub fn to_server_error(e: AuthError) -> ServerFnError {
    ServerFnError::ServerError(e.to_string())
}
