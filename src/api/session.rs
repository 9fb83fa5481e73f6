use axum::http::{HeaderMap, header};

pub const SESSION_COOKIE: &str = "musync_session";

/// Session id carried by the `musync_session` cookie, if any.
pub fn session_id(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .find_map(|pair| {
            let (name, value) = pair.trim().split_once('=')?;
            (name == SESSION_COOKIE && !value.is_empty()).then(|| value.to_string())
        })
}

/// `Set-Cookie` value binding the browser to `session_id`. `SameSite=Lax`
/// keeps the cookie on the provider's top-level redirect back to us.
pub fn session_cookie(session_id: &str) -> String {
    format!("{SESSION_COOKIE}={session_id}; Path=/; HttpOnly; SameSite=Lax")
}
