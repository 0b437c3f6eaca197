// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

//! Server-rendered HTML pages.

use crate::models::auth::User;
use axum::http::StatusCode;
use axum::response::Html;

/// Escape text for interpolation into HTML element content or attribute values.
pub fn escape_html(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

fn layout(title: &str, body: &str) -> Html<String> {
    Html(format!(
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n<title>{}</title>\n</head>\n<body>\n{}\n</body>\n</html>\n",
        escape_html(title),
        body
    ))
}

const LOG_IN_FORM: &str = r#"<h1>please log in</h1>
<form action="/log-in" method="POST">
  <label for="username">Username</label>
  <input id="username" name="username" placeholder="username" type="text" />
  <label for="password">Password</label>
  <input id="password" name="password" type="password" />
  <button>Log In</button>
</form>
<p><a href="/sign-up">Sign up</a></p>"#;

/// Home page: a greeting for a logged-in user, otherwise the log-in form.
pub fn index(user: Option<&User>) -> Html<String> {
    match user {
        Some(user) => layout(
            "Home",
            &format!(
                "<h1>WELCOME BACK {}</h1>\n<a href=\"/log-out\">LOG OUT</a>",
                escape_html(&user.username)
            ),
        ),
        None => layout("Home", LOG_IN_FORM),
    }
}

pub fn sign_up_form() -> Html<String> {
    layout(
        "Sign Up",
        r#"<h1>Sign Up</h1>
<form action="/sign-up" method="POST">
  <label for="username">Username</label>
  <input id="username" name="username" placeholder="username" type="text" />
  <label for="password">Password</label>
  <input id="password" name="password" type="password" />
  <button>Sign Up</button>
</form>"#,
    )
}

pub fn error_page(status: StatusCode, message: &str) -> Html<String> {
    let title = status.canonical_reason().unwrap_or("Error");
    layout(
        title,
        &format!(
            "<h1>{} {}</h1>\n<p>{}</p>\n<p><a href=\"/\">Home</a></p>",
            status.as_u16(),
            escape_html(title),
            escape_html(message)
        ),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn user(username: &str) -> User {
        User {
            id: Uuid::now_v7(),
            username: username.to_string(),
            password: "pw".to_string(),
            created_at: 0,
        }
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html(r#"<a href="x">'&'</a>"#),
            "&lt;a href=&quot;x&quot;&gt;&#39;&amp;&#39;&lt;/a&gt;"
        );
        assert_eq!(escape_html("plain"), "plain");
    }

    #[test]
    fn test_index_for_anonymous_shows_log_in_form() {
        let Html(body) = index(None);
        assert!(body.contains(r#"action="/log-in""#));
        assert!(body.contains(r#"name="username""#));
        assert!(body.contains(r#"name="password""#));
        assert!(!body.contains("WELCOME BACK"));
    }

    #[test]
    fn test_index_for_user_greets_and_links_log_out() {
        let Html(body) = index(Some(&user("alice")));
        assert!(body.contains("WELCOME BACK alice"));
        assert!(body.contains(r#"href="/log-out""#));
        assert!(!body.contains(r#"action="/log-in""#));
    }

    #[test]
    fn test_index_escapes_username() {
        let Html(body) = index(Some(&user("<script>")));
        assert!(body.contains("WELCOME BACK &lt;script&gt;"));
        assert!(!body.contains("<script>"));
    }

    #[test]
    fn test_sign_up_form_posts_to_sign_up() {
        let Html(body) = sign_up_form();
        assert!(body.contains(r#"action="/sign-up""#));
        assert!(body.contains(r#"method="POST""#));
    }

    #[test]
    fn test_error_page() {
        let Html(body) = error_page(StatusCode::BAD_REQUEST, "username is required");
        assert!(body.contains("400 Bad Request"));
        assert!(body.contains("username is required"));
    }
}
