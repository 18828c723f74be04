//! One-shot notices carried in the `notice` query parameter.

use axum::response::Redirect;

/// A message shown once on the page a flow redirects to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notice {
    NotFound,
    Expired,
    RedirectError,
    Created,
    InvalidToken,
    LoginFailed,
    LoggedOut,
}

impl Notice {
    /// Value used in the query string.
    pub fn code(self) -> &'static str {
        match self {
            Notice::NotFound => "not_found",
            Notice::Expired => "expired",
            Notice::RedirectError => "error",
            Notice::Created => "created",
            Notice::InvalidToken => "invalid_token",
            Notice::LoginFailed => "login_failed",
            Notice::LoggedOut => "logged_out",
        }
    }

    /// Parses a query value. Unknown values are ignored.
    pub fn from_code(code: &str) -> Option<Self> {
        Some(match code {
            "not_found" => Notice::NotFound,
            "expired" => Notice::Expired,
            "error" => Notice::RedirectError,
            "created" => Notice::Created,
            "invalid_token" => Notice::InvalidToken,
            "login_failed" => Notice::LoginFailed,
            "logged_out" => Notice::LoggedOut,
            _ => return None,
        })
    }

    pub fn message(self) -> &'static str {
        match self {
            Notice::NotFound => "URL not found",
            Notice::Expired => "This link has expired",
            Notice::RedirectError => "Error redirecting to URL",
            Notice::Created => "URL shortened successfully!",
            Notice::InvalidToken => "Invalid or revoked token",
            Notice::LoginFailed => "Sign-in is temporarily unavailable, please try again",
            Notice::LoggedOut => "You have been signed out",
        }
    }

    pub fn is_error(self) -> bool {
        !matches!(self, Notice::Created | Notice::LoggedOut)
    }

    /// `303 See Other` to `path` carrying this notice.
    pub fn redirect_to(self, path: &str) -> Redirect {
        Redirect::to(&format!("{path}?notice={}", self.code()))
    }
}

/// Notice ready for a template.
#[derive(Debug, Clone)]
pub struct Flash {
    pub message: String,
    pub is_error: bool,
}

impl From<Notice> for Flash {
    fn from(notice: Notice) -> Self {
        Self {
            message: notice.message().to_string(),
            is_error: notice.is_error(),
        }
    }
}

impl Flash {
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            is_error: true,
        }
    }

    /// Flash for an optional `notice` query value.
    pub fn from_query(notice: Option<&str>) -> Option<Self> {
        notice.and_then(Notice::from_code).map(Flash::from)
    }
}
