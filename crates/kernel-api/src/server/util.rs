fn apply_cors_headers(headers: &mut axum::http::HeaderMap) {
    headers.insert(
        HeaderName::from_static("access-control-allow-origin"),
        HeaderValue::from_static("*"),
    );
    headers.insert(
        HeaderName::from_static("access-control-allow-methods"),
        HeaderValue::from_static("GET,POST,OPTIONS"),
    );
    headers.insert(
        HeaderName::from_static("access-control-allow-headers"),
        HeaderValue::from_static("*"),
    );
    headers.insert(
        HeaderName::from_static("access-control-max-age"),
        HeaderValue::from_static("3600"),
    );
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum InfoAction {
    Investigate,
    Archive,
    Discard,
}

impl InfoAction {
    fn as_str(self) -> &'static str {
        match self {
            Self::Investigate => "investigate",
            Self::Archive => "archive",
            Self::Discard => "discard",
        }
    }
}

fn parse_info_action(raw: &str) -> Result<InfoAction, HttpApiError> {
    match raw {
        "investigate" => Ok(InfoAction::Investigate),
        "archive" => Ok(InfoAction::Archive),
        "discard" => Ok(InfoAction::Discard),
        other => Err(HttpApiError::invalid_command(
            "unknown info action",
            Some(format!("action={other} expected=investigate|archive|discard")),
        )),
    }
}
