use reqwest::StatusCode;
use thiserror::Error;

/// Every way a copy run can fail. None of them are recovered from.
#[derive(Debug, Error)]
pub enum CopyError {
    #[error("usage error: {0} (expected at most one argument, the day offset)")]
    Usage(String),

    #[error("invalid day offset {input:?}")]
    ArgumentParse {
        input: String,
        #[source]
        source: std::num::ParseIntError,
    },

    #[error("unknown time zone: {0}")]
    ZoneResolution(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("request failed")]
    Transport(#[from] reqwest::Error),

    #[error("{method} {url} returned {status}")]
    Status {
        method: &'static str,
        url: String,
        status: StatusCode,
    },

    #[error("malformed time entries response")]
    Decode(#[from] serde_json::Error),

    #[error("time entry field `{field}` is not a valid timestamp ({value}): {reason}")]
    TimestampParse {
        field: &'static str,
        value: String,
        reason: String,
    },

    #[error("date out of range: {0}")]
    DateOutOfRange(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn argument_parse_mentions_input() {
        let source = "abc".parse::<i64>().unwrap_err();
        let err = CopyError::ArgumentParse {
            input: "abc".into(),
            source,
        };
        assert!(err.to_string().contains("\"abc\""));
        assert!(err.to_string().starts_with("invalid day offset"));
    }

    #[test]
    fn status_display() {
        let err = CopyError::Status {
            method: "POST",
            url: "https://example.test/time_entries".into(),
            status: StatusCode::FORBIDDEN,
        };
        assert_eq!(
            err.to_string(),
            "POST https://example.test/time_entries returned 403 Forbidden"
        );
    }

    #[test]
    fn timestamp_parse_names_field() {
        let err = CopyError::TimestampParse {
            field: "stop",
            value: "null".into(),
            reason: "missing".into(),
        };
        assert!(err.to_string().contains("`stop`"));
    }
}
