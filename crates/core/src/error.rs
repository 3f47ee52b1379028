/// Result alias that carries the custom [`ChartError`] type.
pub type Result<T> = std::result::Result<T, ChartError>;

/// Common error type for the core crate.
#[derive(Debug, thiserror::Error)]
pub enum ChartError {
    /// Free-form failure surfaced to the command line as-is.
    #[error("{0}")]
    Message(String),
    /// Wrapper around standard IO errors.
    #[error("{0}")]
    Io(#[from] std::io::Error),
    /// Beatmap or config file that is not valid JSON for the expected shape.
    #[error("malformed json: {0}")]
    Json(#[from] serde_json::Error),
    /// A configuration value outside its accepted range.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    /// The beatmap reports a negative song length, so no chart can be built.
    #[error("song duration is unknown ({0})")]
    UnknownDuration(f32),
}

impl ChartError {
    /// Creates a new error that simply wraps the provided message.
    pub fn msg<T: Into<String>>(msg: T) -> Self {
        Self::Message(msg.into())
    }

    pub(crate) fn invalid_config<T: Into<String>>(msg: T) -> Self {
        Self::InvalidConfig(msg.into())
    }
}

impl From<&str> for ChartError {
    fn from(value: &str) -> Self {
        Self::msg(value)
    }
}

impl From<String> for ChartError {
    fn from(value: String) -> Self {
        Self::Message(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn displays_wrapped_message() {
        let err = ChartError::from("beatmap missing");
        assert_eq!(err.to_string(), "beatmap missing");
    }

    #[test]
    fn converts_json_errors() {
        let err: ChartError = serde_json::from_str::<u32>("nope").unwrap_err().into();
        assert!(matches!(err, ChartError::Json(_)));
        assert!(err.to_string().starts_with("malformed json"));
    }

    #[test]
    fn reports_unknown_duration() {
        let err = ChartError::UnknownDuration(-1.0);
        assert!(err.to_string().contains("-1"));
    }
}
