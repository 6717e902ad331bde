use thiserror::Error;

#[derive(Error, Debug)]
pub enum UtilsError {
    #[error("Invalid instant '{value}': {reason}")]
    InvalidInstant { value: String, reason: String },

    #[error("Serialization error at {path}: {reason}")]
    SerializationError { path: String, reason: String },

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration validation error in {field}: {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Input,
    Serialization,
    Io,
    Configuration,
}

impl UtilsError {
    pub fn invalid_instant(value: impl ToString, reason: impl Into<String>) -> Self {
        UtilsError::InvalidInstant {
            value: value.to_string(),
            reason: reason.into(),
        }
    }

    pub fn serialization(path: impl Into<String>, reason: impl Into<String>) -> Self {
        UtilsError::SerializationError {
            path: path.into(),
            reason: reason.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            UtilsError::InvalidInstant { .. } => ErrorCategory::Input,
            UtilsError::SerializationError { .. } => ErrorCategory::Serialization,
            UtilsError::JsonError(e) if is_recursion_limit(e) => ErrorCategory::Serialization,
            // Malformed JSON input is a caller problem, encoder failures are serialization ones.
            UtilsError::JsonError(e) if e.is_syntax() || e.is_eof() => ErrorCategory::Input,
            UtilsError::JsonError(_) => ErrorCategory::Serialization,
            UtilsError::IoError(_) => ErrorCategory::Io,
            UtilsError::ConfigError { .. }
            | UtilsError::ConfigValidationError { .. }
            | UtilsError::InvalidConfigValueError { .. } => ErrorCategory::Configuration,
        }
    }

    pub fn is_serialization_error(&self) -> bool {
        matches!(
            self,
            UtilsError::SerializationError { .. } | UtilsError::JsonError(_)
        )
    }
}

// serde_json reports nesting past its parser limit as a syntax error and exposes no code for it.
fn is_recursion_limit(e: &serde_json::Error) -> bool {
    e.to_string().starts_with("recursion limit exceeded")
}

impl ErrorCategory {
    pub fn exit_code(self) -> i32 {
        match self {
            ErrorCategory::Input => 1,
            ErrorCategory::Serialization => 2,
            ErrorCategory::Io => 3,
            ErrorCategory::Configuration => 4,
        }
    }
}

pub type Result<T> = std::result::Result<T, UtilsError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_exit_codes() {
        let err = UtilsError::invalid_instant("abc", "not a date");
        assert_eq!(err.category(), ErrorCategory::Input);
        assert_eq!(err.category().exit_code(), 1);

        let err = UtilsError::serialization("$.a", "cycle");
        assert_eq!(err.category().exit_code(), 2);
        assert!(err.is_serialization_error());

        let err = UtilsError::ConfigError {
            message: "bad".to_string(),
        };
        assert_eq!(err.category().exit_code(), 4);
        assert!(!err.is_serialization_error());
    }

    #[test]
    fn test_json_syntax_error_is_input() {
        let parse_err = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        let err = UtilsError::from(parse_err);
        assert_eq!(err.category(), ErrorCategory::Input);
    }

    #[test]
    fn test_nesting_past_parser_limit_is_serialization() {
        let deep = format!("{}{}", "[".repeat(200), "]".repeat(200));
        let parse_err = serde_json::from_str::<serde_json::Value>(&deep).unwrap_err();
        let err = UtilsError::from(parse_err);
        assert_eq!(err.category(), ErrorCategory::Serialization);
        assert_eq!(err.category().exit_code(), 2);
    }

    #[test]
    fn test_display_includes_path() {
        let err = UtilsError::serialization("$.a[2]", "cyclic structure");
        assert_eq!(
            err.to_string(),
            "Serialization error at $.a[2]: cyclic structure"
        );
    }
}
