//! Domain error types.
//!
//! Malformed input records are not errors: the parser drops them silently.
//! Only failures that abort a whole run are represented here.

/// Top-level error type for cancelcheck.
#[derive(Debug, thiserror::Error)]
pub enum CancelCheckError {
    #[error("cannot read event source {path}: {reason}")]
    Source { path: String, reason: String },

    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error("report rendering failed: {reason}")]
    Report { reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<&CancelCheckError> for std::process::ExitCode {
    fn from(err: &CancelCheckError) -> Self {
        let code: u8 = match err {
            CancelCheckError::Io(_) | CancelCheckError::Source { .. } => 1,
            CancelCheckError::ConfigParse { .. } | CancelCheckError::ConfigInvalid { .. } => 2,
            CancelCheckError::Report { .. } => 3,
        };
        std::process::ExitCode::from(code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_context() {
        let err = CancelCheckError::ConfigInvalid {
            section: "checker".into(),
            key: "window_seconds".into(),
            reason: "must be positive".into(),
        };
        assert_eq!(
            err.to_string(),
            "invalid config value [checker] window_seconds: must be positive"
        );
    }

    #[test]
    fn io_errors_convert_transparently() {
        let io = std::io::Error::new(std::io::ErrorKind::UnexpectedEof, "stream closed");
        let err: CancelCheckError = io.into();
        assert!(matches!(err, CancelCheckError::Io(_)));
        assert_eq!(err.to_string(), "stream closed");
    }

    fn exit_code_of(err: &CancelCheckError) -> String {
        format!("{:?}", std::process::ExitCode::from(err))
    }

    #[test]
    fn exit_codes_by_category() {
        let code = |n: u8| format!("{:?}", std::process::ExitCode::from(n));
        let source = CancelCheckError::Source {
            path: "t.csv".into(),
            reason: "missing".into(),
        };
        let config = CancelCheckError::ConfigParse {
            file: "c.ini".into(),
            reason: "bad".into(),
        };
        let report = CancelCheckError::Report {
            reason: "broken pipe".into(),
        };
        let io = CancelCheckError::Io(std::io::Error::other("gone"));
        assert_eq!(exit_code_of(&source), code(1));
        assert_eq!(exit_code_of(&io), code(1));
        assert_eq!(exit_code_of(&config), code(2));
        assert_eq!(exit_code_of(&report), code(3));
    }
}
