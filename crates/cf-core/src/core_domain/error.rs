use crate::core::TemplateKind;

// ---------------------------------------------------------------------------
// Sub-error types
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum TemplateError {
    #[error("no template {key:?} under {kind} in the catalog")]
    UnknownKey { kind: TemplateKind, key: String },
    #[error(
        "catalog version mismatch between cot trigger ({trigger_version}) \
         and answer extraction ({extraction_version})"
    )]
    VersionMismatch {
        trigger_version: String,
        extraction_version: String,
    },
    #[error("{count} choices exceed the 26-letter label range")]
    TooManyChoices { count: usize },
}

#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    #[error("backend returned HTTP {status}: {body}")]
    HttpStatus { status: u16, body: String },
    #[error("backend connection failed: {0}")]
    Connection(String),
    #[error("backend returned a malformed response: {0}")]
    MalformedResponse(String),
    #[error("no live backend configured for {0}")]
    NotConfigured(String),
    #[error("missing API key for backend {0}")]
    MissingApiKey(String),
}

#[derive(Debug, thiserror::Error)]
pub enum DatasetError {
    #[error("unrecognized dataset shape: {0}")]
    UnrecognizedShape(String),
    #[error("ground-truth answer {answer:?} not among the item's choices")]
    AnswerNotInChoices { answer: String },
}

// ---------------------------------------------------------------------------
// Top-level error
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum SweepError {
    #[error(transparent)]
    Template(#[from] TemplateError),
    #[error(transparent)]
    Backend(#[from] BackendError),
    #[error(transparent)]
    Dataset(#[from] DatasetError),
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    // -- From conversions --

    #[test]
    fn test_from_template_error_to_sweep_error() {
        let err: SweepError = TemplateError::UnknownKey {
            kind: TemplateKind::Instruction,
            key: "missing".to_owned(),
        }
        .into();
        assert!(matches!(
            err,
            SweepError::Template(TemplateError::UnknownKey { .. })
        ));
    }

    #[test]
    fn test_from_backend_error_to_sweep_error() {
        let err: SweepError = BackendError::Connection("refused".into()).into();
        assert!(matches!(
            err,
            SweepError::Backend(BackendError::Connection(_))
        ));
    }

    #[test]
    fn test_from_dataset_error_to_sweep_error() {
        let err: SweepError = DatasetError::UnrecognizedShape("a bare number".into()).into();
        assert!(matches!(
            err,
            SweepError::Dataset(DatasetError::UnrecognizedShape(_))
        ));
    }

    // -- Display formatting --

    #[test]
    fn test_display_unknown_key() {
        let err = TemplateError::UnknownKey {
            kind: TemplateKind::CotTrigger,
            key: "kojima-99".to_owned(),
        };
        assert_eq!(
            err.to_string(),
            "no template \"kojima-99\" under cot-triggers in the catalog"
        );
    }

    #[test]
    fn test_display_version_mismatch() {
        let err = TemplateError::VersionMismatch {
            trigger_version: "0.01".to_owned(),
            extraction_version: "0.02".to_owned(),
        };
        assert_eq!(
            err.to_string(),
            "catalog version mismatch between cot trigger (0.01) and answer extraction (0.02)"
        );
    }

    #[test]
    fn test_display_too_many_choices() {
        let err = TemplateError::TooManyChoices { count: 30 };
        assert_eq!(err.to_string(), "30 choices exceed the 26-letter label range");
    }

    #[test]
    fn test_display_backend_http_status() {
        let err = BackendError::HttpStatus {
            status: 429,
            body: "rate limited".into(),
        };
        assert_eq!(err.to_string(), "backend returned HTTP 429: rate limited");
    }

    #[test]
    fn test_display_backend_not_configured() {
        let err = BackendError::NotConfigured("openai".into());
        assert_eq!(err.to_string(), "no live backend configured for openai");
    }

    #[test]
    fn test_display_unrecognized_shape() {
        let err = DatasetError::UnrecognizedShape("expected a list of items".into());
        assert_eq!(
            err.to_string(),
            "unrecognized dataset shape: expected a list of items"
        );
    }

    #[test]
    fn test_display_sweep_transparent() {
        let err: SweepError = BackendError::Connection("dns lookup failed".into()).into();
        assert_eq!(
            err.to_string(),
            "backend connection failed: dns lookup failed"
        );
    }
}
