use recast_api::error::{ConversionError, FieldError, InstantiationError};

#[derive(Debug, thiserror::Error)]
pub enum MapperError {
    #[error("instantiation error: {0}")]
    Instantiation(#[from] InstantiationError),

    #[error("conversion of field '{field}' failed: {source}")]
    Conversion {
        field: &'static str,
        #[source]
        source: ConversionError,
    },

    #[error("field error: {0}")]
    Field(#[from] FieldError),

    #[error("no converter for field '{field}' ({source_type} -> {target_type})")]
    Unmapped {
        field: &'static str,
        source_type: &'static str,
        target_type: &'static str,
    },

    #[error("config error: {0}")]
    Config(String),
}

impl MapperError {
    /// Add context to the error.
    ///
    /// For `Conversion` variant, context is added to the inner `ConversionError`.
    /// For `Config`, context is prepended to the message.
    pub fn with_context(self, ctx: impl std::fmt::Display) -> Self {
        match self {
            MapperError::Conversion { field, source } => MapperError::Conversion {
                field,
                source: source.with_context(ctx),
            },
            MapperError::Config(msg) => MapperError::Config(format!("{ctx}: {msg}")),
            other => other,
        }
    }
}
