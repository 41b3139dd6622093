use thiserror::Error;

/// Failure taxonomy for wallpaper channel calls.
///
/// Every failed call maps to exactly one of these; the wire code returned
/// to the caller comes from [`BridgeError::code`]. Failures are terminal
/// for the call that produced them and never take the daemon down.
#[derive(Debug, Error)]
pub enum BridgeError {
    /// A required call argument was missing.
    #[error("{0}")]
    InvalidArgs(String),

    /// The file referenced by the `path` argument does not exist.
    #[error("Wallpaper file not found: {0}")]
    FileNotFound(String),

    /// URI resolution produced no byte stream.
    #[error("Failed to open input stream for URI")]
    Stream,

    /// The underlying wallpaper mechanism rejected the set call.
    #[error("Failed to set wallpaper: {message}")]
    Wallpaper {
        message: String,
        detail: Option<String>,
    },

    /// Anything else that went wrong around the operation.
    #[error("{message}")]
    Other {
        message: String,
        detail: Option<String>,
    },
}

impl BridgeError {
    pub fn invalid_args(msg: impl Into<String>) -> Self {
        Self::InvalidArgs(msg.into())
    }

    /// Wallpaper-mechanism failure, keeping the verbose description of the
    /// underlying error as the reply detail.
    pub fn wallpaper(err: impl std::fmt::Display + std::fmt::Debug) -> Self {
        Self::Wallpaper {
            message: err.to_string(),
            detail: Some(format!("{err:?}")),
        }
    }

    /// Wire code reported back to the caller.
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidArgs(_) => "INVALID_ARGS",
            Self::FileNotFound(_) => "FILE_NOT_FOUND",
            Self::Stream => "STREAM_ERROR",
            Self::Wallpaper { .. } => "WALLPAPER_ERROR",
            Self::Other { .. } => "ERROR",
        }
    }

    /// Extra description carried alongside the message, where one exists.
    pub fn detail(&self) -> Option<&str> {
        match self {
            Self::Wallpaper { detail, .. } | Self::Other { detail, .. } => detail.as_deref(),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_cover_the_taxonomy() {
        assert_eq!(BridgeError::invalid_args("x").code(), "INVALID_ARGS");
        assert_eq!(BridgeError::FileNotFound("/x".into()).code(), "FILE_NOT_FOUND");
        assert_eq!(BridgeError::Stream.code(), "STREAM_ERROR");
        assert_eq!(BridgeError::wallpaper("boom").code(), "WALLPAPER_ERROR");
        let other = BridgeError::Other {
            message: "weird".into(),
            detail: None,
        };
        assert_eq!(other.code(), "ERROR");
    }

    #[test]
    fn messages_match_the_channel_contract() {
        let err = BridgeError::FileNotFound("/tmp/missing.jpg".into());
        assert_eq!(err.to_string(), "Wallpaper file not found: /tmp/missing.jpg");

        let err = BridgeError::Stream;
        assert_eq!(err.to_string(), "Failed to open input stream for URI");

        let err = BridgeError::wallpaper("device rejected image");
        assert_eq!(err.to_string(), "Failed to set wallpaper: device rejected image");
    }

    #[test]
    fn detail_is_kept_only_where_it_exists() {
        assert!(BridgeError::invalid_args("x").detail().is_none());
        assert!(BridgeError::Stream.detail().is_none());
        assert_eq!(
            BridgeError::wallpaper("boom").detail(),
            Some("\"boom\"")
        );
    }
}
