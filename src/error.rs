pub type MenuetResult<T> = Result<T, MenuetError>;

#[derive(thiserror::Error, Debug)]
pub enum MenuetError {
    #[error("validation error: {0}")]
    Validation(String),

    #[error("composition error: {0}")]
    Composition(String),

    #[error("session error: {0}")]
    Session(String),

    #[error("serialization error: {0}")]
    Serde(String),

    #[error("transport error: {message}")]
    Transport { status: Option<u16>, message: String },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl MenuetError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn composition(msg: impl Into<String>) -> Self {
        Self::Composition(msg.into())
    }

    pub fn session(msg: impl Into<String>) -> Self {
        Self::Session(msg.into())
    }

    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }

    pub fn transport(msg: impl Into<String>) -> Self {
        Self::Transport {
            status: None,
            message: msg.into(),
        }
    }

    pub fn transport_status(status: u16, msg: impl Into<String>) -> Self {
        Self::Transport {
            status: Some(status),
            message: msg.into(),
        }
    }

    /// True for HTTP 401 transport failures; the shell reacts by redirecting
    /// to its login boundary. Every other error is surfaced as a notice.
    pub fn is_auth_failure(&self) -> bool {
        matches!(
            self,
            Self::Transport {
                status: Some(401),
                ..
            }
        )
    }
}
