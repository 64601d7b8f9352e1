use thiserror::Error;

#[derive(Error, Debug)]
pub enum OracleError {
    /// The call itself failed: network, non-success status, or a reply
    /// envelope without any message content.
    #[error("oracle call failed: {0}")]
    Transport(String),

    /// The oracle answered, but not with a judgment we can read.
    #[error("oracle reply is not a valid judgment: {0}")]
    Format(String),
}

impl OracleError {
    pub fn from_reqwest_error(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Transport("request timed out".to_string())
        } else if let Some(status) = err.status() {
            Self::Transport(format!("http error {status}"))
        } else {
            Self::Transport(err.to_string())
        }
    }

    pub fn is_format(&self) -> bool {
        matches!(self, Self::Format(_))
    }
}
