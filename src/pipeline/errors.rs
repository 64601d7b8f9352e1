use thiserror::Error;

use crate::fetcher::FetchError;
use crate::oracle::OracleError;
use crate::pipeline::Stage;
use crate::scoring::ScoreError;

/// Problems with the caller's input, reported before anything is fetched.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InputError {
    #[error("missing url")]
    MissingUrl,

    #[error("malformed url: {0}")]
    MalformedUrl(String),

    #[error("host {0} is not a supported product catalog")]
    UnsupportedHost(String),

    #[error("missing oracle credential")]
    MissingCredential,
}

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error(transparent)]
    Input(#[from] InputError),

    #[error("fetch failed: {0}")]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    OracleTransport(OracleError),

    #[error(transparent)]
    OracleFormat(OracleError),

    #[error("scoring failed: {0}")]
    Score(#[from] ScoreError),
}

impl From<OracleError> for PipelineError {
    fn from(err: OracleError) -> Self {
        if err.is_format() {
            Self::OracleFormat(err)
        } else {
            Self::OracleTransport(err)
        }
    }
}

impl PipelineError {
    /// The stage that was running when the pipeline moved to `Failed`.
    /// Input errors happen before `Fetching` starts, so they report it.
    pub fn stage(&self) -> Stage {
        match self {
            Self::Input(_) | Self::Fetch(_) => Stage::Fetching,
            Self::OracleTransport(_) | Self::OracleFormat(_) => Stage::Querying,
            Self::Score(_) => Stage::Scoring,
        }
    }
}
