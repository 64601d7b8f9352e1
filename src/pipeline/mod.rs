//! Sequences one analysis: fetch the page, extract the product fields, ask
//! the oracle, score the judgment.
//!
//! ```text
//! Fetching -> Extracting -> Querying -> Scoring -> Done
//!     \___________\______________\__________\____> Failed
//! ```
//!
//! The first failing stage ends the run; nothing after it executes and no
//! partial result is returned. A failed run is simply started again.

pub mod errors;

pub use errors::{InputError, PipelineError};

use std::fmt;
use std::sync::Arc;

use tokio::sync::Semaphore;
use tracing::{debug, info, instrument, warn};
use url::Url;

use crate::config::Config;
use crate::extractor::{self, ProductRaw};
use crate::fetcher::{HttpFetcher, MarkupSource};
use crate::oracle::{Oracle, OracleClient, OracleCredential};
use crate::scoring::{self, EcoScoreResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Fetching,
    Extracting,
    Querying,
    Scoring,
    Done,
    Failed,
}

impl Stage {
    /// The stage reached when this one succeeds. Terminal stages have none.
    pub fn next(self) -> Option<Stage> {
        match self {
            Stage::Fetching => Some(Stage::Extracting),
            Stage::Extracting => Some(Stage::Querying),
            Stage::Querying => Some(Stage::Scoring),
            Stage::Scoring => Some(Stage::Done),
            Stage::Done | Stage::Failed => None,
        }
    }

    pub fn is_terminal(self) -> bool {
        self.next().is_none()
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Fetching => "fetching",
            Stage::Extracting => "extracting",
            Stage::Querying => "querying",
            Stage::Scoring => "scoring",
            Stage::Done => "done",
            Stage::Failed => "failed",
        };
        f.write_str(name)
    }
}

fn advance(stage: Stage) {
    if let Some(next) = stage.next() {
        debug!(from = %stage, to = %next, "stage complete");
    }
}

/// Moves the run to `Failed`. The error variant names the stage it left.
fn fail<E>(err: E) -> PipelineError
where
    E: Into<PipelineError>,
{
    let err = err.into();
    warn!(stage = %err.stage(), error = %err, "analysis failed");
    err
}

#[derive(Clone)]
pub struct EcoPipeline {
    fetcher: Arc<dyn MarkupSource>,
    oracle: Arc<dyn Oracle>,
    catalog_hosts: Vec<String>,
}

impl EcoPipeline {
    pub fn new(
        fetcher: Arc<dyn MarkupSource>,
        oracle: Arc<dyn Oracle>,
        catalog_hosts: Vec<String>,
    ) -> Self {
        Self {
            fetcher,
            oracle,
            catalog_hosts,
        }
    }

    /// HTTP fetcher and oracle client sharing one outbound concurrency cap.
    pub fn from_config(config: &Config) -> Result<Self, PipelineError> {
        let limiter = Arc::new(Semaphore::new(config.outbound_concurrency()));
        let fetcher = HttpFetcher::new(config)?.with_limiter(limiter.clone());
        let oracle = OracleClient::new(config)?.with_limiter(limiter);

        Ok(Self::new(
            Arc::new(fetcher),
            Arc::new(oracle),
            config.catalog_hosts().to_vec(),
        ))
    }

    /// Run the whole chain for one product URL.
    #[instrument(skip_all, fields(url = %url))]
    pub async fn analyze(
        &self,
        url: &str,
        credential: &OracleCredential,
    ) -> Result<EcoScoreResult, PipelineError> {
        let url = validate_product_url(url, &self.catalog_hosts)?;

        let page = self.fetcher.fetch(url.as_str()).await.map_err(fail)?;
        advance(Stage::Fetching);

        let product = extractor::extract(&page.body_utf8);
        if product.is_empty() {
            // Still a valid input; the oracle will just have little to go on.
            warn!(final_url = %page.url_final, "no product fields found in markup");
        }
        advance(Stage::Extracting);

        let judgment = self.oracle.judge(&product, credential).await.map_err(fail)?;
        advance(Stage::Querying);

        let result = scoring::evaluate(judgment).map_err(fail)?;
        advance(Stage::Scoring);

        info!(score = result.score, "analysis complete");
        Ok(result)
    }

    /// Fetch and extract only. Any non-empty URL is attempted; a URL that
    /// cannot be fetched surfaces as a fetch failure.
    #[instrument(skip_all, fields(url = %url))]
    pub async fn extract_product(&self, url: &str) -> Result<ProductRaw, PipelineError> {
        let url = url.trim();
        if url.is_empty() {
            return Err(InputError::MissingUrl.into());
        }

        let page = self.fetcher.fetch(url).await.map_err(fail)?;
        advance(Stage::Fetching);
        let product = extractor::extract(&page.body_utf8);
        advance(Stage::Extracting);

        Ok(product)
    }
}

/// Check a product URL before anything goes over the wire.
///
/// The host must contain one of `catalog_hosts` (e.g. `amazon.` matches
/// `www.amazon.com` and `amazon.co.uk`). An empty list accepts any host.
pub fn validate_product_url(raw: &str, catalog_hosts: &[String]) -> Result<Url, InputError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(InputError::MissingUrl);
    }

    let url = Url::parse(raw).map_err(|e| InputError::MalformedUrl(e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(InputError::MalformedUrl(format!(
            "unsupported scheme {}",
            url.scheme()
        )));
    }

    let host = url
        .host_str()
        .ok_or_else(|| InputError::MalformedUrl("url has no host".to_string()))?
        .to_ascii_lowercase();

    if !catalog_hosts.is_empty() && !catalog_hosts.iter().any(|marker| host.contains(marker.as_str())) {
        return Err(InputError::UnsupportedHost(host));
    }

    Ok(url)
}
