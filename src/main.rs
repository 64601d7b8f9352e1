//! One-shot analysis from the command line:
//!
//! ```text
//! OPENAI_API_KEY=sk-... ecoscore https://www.amazon.com/dp/B0XXXXXXX
//! ```

use anyhow::{Context, Result, bail};
use ecoscore::{config::Config, oracle::OracleCredential, pipeline::EcoPipeline, telemetry};

const ENV_API_KEY: &str = "OPENAI_API_KEY";

#[tokio::main]
async fn main() -> Result<()> {
    telemetry::init_tracing();

    let Some(url) = std::env::args().nth(1) else {
        bail!("usage: ecoscore <product-url>");
    };
    // Read once here and handed to the pipeline; nothing below looks at the env.
    let credential = std::env::var(ENV_API_KEY)
        .ok()
        .and_then(OracleCredential::new)
        .with_context(|| format!("{ENV_API_KEY} is not set"))?;

    let config = Config::from_env()?;
    let pipeline = EcoPipeline::from_config(&config)?;
    let result = pipeline.analyze(&url, &credential).await?;

    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}
