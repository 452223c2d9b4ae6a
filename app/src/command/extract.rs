use std::io::BufRead;
use std::path::PathBuf;

use addrkit_extract::ExtractionPipeline;
use serde_json::Value;
use tracing::info;

/// Input parameters for the Extract command strategy.
#[derive(Debug, Clone)]
pub struct ExtractInput {
    pub config: Option<PathBuf>,
    /// Text to extract from; stdin is read line by line when absent
    pub text: Option<String>,
    /// Optional model override
    pub model: Option<String>,
    /// Extraction schema as a JSON string
    pub schema: Option<String>,
    /// Run region completion when a database is configured
    pub complete: bool,
}

/// Strategy for running the extraction pipeline.
///
/// Prints one response envelope per input as a JSON line.
#[derive(Debug, Clone, Copy)]
pub struct ExtractStrategy;

impl super::CommandStrategy for ExtractStrategy {
    type Input = ExtractInput;

    async fn execute(&self, input: Self::Input) -> anyhow::Result<()> {
        let config = super::load_config(input.config)?;
        let schema = input
            .schema
            .as_deref()
            .map(serde_json::from_str::<Value>)
            .transpose()
            .map_err(|e| anyhow::anyhow!("Invalid schema JSON: {e}"))?;
        let pipeline = super::build_pipeline(&config, input.complete).await?;

        if let Some(text) = input.text {
            return run(&pipeline, &text, input.model.as_deref(), schema.as_ref()).await;
        }

        info!("Reading inputs from stdin");
        for line in std::io::stdin().lock().lines() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            run(&pipeline, &line, input.model.as_deref(), schema.as_ref()).await?;
        }
        Ok(())
    }
}

async fn run(
    pipeline: &ExtractionPipeline,
    text: &str,
    model: Option<&str>,
    schema: Option<&Value>,
) -> anyhow::Result<()> {
    let response = pipeline.extract(text, model, schema).await?;
    println!("{}", serde_json::to_string(&response)?);
    Ok(())
}
