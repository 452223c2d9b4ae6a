use std::path::PathBuf;

use addrkit_extract::models::SUPPORTED_MODELS;

/// Strategy for listing supported models and which are configured.
#[derive(Debug, Clone, Copy)]
pub struct ModelsStrategy;

impl super::CommandStrategy for ModelsStrategy {
    type Input = Option<PathBuf>;

    async fn execute(&self, input: Self::Input) -> anyhow::Result<()> {
        let config = super::load_config(input)?;
        let pipeline = super::build_pipeline(&config, false).await?;
        let available = pipeline.models();

        println!("Default: {}", pipeline.default_model());
        for model in SUPPORTED_MODELS {
            let status = if available.contains(model) {
                "available"
            } else {
                "not configured"
            };
            println!("  {model}: {status}");
        }
        Ok(())
    }
}
