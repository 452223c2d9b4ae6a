//! Static strategy pattern for CLI commands.
//!
//! Each command is a separate strategy with its own input type. Shared
//! wiring (config loading, pipeline and completer construction) lives here so
//! every command builds collaborators the same way.

use addrkit_config::{Config, load_entity_mapping};
use addrkit_core::{EntityBackend, LLMProvider, RegionStore};
use addrkit_extract::{ExtractionPipeline, NormalizerRegistry};
use addrkit_providers::{DashScopeProvider, HttpTaggerBackend, LlmAddressBackend};
use addrkit_region::{AddressCompleter, DatabaseRegionStore};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};

mod complete;
mod decompose;
mod extract;
mod info;
mod init;
mod models;
mod parse;
mod version;

pub use complete::{CompleteInput, CompleteStrategy};
pub use decompose::DecomposeStrategy;
pub use extract::{ExtractInput, ExtractStrategy};
pub use info::InfoStrategy;
pub use init::InitStrategy;
pub use models::ModelsStrategy;
pub use parse::ParseStrategy;
pub use version::VersionStrategy;

/// Core trait defining the contract for all command strategies.
///
/// Each strategy defines its own input type via the associated type, so
/// parameters are passed without runtime casting or boxing.
pub trait CommandStrategy: Send + Sync + 'static {
    type Input;

    async fn execute(&self, input: Self::Input) -> anyhow::Result<()>;
}

/// Explicit config path, or `~/addrkit/config.json`.
fn config_path_or_default(path: Option<PathBuf>) -> anyhow::Result<PathBuf> {
    path.map_or_else(Config::config_path, Ok)
}

fn load_config(path: Option<PathBuf>) -> anyhow::Result<Config> {
    let path = config_path_or_default(path)?;
    let config = Config::load_from(&path)?;
    info!("Loaded config from {}", path.display());
    Ok(config)
}

/// Region completer over the configured database, if one is configured.
async fn build_completer(
    config: &Config,
) -> anyhow::Result<Option<AddressCompleter<Arc<dyn RegionStore>>>> {
    let Some(url) = config.database.url.as_deref() else {
        info!("No database configured, region completion disabled");
        return Ok(None);
    };

    let store = DatabaseRegionStore::connect(url, &config.database.region_table).await?;
    let store: Arc<dyn RegionStore> = Arc::new(store);
    Ok(Some(
        AddressCompleter::new(store).with_codes(config.database.region_types),
    ))
}

/// Wire backends, normalizers and the completer from the config.
async fn build_pipeline(config: &Config, complete: bool) -> anyhow::Result<ExtractionPipeline> {
    let mapping = load_entity_mapping(config.extraction.entity_config_path.as_deref());
    let mut pipeline = ExtractionPipeline::new(NormalizerRegistry::with_defaults(mapping))
        .with_default_model(config.extraction.default_model.clone());

    match config.dashscope_api_key() {
        Some(api_key) => {
            let mut provider = DashScopeProvider::new(api_key);
            if let Some(dashscope) = &config.providers.dashscope {
                if let Some(base_url) = &dashscope.base_url {
                    provider = provider.with_base_url(base_url.clone());
                }
                if let Some(model) = &dashscope.model {
                    provider = provider.with_model(model.clone());
                }
            }
            let provider: Arc<dyn LLMProvider> = Arc::new(provider);
            pipeline = pipeline.with_backend(Arc::new(LlmAddressBackend::new(provider)));
        }
        None => warn!("No DashScope API key configured, LLM backend disabled"),
    }

    for (model, backend) in &config.backends {
        let tagger: Arc<dyn EntityBackend> =
            Arc::new(HttpTaggerBackend::new(model.clone(), backend.endpoint.clone())?);
        pipeline = pipeline.with_backend(tagger);
    }

    if complete && config.extraction.complete_address {
        match build_completer(config).await {
            Ok(Some(completer)) => pipeline = pipeline.with_completer(completer),
            Ok(None) => {}
            Err(e) => warn!("Region database unavailable, completion disabled: {e:#}"),
        }
    }

    Ok(pipeline)
}
