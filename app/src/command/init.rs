use std::path::PathBuf;

use addrkit_config::Config;

/// Strategy for initializing the configuration.
///
/// Writes the config template to `~/addrkit/config.json`, or to the path
/// given with `--config`.
#[derive(Debug, Clone, Copy)]
pub struct InitStrategy;

impl super::CommandStrategy for InitStrategy {
    type Input = Option<PathBuf>;

    async fn execute(&self, input: Self::Input) -> anyhow::Result<()> {
        let config_path = match input {
            Some(path) => {
                if let Some(parent) = path.parent() {
                    std::fs::create_dir_all(parent)?;
                }
                Config::create_config_at(&path)?;
                path
            }
            None => Config::create_config()?,
        };

        println!("✅ Created config file at: {}", config_path.display());
        println!();
        println!("📝 Next steps:");
        println!("   1. Add your DashScope API key (or set DASHSCOPE_API_KEY)");
        println!("   2. Point database.url at the region table, or remove it to skip completion");
        println!("   3. Set tagger endpoints under backends for the NER and MGeo models");
        println!("   4. Run 'addrkit extract \"<address> <name> <phone>\"'");
        println!();
        Ok(())
    }
}
