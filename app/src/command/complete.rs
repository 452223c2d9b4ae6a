use std::path::PathBuf;

use addrkit_core::AddressRecord;
use addrkit_region::ChangeKind;

/// Input parameters for the Complete command strategy.
#[derive(Debug, Clone)]
pub struct CompleteInput {
    pub config: Option<PathBuf>,
    pub province: String,
    pub city: String,
    pub district: String,
    pub street: String,
}

/// Strategy for reconciling region fields against the region table.
///
/// Prints the completed record as JSON, followed by the list of changes.
#[derive(Debug, Clone, Copy)]
pub struct CompleteStrategy;

impl super::CommandStrategy for CompleteStrategy {
    type Input = CompleteInput;

    async fn execute(&self, input: Self::Input) -> anyhow::Result<()> {
        let config = super::load_config(input.config)?;
        let completer = super::build_completer(&config)
            .await?
            .ok_or_else(|| anyhow::anyhow!("No database configured. Set database.url in the config file."))?;

        let record = AddressRecord {
            province_name: input.province,
            city_name: input.city,
            exp_area_name: input.district,
            street_name: input.street,
            ..AddressRecord::default()
        };

        let completion = completer.complete_with_changes(&record).await;
        println!("{}", serde_json::to_string_pretty(&completion.record)?);

        if completion.changes.is_empty() {
            println!("No changes");
        }
        for change in &completion.changes {
            match &change.kind {
                ChangeKind::Filled => println!("  filled {}: {}", change.field, change.value),
                ChangeKind::Replaced { previous } => {
                    println!("  replaced {}: {previous} -> {}", change.field, change.value);
                }
            }
        }
        Ok(())
    }
}
