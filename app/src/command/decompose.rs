use addrkit_extract::decompose;

/// Strategy for splitting raw text into name, phone and address.
#[derive(Debug, Clone, Copy)]
pub struct DecomposeStrategy;

impl super::CommandStrategy for DecomposeStrategy {
    type Input = String;

    async fn execute(&self, input: Self::Input) -> anyhow::Result<()> {
        let parts = decompose(&input);
        println!("{}", serde_json::to_string_pretty(&parts)?);
        Ok(())
    }
}
