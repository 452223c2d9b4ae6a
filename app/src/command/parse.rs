use addrkit_extract::parse_address;

/// Strategy for the regex-cascade address parser.
///
/// Needs no configuration; prints the parsed levels as JSON.
#[derive(Debug, Clone, Copy)]
pub struct ParseStrategy;

impl super::CommandStrategy for ParseStrategy {
    type Input = String;

    async fn execute(&self, input: Self::Input) -> anyhow::Result<()> {
        let parsed = parse_address(&input);
        println!("{}", serde_json::to_string_pretty(&parsed)?);
        Ok(())
    }
}
