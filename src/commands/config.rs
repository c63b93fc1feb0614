use anyhow::Result;

use st_vision::ChartConfig;

pub fn print_config(config: &ChartConfig) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(config)?);
    Ok(())
}
