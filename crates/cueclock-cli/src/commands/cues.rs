use clap::Args;
use cueclock_core::{builtin_catalog, trigger_offset};

use super::format_clock;

#[derive(Args)]
pub struct CuesArgs {
    /// Print the catalog as JSON
    #[arg(long)]
    json: bool,
}

pub fn run(args: CuesArgs) -> Result<(), Box<dyn std::error::Error>> {
    let catalog = builtin_catalog();
    if args.json {
        println!("{}", serde_json::to_string_pretty(&catalog)?);
        return Ok(());
    }
    for cue in catalog {
        if let Some(trigger_at) = trigger_offset(&cue.id) {
            println!(
                "{:>10}  {:<18} fires at {} remaining",
                cue.id,
                cue.label,
                format_clock(trigger_at)
            );
        }
    }
    Ok(())
}
