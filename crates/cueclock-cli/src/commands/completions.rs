use clap::Args;
use clap_complete::Shell;

#[derive(Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    shell: Shell,
}

pub fn run(args: CompletionsArgs, mut cmd: clap::Command) -> Result<(), Box<dyn std::error::Error>> {
    clap_complete::generate(args.shell, &mut cmd, "cueclock", &mut std::io::stdout());
    Ok(())
}
