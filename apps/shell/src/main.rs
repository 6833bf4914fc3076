use anyhow::Context;
use clap::Parser;
use sailor_domain::config::ShellConfig;
use sailor_kernel::config::load_config;
use sailor_logger::Logger;
use sailor_shell::{Cli, Shell};
use tokio::io::{BufReader, stdin, stdout};

#[sailor_runtime::main(cooperative)]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config: ShellConfig =
        load_config(cli.config.as_deref()).context("Critical: Configuration is malformed")?;
    let _log = Logger::from_config(env!("CARGO_PKG_NAME"), &config.logging)?;

    Shell::start(&cli, &config).await?.run(BufReader::new(stdin()), stdout()).await
}
