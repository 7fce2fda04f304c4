//! # curlline Main Entry Point

use anyhow::Result;
use curlline::cmd_args::CommandLineArgs;
use curlline::config;
use curlline::{
    JsonStore, QuoteStyle, SessionController, ShellExecutor, TerminalLineSource,
    TerminalRenderer,
};
use tracing_subscriber::{fmt::time::ChronoLocal, EnvFilter};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let args = CommandLineArgs::parse();
    init_tracing_subscriber(args.verbose())?;

    let store = JsonStore::new(config::resolve_store_dir(args.config_dir()));
    tracing::debug!("storage directory: {}", store.dir().display());

    let color = !args.no_color() && atty::is(atty::Stream::Stdout);
    let mut controller = SessionController::new(
        Box::new(store),
        ShellExecutor::default(),
        TerminalLineSource::new(),
        TerminalRenderer::new(std::io::stdout(), color),
        QuoteStyle::for_host(args.windows_quoting()),
    );

    controller.run().await
}

fn init_tracing_subscriber(verbose: bool) -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(build_env_filter(verbose)?)
        .with_writer(std::io::stderr)
        .with_timer(ChronoLocal::rfc_3339())
        .try_init()
        .map_err(|e| anyhow::anyhow!(e))
}

/// `--verbose` forces debug; otherwise the level comes from `CURLLINE_LOG_LEVEL`
fn build_env_filter(verbose: bool) -> Result<EnvFilter> {
    let base = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_env(format!(
            "{}_LOG_LEVEL",
            env!("CARGO_PKG_NAME").to_uppercase()
        ))
    };
    Ok(base
        .add_directive("tokio=warn".parse()?)
        .add_directive("tracing=warn".parse()?)
        .add_directive("tracing_subscriber=warn".parse()?))
}
