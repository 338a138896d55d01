use ask_agent::cli::{self, Command};
use ask_agent::{AskAgent, Config};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ask_core=warn,ask_agent=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    dotenvy::dotenv().ok();

    let command = Command::parse(std::env::args().skip(1));
    let config = Config::from_env();

    cli::run(command, || AskAgent::connect(config), &mut std::io::stdout()).await
}
