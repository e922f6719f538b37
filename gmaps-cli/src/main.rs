use anyhow::{Result, anyhow};
use clap::Parser;
use gmaps_cli::cli::{Cli, Commands};
use gmaps_cli::console::run_console;
use gmaps_cli::launcher::{APP_NAME, build_runner, load_config};
use gmaps_cli::render::collect_turn;
use gmaps_telemetry::{init_json_telemetry, init_telemetry};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let init = if cli.json { init_json_telemetry(APP_NAME) } else { init_telemetry(APP_NAME) };
    init.map_err(|e| anyhow!("failed to initialize logging: {}", e))?;

    let config = load_config(cli.config.as_deref())?;
    let runner = build_runner(&config, |name| std::env::var(name).ok())?;

    match cli.command {
        Commands::Ask { text } => {
            let output = collect_turn(runner.run(&cli.user_id, text.join(" ")).await?).await;
            if let Some(answer) = output.answer {
                println!("{}", answer);
            }
            match output.error {
                Some(e) => Err(e.into()),
                None => Ok(()),
            }
        }
        Commands::Console => run_console(&runner, &cli.user_id).await,
    }
}
