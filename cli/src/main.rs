use anyhow::Result;
use clap::{Parser, Subcommand};
use nimbus_core::{agent, config, providers, tools};
use std::io::Write;
use std::sync::Arc;

mod onboard;
mod server;

#[derive(Parser)]
#[command(name = "nimbus")]
#[command(about = "nimbus - a weather question answering agent", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Configure API keys and the model
    Onboard,
    /// Ask one question, or start a REPL when no message is given
    Ask {
        #[arg(short, long)]
        message: Option<String>,
    },
    /// Run the HTTP server exposing POST /ask
    Serve {
        #[arg(long)]
        host: Option<String>,
        #[arg(long)]
        port: Option<u16>,
    },
}

fn build_tool_registry(config: &config::Config) -> Result<Arc<agent::ToolRegistry>> {
    let weather_api_key = config.resolve_weather_api_key()?;
    let mut weather = tools::WeatherTool::new(weather_api_key);
    if let Some(base_url) = &config.weather_base_url {
        weather = weather.with_base_url(base_url.clone());
    }

    let mut registry = agent::ToolRegistry::new();
    registry.register(Arc::new(weather));
    Ok(Arc::new(registry))
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "nimbus=info,nimbus_core=info".into()),
        )
        .init();

    let cli = Cli::parse();

    let command = cli.command.unwrap_or_else(|| {
        if !config::config_exists() {
            Commands::Onboard
        } else {
            Commands::Ask { message: None }
        }
    });

    match command {
        Commands::Onboard => {
            let onboard_config = onboard::run_onboard().map_err(|e| {
                eprintln!("❌ Onboarding failed: {}", e);
                anyhow::anyhow!("Onboarding failed: {}", e)
            })?;
            config::save_config(&onboard_config)?;
        }
        Commands::Ask { message } => {
            let config = config::load_config()?;
            let provider = providers::create_provider(&config)?;
            let registry = build_tool_registry(&config)?;

            let mut session = agent::Session::new(provider, registry)
                .with_max_iterations(config.max_iterations);

            if let Some(msg) = message {
                match session.ask(&msg).await {
                    Ok(answer) => {
                        println!("{}", answer);
                    }
                    Err(e) => {
                        eprintln!("❌ Error: {}", e);
                        anyhow::bail!("Ask failed: {}", e);
                    }
                }
            } else {
                println!("⛅ Nimbus");
                println!("Ask about the weather (Ctrl+D to exit):\n");
                use std::io::{self, BufRead};
                let stdin = io::stdin();
                let stdout = io::stdout();
                let mut stdout_lock = stdout.lock();

                loop {
                    print!(">> ");
                    let _ = stdout_lock.flush();

                    let mut input = String::new();
                    let mut reader = stdin.lock();

                    match reader.read_line(&mut input) {
                        Ok(0) => {
                            println!("\n👋 Goodbye!");
                            break;
                        }
                        Ok(_) => {
                            let input = input.trim();
                            if input.is_empty() {
                                continue;
                            }

                            // One session for the whole REPL: later queries
                            // can refer back to earlier observations.
                            match session.ask(input).await {
                                Ok(answer) => {
                                    println!("{}", answer);
                                }
                                Err(e) => {
                                    eprintln!("❌ Error: {}", e);
                                }
                            }

                            println!();
                        }
                        Err(_) => {
                            println!("\n👋 Goodbye!");
                            break;
                        }
                    }
                }
            }
        }
        Commands::Serve { host, port } => {
            let config = config::load_config()?;
            let provider = providers::create_provider(&config)?;
            let registry = build_tool_registry(&config)?;

            let state = server::AppState {
                provider,
                tools: registry,
                max_iterations: config.max_iterations,
            };

            let host = host.unwrap_or(config.server.host);
            let port = port.unwrap_or(config.server.port);
            server::run(state, &host, port).await?;
        }
    }

    Ok(())
}
