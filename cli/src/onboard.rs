use anyhow::{Context, Result};
use console::style;
use dialoguer::{Input, Select};
use nimbus_core::config::Config;

const BANNER: &str = r"
    -------------------------------------
         nimbus - weather assistant
    -------------------------------------
";

fn print_step(step: usize, total: usize, title: &str) {
    println!();
    println!(
        "{}",
        style(format!("[{}/{}] {}", step, total, title))
            .cyan()
            .bold()
    );
    println!();
}

fn setup_api_key() -> Result<String> {
    let api_key: String = Input::new()
        .with_prompt("Enter your OpenAI API key")
        .interact_text()
        .context("Failed to read API key")?;

    if api_key.is_empty() {
        return Err(anyhow::anyhow!("API key cannot be empty"));
    }

    Ok(api_key)
}

fn setup_weather_api_key() -> Result<String> {
    let api_key: String = Input::new()
        .with_prompt("Enter your WeatherAPI key")
        .interact_text()
        .context("Failed to read weather API key")?;

    if api_key.is_empty() {
        return Err(anyhow::anyhow!("Weather API key cannot be empty"));
    }

    Ok(api_key)
}

fn setup_model() -> Result<String> {
    let models = vec!["gpt-4o", "gpt-4o-mini", "gpt-5", "gpt-5-mini"];

    let selection = Select::new()
        .with_prompt("Select your model")
        .items(&models)
        .default(0)
        .interact()
        .context("Failed to select model")?;

    Ok(models[selection].to_string())
}

pub fn run_onboard() -> Result<Config> {
    println!("{}", style(BANNER).cyan().bold());

    println!("  {}", style("Welcome to Nimbus!").white().bold());
    println!(
        "  {}",
        style("This wizard will configure your assistant in under 30 seconds.").dim()
    );
    println!();

    print_step(1, 3, "OpenAI API Key");
    let api_key = setup_api_key()?;

    print_step(2, 3, "Weather API Key");
    let weather_api_key = setup_weather_api_key()?;

    print_step(3, 3, "Model Selection");
    let model = setup_model()?;

    let config = Config {
        api_key,
        weather_api_key,
        model,
        ..Default::default()
    };

    println!();
    println!("  {} Configuration complete!", style("✓").green().bold());
    println!(
        "  {} Config saved to {}",
        style("→").green(),
        style(nimbus_core::config::get_config_path().display()).cyan()
    );
    println!();
    println!(
        "  {} You can now run: {}",
        style("→").green(),
        style("nimbus ask").cyan().bold()
    );
    println!();

    Ok(config)
}
