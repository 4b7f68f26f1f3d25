mod contact;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use rusty_forms::FormConfig;
use serde_json::json;
use tracing::info;

#[derive(Parser)]
#[command(
    name = "rusty-forms-demo",
    about = "Fill in the demo contact form and print its validation state"
)]
struct Cli {
    /// Form configuration file
    #[arg(long, default_value = "rusty-forms.toml")]
    config: PathBuf,

    /// Field assignment, applied in order (e.g. --set canProvideEmail=true)
    #[arg(long = "set", value_name = "NAME=VALUE")]
    assignments: Vec<String>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = FormConfig::load(&cli.config)?;
    let mut form = contact::contact_form(config)?;

    for raw in &cli.assignments {
        let (name, value) = contact::parse_assignment(raw)?;
        info!(field = %name, %value, "set");
        form.set_value(&name, value)
            .with_context(|| format!("Failed to apply `{}`", raw))?;
    }

    let report = json!({
        "valid": form.is_valid(),
        "value": form.value_map(),
        "errors": form.errors_map(),
    });
    println!("{}", serde_json::to_string_pretty(&report)?);

    if !form.is_valid() {
        std::process::exit(1);
    }
    Ok(())
}
