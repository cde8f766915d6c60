//! Show the effective configuration, optionally writing it back to disk.

use anyhow::Result;
use eventhub_core::config::HubConfig;
use owo_colors::OwoColorize;

use crate::render::Output;

pub fn run(config: &HubConfig, save: bool, output: Output) -> Result<()> {
    let path = HubConfig::config_path()?;

    if output.json {
        println!("{}", serde_json::to_string_pretty(config)?);
    } else {
        println!("{}", path.display().to_string().dimmed());
        println!("  timezone           {}", config.timezone);
        println!("  login_latency      {:?}", config.login_latency);
        println!("  logout_latency     {:?}", config.logout_latency);
        println!("  persist_latency    {:?}", config.persist_latency);
        println!("  seed_sample_events {}", config.seed_sample_events);
    }

    if save {
        config.save(&path)?;
        println!("{}", format!("Saved: {}", path.display()).green());
    }

    Ok(())
}
