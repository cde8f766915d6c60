//! Scripted walk through the admin flow.

use anyhow::Result;
use chrono::Duration;
use eventhub_core::{DraftField, EventHub};
use owo_colors::OwoColorize;

use crate::render::Output;

pub async fn run(hub: &EventHub, output: Output) -> Result<()> {
    let zone = hub.zone();
    let today = hub.today();
    let tomorrow = today + Duration::days(1);

    step("Start");
    output.show(&hub.view())?;

    step("Login");
    hub.login().await?;
    output.show(&hub.view())?;

    step("Switch to admin mode");
    hub.toggle_mode()?;
    hub.open_composer()?;
    hub.update_draft_field(DraftField::Title, "Volunteer Day");
    hub.update_draft_field(DraftField::Description, "Help out at the local park.");
    hub.update_draft_field(DraftField::Date, tomorrow.format("%Y-%m-%dT10:00").to_string());
    hub.update_draft_field(DraftField::Location, "Park");
    output.show(&hub.view())?;

    step("Submit");
    let event = hub.submit_draft().await?;
    println!("{}", format!("  Created: {} ({})", event.title, event.id).green());

    step(&format!("Events on {}", zone.format_day(tomorrow)));
    hub.select_date(Some(tomorrow));
    output.show(&hub.view())?;

    step(&format!("Events on {}", zone.format_day(today)));
    hub.select_date(Some(today));
    output.show(&hub.view())?;

    Ok(())
}

fn step(title: &str) {
    println!("\n{}", format!("── {title} ──").cyan().bold());
}
