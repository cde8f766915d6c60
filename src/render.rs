//! Terminal rendering of the hub's view model.

use anyhow::Result;
use eventhub_core::view::{AuthAction, ComposerView, EventCard, ViewModel};
use owo_colors::OwoColorize;

#[derive(Debug, Clone, Copy)]
pub struct Output {
    pub json: bool,
}

impl Output {
    pub fn show(&self, view: &ViewModel) -> Result<()> {
        if self.json {
            println!("{}", serde_json::to_string_pretty(view)?);
        } else {
            println!("{}", view.render());
        }
        Ok(())
    }

    pub fn error(&self, err: &impl std::fmt::Display) {
        eprintln!("  {}", err.to_string().red());
    }
}

/// Extension trait for colored terminal rendering.
pub trait Render {
    fn render(&self) -> String;
}

impl Render for AuthAction {
    fn render(&self) -> String {
        let label = self.label();
        match self {
            AuthAction::Login => label.green().to_string(),
            AuthAction::Logout => label.red().to_string(),
            AuthAction::LoggingIn | AuthAction::LoggingOut => label.dimmed().to_string(),
        }
    }
}

impl Render for EventCard {
    fn render(&self) -> String {
        let mut lines = vec![format!("  {}", self.title.bold())];
        let mut meta = Vec::new();
        if let Some(location) = &self.location {
            meta.push(format!("📍 {location}"));
        }
        meta.push(self.when.clone());
        lines.push(format!("    {}", meta.join("  ").dimmed()));
        lines.push(format!("    {}", self.description));
        lines.join("\n")
    }
}

impl Render for ComposerView {
    fn render(&self) -> String {
        let draft = &self.draft;
        let field = |name: &str, value: &str| {
            let shown = if value.is_empty() { "-" } else { value };
            format!("    {:<12} {}", name.dimmed(), shown)
        };

        let mut lines = vec![
            format!("  {}", "Add New Event".blue().bold()),
            field("title", &draft.title),
            field("description", &draft.description),
            field("date", &draft.date),
            field("location", &draft.location),
            format!("    [{}]", self.submit_label.blue()),
        ];
        if let Some(error) = &self.error {
            lines.push(format!("    {}", error.red()));
        }
        lines.join("\n")
    }
}

impl Render for ViewModel {
    fn render(&self) -> String {
        let mut lines = Vec::new();

        let mut header = format!("{} Events Hub", "Community".blue());
        if let Some(user) = &self.user_line {
            header.push_str(&format!("   👤 {user}"));
        }
        if let Some(toggle) = &self.mode_toggle {
            let label = if toggle.enabled {
                toggle.label.yellow().to_string()
            } else {
                toggle.label.dimmed().to_string()
            };
            header.push_str(&format!("   [{label}]"));
        }
        header.push_str(&format!("   [{}]", self.auth_action.render()));
        lines.push(header);

        if let Some(error) = &self.error {
            lines.push(format!("  {}", error.red()));
        }

        if let Some(composer) = &self.composer {
            lines.push(String::new());
            lines.push(composer.render());
        } else if self.can_add_events {
            lines.push(format!("  {}", "Type `new` to add an event.".dimmed()));
        }

        lines.push(String::new());
        lines.push(format!("📅 {}", self.list_heading.bold()));
        for card in &self.events {
            lines.push(card.render());
        }
        if let Some(message) = self.empty_message {
            lines.push(format!("  {}", message.dimmed()));
        }

        lines.join("\n")
    }
}
