//! Line-oriented interactive front-end.

use anyhow::Result;
use chrono::NaiveDate;
use eventhub_core::{DraftField, EventHub};
use owo_colors::OwoColorize;
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::render::Output;

const HELP: &str = "\
Commands:
  login                  log in
  logout                 log out
  mode                   switch between member and admin mode (admins only)
  new                    open the add-event form
  set <field> <value>    edit the form (title, description, date, location)
  submit                 add the event
  cancel                 close the form and discard it
  date <YYYY-MM-DD>      show events on one day
  date none              show all upcoming events
  dismiss                clear error messages
  show                   redraw
  help                   this text
  quit                   exit";

#[derive(Debug, PartialEq, Eq)]
enum ShellCommand {
    Login,
    Logout,
    Mode,
    New,
    Set(DraftField, String),
    Submit,
    Cancel,
    Date(Option<NaiveDate>),
    Dismiss,
    Show,
    Help,
    Quit,
}

pub async fn run(hub: &EventHub, output: Output) -> Result<()> {
    output.show(&hub.view())?;
    println!("{}", "Type `help` for commands.".dimmed());

    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    while let Some(line) = lines.next_line().await? {
        let command = match parse_line(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(e) => {
                output.error(&e);
                continue;
            }
        };

        if command == ShellCommand::Quit {
            break;
        }

        if let Err(e) = execute(hub, command).await {
            output.error(&e);
        }
        output.show(&hub.view())?;
    }

    Ok(())
}

async fn execute(hub: &EventHub, command: ShellCommand) -> Result<()> {
    match command {
        ShellCommand::Login => {
            println!("{}", "Logging In...".dimmed());
            hub.login().await?;
        }
        ShellCommand::Logout => {
            println!("{}", "Logging Out...".dimmed());
            hub.logout().await?;
        }
        ShellCommand::Mode => {
            hub.toggle_mode()?;
        }
        ShellCommand::New => hub.open_composer()?,
        ShellCommand::Set(field, value) => hub.update_draft_field(field, value),
        ShellCommand::Submit => {
            println!("{}", "Adding...".dimmed());
            let event = hub.submit_draft().await?;
            println!("{}", format!("  Created: {}", event.title).green());
        }
        ShellCommand::Cancel => hub.cancel_composer(),
        ShellCommand::Date(day) => hub.select_date(day),
        ShellCommand::Dismiss => hub.dismiss_error(),
        ShellCommand::Help => println!("{HELP}"),
        ShellCommand::Show | ShellCommand::Quit => {}
    }
    Ok(())
}

/// Parse one input line. Blank lines yield `None`.
fn parse_line(line: &str) -> Result<Option<ShellCommand>> {
    let line = line.trim();
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };

    let command = match word.to_lowercase().as_str() {
        "" => return Ok(None),
        "login" => ShellCommand::Login,
        "logout" => ShellCommand::Logout,
        "mode" => ShellCommand::Mode,
        "new" | "add" => ShellCommand::New,
        "set" => {
            let (field, value) = rest.split_once(char::is_whitespace).unwrap_or((rest, ""));
            if field.is_empty() {
                anyhow::bail!("Usage: set <title|description|date|location> <value>");
            }
            let field = field.parse::<DraftField>().map_err(|e| anyhow::anyhow!(e))?;
            ShellCommand::Set(field, value.trim().to_string())
        }
        "submit" => ShellCommand::Submit,
        "cancel" => ShellCommand::Cancel,
        "date" => match rest {
            "" | "none" | "all" => ShellCommand::Date(None),
            s => {
                let day = NaiveDate::parse_from_str(s, "%Y-%m-%d")
                    .map_err(|_| anyhow::anyhow!("Invalid date '{}'. Expected YYYY-MM-DD", s))?;
                ShellCommand::Date(Some(day))
            }
        },
        "dismiss" => ShellCommand::Dismiss,
        "show" | "ls" => ShellCommand::Show,
        "help" | "?" => ShellCommand::Help,
        "quit" | "exit" | "q" => ShellCommand::Quit,
        other => anyhow::bail!("Unknown command '{}'. Type `help` for commands.", other),
    };

    Ok(Some(command))
}
