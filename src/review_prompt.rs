//! Interactive driver for the review/escalation workflow
//!
//! Presents a flagged command for editing, offers whitelist promotion behind
//! a second confirmation, and asks for the final execute/cancel decision.
//! All state lives in the `ReviewSession`; this module only runs the prompts.

use anyhow::Result;
use bashpilot_core::ReviewSession;
use console::style;
use dialoguer::{Confirm, Input};

/// Run the prompts for one review session. Returns the session (carrying any
/// confirmed promotion) and whether the user approved execution.
pub fn run(mut session: ReviewSession) -> Result<(ReviewSession, bool)> {
    println!(
        "{}",
        style("The AI generated a blacklisted command.").yellow().bold()
    );
    println!("Please review and edit it before execution.\n");

    let edited: String = Input::new()
        .with_prompt("Command")
        .with_initial_text(session.text().to_string())
        .allow_empty(true)
        .interact_text()?;
    session.set_text(&edited);

    let Some(name) = session.command_name().map(str::to_string) else {
        println!("{}", style("Empty command; nothing to execute.").yellow());
        return Ok((session, false));
    };

    let wants_promotion = Confirm::new()
        .with_prompt(format!("Add '{name}' to the whitelist?"))
        .default(false)
        .interact()?;

    if wants_promotion {
        let confirmed = session.request_promotion(|name| {
            Confirm::new()
                .with_prompt(format!(
                    "Adding '{name}' to the whitelist will bypass future checks. Proceed?"
                ))
                .default(false)
                .interact()
                .unwrap_or(false)
        });
        if !confirmed {
            println!("{}", style(format!("'{name}' will not be whitelisted.")).yellow());
        }
    }

    let approved = Confirm::new()
        .with_prompt("Execute this command?")
        .default(true)
        .interact()?;

    Ok((session, approved))
}
