//! Review/escalation workflow
//!
//! When the classifier flags a command, a `ReviewSession` presents it to a
//! human: the text is editable, the command may optionally be promoted onto
//! the whitelist, and the session ends in exactly one of Execute or Cancel.
//! The session is a plain value object; the interactive prompts live in the
//! binary so this state machine is testable headless.

use tokio::task::JoinHandle;

use crate::exec::CommandDispatcher;
use crate::lists::CommandLists;
use crate::safety::command_name;

/// Terminal outcome of a review session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewOutcome {
    Executed,
    Cancelled,
}

/// A flagged command pending human review
#[derive(Debug)]
pub struct ReviewSession {
    text: String,
    promoted_name: Option<String>,
}

impl ReviewSession {
    /// Open a session over the flagged line
    pub fn new(flagged_line: &str) -> Self {
        Self {
            text: flagged_line.to_string(),
            promoted_name: None,
        }
    }

    /// Current command text, possibly edited
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Replace the command text. An already-confirmed promotion keeps the
    /// name captured at confirmation time.
    pub fn set_text(&mut self, edited: &str) {
        self.text = edited.trim().to_string();
    }

    /// First token of the current text
    pub fn command_name(&self) -> Option<&str> {
        command_name(&self.text)
    }

    /// Ask to promote the command onto the whitelist. `confirm` receives the
    /// name that would be promoted (the first token of the current text) and
    /// must return true for the flag to stick; declining reverts it. The
    /// secondary confirmation is deliberate: promotion bypasses every future
    /// check for that name.
    pub fn request_promotion<F>(&mut self, confirm: F) -> bool
    where
        F: FnOnce(&str) -> bool,
    {
        let Some(name) = command_name(&self.text).map(str::to_string) else {
            self.promoted_name = None;
            return false;
        };

        if confirm(&name) {
            self.promoted_name = Some(name);
            true
        } else {
            self.promoted_name = None;
            false
        }
    }

    /// Clear a previously confirmed promotion
    pub fn decline_promotion(&mut self) {
        self.promoted_name = None;
    }

    /// Name that will be appended to the whitelist on execute, if confirmed
    pub fn promotion(&self) -> Option<&str> {
        self.promoted_name.as_deref()
    }

    /// Discard the session: no execution, no list mutation
    pub fn cancel(self) -> ReviewOutcome {
        ReviewOutcome::Cancelled
    }

    /// Honor the promotion flag, then hand the (possibly edited) text to the
    /// dispatcher. Terminal regardless of dispatcher outcome; execution
    /// failures surface only as dispatcher diagnostics. A failed whitelist
    /// write is logged and does not stop the execution. The returned handle
    /// lets one-shot callers wait for the dispatched command; interactive
    /// callers drop it.
    pub fn execute(
        self,
        lists: &mut CommandLists,
        dispatcher: &CommandDispatcher,
    ) -> (ReviewOutcome, JoinHandle<()>) {
        if let Some(name) = &self.promoted_name {
            if lists.whitelist.insert(name) {
                if let Err(err) = lists.whitelist.save() {
                    tracing::warn!(%err, %name, "failed to persist whitelist promotion");
                }
            }
        }

        (ReviewOutcome::Executed, dispatcher.dispatch(self.text))
    }
}
