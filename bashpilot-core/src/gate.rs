//! The command safety gate
//!
//! Owns the mutable session state (query cache, command lists) and the
//! dispatcher, and makes the per-command decision: dispatch unattended,
//! reject outright, or open a review session. All mutation happens on the
//! coordinating task that owns the gate; only execution itself runs
//! elsewhere.

use tokio::task::JoinHandle;

use crate::cache::QueryCache;
use crate::exec::CommandDispatcher;
use crate::lists::CommandLists;
use crate::review::{ReviewOutcome, ReviewSession};
use crate::safety::{
    LOOP_BLOCK_NOTICE, SUDO_BLOCK_NOTICE, Verdict, classify, command_name, normalize,
};

/// What the gate decided for one generated command line
pub enum GateDecision {
    /// Blank line after normalization; nothing to do
    Skipped,
    /// Allowed and already handed to the dispatcher
    Dispatched(JoinHandle<()>),
    /// Blocked outright; the rejection notice is already on its way to the
    /// terminal
    Rejected {
        verdict: Verdict,
        notice: JoinHandle<()>,
    },
    /// Flagged; the caller drives the session and finishes it through
    /// [`SafetyGate::complete_review`]
    NeedsReview(ReviewSession),
}

/// Session state and decision logic for AI-generated commands
pub struct SafetyGate {
    pub cache: QueryCache,
    pub lists: CommandLists,
    dispatcher: CommandDispatcher,
}

impl SafetyGate {
    pub fn new(lists: CommandLists, dispatcher: CommandDispatcher) -> Self {
        Self {
            cache: QueryCache::new(),
            lists,
            dispatcher,
        }
    }

    pub fn dispatcher(&self) -> &CommandDispatcher {
        &self.dispatcher
    }

    /// Classify one generated command line and act on the verdict. The line
    /// is normalized once here; the normalized form is what executes and
    /// what a review session presents.
    pub fn assess(&self, raw_line: &str) -> GateDecision {
        let line = normalize(raw_line);
        if command_name(&line).is_none() {
            return GateDecision::Skipped;
        }

        let verdict = classify(
            &line,
            self.lists.whitelist.entries(),
            self.lists.blacklist.entries(),
        );
        tracing::debug!(?verdict, %line, "classified generated command");

        match verdict {
            Verdict::Allowed => GateDecision::Dispatched(self.dispatcher.dispatch(line)),
            Verdict::BlockedPrivilege => GateDecision::Rejected {
                verdict,
                notice: self.dispatcher.reject(SUDO_BLOCK_NOTICE),
            },
            Verdict::BlockedLoop => GateDecision::Rejected {
                verdict,
                notice: self.dispatcher.reject(LOOP_BLOCK_NOTICE),
            },
            Verdict::NeedsReview => GateDecision::NeedsReview(ReviewSession::new(&line)),
        }
    }

    /// Finish a review session: execute (honoring a confirmed promotion) or
    /// cancel. The handle is present only when a command was dispatched.
    pub fn complete_review(
        &mut self,
        session: ReviewSession,
        approved: bool,
    ) -> (ReviewOutcome, Option<JoinHandle<()>>) {
        if approved {
            let (outcome, dispatch) = session.execute(&mut self.lists, &self.dispatcher);
            (outcome, Some(dispatch))
        } else {
            (session.cancel(), None)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exec::{ExecError, TerminalSink};
    use async_trait::async_trait;
    use std::sync::{Arc, Mutex};
    use tempfile::tempdir;

    struct RecordingSink {
        lines: Mutex<Vec<String>>,
    }

    impl RecordingSink {
        fn new() -> Arc<Self> {
            Arc::new(Self {
                lines: Mutex::new(Vec::new()),
            })
        }

        fn lines(&self) -> Vec<String> {
            self.lines.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl TerminalSink for RecordingSink {
        async fn run(&self, line: &str) -> Result<(), ExecError> {
            self.lines.lock().unwrap().push(line.to_string());
            Ok(())
        }
    }

    fn gate_with(sink: Arc<RecordingSink>, dir: &std::path::Path) -> SafetyGate {
        let lists =
            CommandLists::open(dir.join("whitelist.txt"), dir.join("blacklist.txt")).unwrap();
        SafetyGate::new(lists, CommandDispatcher::new(sink))
    }

    #[tokio::test]
    async fn allowed_command_is_dispatched() {
        let dir = tempdir().unwrap();
        let sink = RecordingSink::new();
        let gate = gate_with(sink.clone(), dir.path());

        match gate.assess("ls -la") {
            GateDecision::Dispatched(handle) => handle.await.unwrap(),
            _ => panic!("expected dispatch"),
        }
        assert_eq!(sink.lines(), ["ls -la"]);
    }

    #[tokio::test]
    async fn sudo_is_rejected_with_the_notice() {
        let dir = tempdir().unwrap();
        let sink = RecordingSink::new();
        let gate = gate_with(sink.clone(), dir.path());

        match gate.assess("sudo rm -rf /") {
            GateDecision::Rejected { verdict, notice } => {
                assert_eq!(verdict, Verdict::BlockedPrivilege);
                notice.await.unwrap();
            }
            _ => panic!("expected rejection"),
        }
        assert_eq!(sink.lines(), [SUDO_BLOCK_NOTICE]);
    }

    #[tokio::test]
    async fn blacklisted_command_opens_a_review() {
        let dir = tempdir().unwrap();
        let sink = RecordingSink::new();
        let mut gate = gate_with(sink.clone(), dir.path());
        gate.lists.blacklist.insert("rm");

        let session = match gate.assess("rm file.txt") {
            GateDecision::NeedsReview(session) => session,
            _ => panic!("expected review"),
        };
        assert_eq!(session.text(), "rm file.txt");

        let (outcome, dispatch) = gate.complete_review(session, false);
        assert_eq!(outcome, ReviewOutcome::Cancelled);
        assert!(dispatch.is_none());
        assert!(sink.lines().is_empty());
    }

    #[tokio::test]
    async fn blank_line_is_skipped() {
        let dir = tempdir().unwrap();
        let sink = RecordingSink::new();
        let gate = gate_with(sink.clone(), dir.path());

        assert!(matches!(gate.assess("   "), GateDecision::Skipped));
        assert!(sink.lines().is_empty());
    }

    #[tokio::test]
    async fn review_presents_the_normalized_line() {
        let dir = tempdir().unwrap();
        let sink = RecordingSink::new();
        let mut gate = gate_with(sink, dir.path());
        gate.lists.blacklist.insert("rm");

        match gate.assess("rm file.txt > /dev/null") {
            GateDecision::NeedsReview(session) => {
                assert_eq!(session.text(), "rm file.txt");
            }
            _ => panic!("expected review"),
        }
    }
}
