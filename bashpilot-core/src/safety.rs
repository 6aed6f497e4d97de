//! Command classification
//!
//! A pure, deterministic verdict over an AI-generated command line. The
//! checks are lexical: this is not a shell parser, it recognizes exactly the
//! patterns below and nothing more. Order matters and is part of the
//! contract: privilege escalation first, loop detection second, whitelist
//! before blacklist.

use once_cell::sync::Lazy;
use regex::Regex;

/// Classification outcome for a generated command line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// Safe to dispatch without human review
    Allowed,
    /// Starts with `sudo`; no list can override this
    BlockedPrivilege,
    /// Contains an unbounded-iteration shell construct
    BlockedLoop,
    /// Matches the blacklist; route to the review workflow
    NeedsReview,
}

/// Output redirections the generation contract forbids. They are stripped,
/// not rejected, in case the model emits them anyway.
const REDIRECTION_SUFFIXES: &[&str] = &[
    "> /dev/null 2>&1",
    "> /dev/null",
    "< /dev/null",
    ">/dev/null 2>&1",
];

/// Unbounded-iteration constructs. Matched anywhere in the line, not
/// anchored, so a loop buried behind `&&` still blocks.
static LOOP_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"while\s+true",
        r"for\s+\(\s*;?\s*;?\s*\)",
        r"until\s+false",
        r"while\s+:",
        r":\s+while\s+true",
        r"while\s+\d+",
        r"while\s+\[\s*.*?\s*\]",
        r"while\s+test\s+.*",
        r"repeat\s+until\s+false",
        r"while\s+\(\(.*?\)\)",
    ]
    .iter()
    .map(|pattern| Regex::new(pattern).expect("loop pattern must compile"))
    .collect()
});

/// Strip the forbidden redirection suffixes from a command line
pub fn normalize(line: &str) -> String {
    let mut normalized = line.to_string();
    for suffix in REDIRECTION_SUFFIXES {
        normalized = normalized.replace(suffix, "");
    }
    normalized.trim_end().to_string()
}

/// First whitespace-delimited token of a line; `None` for a blank line
pub fn command_name(line: &str) -> Option<&str> {
    line.split_whitespace().next()
}

/// Classify a generated command line against the two lists.
///
/// Total over its inputs: an empty line is `Allowed` and callers are expected
/// not to dispatch it. The whitelist is a line-prefix test while the
/// blacklist is a substring test; the asymmetry is deliberate, observable
/// behavior and kept as the contract.
pub fn classify(raw_line: &str, whitelist: &[String], blacklist: &[String]) -> Verdict {
    let line = normalize(raw_line);

    let Some(name) = command_name(&line) else {
        return Verdict::Allowed;
    };

    if name == "sudo" {
        return Verdict::BlockedPrivilege;
    }

    if LOOP_PATTERNS.iter().any(|pattern| pattern.is_match(&line)) {
        return Verdict::BlockedLoop;
    }

    if whitelist.iter().any(|entry| line.starts_with(entry.as_str())) {
        return Verdict::Allowed;
    }

    if blacklist.iter().any(|entry| line.contains(entry.as_str())) {
        return Verdict::NeedsReview;
    }

    Verdict::Allowed
}

/// Comment message fed through the dispatcher for a privilege block
pub const SUDO_BLOCK_NOTICE: &str = "#\n\
     # [ERROR] 'sudo' commands are blocked for safety reasons.\n\
     # If root permissions are required, consider running this program as root\n\
     # (not recommended).\n";

/// Comment message fed through the dispatcher for a loop block
pub const LOOP_BLOCK_NOTICE: &str = "# Blocked: infinite loop detected.";

/// Pre-built comment message fed through the dispatcher when a command is
/// blocked outright. `None` for verdicts that do not reject.
pub fn rejection_notice(verdict: Verdict) -> Option<&'static str> {
    match verdict {
        Verdict::BlockedPrivilege => Some(SUDO_BLOCK_NOTICE),
        Verdict::BlockedLoop => Some(LOOP_BLOCK_NOTICE),
        Verdict::Allowed | Verdict::NeedsReview => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn list(entries: &[&str]) -> Vec<String> {
        entries.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn plain_command_is_allowed() {
        assert_eq!(classify("ls -la", &[], &[]), Verdict::Allowed);
    }

    #[test]
    fn sudo_is_blocked_even_when_whitelisted() {
        assert_eq!(
            classify("sudo rm -rf /", &list(&["sudo"]), &[]),
            Verdict::BlockedPrivilege
        );
    }

    #[test]
    fn sudo_must_be_the_command_name() {
        // `sudo` appearing as an argument is not a privilege escalation
        assert_eq!(classify("echo sudo", &[], &[]), Verdict::Allowed);
    }

    #[test]
    fn loop_constructs_are_blocked() {
        assert_eq!(
            classify("while true; do echo hi; done", &[], &[]),
            Verdict::BlockedLoop
        );
        assert_eq!(classify("for (;;) { x(); }", &[], &[]), Verdict::BlockedLoop);
        assert_eq!(classify("until false; do :; done", &[], &[]), Verdict::BlockedLoop);
        assert_eq!(
            classify("while ((count < 10)); do y; done", &[], &[]),
            Verdict::BlockedLoop
        );
    }

    #[test]
    fn loop_buried_in_the_line_still_blocks() {
        assert_eq!(
            classify("echo start && while true; do :; done", &[], &[]),
            Verdict::BlockedLoop
        );
    }

    #[test]
    fn loop_check_runs_before_the_whitelist() {
        assert_eq!(
            classify("while true; do :; done", &list(&["while"]), &[]),
            Verdict::BlockedLoop
        );
    }

    #[test]
    fn whitelist_wins_over_blacklist() {
        assert_eq!(
            classify("rm file.txt", &list(&["rm"]), &list(&["rm"])),
            Verdict::Allowed
        );
    }

    #[test]
    fn blacklist_matches_as_substring() {
        assert_eq!(
            classify("echo hello && rm file.txt", &[], &list(&["rm"])),
            Verdict::NeedsReview
        );
    }

    #[test]
    fn redirection_stripping_is_cosmetic() {
        let normalized = normalize("ls > /dev/null 2>&1");
        assert_eq!(command_name(&normalized), command_name("ls"));
        assert_eq!(classify("ls > /dev/null 2>&1", &[], &[]), Verdict::Allowed);
    }

    #[test]
    fn stripped_redirection_does_not_hide_a_blacklisted_name() {
        assert_eq!(
            classify("rm file.txt > /dev/null", &[], &list(&["rm"])),
            Verdict::NeedsReview
        );
    }

    #[test]
    fn empty_line_is_allowed() {
        assert_eq!(classify("", &[], &list(&["rm"])), Verdict::Allowed);
        assert_eq!(classify("   ", &[], &[]), Verdict::Allowed);
    }

    #[test]
    fn rejection_notices_exist_only_for_blocks() {
        assert!(rejection_notice(Verdict::BlockedPrivilege).is_some());
        assert!(rejection_notice(Verdict::BlockedLoop).is_some());
        assert!(rejection_notice(Verdict::Allowed).is_none());
        assert!(rejection_notice(Verdict::NeedsReview).is_none());
    }
}
