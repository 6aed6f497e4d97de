//! Shared constants to avoid hardcoding paths and keys throughout the codebase

/// Files under the bashpilot dot directory
pub mod files {
    /// Dot directory created in the user's home
    pub const DOT_DIR: &str = ".bashpilot";
    /// Flat key/value configuration
    pub const CONFIG_FILE: &str = "config.json";
    /// Commands that execute without review, one name per line
    pub const WHITELIST_FILE: &str = "whitelisted_commands.txt";
    /// Commands that require review before execution, one name per line
    pub const BLACKLIST_FILE: &str = "blocked_commands.txt";
}

/// Keys recognized in `config.json`
pub mod config_keys {
    /// URL of the OpenAI-compatible chat-completions endpoint
    pub const ENDPOINT: &str = "endpoint";
}

/// Prompt text sent to the model alongside every query
pub mod prompts {
    /// The generation contract: one raw command, nothing else. Redirections
    /// and loops are forbidden here and defensively handled by the classifier
    /// anyway.
    pub const COMMAND_SYSTEM_PROMPT: &str = "Context is a real bash shell.\n\
        Home folder is ~\n\
        list files with ls\n\
        If asked command, raw single simplest command possible must be generated, \
        will be executed in a real shell, written plaintext, no 'if/then/else' \
        constructions, only simplest commands, no escape chars, no quotes, \
        no preambles, never to be used: '> /dev/null' or '/dev/null 2>&1', no loops.\n";
}
