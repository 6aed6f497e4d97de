mod review_prompt;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use console::style;
use std::io::{self, Write};
use std::sync::Arc;
use tokio::task::JoinHandle;

use bashpilot_core::config::constants::config_keys;
use bashpilot_core::llm::{ERROR_PREFIX, first_line, generate_or_error};
use bashpilot_core::{
    CommandDispatcher, CommandLists, ConfigStore, GateDecision, OpenAiCompatibleClient,
    QueryHistory, SafetyGate, ShellSink,
};

#[derive(Parser, Debug)]
#[command(
    name = "bashpilot",
    version,
    about = "AI bash assistant with a command safety gate\n\nDescribe what you want done; bashpilot generates the shell command, classifies it, and either runs it, blocks it, or asks you to review it first."
)]
struct Cli {
    /// Model endpoint URL for this run; overrides the configured value
    #[arg(long, global = true)]
    endpoint: Option<String>,

    /// Shell used to execute approved commands
    #[arg(long, global = true, default_value = "sh")]
    shell: String,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Interactive session: queries in, vetted commands out
    Chat,

    /// One query, one vetted command, then exit
    Ask { query: Vec<String> },

    /// Print the whitelist and the blacklist
    Lists,

    /// Add a command name to the whitelist
    Allow { name: String },

    /// Add a command name to the blacklist
    Deny { name: String },

    /// Remove a command name from one of the lists
    Remove {
        #[arg(value_enum)]
        list: ListArg,
        name: String,
    },

    /// Store the model endpoint URL in the config
    SetEndpoint { url: String },
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
enum ListArg {
    Whitelist,
    Blacklist,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args = Cli::parse();

    let mut config = ConfigStore::open_default()?;
    if let Some(endpoint) = &args.endpoint {
        // Session-only override; not saved unless set-endpoint is used
        config.set(config_keys::ENDPOINT, endpoint);
    }

    match args.command.unwrap_or(Commands::Chat) {
        Commands::Chat => chat_loop(&mut config, &args.shell).await,
        Commands::Ask { query } => ask_once(&config, &args.shell, query.join(" ")).await,
        Commands::Lists => print_lists(),
        Commands::Allow { name } => add_to_list(ListArg::Whitelist, &name),
        Commands::Deny { name } => add_to_list(ListArg::Blacklist, &name),
        Commands::Remove { list, name } => remove_from_list(list, &name),
        Commands::SetEndpoint { url } => set_endpoint(&mut config, &url),
    }
}

fn build_gate(shell: &str) -> Result<SafetyGate> {
    let lists = CommandLists::open_default()?;
    let sink = Arc::new(ShellSink::with_shell(shell.to_string()));
    Ok(SafetyGate::new(lists, CommandDispatcher::new(sink)))
}

fn generator_for(config: &ConfigStore) -> Option<OpenAiCompatibleClient> {
    config
        .endpoint()
        .map(|endpoint| OpenAiCompatibleClient::new(endpoint.to_string()))
}

async fn chat_loop(config: &mut ConfigStore, shell: &str) -> Result<()> {
    let mut gate = build_gate(shell)?;
    let mut history = QueryHistory::new();
    let mut generator = generator_for(config);

    println!(
        "{}\n",
        style("Chat with bashpilot (/help for commands, ctrl-c to quit)")
            .cyan()
            .bold()
    );
    if generator.is_none() {
        println!(
            "{}",
            style("No model endpoint configured. Set one with /endpoint <url>.").yellow()
        );
    }

    let stdin = io::stdin();
    loop {
        print!("{} ", style("You:").blue().bold());
        io::stdout().flush().ok();

        let mut buf = String::new();
        if stdin.read_line(&mut buf)? == 0 {
            break;
        }
        let input = buf.trim();
        if input.is_empty() {
            continue;
        }

        if let Some(rest) = input.strip_prefix('/') {
            match handle_slash_command(rest, &mut gate, config, &history)? {
                SlashOutcome::Handled => continue,
                SlashOutcome::EndpointChanged => {
                    generator = generator_for(config);
                    continue;
                }
                SlashOutcome::Exit => break,
            }
        }

        history.push(input);
        // Fire-and-forget: the handle is dropped so a long-running command
        // never blocks the next query.
        let _ = handle_query(input, &mut gate, generator.as_ref()).await?;
    }

    Ok(())
}

async fn ask_once(config: &ConfigStore, shell: &str, query: String) -> Result<()> {
    let query = query.trim().to_string();
    if query.is_empty() {
        bail!("query cannot be empty");
    }

    let mut gate = build_gate(shell)?;
    let generator = generator_for(config)
        .context("No model endpoint configured. Run `bashpilot set-endpoint <url>` first.")?;

    if let Some(dispatch) = handle_query(&query, &mut gate, Some(&generator)).await? {
        // One-shot mode must outlive its own dispatch
        dispatch.await.ok();
    }

    Ok(())
}

/// Generate (through the cache), classify, and act on one query. Returns the
/// dispatch handle when a command or rejection notice went to the terminal.
async fn handle_query(
    query: &str,
    gate: &mut SafetyGate,
    generator: Option<&OpenAiCompatibleClient>,
) -> Result<Option<JoinHandle<()>>> {
    let Some(generator) = generator else {
        println!(
            "{}",
            style("No model endpoint configured. Set one with /endpoint <url>.").yellow()
        );
        return Ok(None);
    };

    let reply = gate
        .cache
        .get_or_compute(query, |q| async move {
            generate_or_error(generator, &q).await
        })
        .await;

    if reply.starts_with(ERROR_PREFIX) {
        println!("{} {}", style("bashpilot:").yellow().bold(), style(&reply).red());
        return Ok(None);
    }

    match gate.assess(first_line(&reply)) {
        GateDecision::Skipped => Ok(None),
        GateDecision::Dispatched(handle) => Ok(Some(handle)),
        GateDecision::Rejected { notice, .. } => Ok(Some(notice)),
        GateDecision::NeedsReview(session) => {
            let (session, approved) = review_prompt::run(session)?;
            let (_outcome, dispatch) = gate.complete_review(session, approved);
            Ok(dispatch)
        }
    }
}

enum SlashOutcome {
    Handled,
    EndpointChanged,
    Exit,
}

fn handle_slash_command(
    input: &str,
    gate: &mut SafetyGate,
    config: &mut ConfigStore,
    history: &QueryHistory,
) -> Result<SlashOutcome> {
    let mut parts = input.split_whitespace();
    let command = parts.next().unwrap_or("").to_lowercase();

    match command.as_str() {
        "help" => {
            println!("Available commands:");
            println!("  /help             - show this help");
            println!("  /lists            - print the whitelist and the blacklist");
            println!("  /history          - print the queries entered this session");
            println!("  /reset-cache      - forget previously generated commands");
            println!("  /endpoint <url>   - set and save the model endpoint");
            println!("  /exit             - leave the session");
            Ok(SlashOutcome::Handled)
        }
        "lists" => {
            print_list("Whitelisted commands", gate.lists.whitelist.entries());
            print_list("Blacklisted commands", gate.lists.blacklist.entries());
            Ok(SlashOutcome::Handled)
        }
        "history" => {
            if history.is_empty() {
                println!("No queries yet.");
            }
            for query in history.entries() {
                println!("  {query}");
            }
            Ok(SlashOutcome::Handled)
        }
        "reset-cache" => {
            gate.cache.reset();
            println!("{}", style("Command cache cleared.").green());
            Ok(SlashOutcome::Handled)
        }
        "endpoint" => {
            let Some(url) = parts.next() else {
                println!("{}", style("Usage: /endpoint <url>").yellow());
                return Ok(SlashOutcome::Handled);
            };
            config.set(config_keys::ENDPOINT, url);
            config.save()?;
            println!("{}", style("Endpoint configured successfully.").green());
            Ok(SlashOutcome::EndpointChanged)
        }
        "exit" | "quit" => Ok(SlashOutcome::Exit),
        other => {
            println!(
                "{}",
                style(format!("Unknown command '/{other}'. Try /help.")).yellow()
            );
            Ok(SlashOutcome::Handled)
        }
    }
}

fn print_lists() -> Result<()> {
    let lists = CommandLists::open_default()?;
    print_list("Whitelisted commands", lists.whitelist.entries());
    print_list("Blacklisted commands", lists.blacklist.entries());
    Ok(())
}

fn print_list(label: &str, entries: &[String]) {
    println!("{}", style(label).cyan().bold());
    if entries.is_empty() {
        println!("  (none)");
        return;
    }
    for name in entries {
        println!("  {name}");
    }
}

fn add_to_list(kind: ListArg, name: &str) -> Result<()> {
    let mut lists = CommandLists::open_default()?;
    let (list, label) = match kind {
        ListArg::Whitelist => (&mut lists.whitelist, "whitelist"),
        ListArg::Blacklist => (&mut lists.blacklist, "blacklist"),
    };

    let Some(token) = bashpilot_core::command_name(name) else {
        println!("{}", style("Command name cannot be empty.").yellow());
        return Ok(());
    };

    if list.insert(token) {
        list.save()?;
        println!("{}", style(format!("Added '{token}' to the {label}.")).green());
    } else {
        println!("{}", style(format!("'{token}' is already in the {label}.")).yellow());
    }
    Ok(())
}

fn remove_from_list(kind: ListArg, name: &str) -> Result<()> {
    let mut lists = CommandLists::open_default()?;
    let (list, label) = match kind {
        ListArg::Whitelist => (&mut lists.whitelist, "whitelist"),
        ListArg::Blacklist => (&mut lists.blacklist, "blacklist"),
    };

    if list.remove(name.trim()) {
        list.save()?;
        println!("{}", style(format!("Removed '{}' from the {label}.", name.trim())).green());
    } else {
        println!("{}", style(format!("'{}' is not in the {label}.", name.trim())).yellow());
    }
    Ok(())
}

fn set_endpoint(config: &mut ConfigStore, url: &str) -> Result<()> {
    config.set(config_keys::ENDPOINT, url);
    config.save()?;
    println!("{}", style("Endpoint configured successfully.").green());
    Ok(())
}
