//! Binary entrypoint for the safenet terminal.
//!
//! Commands:
//! - `run` (default) - boot the kernel and read command lines from stdin
//! - `init` - write a starter `terminal.toml` plus a seed network tree
//!
//! The binary is the rendering and input collaborator of the kernel: it
//! prints display payloads (with inter-line delays on a TTY), swaps the
//! input-line label while an interactive prompt is pending, and keeps at
//! most one command in flight.

use std::io::Write as _;
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use log::debug;

use safenet::config::Config;
use safenet::kernel::output::{DisplayPayload, Reply};
use safenet::kernel::prompt::Outcome;
use safenet::kernel::Kernel;
use safenet::logutil::escape_log;
use tokio::io::{AsyncBufReadExt, BufReader};

#[derive(Parser)]
#[command(name = "safenet")]
#[command(about = "A simulated terminal for a narrative hacking game")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Configuration file path
    #[arg(short, long, default_value = "terminal.toml", global = true)]
    config: String,

    /// Verbose logging (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Boot the terminal and read commands from stdin
    Run,
    /// Initialize a new terminal configuration and seed network
    Init,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if matches!(cli.command, Some(Commands::Init)) {
        init_logging(None, cli.verbose);
        return cmd_init(&cli.config).await;
    }

    let config = Config::load(&cli.config).await?;
    init_logging(Some(&config), cli.verbose);
    run(config).await
}

fn init_logging(config: Option<&Config>, verbose: u8) {
    let level = match verbose {
        0 => config
            .map(|c| c.logging.level.clone())
            .unwrap_or_else(|| "info".to_string()),
        1 => "debug".to_string(),
        _ => "trace".to_string(),
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(&level)).init();
}

async fn run(config: Config) -> Result<()> {
    let mut kernel = Kernel::from_config(&config).await?;
    let banner = kernel.boot().await.context("boot connect failed")?;
    render_reply(banner).await;

    let mut input = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("{}", kernel.prompt_text());
        std::io::stdout().flush()?;
        let Some(line) = input.next_line().await? else {
            break; // EOF: the player closed the terminal
        };
        debug!("input: {}", escape_log(&line));

        let mut outcome = match kernel.exec_line(&line).await {
            Ok(outcome) => outcome,
            Err(err) => {
                println!("{err}");
                continue;
            }
        };
        // Drive the command to completion, feeding interactive prompts one
        // line each. Normal command handling stays off until this returns.
        loop {
            match outcome {
                Outcome::Done(reply) => {
                    render_reply(reply).await;
                    break;
                }
                Outcome::AwaitingInput { message, label } => {
                    if let Some(message) = message {
                        render_payload(message).await;
                    }
                    print!("{label} ");
                    std::io::stdout().flush()?;
                    let answer = input.next_line().await?.unwrap_or_default();
                    match kernel.resume(&answer).await {
                        Ok(next) => outcome = next,
                        Err(err) => {
                            println!("{err}");
                            break;
                        }
                    }
                }
            }
        }
    }
    Ok(())
}

async fn render_reply(reply: Reply) {
    if reply.clear_screen && atty::is(atty::Stream::Stdout) {
        print!("\x1b[2J\x1b[H");
    }
    render_payload(reply.payload).await;
}

async fn render_payload(payload: DisplayPayload) {
    let (lines, delay) = payload.into_lines();
    // Inter-line delays are a dramatic effect; skip them when piped.
    let pause = delay.filter(|_| atty::is(atty::Stream::Stdout));
    for (index, line) in lines.iter().enumerate() {
        if index > 0 {
            if let Some(ms) = pause {
                tokio::time::sleep(Duration::from_millis(ms)).await;
            }
        }
        println!("{line}");
    }
}

/// Write a default config plus a seed network tree the terminal can boot
/// into, refusing to clobber existing files.
async fn cmd_init(config_path: &str) -> Result<()> {
    let config = Config::create_default(config_path).await?;
    let boot = &config.terminal.boot_address;
    let server_dir = Path::new(&config.terminal.network_dir).join(boot);
    tokio::fs::create_dir_all(&server_dir)
        .await
        .with_context(|| format!("creating {}", server_dir.display()))?;

    let manifest = serde_json::json!({
        "serverAddress": boot,
        "serverName": "Conexão do Anhangá",
        "terminalID": "anhanga",
        "iconName": "serpente.png",
        "defaultUser": { "userId": "runner" },
        "year": 2077,
        "reference": "PD"
    });
    let userlist = serde_json::json!([
        { "userId": "runner" },
        { "userId": "anhanga", "password": "utsupra" }
    ]);
    let mailserver = serde_json::json!([
        {
            "from": "anhanga",
            "to": ["runner"],
            "title": "Primeiros passos",
            "body": "Você chegou.  Use ajuda para ver o que esse terminal faz, e ping para testar endereços.  Apague essa mensagem da cabeça depois de ler."
        }
    ]);
    let software = serde_json::json!({
        "telnet": null,
        "manifesto": {
            "message": ["Informação quer ser livre.", "Nós só cobramos o frete."],
            "delayed": 400,
            "ajuda": "Imprime o manifesto da rede. Devagar, pra você sentir."
        },
        "decrypt": {
            "ajuda": "Decodifica texto rot13. Sem argumentos, pede o texto em seguida."
        }
    });

    write_json(&server_dir.join("manifest.json"), &manifest).await?;
    write_json(&server_dir.join("userlist.json"), &userlist).await?;
    write_json(&server_dir.join("mailserver.json"), &mailserver).await?;
    write_json(Path::new(&config.terminal.software_file), &software).await?;

    println!("Configuração criada em {config_path}; rode `safenet` para entrar.");
    Ok(())
}

async fn write_json(path: &Path, value: &serde_json::Value) -> Result<()> {
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }
    if tokio::fs::try_exists(path).await.unwrap_or(false) {
        anyhow::bail!("{} already exists", path.display());
    }
    tokio::fs::write(path, serde_json::to_vec_pretty(value)?)
        .await
        .with_context(|| format!("writing {}", path.display()))?;
    Ok(())
}
