//! The terminal kernel: command resolution, session state and the
//! interactive execution protocol.
//!
//! The kernel owns the whole world model of the game terminal. A typed line
//! goes through [`Kernel::exec_line`]:
//!
//! 1. The name is resolved against the software registry filtered by the
//!    current server and user. A visible descriptor runs as a software; an
//!    explicitly disabled name is "not found" even when a builtin exists.
//! 2. Otherwise the name, with its first `.` mapped to `_`, is looked up in
//!    the builtin set.
//! 3. The handler runs to a [`Reply`], or suspends on an interactive prompt
//!    that [`Kernel::resume`] later completes.
//!
//! Every failure a handler can produce is a [`TermError`] and is meant to be
//! rendered as its message; the session always survives. The front-end runs
//! at most one command at a time: it keeps input disabled until the returned
//! future (and any pending prompt) completes.

pub mod builtins;
pub mod lifecycle;
pub mod output;
pub mod prompt;
pub mod registry;
pub mod scripts;
pub mod session;

use chrono::{Datelike, Local};
use log::debug;

use crate::config::Config;
use crate::errors::TermError;
use crate::logutil::escape_log;
use crate::net::Network;
use self::output::{DisplayPayload, Reply};
use self::prompt::{InputHandler, Outcome, PromptRequest, Step};
use self::registry::{
    normalize_name, Builtin, MessageText, RegistryEntry, SoftwareDescriptor, SoftwareRegistry,
};
use self::scripts::{ScriptOutput, ScriptRegistry};
use self::session::SessionState;

pub struct Kernel {
    pub(crate) session: SessionState,
    pub(crate) softwares: SoftwareRegistry,
    pub(crate) scripts: ScriptRegistry,
    pub(crate) network: Network,
    pub(crate) boot_address: String,
    pub(crate) operator: String,
    pending: Option<InputHandler>,
}

/// The in-game date shown in the header and by `data`: manifest overrides
/// with the local clock as fallback.
pub(crate) struct ServerDate {
    pub day: u32,
    pub month: u32,
    pub year: i32,
    pub reference: String,
}

impl Kernel {
    pub fn new(
        network: Network,
        softwares: SoftwareRegistry,
        boot_address: impl Into<String>,
        operator: impl Into<String>,
    ) -> Self {
        Kernel {
            session: SessionState::new(),
            softwares,
            scripts: ScriptRegistry::with_defaults(),
            network,
            boot_address: boot_address.into(),
            operator: operator.into(),
            pending: None,
        }
    }

    /// Build a kernel from the app config, loading the software registry.
    pub async fn from_config(config: &Config) -> Result<Self, TermError> {
        let softwares = SoftwareRegistry::load(&config.terminal.software_file).await?;
        Ok(Kernel::new(
            Network::new(&config.terminal.network_dir),
            softwares,
            config.terminal.boot_address.clone(),
            config.terminal.operator.clone(),
        ))
    }

    pub fn session(&self) -> &SessionState {
        &self.session
    }

    pub fn register_script(&mut self, name: impl Into<String>, script: scripts::Script) {
        self.scripts.register(name, script);
    }

    /// First connect, to the boot server, as an anonymous session.
    pub async fn boot(&mut self) -> Result<Reply, TermError> {
        let boot_address = self.boot_address.clone();
        self.connect_to_server(&boot_address, None, "").await
    }

    /// Parse a typed line into a command name and arguments and dispatch it.
    pub async fn exec_line(&mut self, line: &str) -> Result<Outcome, TermError> {
        let mut parts = line.split_whitespace();
        match parts.next() {
            None => Ok(Outcome::Done(Reply::empty())),
            Some(name) => {
                let name = name.to_string();
                let args: Vec<String> = parts.map(str::to_string).collect();
                self.dispatch(&name, &args).await
            }
        }
    }

    /// Resolve and run one command.
    ///
    /// Panics if called while an interactive prompt is pending: the
    /// front-end contract is to disable command input until the prompt is
    /// resolved, so this is a programming error, not a player error.
    pub async fn dispatch(&mut self, name: &str, args: &[String]) -> Result<Outcome, TermError> {
        assert!(
            self.pending.is_none(),
            "dispatch() while an interactive prompt is pending"
        );
        debug!("dispatch: {} ({} args)", escape_log(name), args.len());

        let custom = match self.softwares.resolve(name, &self.session) {
            RegistryEntry::Custom(descriptor) => Some(descriptor.clone()),
            RegistryEntry::Disabled => {
                return Err(TermError::CommandNotFound(name.to_string()));
            }
            RegistryEntry::Absent => None,
        };
        let step = match custom {
            Some(descriptor) => self.run_software(name, &descriptor, args)?,
            None => match Builtin::lookup(&normalize_name(name)) {
                Some(builtin) => self.run_builtin(builtin, args).await?,
                None => return Err(TermError::CommandNotFound(name.to_string())),
            },
        };
        Ok(self.finish(step))
    }

    /// Feed the pending interactive prompt the submitted line.
    ///
    /// Panics when no prompt is pending; see [`Kernel::dispatch`].
    pub async fn resume(&mut self, line: &str) -> Result<Outcome, TermError> {
        let handler = self
            .pending
            .take()
            .expect("resume() without a pending interactive prompt");
        let payload = handler(line.trim().to_string()).await?;
        Ok(Outcome::Done(Reply::of(payload)))
    }

    pub fn is_awaiting_input(&self) -> bool {
        self.pending.is_some()
    }

    fn finish(&mut self, step: Step) -> Outcome {
        match step {
            Step::Done(reply) => Outcome::Done(reply),
            Step::Await(PromptRequest {
                message,
                label,
                handler,
            }) => {
                self.pending = Some(handler);
                Outcome::AwaitingInput { message, label }
            }
        }
    }

    /// Run a data-driven software: static message, or registered script.
    fn run_software(
        &self,
        name: &str,
        descriptor: &SoftwareDescriptor,
        args: &[String],
    ) -> Result<Step, TermError> {
        if let Some(message) = &descriptor.message {
            let payload = match message {
                MessageText::One(line) => DisplayPayload::Text(line.clone()),
                MessageText::Many(lines) => match descriptor.delayed {
                    Some(delay_ms) => DisplayPayload::Delayed {
                        lines: lines.clone(),
                        delay_ms,
                    },
                    None => DisplayPayload::Lines(lines.clone()),
                },
            };
            return Ok(Step::Done(Reply {
                clear_screen: descriptor.clear,
                payload,
            }));
        }
        let script = self.scripts.get(name).unwrap_or_else(|| {
            panic!("software '{name}' declares no message and has no registered script")
        });
        match script(&self.session, args)? {
            ScriptOutput::Payload(payload) => Ok(Step::Done(Reply {
                clear_screen: descriptor.clear,
                payload,
            })),
            ScriptOutput::Prompt(request) => Ok(Step::Await(request)),
        }
    }

    /// Session header shown after connect/login and by `limpar`.
    pub fn header_lines(&self) -> Vec<String> {
        let Some(server) = self.session.current_server() else {
            return vec!["Desconectado.".to_string()];
        };
        let date = self.server_date();
        let mut lines = vec![
            format!("<h2 style=\"letter-spacing: 4px\">{}</h2>", server.name),
            format!(
                "Você está conectado à: {} ( {}/{}/{} )",
                server.address, date.day, date.month, date.year
            ),
        ];
        if let Some(extra) = &server.header_extra {
            lines.push(extra.clone());
        }
        lines.push("Conexão segura estabelecida; Serpens in hac silva caecus est.".to_string());
        lines
    }

    /// A cleared screen with the header redrawn, plus an optional status
    /// line below it.
    pub fn header_reply(&self, message: Option<&str>) -> Reply {
        let mut lines = self.header_lines();
        if let Some(message) = message {
            lines.push(message.to_string());
        }
        Reply {
            clear_screen: true,
            payload: DisplayPayload::Lines(lines),
        }
    }

    /// Input-line prompt text, `[user@terminal] # `.
    pub fn prompt_text(&self) -> String {
        let user = self.session.user_id().unwrap_or("-");
        let terminal = self
            .session
            .current_server()
            .map(|server| server.terminal_id.as_str())
            .unwrap_or("-");
        format!("[{user}@{terminal}] # ")
    }

    pub(crate) fn server_date(&self) -> ServerDate {
        let now = Local::now();
        let server = self.session.current_server();
        ServerDate {
            day: server.and_then(|s| s.day).unwrap_or_else(|| now.day()),
            month: server.and_then(|s| s.month).unwrap_or_else(|| now.month()),
            year: server.and_then(|s| s.year).unwrap_or_else(|| now.year()),
            reference: server
                .and_then(|s| s.reference.clone())
                .unwrap_or_default(),
        }
    }
}
