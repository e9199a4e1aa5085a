//! Programmatic softwares: registry-declared commands whose behavior is a
//! function instead of a static message.
//!
//! A software descriptor without a `message` must have a script registered
//! under the same name. Scripts read the session but never mutate it; they
//! either return a payload or suspend on an interactive prompt.

use std::collections::HashMap;

use crate::errors::TermError;
use crate::kernel::output::DisplayPayload;
use crate::kernel::prompt::{InputFuture, PromptRequest};
use crate::kernel::session::SessionState;

/// What a script produces: output, or a request for one more input line.
pub enum ScriptOutput {
    Payload(DisplayPayload),
    Prompt(PromptRequest),
}

/// A programmatic software body.
pub type Script = fn(&SessionState, &[String]) -> Result<ScriptOutput, TermError>;

#[derive(Default)]
pub struct ScriptRegistry {
    scripts: HashMap<String, Script>,
}

impl ScriptRegistry {
    pub fn new() -> Self {
        ScriptRegistry::default()
    }

    /// Registry preloaded with the stock scripts.
    pub fn with_defaults() -> Self {
        let mut registry = ScriptRegistry::new();
        registry.register("decrypt", decrypt);
        registry
    }

    pub fn register(&mut self, name: impl Into<String>, script: Script) {
        self.scripts.insert(name.into(), script);
    }

    pub fn get(&self, name: &str) -> Option<Script> {
        self.scripts.get(name).copied()
    }
}

/// rot13 decoder. With arguments it decodes them in place; without, it
/// prompts for the ciphertext and decodes the submitted line. The output is
/// wrapped in a `hack-reveal` fragment the renderer may animate.
pub fn decrypt(_session: &SessionState, args: &[String]) -> Result<ScriptOutput, TermError> {
    if args.is_empty() {
        let request = PromptRequest::new(|line| {
            Box::pin(async move { Ok(reveal(&rot13(&line))) }) as InputFuture
        })
        .with_message("Cole o texto encriptado:")
        .with_label("decrypt>");
        return Ok(ScriptOutput::Prompt(request));
    }
    Ok(ScriptOutput::Payload(reveal(&rot13(&args.join(" ")))))
}

fn reveal(text: &str) -> DisplayPayload {
    DisplayPayload::Text(format!("<p class=\"hack-reveal\">{text}</p>"))
}

fn rot13(text: &str) -> String {
    text.chars()
        .map(|c| match c {
            'a'..='z' => (((c as u8 - b'a' + 13) % 26) + b'a') as char,
            'A'..='Z' => (((c as u8 - b'A' + 13) % 26) + b'A') as char,
            other => other,
        })
        .collect()
}
