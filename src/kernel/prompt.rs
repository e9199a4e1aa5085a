//! The interactive-prompt protocol.
//!
//! A command may, instead of finishing, ask the player for one extra line of
//! input. The exchange is an explicit two-state machine: `dispatch` either
//! completes (`Outcome::Done`) or suspends (`Outcome::AwaitingInput`), with
//! the continuation parked inside the kernel until `resume` feeds it the
//! submitted line. At most one prompt can be pending; the front-end keeps
//! normal command handling disabled while one is.

use std::fmt;
use std::future::Future;
use std::pin::Pin;

use crate::errors::TermError;
use crate::kernel::output::{DisplayPayload, Reply};

/// Future produced by a prompt continuation.
pub type InputFuture = Pin<Box<dyn Future<Output = Result<DisplayPayload, TermError>> + Send>>;

/// Continuation invoked with the trimmed line the player submits.
pub type InputHandler = Box<dyn FnOnce(String) -> InputFuture + Send>;

/// A request to suspend the running command and read one line of input.
pub struct PromptRequest {
    /// Optional payload shown before the prompt label appears.
    pub message: Option<DisplayPayload>,
    /// Label rendered on the input line while suspended.
    pub label: String,
    pub(crate) handler: InputHandler,
}

impl PromptRequest {
    pub fn new<F>(handler: F) -> Self
    where
        F: FnOnce(String) -> InputFuture + Send + 'static,
    {
        PromptRequest {
            message: None,
            label: ">".to_string(),
            handler: Box::new(handler),
        }
    }

    pub fn with_message(mut self, message: impl Into<DisplayPayload>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }
}

impl fmt::Debug for PromptRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PromptRequest")
            .field("message", &self.message)
            .field("label", &self.label)
            .finish_non_exhaustive()
    }
}

/// Internal result of running one handler: finished, or suspended on a prompt.
pub(crate) enum Step {
    Done(Reply),
    Await(PromptRequest),
}

impl Step {
    pub(crate) fn done(reply: Reply) -> Result<Step, TermError> {
        Ok(Step::Done(reply))
    }
}

/// What the front-end sees from `dispatch`/`resume`.
#[derive(Debug)]
pub enum Outcome {
    /// The command finished; render the reply.
    Done(Reply),
    /// The command is suspended: show `message` (if any), switch the input
    /// line label to `label`, capture exactly one line, then call
    /// [`crate::kernel::Kernel::resume`] with it.
    AwaitingInput {
        message: Option<DisplayPayload>,
        label: String,
    },
}
