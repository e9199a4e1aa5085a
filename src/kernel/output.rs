//! Display payloads handed back to the rendering collaborator.
//!
//! The kernel never prints anything itself. Commands produce a
//! [`DisplayPayload`] and the front-end renders it: one paragraph per line,
//! strings starting with `<` passed through as pre-formatted markup, and
//! `Delayed` inserting a pause between lines.

/// What a command asks the renderer to show.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DisplayPayload {
    /// Nothing to print (e.g. `limpar` after the header redraw).
    Empty,
    /// A single line or pre-formatted fragment.
    Text(String),
    /// Ordered lines, each rendered on its own.
    Lines(Vec<String>),
    /// Ordered lines with a pause between them, in milliseconds.
    Delayed { lines: Vec<String>, delay_ms: u64 },
}

impl DisplayPayload {
    pub fn is_empty(&self) -> bool {
        match self {
            DisplayPayload::Empty => true,
            DisplayPayload::Text(text) => text.is_empty(),
            DisplayPayload::Lines(lines) => lines.is_empty(),
            DisplayPayload::Delayed { lines, .. } => lines.is_empty(),
        }
    }

    /// Flatten into renderable lines plus the inter-line delay, if any.
    pub fn into_lines(self) -> (Vec<String>, Option<u64>) {
        match self {
            DisplayPayload::Empty => (Vec::new(), None),
            DisplayPayload::Text(text) => (vec![text], None),
            DisplayPayload::Lines(lines) => (lines, None),
            DisplayPayload::Delayed { lines, delay_ms } => (lines, Some(delay_ms)),
        }
    }
}

impl From<String> for DisplayPayload {
    fn from(text: String) -> Self {
        DisplayPayload::Text(text)
    }
}

impl From<&str> for DisplayPayload {
    fn from(text: &str) -> Self {
        DisplayPayload::Text(text.to_string())
    }
}

impl From<Vec<String>> for DisplayPayload {
    fn from(lines: Vec<String>) -> Self {
        DisplayPayload::Lines(lines)
    }
}

/// A finished command: the payload to render, plus whether the screen must
/// be cleared (and the session header redrawn) first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub clear_screen: bool,
    pub payload: DisplayPayload,
}

impl Reply {
    pub fn empty() -> Self {
        Reply {
            clear_screen: false,
            payload: DisplayPayload::Empty,
        }
    }

    pub fn of(payload: impl Into<DisplayPayload>) -> Self {
        Reply {
            clear_screen: false,
            payload: payload.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn into_lines_keeps_order_and_delay() {
        let payload = DisplayPayload::Delayed {
            lines: vec!["a".into(), "b".into()],
            delay_ms: 120,
        };
        assert_eq!(
            payload.into_lines(),
            (vec!["a".to_string(), "b".to_string()], Some(120))
        );
        assert_eq!(DisplayPayload::from("x").into_lines(), (vec!["x".to_string()], None));
    }

    #[test]
    fn emptiness() {
        assert!(DisplayPayload::Empty.is_empty());
        assert!(DisplayPayload::Lines(vec![]).is_empty());
        assert!(!DisplayPayload::Text("oi".into()).is_empty());
        assert!(Reply::empty().payload.is_empty());
    }
}
