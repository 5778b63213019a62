//! Prompt framings.
//!
//! A wrap embeds a rendered task instruction in some outer text before it is
//! sent to the model: a passthrough, an output-format instruction, a fake
//! interpreter transcript, or a chat-style transcript. Wraps are pure string
//! transforms; they format the original inputs but never mutate them.

use crate::value::{format_inputs, Value};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Unknown wrap name at parse time.
#[derive(Debug, Clone, Error)]
#[error("unknown wrap name '{0}'")]
pub struct ParseWrapError(pub String);

/// One textual framing applied to a rendered prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WrapKind {
    /// Identity passthrough.
    Plain,
    /// Append an output-format instruction and an opening bracket.
    List,
    /// Frame as a fake interpreter transcript with the raw inputs inline.
    Interpreter,
    /// Frame as a three-turn chat transcript with a fixed system message.
    System,
}

impl WrapKind {
    /// The full wrap catalog, in presentation order.
    pub const ALL: [WrapKind; 4] = [
        WrapKind::Plain,
        WrapKind::List,
        WrapKind::Interpreter,
        WrapKind::System,
    ];

    /// Canonical wrap name.
    pub fn name(self) -> &'static str {
        match self {
            WrapKind::Plain => "plain",
            WrapKind::List => "list",
            WrapKind::Interpreter => "interpreter",
            WrapKind::System => "system",
        }
    }

    /// Embed a rendered prompt in this framing.
    pub fn apply(self, rendered: &str, inputs: &[Value]) -> String {
        match self {
            WrapKind::Plain => rendered.to_string(),
            WrapKind::List => format!(
                "{}\nOnly output a list, no other information.\nList: [",
                rendered
            ),
            WrapKind::Interpreter => format!(
                "Pretend you are a Python interpreter.\nTASK: {}\nINPUT: {}\nOUTPUT:",
                rendered,
                format_inputs(inputs)
            ),
            WrapKind::System => format!(
                "<|system|> You are a helpful assistant.\n<|user|> {}\n<|assistant|>",
                rendered
            ),
        }
    }
}

impl fmt::Display for WrapKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for WrapKind {
    type Err = ParseWrapError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        WrapKind::ALL
            .into_iter()
            .find(|wrap| wrap.name() == s)
            .ok_or_else(|| ParseWrapError(s.to_string()))
    }
}
