//! The external text-model interface.
//!
//! The core depends on exactly three operations: tokenize, generate, decode.
//! Generation must be deterministic (greedy decoding) so runs are
//! reproducible; `generate` returns only the continuation, never the echoed
//! prompt. Everything else about the model is opaque.
//!
//! [`MockModel`] is a rule-based stand-in: tokens are UTF-8 bytes and
//! generation actually solves the list task it finds in the prompt text.
//! It backs the test suite and offline CLI runs.

use crate::task::Indexing;
use crate::value::format_list;
use thiserror::Error;

/// Opaque model-invocation failure. The core records it against the single
/// case being evaluated and moves on; it never interprets the message.
#[derive(Debug, Clone, Error)]
#[error("model invocation failed: {0}")]
pub struct ModelError(String);

impl ModelError {
    pub fn new(msg: impl Into<String>) -> Self {
        Self(msg.into())
    }
}

/// A generative text model.
pub trait TextModel: Send + Sync {
    /// Encode text into model tokens.
    fn tokenize(&self, text: &str) -> Result<Vec<u32>, ModelError>;

    /// Greedily generate at most `max_new_tokens` continuation tokens.
    fn generate(&self, tokens: &[u32], max_new_tokens: usize) -> Result<Vec<u32>, ModelError>;

    /// Decode tokens back into text.
    fn decode(&self, tokens: &[u32]) -> Result<String, ModelError>;
}

fn byte_tokenize(text: &str) -> Vec<u32> {
    text.bytes().map(u32::from).collect()
}

fn byte_decode(tokens: &[u32]) -> Result<String, ModelError> {
    let bytes = tokens
        .iter()
        .map(|&t| {
            u8::try_from(t).map_err(|_| ModelError::new(format!("token {} outside byte range", t)))
        })
        .collect::<Result<Vec<u8>, ModelError>>()?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Rule-based model over byte tokens: parses the task out of the prompt by
/// keyword and performs the list operation itself.
#[derive(Debug, Clone, Copy, Default)]
pub struct MockModel;

impl MockModel {
    pub fn new() -> Self {
        Self
    }
}

impl TextModel for MockModel {
    fn tokenize(&self, text: &str) -> Result<Vec<u32>, ModelError> {
        Ok(byte_tokenize(text))
    }

    fn generate(&self, tokens: &[u32], max_new_tokens: usize) -> Result<Vec<u32>, ModelError> {
        let prompt = byte_decode(tokens)?;
        let answer = solve_list_task(&prompt);
        let mut out = byte_tokenize(&answer);
        out.truncate(max_new_tokens);
        Ok(out)
    }

    fn decode(&self, tokens: &[u32]) -> Result<String, ModelError> {
        byte_decode(tokens)
    }
}

/// A model that ignores the prompt and always completes with the same text.
/// Useful for forcing failures in tests and report demos.
#[derive(Debug, Clone)]
pub struct FixedModel {
    output: String,
}

impl FixedModel {
    pub fn new(output: impl Into<String>) -> Self {
        Self {
            output: output.into(),
        }
    }
}

impl TextModel for FixedModel {
    fn tokenize(&self, text: &str) -> Result<Vec<u32>, ModelError> {
        Ok(byte_tokenize(text))
    }

    fn generate(&self, _tokens: &[u32], max_new_tokens: usize) -> Result<Vec<u32>, ModelError> {
        let mut out = byte_tokenize(&self.output);
        out.truncate(max_new_tokens);
        Ok(out)
    }

    fn decode(&self, tokens: &[u32]) -> Result<String, ModelError> {
        byte_decode(tokens)
    }
}

/// Find the innermost bracketed number list in the prompt: the segment
/// between the last `[` before the first `]`.
fn first_list(prompt: &str) -> Option<Vec<i64>> {
    let close = prompt.find(']')?;
    let open = prompt[..close].rfind('[')?;
    let body = &prompt[open + 1..close];
    if body.trim().is_empty() {
        return Some(Vec::new());
    }
    body.split(',')
        .map(|s| s.trim().parse::<i64>().ok())
        .collect()
}

/// Extract integer literals in order of appearance.
fn extract_numbers(s: &str) -> Vec<i64> {
    s.split(|c: char| !c.is_ascii_digit() && c != '-')
        .filter_map(|tok| tok.parse().ok())
        .collect()
}

fn stated_indexing(lower: &str) -> Indexing {
    if lower.contains("zero indexed") {
        Indexing::Zero
    } else {
        Indexing::One
    }
}

/// Solve the list task embedded in a prompt, keyed on instruction keywords.
fn solve_list_task(prompt: &str) -> String {
    let list = match first_list(prompt) {
        Some(list) => list,
        None => return String::new(),
    };
    let lower = prompt.to_lowercase();

    if lower.contains("swapped") {
        let tail = match lower.find("position") {
            Some(at) => &lower[at..],
            None => "",
        };
        let positions = extract_numbers(tail);
        if positions.len() >= 2 {
            let indexing = stated_indexing(&lower);
            let i1 = indexing.to_zero_based(positions[0]);
            let i2 = indexing.to_zero_based(positions[1]);
            let len = list.len() as i64;
            if (0..len).contains(&i1) && (0..len).contains(&i2) {
                let mut out = list;
                out.swap(i1 as usize, i2 as usize);
                return format_list(&out);
            }
        }
        return "index out of bounds".to_string();
    }

    if let Some(at) = lower.find("first appear") {
        let target = match extract_numbers(&lower[..at]).last() {
            Some(&target) => target,
            None => return "-1".to_string(),
        };
        let indexing = stated_indexing(&lower);
        let answer = match list.iter().position(|&x| x == target) {
            Some(p) => indexing.from_zero_based(p as i64),
            None => -1,
        };
        return answer.to_string();
    }

    if lower.contains("append") {
        if let Some(&operand) = extract_numbers(&lower).first() {
            let mut out = list;
            out.push(operand);
            return format_list(&out);
        }
    } else if lower.contains("every element") {
        if let Some(&operand) = extract_numbers(&lower).first() {
            let out: Vec<i64> = list.iter().map(|x| x + operand).collect();
            return format_list(&out);
        }
    } else if lower.contains("insert") {
        if let Some(&operand) = extract_numbers(&lower).first() {
            let mut out = list;
            let at = out.len().min(3);
            out.insert(at, operand);
            return format_list(&out);
        }
    }

    // Print and anything unrecognized: echo the list back.
    format_list(&list)
}
