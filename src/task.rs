//! List-manipulation task kinds.
//!
//! Each task is one variant of [`TaskKind`], carrying its natural-language
//! rendering and its ground-truth transform. Both are pure functions of the
//! case inputs. Dispatch is an exhaustive match per variant rather than a
//! name-keyed registry, so an unknown task cannot exist past construction.

use crate::value::{format_list, Value};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Errors from rendering or transforming case inputs.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransformError {
    #[error("task '{task}' expects {expected} inputs, got {got}")]
    Arity {
        task: &'static str,
        expected: usize,
        got: usize,
    },

    #[error("task '{task}' input {index} has the wrong type")]
    Type { task: &'static str, index: usize },

    #[error("unknown indexing convention '{0}'")]
    Convention(String),

    #[error("swap index out of bounds: {i1}, {i2} on list of length {len}")]
    IndexOutOfBounds { i1: i64, i2: i64, len: usize },
}

/// Whether position references in a task are 0-based or 1-based.
///
/// Affects only interpretation of indices, never storage. The convention
/// travels inside the case inputs as the word `zero` or `one`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Indexing {
    Zero,
    One,
}

impl Indexing {
    /// Both conventions, for uniform sampling.
    pub const ALL: [Indexing; 2] = [Indexing::Zero, Indexing::One];

    /// The word used in prompt text and case inputs.
    pub fn word(self) -> &'static str {
        match self {
            Indexing::Zero => "zero",
            Indexing::One => "one",
        }
    }

    /// Normalize a position stated in this convention to a 0-based index.
    pub fn to_zero_based(self, i: i64) -> i64 {
        match self {
            Indexing::Zero => i,
            Indexing::One => i - 1,
        }
    }

    /// Express a 0-based index in this convention.
    pub fn from_zero_based(self, i: i64) -> i64 {
        match self {
            Indexing::Zero => i,
            Indexing::One => i + 1,
        }
    }
}

impl fmt::Display for Indexing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.word())
    }
}

impl FromStr for Indexing {
    type Err = TransformError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "zero" => Ok(Indexing::Zero),
            "one" => Ok(Indexing::One),
            other => Err(TransformError::Convention(other.to_string())),
        }
    }
}

/// Unknown task name at parse time.
#[derive(Debug, Clone, Error)]
#[error("unknown task name '{0}'")]
pub struct ParseTaskError(pub String);

/// One list-manipulation task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskKind {
    /// Echo the list back.
    Print,
    /// Append a scalar operand at the end.
    Append,
    /// Add a scalar operand to every element.
    AddAll,
    /// Insert a scalar operand between the third and fourth element.
    InsertMiddle,
    /// Exchange the elements at two stated positions.
    SwapIndices,
    /// Report the position of the first occurrence of a target value.
    FindIndex,
}

impl TaskKind {
    /// The full task catalog, in presentation order.
    pub const ALL: [TaskKind; 6] = [
        TaskKind::Print,
        TaskKind::Append,
        TaskKind::AddAll,
        TaskKind::InsertMiddle,
        TaskKind::SwapIndices,
        TaskKind::FindIndex,
    ];

    /// Canonical task name.
    pub fn name(self) -> &'static str {
        match self {
            TaskKind::Print => "print",
            TaskKind::Append => "append",
            TaskKind::AddAll => "add_all",
            TaskKind::InsertMiddle => "insert_middle",
            TaskKind::SwapIndices => "swap_indices",
            TaskKind::FindIndex => "find_index",
        }
    }

    /// Number of inputs this task expects.
    pub fn arity(self) -> usize {
        match self {
            TaskKind::Print => 1,
            TaskKind::Append | TaskKind::AddAll | TaskKind::InsertMiddle => 2,
            TaskKind::SwapIndices => 4,
            TaskKind::FindIndex => 3,
        }
    }

    /// Render the natural-language instruction for the given inputs.
    pub fn render(self, inputs: &[Value]) -> Result<String, TransformError> {
        self.check_arity(inputs)?;
        match self {
            TaskKind::Print => {
                let list = self.list_arg(inputs, 0)?;
                Ok(format!(
                    "Print out this list of numbers: {}.",
                    format_list(list)
                ))
            }
            TaskKind::Append => {
                let list = self.list_arg(inputs, 0)?;
                let operand = self.int_arg(inputs, 1)?;
                Ok(format!(
                    "Append {} to the end of this list {}",
                    operand,
                    format_list(list)
                ))
            }
            TaskKind::AddAll => {
                let list = self.list_arg(inputs, 0)?;
                let operand = self.int_arg(inputs, 1)?;
                Ok(format!(
                    "Add {} to every element in this list: {}",
                    operand,
                    format_list(list)
                ))
            }
            TaskKind::InsertMiddle => {
                let list = self.list_arg(inputs, 0)?;
                let operand = self.int_arg(inputs, 1)?;
                Ok(format!(
                    "Insert {} between the third and fourth element in this list: {}",
                    operand,
                    format_list(list)
                ))
            }
            TaskKind::SwapIndices => {
                let list = self.list_arg(inputs, 0)?;
                let i1 = self.int_arg(inputs, 1)?;
                let i2 = self.int_arg(inputs, 2)?;
                let indexing = self.text_arg(inputs, 3)?;
                Ok(format!(
                    "Given a {} indexed list, {}, what would the list be \
                     if you swapped the elements at position {} and {}?",
                    indexing,
                    format_list(list),
                    i1,
                    i2
                ))
            }
            TaskKind::FindIndex => {
                let list = self.list_arg(inputs, 0)?;
                let target = self.int_arg(inputs, 1)?;
                let indexing = self.text_arg(inputs, 2)?;
                Ok(format!(
                    "Given a {} indexed list, {}, at what position does {} \
                     first appear? Answer -1 if it does not appear.",
                    indexing,
                    format_list(list),
                    target
                ))
            }
        }
    }

    /// Compute the ground-truth answer for the given inputs.
    pub fn transform(self, inputs: &[Value]) -> Result<Value, TransformError> {
        self.check_arity(inputs)?;
        match self {
            TaskKind::Print => Ok(Value::List(self.list_arg(inputs, 0)?.to_vec())),
            TaskKind::Append => {
                let mut out = self.list_arg(inputs, 0)?.to_vec();
                out.push(self.int_arg(inputs, 1)?);
                Ok(Value::List(out))
            }
            TaskKind::AddAll => {
                let operand = self.int_arg(inputs, 1)?;
                let out = self
                    .list_arg(inputs, 0)?
                    .iter()
                    .map(|x| x + operand)
                    .collect();
                Ok(Value::List(out))
            }
            TaskKind::InsertMiddle => {
                let mut out = self.list_arg(inputs, 0)?.to_vec();
                // Fixed split between 0-based positions 2 and 3 regardless of
                // length; shorter lists degrade to appending at the end.
                let at = out.len().min(3);
                out.insert(at, self.int_arg(inputs, 1)?);
                Ok(Value::List(out))
            }
            TaskKind::SwapIndices => {
                let mut out = self.list_arg(inputs, 0)?.to_vec();
                let indexing: Indexing = self.text_arg(inputs, 3)?.parse()?;
                let i1 = indexing.to_zero_based(self.int_arg(inputs, 1)?);
                let i2 = indexing.to_zero_based(self.int_arg(inputs, 2)?);
                let len = out.len();
                if i1 < 0 || i1 >= len as i64 || i2 < 0 || i2 >= len as i64 {
                    return Err(TransformError::IndexOutOfBounds { i1, i2, len });
                }
                out.swap(i1 as usize, i2 as usize);
                Ok(Value::List(out))
            }
            TaskKind::FindIndex => {
                let list = self.list_arg(inputs, 0)?;
                let target = self.int_arg(inputs, 1)?;
                let indexing: Indexing = self.text_arg(inputs, 2)?.parse()?;
                let answer = match list.iter().position(|&x| x == target) {
                    Some(p) => indexing.from_zero_based(p as i64),
                    None => -1,
                };
                Ok(Value::Int(answer))
            }
        }
    }

    fn check_arity(self, inputs: &[Value]) -> Result<(), TransformError> {
        if inputs.len() != self.arity() {
            return Err(TransformError::Arity {
                task: self.name(),
                expected: self.arity(),
                got: inputs.len(),
            });
        }
        Ok(())
    }

    fn list_arg<'a>(self, inputs: &'a [Value], index: usize) -> Result<&'a [i64], TransformError> {
        inputs[index].as_list().ok_or(TransformError::Type {
            task: self.name(),
            index,
        })
    }

    fn int_arg(self, inputs: &[Value], index: usize) -> Result<i64, TransformError> {
        inputs[index].as_int().ok_or(TransformError::Type {
            task: self.name(),
            index,
        })
    }

    fn text_arg<'a>(self, inputs: &'a [Value], index: usize) -> Result<&'a str, TransformError> {
        inputs[index].as_text().ok_or(TransformError::Type {
            task: self.name(),
            index,
        })
    }
}

impl fmt::Display for TaskKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for TaskKind {
    type Err = ParseTaskError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TaskKind::ALL
            .into_iter()
            .find(|kind| kind.name() == s)
            .ok_or_else(|| ParseTaskError(s.to_string()))
    }
}
