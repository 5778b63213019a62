//! Probegen - List-Task Prompt Probing Harness
//!
//! Generates parametrized natural-language prompts describing
//! list-manipulation tasks, pairs them with randomly sampled inputs and
//! computed ground-truth answers, wraps them in textual framings, runs them
//! through a text model, and scores the outputs. A failure-mode collector
//! extracts minimal input perturbations that flip correctness.
//!
//! # Pipeline
//!
//! ```text
//! ┌──────────────┐   ┌───────────────┐   ┌──────────────┐
//! │ ListSampler  │──▶│ PromptFamily  │──▶│  Evaluator   │
//! │ random input │   │ cases = tasks │   │ model + score│
//! └──────────────┘   │    x wraps    │   └──────┬───────┘
//!                    └───────────────┘          │
//!                                               ▼
//!                                    ┌─────────────────────┐
//!                                    │ collect_failure_modes│
//!                                    │ (clean, corrupted)   │
//!                                    └─────────────────────┘
//! ```
//!
//! # Example
//!
//! ```rust
//! use probegen::{list_family, EvalOptions, ListFamilyConfig, MockModel};
//!
//! let mut family = list_family(&ListFamilyConfig::default(), 42);
//! family.generate_all(2).unwrap();
//! let report = family.evaluate_all(&MockModel::new(), EvalOptions::default());
//! println!("{}", report.summary());
//! ```

#![warn(clippy::all)]

pub mod config;
pub mod contrast;
pub mod eval;
pub mod list;
pub mod model;
pub mod prompt;
pub mod task;
pub mod value;
pub mod wrap;

// Re-export commonly used types
pub use config::{ConfigError, ConfigResult, ListFamilyConfig, ProbeConfig, Seed};
pub use contrast::collect_failure_modes;
pub use eval::{CaseRecord, EvalOptions, EvalReport, Evaluation, Evaluator, SuccessKey};
pub use list::{check_behavior, list_family, FillMode, ListSampler};
pub use model::{FixedModel, MockModel, ModelError, TextModel};
pub use prompt::{CaseError, Prompt, PromptCase, PromptFamily, SampleInputs};
pub use task::{Indexing, TaskKind, TransformError};
pub use value::{format_inputs, format_list, Value};
pub use wrap::WrapKind;
