//! Case evaluation and reporting.
//!
//! The evaluator runs every case's fully wrapped prompt through a model with
//! greedy decoding, records an [`Evaluation`] on the case, and produces an
//! [`EvalReport`]: a one-line success summary plus per-case blocks ordered
//! failures first.

use crate::model::{ModelError, TextModel};
use crate::prompt::PromptCase;
use crate::value::Value;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Unknown success-key name at parse time.
#[derive(Debug, Clone, Error)]
#[error("unknown success key '{0}'")]
pub struct ParseKeyError(pub String);

/// Which recorded match decides whether a case counts as a success.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SuccessKey {
    /// Trimmed output equals the stringified ground truth.
    ExactMatch,
    /// Trimmed ground truth appears anywhere in the trimmed output.
    #[default]
    Substring,
}

impl SuccessKey {
    pub fn name(self) -> &'static str {
        match self {
            SuccessKey::ExactMatch => "exact_match",
            SuccessKey::Substring => "substring",
        }
    }
}

impl fmt::Display for SuccessKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SuccessKey {
    type Err = ParseKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "exact_match" => Ok(SuccessKey::ExactMatch),
            "substring" => Ok(SuccessKey::Substring),
            other => Err(ParseKeyError(other.to_string())),
        }
    }
}

/// The recorded outcome of one model invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Evaluation {
    pub exact_match: bool,
    pub substring_match: bool,
    /// Raw decoded model output (empty when the invocation failed).
    pub output: String,
    /// Model-invocation failure, recorded against this case only.
    pub error: Option<String>,
}

impl Evaluation {
    /// Score a decoded output against a ground truth.
    pub fn score(ground_truth: &Value, output: &str) -> Self {
        let expected = ground_truth.to_string();
        let expected = expected.trim();
        let got = output.trim();
        Self {
            exact_match: got == expected,
            substring_match: got.contains(expected),
            output: output.to_string(),
            error: None,
        }
    }

    /// Record a model failure: both match flags false, no output.
    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            exact_match: false,
            substring_match: false,
            output: String::new(),
            error: Some(error.into()),
        }
    }

    /// Whether this outcome counts as a success under the given key.
    pub fn passed(&self, key: SuccessKey) -> bool {
        match key {
            SuccessKey::ExactMatch => self.exact_match,
            SuccessKey::Substring => self.substring_match,
        }
    }
}

/// Evaluation parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvalOptions {
    /// Generation cap per case.
    pub max_tokens: usize,
    /// Which match flag counts as success in the report.
    pub success_key: SuccessKey,
}

impl Default for EvalOptions {
    fn default() -> Self {
        Self {
            max_tokens: 32,
            success_key: SuccessKey::default(),
        }
    }
}

/// Runs cases through a model, strictly sequentially, one at a time.
pub struct Evaluator<'a> {
    model: &'a dyn TextModel,
    options: EvalOptions,
}

impl<'a> Evaluator<'a> {
    pub fn new(model: &'a dyn TextModel) -> Self {
        Self {
            model,
            options: EvalOptions::default(),
        }
    }

    pub fn with_options(mut self, options: EvalOptions) -> Self {
        self.options = options;
        self
    }

    /// Evaluate every case in place and build the report.
    ///
    /// A model failure is fatal to that case only: it is recorded on the
    /// case and the batch continues, leaving earlier results untouched.
    pub fn evaluate_all(&self, cases: &mut [PromptCase]) -> EvalReport {
        for case in cases.iter_mut() {
            let evaluation = match self.run_case(case) {
                Ok(evaluation) => evaluation,
                Err(err) => Evaluation::failed(err.to_string()),
            };
            case.record_evaluation(evaluation);
        }
        EvalReport::from_cases(cases, self.options.success_key)
    }

    fn run_case(&self, case: &PromptCase) -> Result<Evaluation, ModelError> {
        let prompt = case.prompt();
        let tokens = self.model.tokenize(&prompt)?;
        let generated = self.model.generate(&tokens, self.options.max_tokens)?;
        let output = self.model.decode(&generated)?;
        Ok(Evaluation::score(case.ground_truth(), &output))
    }
}

/// One report row.
#[derive(Debug, Clone, Serialize)]
pub struct CaseRecord {
    pub task_id: String,
    pub task: String,
    pub wrap: Option<String>,
    pub prompt: String,
    pub expected: String,
    pub output: String,
    pub error: Option<String>,
    pub passed: bool,
}

/// Aggregated evaluation results for one batch.
#[derive(Debug, Clone, Serialize)]
pub struct EvalReport {
    pub success_key: SuccessKey,
    pub passed_count: usize,
    pub total: usize,
    /// Per-case rows in original batch order.
    pub records: Vec<CaseRecord>,
}

impl EvalReport {
    /// Build a report from evaluated cases. Cases that were never evaluated
    /// count as failures.
    pub fn from_cases(cases: &[PromptCase], success_key: SuccessKey) -> Self {
        let records: Vec<CaseRecord> = cases
            .iter()
            .map(|case| {
                let (passed, output, error) = match case.evaluation() {
                    Some(evaluation) => (
                        evaluation.passed(success_key),
                        evaluation.output.clone(),
                        evaluation.error.clone(),
                    ),
                    None => (false, String::new(), Some("not evaluated".to_string())),
                };
                CaseRecord {
                    task_id: case.task_id().to_string(),
                    task: case.kind().name().to_string(),
                    wrap: case.wrap().map(|w| w.name().to_string()),
                    prompt: case.prompt(),
                    expected: case.ground_truth().to_string(),
                    output,
                    error,
                    passed,
                }
            })
            .collect();
        let passed_count = records.iter().filter(|r| r.passed).count();
        Self {
            success_key,
            passed_count,
            total: records.len(),
            records,
        }
    }

    /// One-line summary: `successes/total correct (pct%)`.
    pub fn summary(&self) -> String {
        let pct = if self.total == 0 {
            0.0
        } else {
            self.passed_count as f64 / self.total as f64 * 100.0
        };
        format!("{}/{} correct ({:.1}%)", self.passed_count, self.total, pct)
    }

    /// Rows ordered all failures first, then all successes, each group in
    /// original batch order.
    pub fn ordered_records(&self) -> Vec<&CaseRecord> {
        let mut ordered: Vec<&CaseRecord> = self.records.iter().filter(|r| !r.passed).collect();
        ordered.extend(self.records.iter().filter(|r| r.passed));
        ordered
    }
}

impl fmt::Display for EvalReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.summary())?;
        for record in self.ordered_records() {
            let status = if record.passed { "PASS" } else { "FAIL" };
            let wrap = record.wrap.as_deref().unwrap_or("none");
            writeln!(f)?;
            writeln!(f, "[{}] {} (wrap: {})", status, record.task_id, wrap)?;
            writeln!(f, "prompt:")?;
            writeln!(f, "{}", record.prompt)?;
            writeln!(f, "expected: {}", record.expected)?;
            writeln!(f, "actual:   {}", record.output)?;
            if let Some(error) = &record.error {
                writeln!(f, "error:    {}", error)?;
            }
        }
        Ok(())
    }
}
