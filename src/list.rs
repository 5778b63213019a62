//! The list prompt family.
//!
//! Supplies the task-specific random-input generators (several fill modes)
//! and behavior checking for the list-manipulation catalog, and assembles
//! the whole thing into a [`PromptFamily`] from a [`ListFamilyConfig`].

use crate::config::ListFamilyConfig;
use crate::eval::Evaluation;
use crate::prompt::{Prompt, PromptCase, PromptFamily, SampleInputs};
use crate::task::{Indexing, TaskKind};
use crate::value::Value;
use crate::wrap::WrapKind;
use rand::Rng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

/// Strategy used to populate a randomly generated numeric list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FillMode {
    /// Independent uniform draws.
    #[default]
    Random,
    /// A single drawn value repeated.
    Uniform,
    /// A single repeated value with exactly one position replaced by a
    /// different one.
    SingleOutlier,
}

/// Per-task random input sampling for the list family.
#[derive(Debug, Clone)]
pub struct ListSampler {
    kind: TaskKind,
    config: ListFamilyConfig,
}

impl ListSampler {
    pub fn new(kind: TaskKind, config: ListFamilyConfig) -> Self {
        Self { kind, config }
    }

    /// Draw a list according to the configured fill mode.
    ///
    /// Elements always lie in `[min_val, max_val)` and the length always
    /// equals `list_size`.
    fn sample_list(&self, rng: &mut ChaCha8Rng) -> Vec<i64> {
        let cfg = &self.config;
        match cfg.fill_mode {
            FillMode::Random => (0..cfg.list_size)
                .map(|_| rng.gen_range(cfg.min_val..cfg.max_val))
                .collect(),
            FillMode::Uniform => {
                let fill = rng.gen_range(cfg.min_val..cfg.max_val);
                vec![fill; cfg.list_size]
            }
            FillMode::SingleOutlier => {
                let fill = rng.gen_range(cfg.min_val..cfg.max_val);
                let mut outlier = fill;
                // Resample until the outlier differs from the fill value.
                while outlier == fill {
                    outlier = rng.gen_range(cfg.min_val..cfg.max_val);
                }
                let mut list = vec![fill; cfg.list_size];
                let at = rng.gen_range(0..cfg.list_size);
                list[at] = outlier;
                list
            }
        }
    }

    fn sample_operand(&self, rng: &mut ChaCha8Rng) -> i64 {
        rng.gen_range(self.config.append_min..self.config.append_max)
    }

    fn sample_indexing(rng: &mut ChaCha8Rng) -> Indexing {
        Indexing::ALL[rng.gen_range(0..Indexing::ALL.len())]
    }

    fn sample_find_target(&self, list: &[i64], rng: &mut ChaCha8Rng) -> i64 {
        if self.config.fill_mode == FillMode::SingleOutlier {
            // The outlier contract guarantees a value occurring exactly once;
            // its absence is a caller/config bug, not a runtime condition.
            return *list
                .iter()
                .find(|&&v| list.iter().filter(|&&w| w == v).count() == 1)
                .expect("single_outlier list must contain a value occurring exactly once");
        }
        if rng.gen_bool(0.8) {
            list[rng.gen_range(0..list.len())]
        } else {
            let mut target = rng.gen_range(self.config.min_val..self.config.max_val);
            while list.contains(&target) {
                target = rng.gen_range(self.config.min_val..self.config.max_val);
            }
            target
        }
    }
}

impl SampleInputs for ListSampler {
    fn sample(&self, rng: &mut ChaCha8Rng) -> Vec<Value> {
        let list = self.sample_list(rng);
        match self.kind {
            TaskKind::Print => vec![Value::List(list)],
            TaskKind::Append | TaskKind::AddAll | TaskKind::InsertMiddle => {
                let operand = self.sample_operand(rng);
                vec![Value::List(list), Value::Int(operand)]
            }
            TaskKind::SwapIndices => {
                let indexing = Self::sample_indexing(rng);
                let len = list.len() as i64;
                let (i1, i2) = match indexing {
                    Indexing::Zero => (rng.gen_range(0..len), rng.gen_range(0..len)),
                    Indexing::One => (rng.gen_range(1..=len), rng.gen_range(1..=len)),
                };
                vec![
                    Value::List(list),
                    Value::Int(i1),
                    Value::Int(i2),
                    Value::Text(indexing.word().to_string()),
                ]
            }
            TaskKind::FindIndex => {
                let indexing = Self::sample_indexing(rng);
                let target = self.sample_find_target(&list, rng);
                vec![
                    Value::List(list),
                    Value::Int(target),
                    Value::Text(indexing.word().to_string()),
                ]
            }
        }
    }
}

/// Build the `list` prompt family: every task in the catalog with its
/// sampler, combined with every wrap.
pub fn list_family(config: &ListFamilyConfig, seed: u64) -> PromptFamily {
    let prompts = TaskKind::ALL
        .iter()
        .map(|&kind| Prompt::with_sampler(kind, Box::new(ListSampler::new(kind, config.clone()))))
        .collect();
    PromptFamily::new("list", prompts, WrapKind::ALL.to_vec(), seed)
}

/// Score a model output against a case's ground truth: trimmed exact match
/// and trimmed substring match.
pub fn check_behavior(case: &PromptCase, output: &str) -> Evaluation {
    Evaluation::score(case.ground_truth(), output)
}
