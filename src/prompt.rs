//! Prompt templates, cases, and families.
//!
//! A [`Prompt`] is an immutable task template plus an optional random-input
//! sampler. A [`PromptCase`] is one concrete trial: fixed inputs, a ground
//! truth computed once at creation, and an optional wrap. A [`PromptFamily`]
//! groups a catalog of prompts with a wrap catalog and generates batches of
//! cases over their cross product.

use crate::eval::{EvalOptions, EvalReport, Evaluation, Evaluator};
use crate::model::TextModel;
use crate::task::{TaskKind, TransformError};
use crate::value::Value;
use crate::wrap::WrapKind;
use indexmap::IndexMap;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use thiserror::Error;

/// Errors from case creation and batch generation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CaseError {
    #[error("no input sampler registered for task '{0}'")]
    NoSampler(&'static str),

    #[error("task '{0}' is not part of this family")]
    UnknownTask(&'static str),

    #[error(transparent)]
    Transform(#[from] TransformError),
}

/// Random input generation for one prompt.
///
/// Implementations draw a complete input sequence for their task from the
/// given seeded generator.
pub trait SampleInputs: Send + Sync {
    fn sample(&self, rng: &mut ChaCha8Rng) -> Vec<Value>;
}

/// An immutable task template: rendering, ground-truth transform (both via
/// the task kind) and an optional random-input sampler.
pub struct Prompt {
    kind: TaskKind,
    sampler: Option<Box<dyn SampleInputs>>,
    // Builds default task IDs only; never consulted for correctness.
    case_counter: u32,
}

impl Prompt {
    /// A prompt with no sampler: it can only create cases from explicit
    /// inputs.
    pub fn new(kind: TaskKind) -> Self {
        Self {
            kind,
            sampler: None,
            case_counter: 0,
        }
    }

    /// A prompt that can also generate random cases.
    pub fn with_sampler(kind: TaskKind, sampler: Box<dyn SampleInputs>) -> Self {
        Self {
            kind,
            sampler: Some(sampler),
            case_counter: 0,
        }
    }

    pub fn kind(&self) -> TaskKind {
        self.kind
    }

    /// Draw a random input sequence.
    pub fn sample_inputs(&self, rng: &mut ChaCha8Rng) -> Result<Vec<Value>, CaseError> {
        match &self.sampler {
            Some(sampler) => Ok(sampler.sample(rng)),
            None => Err(CaseError::NoSampler(self.kind.name())),
        }
    }

    /// Create one case. Missing inputs are sampled; the ground truth is
    /// computed here, once, and never recomputed afterwards.
    pub fn create_case(
        &mut self,
        rng: &mut ChaCha8Rng,
        inputs: Option<Vec<Value>>,
        task_id: Option<String>,
    ) -> Result<PromptCase, CaseError> {
        let inputs = match inputs {
            Some(inputs) => inputs,
            None => self.sample_inputs(rng)?,
        };
        let ground_truth = self.kind.transform(&inputs)?;
        let task_id =
            task_id.unwrap_or_else(|| format!("{}-{}", self.kind.name(), self.case_counter));
        self.case_counter += 1;

        Ok(PromptCase {
            task_id,
            kind: self.kind,
            wrap: None,
            inputs,
            ground_truth,
            evaluation: None,
        })
    }

    /// Create `n` independent cases with freshly sampled inputs. Duplicate
    /// input sequences across cases are permitted and expected.
    pub fn create_cases(
        &mut self,
        rng: &mut ChaCha8Rng,
        n: usize,
    ) -> Result<Vec<PromptCase>, CaseError> {
        let mut cases = Vec::with_capacity(n);
        for _ in 0..n {
            cases.push(self.create_case(rng, None, None)?);
        }
        Ok(cases)
    }
}

/// One concrete trial instance.
#[derive(Debug, Clone)]
pub struct PromptCase {
    task_id: String,
    kind: TaskKind,
    wrap: Option<WrapKind>,
    inputs: Vec<Value>,
    ground_truth: Value,
    evaluation: Option<Evaluation>,
}

impl PromptCase {
    pub fn task_id(&self) -> &str {
        &self.task_id
    }

    pub fn kind(&self) -> TaskKind {
        self.kind
    }

    pub fn wrap(&self) -> Option<WrapKind> {
        self.wrap
    }

    /// Attach or replace the wrap applied on every `prompt()` access.
    pub fn set_wrap(&mut self, wrap: WrapKind) {
        self.wrap = Some(wrap);
    }

    pub fn inputs(&self) -> &[Value] {
        &self.inputs
    }

    pub fn ground_truth(&self) -> &Value {
        &self.ground_truth
    }

    pub fn evaluation(&self) -> Option<&Evaluation> {
        self.evaluation.as_ref()
    }

    pub fn record_evaluation(&mut self, evaluation: Evaluation) {
        self.evaluation = Some(evaluation);
    }

    /// The full prompt text: the rendered instruction, wrapped if a wrap is
    /// attached. Recomputed on every access so it always reflects the
    /// current wrap; never cached.
    pub fn prompt(&self) -> String {
        let core = self
            .kind
            .render(&self.inputs)
            .expect("case inputs were validated at creation");
        match self.wrap {
            Some(wrap) => wrap.apply(&core, &self.inputs),
            None => core,
        }
    }

    /// Copy-based clone with replaced inputs: same task and wrap, fresh
    /// ground truth, cleared evaluation. The safe way to derive a modified
    /// case without mutating this one.
    pub fn variant(&self, inputs: Vec<Value>) -> Result<PromptCase, CaseError> {
        let ground_truth = self.kind.transform(&inputs)?;
        Ok(PromptCase {
            task_id: format!("{}-v", self.task_id),
            kind: self.kind,
            wrap: self.wrap,
            inputs,
            ground_truth,
            evaluation: None,
        })
    }
}

/// A named catalog of prompts and wraps, plus the most recent generated
/// batch of cases.
pub struct PromptFamily {
    name: String,
    prompts: IndexMap<TaskKind, Prompt>,
    wraps: Vec<WrapKind>,
    rng: ChaCha8Rng,
    cases: Vec<PromptCase>,
}

impl PromptFamily {
    pub fn new(
        name: impl Into<String>,
        prompts: Vec<Prompt>,
        wraps: Vec<WrapKind>,
        seed: u64,
    ) -> Self {
        Self {
            name: name.into(),
            prompts: prompts.into_iter().map(|p| (p.kind(), p)).collect(),
            wraps,
            rng: ChaCha8Rng::seed_from_u64(seed),
            cases: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn wraps(&self) -> &[WrapKind] {
        &self.wraps
    }

    pub fn kinds(&self) -> impl Iterator<Item = TaskKind> + '_ {
        self.prompts.keys().copied()
    }

    /// The current batch.
    pub fn cases(&self) -> &[PromptCase] {
        &self.cases
    }

    pub fn cases_mut(&mut self) -> &mut [PromptCase] {
        &mut self.cases
    }

    /// Generate `n` cases for one (task, wrap) cell and append them to the
    /// current batch. Returns the newly generated slice.
    pub fn generate(
        &mut self,
        kind: TaskKind,
        wrap: WrapKind,
        n: usize,
    ) -> Result<&[PromptCase], CaseError> {
        let prompt = self
            .prompts
            .get_mut(&kind)
            .ok_or(CaseError::UnknownTask(kind.name()))?;
        let mut cases = prompt.create_cases(&mut self.rng, n)?;
        for case in &mut cases {
            case.set_wrap(wrap);
        }
        let start = self.cases.len();
        self.cases.extend(cases);
        Ok(&self.cases[start..])
    }

    /// Generate a fresh batch: `n` cases for every task x wrap combination,
    /// in catalog order. The previous batch is discarded first; repeated
    /// calls never accumulate.
    pub fn generate_all(&mut self, n: usize) -> Result<&[PromptCase], CaseError> {
        self.cases.clear();
        let kinds: Vec<TaskKind> = self.prompts.keys().copied().collect();
        let wraps = self.wraps.clone();
        for kind in kinds {
            for &wrap in &wraps {
                self.generate(kind, wrap, n)?;
            }
        }
        Ok(&self.cases)
    }

    /// Run every case in the current batch through the model and record the
    /// per-case evaluation in place.
    pub fn evaluate_all(&mut self, model: &dyn TextModel, options: EvalOptions) -> EvalReport {
        Evaluator::new(model)
            .with_options(options)
            .evaluate_all(&mut self.cases)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedSampler(Vec<Value>);

    impl SampleInputs for FixedSampler {
        fn sample(&self, _rng: &mut ChaCha8Rng) -> Vec<Value> {
            self.0.clone()
        }
    }

    fn rng() -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(0)
    }

    fn append_prompt() -> Prompt {
        Prompt::with_sampler(
            TaskKind::Append,
            Box::new(FixedSampler(vec![Value::List(vec![1, 2, 3]), Value::Int(7)])),
        )
    }

    #[test]
    fn test_create_case_computes_ground_truth() {
        let mut prompt = append_prompt();
        let case = prompt.create_case(&mut rng(), None, None).unwrap();
        assert_eq!(case.ground_truth(), &Value::List(vec![1, 2, 3, 7]));
        assert_eq!(case.task_id(), "append-0");
    }

    #[test]
    fn test_case_counter_builds_default_ids() {
        let mut prompt = append_prompt();
        let mut rng = rng();
        let first = prompt.create_case(&mut rng, None, None).unwrap();
        let second = prompt.create_case(&mut rng, None, None).unwrap();
        assert_eq!(first.task_id(), "append-0");
        assert_eq!(second.task_id(), "append-1");
    }

    #[test]
    fn test_explicit_task_id_wins() {
        let mut prompt = append_prompt();
        let case = prompt
            .create_case(&mut rng(), None, Some("trial-a".to_string()))
            .unwrap();
        assert_eq!(case.task_id(), "trial-a");
    }

    #[test]
    fn test_no_sampler_is_a_configuration_error() {
        let mut prompt = Prompt::new(TaskKind::Print);
        let err = prompt.create_case(&mut rng(), None, None).unwrap_err();
        assert_eq!(err, CaseError::NoSampler("print"));
    }

    #[test]
    fn test_explicit_inputs_bypass_sampler() {
        let mut prompt = Prompt::new(TaskKind::Print);
        let case = prompt
            .create_case(&mut rng(), Some(vec![Value::List(vec![9])]), None)
            .unwrap();
        assert_eq!(case.ground_truth(), &Value::List(vec![9]));
    }

    #[test]
    fn test_prompt_reflects_current_wrap() {
        let mut prompt = append_prompt();
        let mut case = prompt.create_case(&mut rng(), None, None).unwrap();
        let bare = case.prompt();
        case.set_wrap(WrapKind::List);
        assert!(case.prompt().starts_with(&bare));
        assert!(case.prompt().ends_with("List: ["));
    }

    #[test]
    fn test_variant_recomputes_ground_truth() {
        let mut prompt = append_prompt();
        let case = prompt.create_case(&mut rng(), None, None).unwrap();
        let variant = case
            .variant(vec![Value::List(vec![4, 4]), Value::Int(1)])
            .unwrap();
        assert_eq!(variant.ground_truth(), &Value::List(vec![4, 4, 1]));
        assert_eq!(variant.kind(), case.kind());
        assert!(variant.evaluation().is_none());
    }

    #[test]
    fn test_generate_all_is_a_fresh_cross_product() {
        let prompts = vec![append_prompt()];
        let mut family = PromptFamily::new(
            "tiny",
            prompts,
            vec![WrapKind::Plain, WrapKind::List],
            3,
        );
        family.generate_all(4).unwrap();
        assert_eq!(family.cases().len(), 8);
        // A second call replaces the batch instead of appending.
        family.generate_all(2).unwrap();
        assert_eq!(family.cases().len(), 4);
    }

    #[test]
    fn test_generate_sets_wrap_and_appends() {
        let prompts = vec![append_prompt()];
        let mut family = PromptFamily::new("tiny", prompts, vec![WrapKind::Plain], 3);
        let generated = family
            .generate(TaskKind::Append, WrapKind::Interpreter, 2)
            .unwrap();
        assert_eq!(generated.len(), 2);
        assert!(generated
            .iter()
            .all(|c| c.wrap() == Some(WrapKind::Interpreter)));
        family.generate(TaskKind::Append, WrapKind::Plain, 1).unwrap();
        assert_eq!(family.cases().len(), 3);
    }

    #[test]
    fn test_generate_unknown_task_fails() {
        let prompts = vec![append_prompt()];
        let mut family = PromptFamily::new("tiny", prompts, vec![WrapKind::Plain], 3);
        let err = family
            .generate(TaskKind::Print, WrapKind::Plain, 1)
            .unwrap_err();
        assert_eq!(err, CaseError::UnknownTask("print"));
    }
}
