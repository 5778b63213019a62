//! Minimal contrastive pair extraction.
//!
//! Given an evaluated batch and a pivot input position, find every pair of
//! cases that are identical on all inputs except the pivot, where exactly
//! one of the two succeeded. Each emitted pair is ordered (clean,
//! corrupted): the succeeding case first.

use crate::eval::SuccessKey;
use crate::prompt::PromptCase;
use crate::value::Value;
use indexmap::IndexMap;

/// Collect (clean, corrupted) pairs around one pivot input position.
///
/// Cases are bucketed by their non-pivot inputs, then sub-grouped by the
/// pivot value; only adjacent pivot-value groups in first-seen order are
/// compared. Pairs where both cases pass, both fail, or whose non-pivot
/// inputs turn out not to be equal are skipped silently. Cases that were
/// never evaluated count as failures.
pub fn collect_failure_modes<'a>(
    cases: &'a [PromptCase],
    pivot_index: usize,
    success_key: SuccessKey,
) -> Vec<(&'a PromptCase, &'a PromptCase)> {
    // Bucket by all inputs except the pivot.
    let mut buckets: IndexMap<Vec<Value>, Vec<&'a PromptCase>> = IndexMap::new();
    for case in cases {
        if case.inputs().len() <= pivot_index {
            continue;
        }
        let key: Vec<Value> = case
            .inputs()
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != pivot_index)
            .map(|(_, v)| v.clone())
            .collect();
        buckets.entry(key).or_default().push(case);
    }

    let mut pairs = Vec::new();
    for bucket in buckets.values() {
        // Sub-group by the pivot value, keeping first-seen order.
        let mut by_pivot: IndexMap<&'a Value, Vec<&'a PromptCase>> = IndexMap::new();
        for &case in bucket {
            by_pivot
                .entry(&case.inputs()[pivot_index])
                .or_default()
                .push(case);
        }
        if by_pivot.len() < 2 {
            continue;
        }

        let groups: Vec<Vec<&'a PromptCase>> = by_pivot.into_values().collect();
        for window in groups.windows(2) {
            for &left in &window[0] {
                for &right in &window[1] {
                    if !differ_only_at_pivot(left, right, pivot_index) {
                        continue;
                    }
                    let left_passed = passed(left, success_key);
                    let right_passed = passed(right, success_key);
                    if left_passed && !right_passed {
                        pairs.push((left, right));
                    } else if right_passed && !left_passed {
                        pairs.push((right, left));
                    }
                }
            }
        }
    }
    pairs
}

/// Defensive re-check beyond the bucket key: equal everywhere but the pivot,
/// and actually different at the pivot.
fn differ_only_at_pivot(a: &PromptCase, b: &PromptCase, pivot_index: usize) -> bool {
    if a.inputs().len() != b.inputs().len() {
        return false;
    }
    a.inputs()
        .iter()
        .zip(b.inputs())
        .enumerate()
        .all(|(i, (x, y))| if i == pivot_index { x != y } else { x == y })
}

fn passed(case: &PromptCase, success_key: SuccessKey) -> bool {
    case.evaluation()
        .map(|evaluation| evaluation.passed(success_key))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::eval::Evaluation;
    use crate::prompt::Prompt;
    use crate::task::TaskKind;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn case(task_id: &str, list: Vec<i64>, operand: i64, output: &str) -> PromptCase {
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let mut case = Prompt::new(TaskKind::Append)
            .create_case(
                &mut rng,
                Some(vec![Value::List(list), Value::Int(operand)]),
                Some(task_id.to_string()),
            )
            .unwrap();
        let evaluation = Evaluation::score(case.ground_truth(), output);
        case.record_evaluation(evaluation);
        case
    }

    fn good(task_id: &str, list: Vec<i64>, operand: i64) -> PromptCase {
        let mut out = list.clone();
        out.push(operand);
        let output = crate::value::format_list(&out);
        case(task_id, list, operand, &output)
    }

    fn bad(task_id: &str, list: Vec<i64>, operand: i64) -> PromptCase {
        case(task_id, list, operand, "garbage")
    }

    #[test]
    fn test_minimal_pair_is_emitted_clean_first() {
        let cases = vec![good("clean", vec![1, 2, 3], 7), bad("corrupt", vec![1, 2, 3], 8)];
        let pairs = collect_failure_modes(&cases, 1, SuccessKey::ExactMatch);
        assert_eq!(pairs.len(), 1);
        assert_eq!(pairs[0].0.task_id(), "clean");
        assert_eq!(pairs[0].1.task_id(), "corrupt");
    }

    #[test]
    fn test_order_in_batch_does_not_change_roles() {
        let cases = vec![bad("corrupt", vec![1, 2, 3], 8), good("clean", vec![1, 2, 3], 7)];
        let pairs = collect_failure_modes(&cases, 1, SuccessKey::ExactMatch);
        assert_eq!(pairs.len(), 1);
        assert_eq!(pairs[0].0.task_id(), "clean");
        assert_eq!(pairs[0].1.task_id(), "corrupt");
    }

    #[test]
    fn test_cases_differing_elsewhere_never_pair() {
        // Different at both the pivot (operand) and the list.
        let cases = vec![good("a", vec![1, 2, 3], 7), bad("b", vec![9, 9, 9], 8)];
        let pairs = collect_failure_modes(&cases, 1, SuccessKey::ExactMatch);
        assert!(pairs.is_empty());
    }

    #[test]
    fn test_both_pass_or_both_fail_are_skipped() {
        let cases = vec![good("a", vec![1, 2, 3], 7), good("b", vec![1, 2, 3], 8)];
        assert!(collect_failure_modes(&cases, 1, SuccessKey::ExactMatch).is_empty());

        let cases = vec![bad("a", vec![1, 2, 3], 7), bad("b", vec![1, 2, 3], 8)];
        assert!(collect_failure_modes(&cases, 1, SuccessKey::ExactMatch).is_empty());
    }

    #[test]
    fn test_only_adjacent_pivot_values_are_compared() {
        // Three pivot values in first-seen order 7, 8, 9: the (7, 9)
        // combination is never compared.
        let cases = vec![
            good("v7", vec![1, 2, 3], 7),
            good("v8", vec![1, 2, 3], 8),
            bad("v9", vec![1, 2, 3], 9),
        ];
        let pairs = collect_failure_modes(&cases, 1, SuccessKey::ExactMatch);
        assert_eq!(pairs.len(), 1);
        assert_eq!(pairs[0].0.task_id(), "v8");
        assert_eq!(pairs[0].1.task_id(), "v9");
    }

    #[test]
    fn test_cross_pairs_within_adjacent_groups() {
        // Two cases per pivot value: every cross pair with split outcomes.
        let cases = vec![
            good("a1", vec![1, 2, 3], 7),
            bad("a2", vec![1, 2, 3], 7),
            bad("b1", vec![1, 2, 3], 8),
        ];
        let pairs = collect_failure_modes(&cases, 1, SuccessKey::ExactMatch);
        // a1 (pass) vs b1 (fail) emits; a2 (fail) vs b1 (fail) does not.
        assert_eq!(pairs.len(), 1);
        assert_eq!(pairs[0].0.task_id(), "a1");
    }

    #[test]
    fn test_unevaluated_case_counts_as_failure() {
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let unevaluated = Prompt::new(TaskKind::Append)
            .create_case(
                &mut rng,
                Some(vec![Value::List(vec![1, 2, 3]), Value::Int(8)]),
                Some("fresh".to_string()),
            )
            .unwrap();
        let cases = vec![good("clean", vec![1, 2, 3], 7), unevaluated];
        let pairs = collect_failure_modes(&cases, 1, SuccessKey::ExactMatch);
        assert_eq!(pairs.len(), 1);
        assert_eq!(pairs[0].1.task_id(), "fresh");
    }

    #[test]
    fn test_pivot_past_arity_is_skipped() {
        let cases = vec![good("a", vec![1, 2, 3], 7)];
        assert!(collect_failure_modes(&cases, 5, SuccessKey::ExactMatch).is_empty());
    }

    #[test]
    fn test_pivot_on_list_input() {
        // Pivot at position 0: same operand, different lists.
        let cases = vec![good("clean", vec![1, 2, 3], 7), bad("corrupt", vec![4, 5, 6], 7)];
        let pairs = collect_failure_modes(&cases, 0, SuccessKey::ExactMatch);
        assert_eq!(pairs.len(), 1);
        assert_eq!(pairs[0].0.task_id(), "clean");
    }
}
