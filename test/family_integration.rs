//! List Family Integration Tests
//!
//! End-to-end scenarios over the full family: fixed-input cases, wrapped
//! prompt text, batch generation, and sampled-input properties.

use probegen::{
    list_family, FillMode, ListFamilyConfig, Prompt, TaskKind, TransformError, Value, WrapKind,
};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

fn rng() -> ChaCha8Rng {
    ChaCha8Rng::seed_from_u64(0)
}

// ============================================================================
// Fixed-Input Scenarios
// ============================================================================

#[test]
fn test_append_scenario_with_list_wrap() {
    let mut prompt = Prompt::new(TaskKind::Append);
    let mut case = prompt
        .create_case(
            &mut rng(),
            Some(vec![Value::List(vec![1, 2, 3, 4, 5]), Value::Int(7)]),
            None,
        )
        .expect("fixed append inputs should produce a case");

    assert_eq!(case.ground_truth(), &Value::List(vec![1, 2, 3, 4, 5, 7]));

    case.set_wrap(WrapKind::List);
    assert!(case.prompt().ends_with("List: ["));
}

#[test]
fn test_swap_scenario_one_based() {
    let mut prompt = Prompt::new(TaskKind::SwapIndices);
    let case = prompt
        .create_case(
            &mut rng(),
            Some(vec![
                Value::List(vec![10, 20, 30]),
                Value::Int(1),
                Value::Int(3),
                Value::Text("one".to_string()),
            ]),
            None,
        )
        .unwrap();
    assert_eq!(case.ground_truth(), &Value::List(vec![30, 20, 10]));
}

#[test]
fn test_swap_scenario_one_based_out_of_bounds() {
    let mut prompt = Prompt::new(TaskKind::SwapIndices);
    let err = prompt
        .create_case(
            &mut rng(),
            Some(vec![
                Value::List(vec![10, 20, 30]),
                Value::Int(1),
                Value::Int(4),
                Value::Text("one".to_string()),
            ]),
            None,
        )
        .unwrap_err();
    assert_eq!(
        err,
        probegen::CaseError::Transform(TransformError::IndexOutOfBounds {
            i1: 0,
            i2: 3,
            len: 3
        })
    );
}

// ============================================================================
// Batch Generation
// ============================================================================

#[test]
fn test_generate_all_covers_the_cross_product() {
    let mut family = list_family(&ListFamilyConfig::default(), 42);
    let cases = family.generate_all(3).unwrap();
    // 6 tasks x 4 wraps x 3 replicas.
    assert_eq!(cases.len(), 6 * 4 * 3);

    for kind in TaskKind::ALL {
        for wrap in WrapKind::ALL {
            let count = family
                .cases()
                .iter()
                .filter(|c| c.kind() == kind && c.wrap() == Some(wrap))
                .count();
            assert_eq!(count, 3, "cell {} x {}", kind, wrap);
        }
    }
}

#[test]
fn test_generate_all_replaces_the_previous_batch() {
    let mut family = list_family(&ListFamilyConfig::default(), 42);
    family.generate_all(2).unwrap();
    family.generate_all(1).unwrap();
    assert_eq!(family.cases().len(), 6 * 4);
}

#[test]
fn test_same_seed_same_batch() {
    let config = ListFamilyConfig::default();
    let mut first = list_family(&config, 9);
    let mut second = list_family(&config, 9);
    first.generate_all(2).unwrap();
    second.generate_all(2).unwrap();

    let lhs: Vec<_> = first.cases().iter().map(|c| c.inputs().to_vec()).collect();
    let rhs: Vec<_> = second.cases().iter().map(|c| c.inputs().to_vec()).collect();
    assert_eq!(lhs, rhs);
}

#[test]
fn test_different_seeds_diverge() {
    let config = ListFamilyConfig::default();
    let mut first = list_family(&config, 1);
    let mut second = list_family(&config, 2);
    first.generate_all(4).unwrap();
    second.generate_all(4).unwrap();

    let lhs: Vec<_> = first.cases().iter().map(|c| c.inputs().to_vec()).collect();
    let rhs: Vec<_> = second.cases().iter().map(|c| c.inputs().to_vec()).collect();
    assert_ne!(lhs, rhs);
}

// ============================================================================
// Sampled-Input Properties
// ============================================================================

#[test]
fn test_generated_lists_respect_config() {
    let config = ListFamilyConfig {
        min_val: 2,
        max_val: 6,
        list_size: 7,
        ..ListFamilyConfig::default()
    };
    let mut family = list_family(&config, 5);
    family.generate_all(5).unwrap();

    for case in family.cases() {
        let list = case.inputs()[0].as_list().expect("first input is the list");
        assert_eq!(list.len(), 7);
        assert!(list.iter().all(|&x| (2..6).contains(&x)));
    }
}

#[test]
fn test_single_outlier_batches() {
    let config = ListFamilyConfig {
        fill_mode: FillMode::SingleOutlier,
        ..ListFamilyConfig::default()
    };
    let mut family = list_family(&config, 11);
    family.generate_all(4).unwrap();

    for case in family.cases() {
        let list = case.inputs()[0].as_list().unwrap();
        let unique = list
            .iter()
            .filter(|&&v| list.iter().filter(|&&w| w == v).count() == 1)
            .count();
        assert_eq!(unique, 1, "case {} list {:?}", case.task_id(), list);
    }
}

#[test]
fn test_sampled_ground_truths_are_well_formed() {
    let mut family = list_family(&ListFamilyConfig::default(), 21);
    family.generate_all(5).unwrap();

    for case in family.cases() {
        match case.kind() {
            TaskKind::FindIndex => {
                assert!(case.ground_truth().as_int().is_some());
            }
            TaskKind::InsertMiddle | TaskKind::Append => {
                let original = case.inputs()[0].as_list().unwrap();
                let result = case.ground_truth().as_list().unwrap();
                assert_eq!(result.len(), original.len() + 1);
            }
            _ => {
                assert!(case.ground_truth().as_list().is_some());
            }
        }
    }
}

#[test]
fn test_prompts_render_for_every_generated_case() {
    let mut family = list_family(&ListFamilyConfig::default(), 33);
    family.generate_all(2).unwrap();

    for case in family.cases() {
        let prompt = case.prompt();
        assert!(!prompt.is_empty());
        match case.wrap() {
            Some(WrapKind::List) => assert!(prompt.ends_with("List: [")),
            Some(WrapKind::Interpreter) => {
                assert!(prompt.starts_with("Pretend you are a Python interpreter."))
            }
            Some(WrapKind::System) => assert!(prompt.starts_with("<|system|>")),
            _ => {}
        }
    }
}
