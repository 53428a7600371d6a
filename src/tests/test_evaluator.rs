use ndarray::array;

use super::support::{assert_close, ConstantQ, ScriptedEnv};
use crate::error::{DqnError, Result};
use crate::evaluator::{evaluate_runs, EvaluationStats, Evaluator, SolveCriterion};

#[test]
fn test_solve_criterion_validation() {
    assert!(SolveCriterion::new(195.0, 0).unwrap_err().is_configuration());
    assert!(SolveCriterion::new(f32::NAN, 10).unwrap_err().is_configuration());
    assert!(SolveCriterion::new(-5.0, 1).is_ok());
}

#[test]
fn test_constant_reward_reaches_threshold() {
    // Episodes of 4 steps paying 2.5 return 10 each.
    let mut env = ScriptedEnv::new(4, 2.5);
    let q = ConstantQ::new(1, array![1.0, 0.0]);
    let criterion = SolveCriterion::new(10.0, 5).unwrap();

    let stats: Vec<EvaluationStats> = Evaluator::new(&mut env, &q, criterion)
        .unwrap()
        .collect::<Result<Vec<_>>>()
        .unwrap();

    assert_eq!(stats.len(), 5);
    for (i, s) in stats.iter().enumerate() {
        assert_eq!(s.episode, i);
        assert_eq!(s.reward, 10.0);
        assert_eq!(s.running_average, 10.0);
        // Only a full window can be solved.
        assert_eq!(s.solved, i == 4);
    }
    assert_eq!(env.resets, 5);
}

#[test]
fn test_constant_reward_below_threshold() {
    let mut env = ScriptedEnv::new(4, 2.5);
    let q = ConstantQ::new(1, array![1.0, 0.0]);
    let criterion = SolveCriterion::new(10.5, 3).unwrap();

    let last = Evaluator::new(&mut env, &q, criterion).unwrap().last().unwrap().unwrap();
    assert_eq!(last.running_average, 10.0);
    assert!(!last.solved);
}

#[test]
fn test_evaluation_does_not_train() {
    let mut env = ScriptedEnv::new(2, 1.0);
    let q = ConstantQ::new(1, array![0.0, 1.0]);
    let criterion = SolveCriterion::new(1.0, 3).unwrap();
    for stats in Evaluator::new(&mut env, &q, criterion).unwrap() {
        stats.unwrap();
    }
    assert_eq!(q.fits, 0);
    assert_eq!(q.values, array![0.0, 1.0]);
    assert_eq!(env.calls, 6);
}

#[test]
fn test_evaluator_rejects_mismatched_network() {
    let mut env = ScriptedEnv::new(2, 1.0);
    let q = ConstantQ::new(1, array![0.0, 1.0, 2.0]);
    let criterion = SolveCriterion::new(1.0, 3).unwrap();
    assert!(Evaluator::new(&mut env, &q, criterion).is_err());
}

#[test]
fn test_evaluator_stops_after_error() {
    let mut env = ScriptedEnv::new(2, 1.0).failing_at(3);
    let q = ConstantQ::new(1, array![0.0, 1.0]);
    let criterion = SolveCriterion::new(1.0, 5).unwrap();
    let mut evaluator = Evaluator::new(&mut env, &q, criterion).unwrap();

    assert!(evaluator.next().unwrap().is_ok());
    assert!(matches!(evaluator.next(), Some(Err(DqnError::Environment(_)))));
    assert!(evaluator.next().is_none());
}

#[test]
fn test_evaluate_runs_aggregates() {
    let mut env = ScriptedEnv::new(3, 1.0);
    let q = ConstantQ::new(1, array![1.0, 0.0]);
    let criterion = SolveCriterion::new(3.0, 4).unwrap();

    let report = evaluate_runs(&mut env, &q, criterion, 3).unwrap();
    assert_eq!(report.runs.len(), 3);
    assert!(report.runs.iter().all(|r| r.average_reward == 3.0 && r.solved));
    assert_close(report.score.average_reward, 3.0, 1e-6);
    assert!(report.score.solved);
    assert_eq!(report.summary.count, 3);
    assert_eq!(report.summary.std, 0.0);
    assert_eq!(report.solve_criterion, criterion);
    assert_eq!(env.resets, 12);

    assert!(evaluate_runs(&mut env, &q, criterion, 0).unwrap_err().is_configuration());
}
