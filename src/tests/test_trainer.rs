use ndarray::{arr2, array};

use super::support::{ConstantQ, ScriptedEnv};
use crate::agent::QFunction;
use crate::error::{DqnError, Result};
use crate::exploration::ExplorationSchedule;
use crate::loss::LossFunction;
use crate::trainer::{DqnConfig, Phase, Trainer, TrainingStats};

fn small_config() -> DqnConfig {
    DqnConfig::default()
        .seed(Some(3))
        .hidden_size(4)
        .steps(10)
        .learning_rate(1e-2)
        .exploration(ExplorationSchedule::new(1.0, 0.0, 5).unwrap())
        .replay(4, 100, 2)
        .target_update_freq(2)
}

#[test]
fn test_default_config() {
    let config = DqnConfig::default();
    assert_eq!(config.seed, Some(77));
    assert_eq!(config.hidden_size, 512);
    assert_eq!(config.discount, 0.99);
    assert_eq!(config.steps, 400_000);
    assert_eq!(config.learning_rate, 1e-3);
    assert_eq!(config.exploration, ExplorationSchedule::new(1.0, 0.1, 40_000).unwrap());
    assert_eq!((config.replay_min, config.replay_max, config.replay_batch), (2000, 50_000, 32));
    assert_eq!(config.target_update_freq, 500);
    assert_eq!(config.loss, LossFunction::L2);
    assert_eq!(config.total_steps(), 402_000);
    assert!(config.validate().is_ok());
}

#[test]
fn test_config_validation() {
    let cases = vec![
        small_config().replay(1, 100, 2),
        small_config().replay(4, 3, 2),
        small_config().replay(4, 100, 0),
        small_config().target_update_freq(0),
        small_config().discount(1.5),
        small_config().learning_rate(0.0),
        small_config().hidden_size(0),
        small_config().exploration(ExplorationSchedule { start: 2.0, end: 0.1, horizon_steps: 10 }),
        small_config().loss(LossFunction::Huber { delta: 0.0 }),
    ];
    for config in cases {
        let err = config.validate().unwrap_err();
        assert!(err.is_configuration(), "{:?}", err);
        assert!(Trainer::new(config, ScriptedEnv::new(3, 1.0)).is_err());
    }
}

#[test]
fn test_config_yaml_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.yaml");
    let config = small_config().loss(LossFunction::Huber { delta: 1.0 });
    config.save(&path).unwrap();
    assert_eq!(DqnConfig::load(&path).unwrap(), config);
}

#[test]
fn test_network_must_fit_environment() {
    let q = ConstantQ::new(3, array![0.0, 0.0]);
    let err = Trainer::with_network(small_config(), ScriptedEnv::new(3, 1.0), q).err().unwrap();
    assert!(err.is_configuration());

    let q = ConstantQ::new(1, array![0.0, 0.0, 0.0]);
    let err = Trainer::with_network(small_config(), ScriptedEnv::new(3, 1.0), q).err().unwrap();
    assert!(err.is_configuration());
}

#[test]
fn test_training_phases_and_counters() {
    let mut trainer = Trainer::new(small_config(), ScriptedEnv::new(3, 1.0)).unwrap();
    assert_eq!(trainer.phase(), Phase::WarmUp);
    assert_eq!(trainer.total_steps(), 14);

    let stats: Vec<TrainingStats> = (&mut trainer).collect::<Result<Vec<_>>>().unwrap();

    // Episodes end at steps 2, 5, 8 and 11; the first falls in the warm-up and the run stops
    // at step 13 in the middle of a fifth episode.
    assert_eq!(stats.iter().map(|s| s.episode).collect::<Vec<_>>(), vec![1, 2, 3]);
    assert_eq!(stats.iter().map(|s| s.step).collect::<Vec<_>>(), vec![5, 8, 11]);
    assert!(stats.iter().all(|s| s.reward == 3.0));
    assert!(stats.iter().all(|s| s.mean_loss.is_finite() && s.mean_loss >= 0.0));

    // Epsilon is indexed by the learning step t - (replay_min - 1).
    let schedule = trainer.config().exploration;
    assert_eq!(stats[0].epsilon, schedule.epsilon(2));
    assert_eq!(stats[1].epsilon, schedule.epsilon(5));
    assert_eq!(stats[2].epsilon, 0.0);

    assert_eq!(trainer.global_step(), 14);
    assert_eq!(trainer.learning_steps(), 11);
    assert_eq!(trainer.replay_buffer().len(), 14);
    assert_eq!(trainer.target().sync_count(), 5);
    assert_eq!(trainer.episode(), 4);
    assert_eq!(trainer.phase(), Phase::Learning);
    assert!(trainer.is_finished());
    assert!(trainer.next().is_none());
}

#[test]
fn test_learning_updates_only_after_warm_up() {
    let q = ConstantQ::new(1, array![0.0, 0.0]);
    let mut trainer = Trainer::with_network(small_config(), ScriptedEnv::new(50, 1.0), q).unwrap();

    // A 50-step episode never finishes within 14 steps, so nothing is yielded.
    assert!(trainer.next().is_none());
    assert_eq!(trainer.global_step(), 14);
    assert_eq!(trainer.learning_steps(), 11);
    assert_eq!(trainer.online().fits, 11);
    assert_eq!(trainer.env().calls, 14);
}

#[test]
fn test_mean_loss_averages_learning_steps() {
    let q = ConstantQ::new(1, array![0.0, 0.0]);
    let mut trainer = Trainer::with_network(small_config(), ScriptedEnv::new(3, 2.0), q).unwrap();
    let stats = trainer.next().unwrap().unwrap();
    assert_eq!(stats.mean_loss, 0.5);
    assert_eq!(stats.reward, 6.0);
}

#[test]
fn test_target_stays_frozen_without_sync() {
    let config = small_config().target_update_freq(1_000);
    let mut trainer = Trainer::new(config, ScriptedEnv::new(3, 1.0)).unwrap();
    let probe = arr2(&[[0.0], [0.5]]);
    let initial = trainer.online().q_values(probe.view()).unwrap();

    for stats in &mut trainer {
        stats.unwrap();
    }

    assert_eq!(trainer.target().sync_count(), 0);
    assert_eq!(trainer.target().q_values(probe.view()).unwrap(), initial);
    assert_ne!(trainer.online().q_values(probe.view()).unwrap(), initial);
}

#[test]
fn test_target_synced_on_cadence_matches_online() {
    let q = ConstantQ::new(1, array![0.0, 0.0]);
    let config = small_config().target_update_freq(1);
    let mut trainer = Trainer::with_network(config, ScriptedEnv::new(3, 1.0), q).unwrap();
    for stats in &mut trainer {
        stats.unwrap();
    }
    assert_eq!(trainer.target().sync_count(), 11);
    assert_eq!(trainer.target().network(), trainer.online());
}

#[test]
fn test_error_fuses_iterator() {
    let env = ScriptedEnv::new(3, 1.0).failing_at(7);
    let mut trainer = Trainer::new(small_config(), env).unwrap();

    assert!(trainer.next().unwrap().is_ok());
    assert!(matches!(trainer.next(), Some(Err(DqnError::Environment(_)))));
    assert!(trainer.next().is_none());
    assert!(trainer.is_finished());
    assert_eq!(trainer.global_step(), 7);
}

#[test]
fn test_same_seed_same_run() {
    let run = || {
        let mut trainer = Trainer::new(small_config(), ScriptedEnv::new(3, 1.0)).unwrap();
        let stats = (&mut trainer).collect::<Result<Vec<_>>>().unwrap();
        (stats, trainer.into_network())
    };
    let (a, net_a) = run();
    let (b, net_b) = run();
    assert_eq!(a, b);
    assert_eq!(net_a.layers[0].weights, net_b.layers[0].weights);
}

#[test]
fn test_resume_after_early_stop_matches_single_pass() {
    let mut single = Trainer::new(small_config(), ScriptedEnv::new(3, 1.0)).unwrap();
    let expected = (&mut single).collect::<Result<Vec<_>>>().unwrap();
    assert!(expected.len() > 1);

    let mut resumed = Trainer::new(small_config(), ScriptedEnv::new(3, 1.0)).unwrap();
    let first = resumed.next().unwrap().unwrap();
    assert!(!resumed.is_finished());

    let mut stats = vec![first];
    stats.extend((&mut resumed).collect::<Result<Vec<_>>>().unwrap());
    assert_eq!(stats, expected);
    assert!(resumed.next().is_none());

    let (a, b) = (single.into_network(), resumed.into_network());
    for (x, y) in a.layers.iter().zip(&b.layers) {
        assert_eq!(x.weights, y.weights);
        assert_eq!(x.biases, y.biases);
    }
}
