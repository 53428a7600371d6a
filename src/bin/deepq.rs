use clap::{Parser, Subcommand};
use deepq::{
    env::{CartPole, Environment},
    error::{DqnError, Result},
    evaluator::{evaluate_runs, SolveCriterion},
    metrics::{save_summary, EvaluationSummary, TrainingMonitor, TrainingReport},
    network::NeuralNetwork,
    trainer::{DqnConfig, Trainer},
};
use log::info;
use std::{
    fs,
    path::{Path, PathBuf},
};

/// Train and evaluate DQN agents on CartPole
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Train a Q-network and save it with its training report
    Train {
        /// YAML hyperparameters; the CartPole defaults when omitted
        #[arg(short, long)]
        config: Option<PathBuf>,

        #[arg(long, default_value = "model")]
        out_dir: PathBuf,

        /// Model file stem
        #[arg(short, long, default_value = "cartpole")]
        name: String,

        #[arg(long, default_value_t = 195.0)]
        threshold: f32,

        #[arg(long, default_value_t = 100)]
        window: usize,

        /// Log progress every this many episodes
        #[arg(long, default_value_t = 50)]
        print_freq: usize,
    },

    /// Evaluate saved models greedily
    Test {
        #[arg(short, long, required = true, num_args = 1..)]
        model: Vec<PathBuf>,

        #[arg(long, default_value_t = 3)]
        runs: usize,

        #[arg(long, default_value_t = 195.0)]
        threshold: f32,

        #[arg(long, default_value_t = 100)]
        window: usize,

        /// Where to write the JSON map of model name to evaluation report
        #[arg(short, long)]
        out: Option<PathBuf>,
    },

    /// Write the default configuration as YAML
    Config {
        #[arg(short, long, default_value = "dqn_cartpole.yaml")]
        out: PathBuf,
    },
}

fn train(
    config: Option<&Path>,
    out_dir: &Path,
    name: &str,
    criterion: SolveCriterion,
    print_freq: usize,
) -> Result<()> {
    let config = match config {
        Some(path) => DqnConfig::load(path)?,
        None => DqnConfig::default(),
    };
    let env = CartPole::new(config.seed);
    let mut report = TrainingReport::new(env.name(), config.clone(), criterion);

    info!("++ TRAINING: {} | solve criterion: {:?} ++", report.environment, criterion);
    info!("training settings: {:?}", config);

    let mut trainer = Trainer::new(config, env)?;
    let mut monitor = TrainingMonitor::new(criterion, trainer.total_steps(), print_freq);
    for stats in &mut trainer {
        monitor.observe(&stats?);
    }
    report.episodes = monitor.into_records();

    fs::create_dir_all(out_dir)?;
    let model_path = out_dir.join(format!("{}.model", name));
    let report_path = out_dir.join(format!("{}.training.json", name));
    trainer.into_network().save(&model_path)?;
    report.save(&report_path)?;
    info!("saved {} and {}", model_path.display(), report_path.display());
    Ok(())
}

fn test(models: &[PathBuf], runs: usize, criterion: SolveCriterion, out: Option<&Path>) -> Result<()> {
    let mut summary = EvaluationSummary::new();
    for path in models {
        let name = path
            .file_stem()
            .and_then(|stem| stem.to_str())
            .ok_or_else(|| DqnError::configuration("model".to_string(), format!("bad path {}", path.display())))?
            .to_string();
        info!("++ TESTING: {} ++", name);

        let network = NeuralNetwork::load(path)?;
        let report = evaluate_runs(&mut CartPole::new(None), &network, criterion, runs)?;
        summary.insert(name, report);
    }

    if let Some(out) = out {
        save_summary(&summary, out)?;
        info!("saved {}", out.display());
    }
    Ok(())
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    match Args::parse().command {
        Command::Train { config, out_dir, name, threshold, window, print_freq } => {
            let criterion = SolveCriterion::new(threshold, window)?;
            train(config.as_deref(), &out_dir, &name, criterion, print_freq)
        }
        Command::Test { model, runs, threshold, window, out } => {
            let criterion = SolveCriterion::new(threshold, window)?;
            test(&model, runs, criterion, out.as_deref())
        }
        Command::Config { out } => {
            DqnConfig::default().save(&out)?;
            info!("wrote {}", out.display());
            Ok(())
        }
    }
}
