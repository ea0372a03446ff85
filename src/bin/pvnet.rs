use std::path::{Path, PathBuf};
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use log::info;
use rand::rngs::StdRng;
use rand::SeedableRng;
use pvnet::encoding::{legal_priors, top_slots};
use pvnet::export::Artifact;
use pvnet::r#move::Move;
use pvnet::training::{Dataset, Trainer};
use pvnet::{DeviceChoice, EvalNet, Position, TrainConfig};

#[derive(Parser, Debug)]
#[command(author, version, about = "Chess position evaluation network")]
struct Cli {
    /// Overrides the device stored in the config or model
    #[arg(long, value_enum, global = true)]
    device: Option<DeviceChoice>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Export an untrained model
    Init {
        #[arg(long)]
        out: PathBuf,
        /// TOML training config; its `[net]` table configures the network
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Evaluate one position
    Evaluate {
        #[arg(long)]
        model: PathBuf,
        #[arg(long)]
        fen: String,
        /// Candidate moves in UCI notation; priors are renormalized over them
        #[arg(long, num_args = 1..)]
        moves: Vec<String>,
        /// Number of policy slots to print when no moves are given
        #[arg(long, default_value_t = 5)]
        top: usize,
    },
    /// Train a model on a JSONL dataset (or a bincode cache ending in `.bin`)
    Train {
        #[arg(long)]
        model: PathBuf,
        #[arg(long)]
        data: PathBuf,
        #[arg(long)]
        out: PathBuf,
        #[arg(long)]
        config: Option<PathBuf>,
        /// Write the parsed dataset to this bincode cache
        #[arg(long)]
        cache: Option<PathBuf>,
    },
    /// Print the manifest of a model
    Signature {
        #[arg(long)]
        model: PathBuf,
    },
}

fn load_train_config(path: Option<&Path>) -> Result<TrainConfig> {
    match path {
        Some(path) => TrainConfig::load(path).with_context(|| format!("failed to read config {}", path.display())),
        None => Ok(TrainConfig::default()),
    }
}

fn load_model(dir: &Path, device: Option<DeviceChoice>) -> Result<Artifact> {
    Artifact::load(dir, device).with_context(|| format!("failed to load model from {}", dir.display()))
}

fn init(out: &Path, config: Option<&Path>, device: Option<DeviceChoice>) -> Result<()> {
    let mut config = load_train_config(config)?;
    if let Some(device) = device {
        config.net.device = device;
    }
    let net = EvalNet::new(&config.net)?;
    Artifact::export(&net, 0, out).with_context(|| format!("failed to export model to {}", out.display()))?;
    println!("{}", out.display());
    Ok(())
}

fn evaluate(model: &Path, fen: &str, moves: &[String], top: usize, device: Option<DeviceChoice>) -> Result<()> {
    let net = load_model(model, device)?.into_net();
    let position = Position::from_fen(fen).with_context(|| format!("invalid FEN {:?}", fen))?;
    let moves = moves
        .iter()
        .map(|uci| Move::from_uci(uci).with_context(|| format!("invalid move {:?}", uci)))
        .collect::<Result<Vec<_>>>()?;

    let (value, policy) = net.evaluate_positions(std::slice::from_ref(&position))?;
    let policy_row = Vec::<f32>::try_from(&policy.get(0))?;
    println!("value {:.4}", value.f_double_value(&[0, 0])?);

    if moves.is_empty() {
        for (slot, prob) in top_slots(&policy_row, top) {
            println!("{} {:.4}", slot, prob);
        }
    } else {
        for (mv, prior) in legal_priors(&policy_row, &moves) {
            println!("{} {:.4}", mv, prior);
        }
    }
    Ok(())
}

fn train(model: &Path, data: &Path, out: &Path, config: Option<&Path>, cache: Option<&Path>, device: Option<DeviceChoice>) -> Result<()> {
    let file_config = config.map(|path| load_train_config(Some(path))).transpose()?;
    let config = file_config.clone().unwrap_or_default();
    let artifact = load_model(model, device)?;

    let dataset = if data.extension().is_some_and(|extension| extension == "bin") {
        Dataset::load_cache(data)
    } else {
        Dataset::load_jsonl(data)
    }.with_context(|| format!("failed to load dataset {}", data.display()))?;
    if let Some(cache) = cache {
        dataset.save_cache(cache).with_context(|| format!("failed to write cache {}", cache.display()))?;
    }

    let mut rng = match config.net.seed {
        Some(seed) => StdRng::seed_from_u64(seed as u64),
        None => StdRng::from_entropy(),
    };

    // the model keeps its own learning rate unless a config file sets one
    let mut trainer = Trainer::from_artifact(artifact)?;
    if let Some(file_config) = &file_config {
        trainer.apply_config(&file_config.net)?;
    }
    for epoch in 1..=config.epochs {
        let metrics = trainer.fit_epoch(&dataset, config.batch_size, config.shuffle, &mut rng)?;
        info!("epoch {}/{}: {}", epoch, config.epochs, metrics);
    }

    trainer.export(out).with_context(|| format!("failed to export model to {}", out.display()))?;
    Ok(())
}

fn signature(model: &Path) -> Result<()> {
    let manifest = Artifact::read_manifest(model).with_context(|| format!("failed to read manifest in {}", model.display()))?;
    println!("{}", serde_json::to_string_pretty(&manifest)?);
    Ok(())
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().filter_or(env_logger::DEFAULT_FILTER_ENV, "info")).init();

    let cli = Cli::parse();
    match &cli.command {
        Command::Init { out, config } => init(out, config.as_deref(), cli.device),
        Command::Evaluate { model, fen, moves, top } => evaluate(model, fen, moves, *top, cli.device),
        Command::Train { model, data, out, config, cache } => {
            train(model, data, out, config.as_deref(), cache.as_deref(), cli.device)
        }
        Command::Signature { model } => signature(model),
    }
}
