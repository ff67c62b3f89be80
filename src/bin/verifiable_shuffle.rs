use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{anyhow, bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use verifiable_shuffle::config::ProtocolConfig;
use verifiable_shuffle::entropy::{Precision, SafetyBound};
use verifiable_shuffle::prng::{Pcg128, Seed};
use verifiable_shuffle::protocol::{
    BudgetMeter, BudgetUsage, CallContext, CommitmentRecord, CommitterId, HashChainBeacon,
    MeteredBudget, RandomnessBeacon, RequestId, RevealOutcome, ShuffleProtocol,
    ShuffleProtocolError,
};
use verifiable_shuffle::shuffle::draw_winners_with;

const LOG_TARGET: &str = "bin::verifiable_shuffle";

#[derive(Debug, Parser)]
#[command(name = "verifiable_shuffle")]
#[command(about = "Commit-reveal fair shuffle tooling", long_about = None)]
struct Cli {
    /// JSON protocol config; unset fields take their defaults
    #[arg(long, env = "VERIFIABLE_SHUFFLE_CONFIG", global = true)]
    config: Option<PathBuf>,

    /// Minimum rounds between commit and reveal
    #[arg(long, env = "SAFETY_ROUND_GAP", global = true)]
    safety_round_gap: Option<u64>,

    /// Fractional bits of the fixed-point entropy check
    #[arg(long, env = "LOG_PRECISION", global = true)]
    precision: Option<u8>,

    /// Pretty-print JSON output
    #[arg(long, global = true)]
    pretty: bool,

    /// Toggle structured (JSON) tracing output
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Evaluate the k-permutation entropy bound for a selection
    Entropy(SelectionArgs),
    /// Draw winners directly from a seed, bypassing commit and reveal
    Draw(DrawArgs),
    /// Run commit, an early reveal and the final reveal against a local beacon
    Simulate(SimulateArgs),
}

#[derive(Debug, Args)]
struct SelectionArgs {
    #[arg(long)]
    participants: u32,

    #[arg(long)]
    winners: u8,
}

#[derive(Debug, Args)]
struct DrawArgs {
    #[command(flatten)]
    selection: SelectionArgs,

    /// 32-byte seed as hex (optional 0x prefix)
    #[arg(long, conflicts_with = "seed_text", required_unless_present = "seed_text")]
    seed_hex: Option<String>,

    /// Arbitrary text hashed with SHA3-256 into the seed
    #[arg(long)]
    seed_text: Option<String>,
}

#[derive(Debug, Args)]
struct SimulateArgs {
    #[command(flatten)]
    selection: SelectionArgs,

    /// Rounds between commit and reveal
    #[arg(long)]
    delay: Option<u8>,

    /// Round at which the commitment is made
    #[arg(long, default_value_t = 1_000)]
    start_round: u64,

    /// Secret feeding the local hash-chain beacon
    #[arg(long, env = "BEACON_SECRET", default_value = "verifiable-shuffle-simulation")]
    secret: String,

    /// Label hashed into the committer id
    #[arg(long, default_value = "simulator")]
    committer: String,
}

#[derive(Serialize)]
struct EntropyOutput {
    participants: u32,
    winners: u8,
    precision: Precision,
    entropy: u64,
    entropy_bits: f64,
    limit: u64,
    admissible: bool,
}

#[derive(Serialize)]
struct DrawOutput {
    seed: Seed,
    participants: u32,
    winners: Vec<u32>,
}

#[derive(Serialize)]
struct SimulationOutput {
    committer: CommitterId,
    commitment: CommitmentRecord,
    early_reveal_error: String,
    outcome: RevealOutcome,
    budget: BudgetUsage,
}

#[tokio::main]
async fn main() -> Result<()> {
    load_dotenv();
    let cli = Cli::parse();
    init_tracing(cli.json)?;
    let config = build_config(&cli)?;

    match &cli.command {
        Command::Entropy(args) => emit(&run_entropy(&config, args)?, cli.pretty),
        Command::Draw(args) => emit(&run_draw(&config, args)?, cli.pretty),
        Command::Simulate(args) => emit(&run_simulation(config, args).await?, cli.pretty),
    }
}

fn load_dotenv() {
    let manifest_env_path = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join(".env");
    dotenv::from_filename(manifest_env_path).ok();
    dotenv::dotenv().ok();
}

fn init_tracing(json: bool) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr);
    if json {
        builder
            .json()
            .flatten_event(true)
            .try_init()
            .map_err(|err| anyhow!("failed to initialize tracing subscriber: {err}"))?;
    } else {
        builder
            .compact()
            .try_init()
            .map_err(|err| anyhow!("failed to initialize tracing subscriber: {err}"))?;
    }
    Ok(())
}

fn read_config_file(path: &Path) -> Result<ProtocolConfig> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config file {}", path.display()))?;
    serde_json::from_str(&raw)
        .with_context(|| format!("failed to parse config file {}", path.display()))
}

fn build_config(cli: &Cli) -> Result<ProtocolConfig> {
    let mut config = match &cli.config {
        Some(path) => read_config_file(path)?,
        None => ProtocolConfig::default(),
    };
    if let Some(gap) = cli.safety_round_gap {
        config.safety_round_gap = gap;
    }
    if let Some(bits) = cli.precision {
        config.precision = Precision::new(bits).context("invalid --precision")?;
    }
    config.validate().context("invalid protocol config")?;
    Ok(config)
}

fn emit<T: Serialize>(value: &T, pretty: bool) -> Result<()> {
    let rendered = if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    }
    .context("failed to serialize output")?;
    println!("{rendered}");
    Ok(())
}

fn run_entropy(config: &ProtocolConfig, args: &SelectionArgs) -> Result<EntropyOutput> {
    let bound = SafetyBound::evaluate(args.participants, args.winners, config.precision)
        .context("failed to evaluate entropy bound")?;
    info!(
        target: LOG_TARGET,
        participants = args.participants,
        winners = args.winners,
        entropy = bound.entropy,
        limit = bound.limit,
        "evaluated safety bound"
    );
    Ok(EntropyOutput {
        participants: args.participants,
        winners: args.winners,
        precision: bound.precision,
        entropy: bound.entropy,
        entropy_bits: bound.entropy_bits(),
        limit: bound.limit,
        admissible: bound.is_safe(),
    })
}

fn run_draw(config: &ProtocolConfig, args: &DrawArgs) -> Result<DrawOutput> {
    let seed = match (&args.seed_hex, &args.seed_text) {
        (Some(hex), _) => hex.parse::<Seed>().context("invalid --seed-hex")?,
        (None, Some(text)) => Seed::digest(text.as_bytes()),
        (None, None) => bail!("either --seed-hex or --seed-text is required"),
    };
    let mut rng = Pcg128::from_seed(&seed);
    let winners = draw_winners_with(
        args.selection.participants,
        args.selection.winners,
        &mut rng,
        config.buckets,
    )
    .context("draw failed")?;
    Ok(DrawOutput {
        seed,
        participants: args.selection.participants,
        winners,
    })
}

fn request_id_for(committer: &str, round: u64) -> RequestId {
    let label = format!("{committer}/{round}");
    RequestId::new(Seed::digest(label.as_bytes()).into_bytes())
}

async fn run_simulation(config: ProtocolConfig, args: &SimulateArgs) -> Result<SimulationOutput> {
    let delay = match args.delay {
        Some(delay) => delay,
        None => u8::try_from(config.safety_round_gap)
            .context("safety_round_gap does not fit a delay")?,
    };
    if delay == 0 {
        bail!("simulation needs a delay of at least one round");
    }
    let committer = CommitterId::new(Seed::digest(args.committer.as_bytes()).into_bytes());
    let beacon = Arc::new(HashChainBeacon::from_passphrase(
        &args.secret,
        args.start_round,
    ));
    let meter = Arc::new(MeteredBudget::unlimited());
    let protocol = ShuffleProtocol::in_memory(config, beacon.clone() as Arc<dyn RandomnessBeacon>)
        .context("failed to build protocol")?
        .with_budget(meter.clone() as Arc<dyn BudgetMeter>);

    let commit_ctx = CallContext {
        committer,
        request_id: request_id_for(&args.committer, args.start_round),
        round: args.start_round,
    };
    let commitment = protocol
        .commit(
            &commit_ctx,
            delay,
            args.selection.participants,
            args.selection.winners,
        )
        .await
        .context("commit failed")?;

    let early_reveal_error = match protocol.reveal(&commit_ctx).await {
        Ok(_) => bail!("reveal succeeded before the target round"),
        Err(err @ ShuffleProtocolError::RoundNotElapsed { .. }) => {
            warn!(target: LOG_TARGET, error = %err, "early reveal refused as expected");
            err.to_string()
        }
        Err(err) => return Err(err).context("unexpected early reveal failure"),
    };

    beacon.advance_to(commitment.target_round);
    let reveal_ctx = CallContext {
        committer,
        request_id: request_id_for(&args.committer, commitment.target_round),
        round: commitment.target_round,
    };
    let outcome = protocol
        .reveal(&reveal_ctx)
        .await
        .context("reveal failed")?;

    info!(
        target: LOG_TARGET,
        request_id = %outcome.request_id,
        winners = ?outcome.winners,
        "simulation finished"
    );
    Ok(SimulationOutput {
        committer,
        commitment,
        early_reveal_error,
        outcome,
        budget: meter.usage(),
    })
}
