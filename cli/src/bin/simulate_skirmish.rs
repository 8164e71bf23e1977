use clap::Parser;
use encoding_rs::Encoding;
use idle_engine::api::{demo_skirmish, simulate_skirmish, simulate_skirmish_many, SkirmishConfig};
use std::{fs, path::PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "simulate-skirmish")]
#[command(about = "Party vs party skirmishes using the ability tables")]
struct Args {
    /// Skirmish JSON (party_a, party_b, ...). Uses the demo line-up if omitted.
    #[arg(long)]
    config: Option<PathBuf>,

    /// RNG base seed (sample i uses seed+i)
    #[arg(long, default_value_t = 12345)]
    seed: u64,

    /// Number of skirmishes; more than one prints a summary only
    #[arg(long, default_value_t = 1)]
    samples: u32,

    /// Safety cap on rounds per skirmish
    #[arg(long)]
    max_rounds: Option<u32>,

    /// Optional abilities JSON (defaults to the built-in table)
    #[arg(long)]
    abilities: Option<PathBuf>,
}

fn read_text_auto(path: &std::path::Path) -> anyhow::Result<String> {
    let bytes = fs::read(path)?;
    if let Some((enc, bom_len)) = Encoding::for_bom(&bytes) {
        let (cow, _, _) = enc.decode(&bytes[bom_len..]);
        Ok(cow.into_owned())
    } else {
        Ok(String::from_utf8(bytes)?)
    }
}

fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .compact()
        .init();

    let args = Args::parse();

    let mut cfg: SkirmishConfig = match args.config.as_ref() {
        Some(path) => serde_json::from_str(&read_text_auto(path)?)?,
        None => demo_skirmish(args.seed),
    };
    cfg.seed = args.seed;
    if args.max_rounds.is_some() {
        cfg.max_rounds = args.max_rounds;
    }
    if let Some(path) = args.abilities.as_ref() {
        cfg.abilities_path = Some(path.to_string_lossy().into_owned());
    }

    if args.samples > 1 {
        let summary = simulate_skirmish_many(cfg, args.samples)?;
        let samples = f64::from(summary.samples);
        println!("simulate-skirmish results");
        println!("-------------------------");
        println!("samples:            {}", summary.samples);
        println!(
            "party a wins:       {} ({:.1}%)",
            summary.a_wins,
            f64::from(summary.a_wins) / samples * 100.0
        );
        println!(
            "party b wins:       {} ({:.1}%)",
            summary.b_wins,
            f64::from(summary.b_wins) / samples * 100.0
        );
        println!("draws:              {}", summary.draws);
        println!("avg rounds:         {:.2}", summary.avg_rounds);
        return Ok(());
    }

    let res = simulate_skirmish(cfg)?;
    for line in &res.log {
        println!("{}", line);
    }
    for (name, hp) in &res.survivors {
        println!("survivor: {} ({} hp)", name, hp);
    }
    Ok(())
}
