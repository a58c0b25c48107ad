//! Random-workload simulation of an n-way set-associative cache.
//!
//! Writes a stream of random string keys, re-reading a sliding window of the
//! most recently written ones after every write, and reports how many reads
//! of older keys still hit.
//!
//! **Usage**:
//! ```bash
//! cargo run --example simulate -- --sets 4 --bits 2
//! cargo run --example simulate -- --sets 2 --bits 4 --policy mru-seq --writes 10000
//! cargo run --example simulate -- --log-level trace --writes 20
//! ```

use std::time::Instant;

use clap::Parser;
use nway_cache::cache::Cache;
use nway_cache::options::Options;
use nway_cache::policy::Policy;
use rand::prelude::*;
use rand_chacha::ChaCha8Rng;
use simplelog::LevelFilter;

#[derive(Debug, Parser)]
#[command(name = "N-way cache simulator")]
#[command(about = "Exercise an n-way set-associative cache with random string keys", long_about = None)]
struct Cli {
    /// Number of ways per address
    #[arg(short, long, default_value = "4")]
    sets: usize,

    /// Number of address bits (2^bits addresses)
    #[arg(short, long, default_value = "2")]
    bits: u32,

    /// Replacement policy: lru, mru, lru-seq, mru-seq
    #[arg(short, long, default_value = "lru-seq")]
    policy: Policy,

    /// Number of keys to write
    #[arg(short, long, default_value = "1000")]
    writes: usize,

    /// Number of recent keys re-read after every write
    #[arg(long, default_value = "4")]
    window: usize,

    /// Seed for the key generator
    #[arg(long, default_value = "42")]
    seed: u64,

    /// Log level
    #[arg(long, default_value = "info")]
    log_level: LevelFilter,
}

fn random_key(rng: &mut impl Rng) -> String {
    let len = rng.random_range(1..10);
    (0..len).map(|_| char::from(rng.random_range(0..=255u8))).collect()
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let args = Cli::parse();

    simplelog::TermLogger::init(
        args.log_level,
        simplelog::Config::default(),
        simplelog::TerminalMode::Mixed,
        simplelog::ColorChoice::Auto,
    )?;

    let options = Options::new(args.sets, args.bits)?;
    let mut cache = Cache::<String, usize, Policy>::with_policy(options, args.policy);
    let mut rng = ChaCha8Rng::seed_from_u64(args.seed);

    println!("=== N-way cache simulation ===\n");
    println!("Configuration:");
    println!("  Sets:      {}", cache.num_sets());
    println!("  Addresses: {}", cache.num_addresses());
    println!("  Capacity:  {}", cache.capacity());
    println!("  Policy:    {}", cache.policy());
    println!();

    let start = Instant::now();
    let mut recent: Vec<String> = Vec::with_capacity(args.window + 1);
    let mut window_hits = 0usize;
    let mut window_reads = 0usize;

    for i in 0..args.writes {
        let key = random_key(&mut rng);
        cache.write(key.clone(), i)?;

        recent.push(key);
        if recent.len() > args.window {
            recent.remove(0);
        }

        for key in &recent {
            window_reads += 1;
            if cache.read(key)?.is_some() {
                window_hits += 1;
            }
        }
    }
    let elapsed = start.elapsed();

    // Replay the stream to see how much of it is still cached.
    let mut rng = ChaCha8Rng::seed_from_u64(args.seed);
    let mut survivors = 0usize;
    for _ in 0..args.writes {
        let key = random_key(&mut rng);
        if cache.read(&key)?.is_some() {
            survivors += 1;
        }
    }

    println!("Results:");
    println!("  Writes:       {}", args.writes);
    println!("  Window hits:  {}/{}", window_hits, window_reads);
    println!("  Survivors:    {}/{}", survivors, args.writes);
    println!("  Occupied:     {}/{}", cache.memory().len(), cache.capacity());
    println!("  Time:         {:.2}ms", elapsed.as_secs_f64() * 1000.0);

    Ok(())
}
