//! Writes a generated task plan to stdout as JSON.
//!
//! Usage: `gen-plan [small|medium|large|xlarge] [SEED] [CYCLES]`
//!
//! The output feeds straight into the `taskgraph` binary, e.g.
//! `gen-plan large 7 | taskgraph analyze -`.

use std::error::Error;
use std::io::{BufWriter, Write as _};

use taskgraph_bench::{SizeTier, generate_plan};

fn parse_tier(name: &str) -> Result<SizeTier, String> {
    match name {
        "small" => Ok(SizeTier::Small),
        "medium" => Ok(SizeTier::Medium),
        "large" => Ok(SizeTier::Large),
        "xlarge" => Ok(SizeTier::XLarge),
        other => Err(format!("unknown tier {other:?}")),
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let mut args = std::env::args().skip(1);
    let tier = parse_tier(args.next().as_deref().unwrap_or("medium"))?;
    let seed: u64 = args.next().map_or(Ok(42), |s| s.parse())?;
    let cycles: usize = args.next().map_or(Ok(0), |s| s.parse())?;

    let mut config = tier.config(seed);
    config.inject_cycles = cycles;
    let plan = generate_plan(&config)?;

    let stdout = std::io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    serde_json::to_writer_pretty(&mut out, &plan)?;
    writeln!(out)?;
    out.flush()?;
    Ok(())
}
