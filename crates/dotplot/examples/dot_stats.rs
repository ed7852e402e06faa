//! Print a quick summary of a seeded chaos-game run.
//!
//! Usage:
//!   cargo run -p dotplot --example dot_stats -- [n] [seed]
//!
//! Prints corner visit counts, the worst redraw streak, and the bounding box of
//! the emitted points.

use dotplot::api::{ChaosCfg, ChaosGenerator};

fn main() {
    let mut args = std::env::args().skip(1);
    let n: i64 = args.next().and_then(|s| s.parse().ok()).unwrap_or(100_000);
    let seed: u64 = args.next().and_then(|s| s.parse().ok()).unwrap_or(2025);

    let gen = match ChaosGenerator::seeded(n, seed, ChaosCfg::default()) {
        Ok(g) => g,
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(2);
        }
    };
    let p0 = gen.seed_point();
    let steps = match gen.collect_steps() {
        Ok(s) => s,
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
    };

    let mut visits = [0usize; 4];
    let mut max_draws = 0u32;
    let (mut lo, mut hi) = ([f64::INFINITY; 2], [f64::NEG_INFINITY; 2]);
    for s in &steps {
        visits[s.corner] += 1;
        max_draws = max_draws.max(s.corner_draws);
        lo = [lo[0].min(s.point.x), lo[1].min(s.point.y)];
        hi = [hi[0].max(s.point.x), hi[1].max(s.point.y)];
    }
    println!("n={n} seed={seed} p0=({:.4},{:.4})", p0.x, p0.y);
    println!("corner visits: {visits:?}");
    println!("longest redraw: {max_draws} draws");
    println!(
        "bbox: x∈[{:.4},{:.4}] y∈[{:.4},{:.4}]",
        lo[0], hi[0], lo[1], hi[1]
    );
}
