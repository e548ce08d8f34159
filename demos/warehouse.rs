//! # Warehouse slotting walk-through
//!
//! Generates a synthetic order history, builds the co-occurrence graph, and
//! compares a random bin layout against the community-based one. Then re-runs
//! through the result cache to show the swap.
//!
//! ```text
//! RUST_LOG=bin_slotting=debug cargo run --example warehouse
//! ```

use bin_slotting::{pipeline, PipelineConfig, ResultCache, SimulationRun};
use bin_slotting::{Layout, MinCutDetector};

// ── Display helpers ───────────────────────────────────────────────────────────

fn bar(v: u32, max: u32) -> String {
    let filled = if max == 0 { 0 } else { (v as usize * 20) / max as usize };
    let empty = 20usize.saturating_sub(filled);
    format!("[{}{}] {:>4}", "█".repeat(filled), "░".repeat(empty), v)
}

fn print_layout(title: &str, run: &SimulationRun, layout: &Layout) {
    println!("\n── {} ──", title);
    let max = run.heat.as_slice().iter().copied().max().unwrap_or(0);
    for (slot, p) in layout.ordering().iter().enumerate().take(15) {
        let community = run.plan.partition.community_of(*p).map_or(0, |c| c + 1);
        println!(
            "  bin {:>3}  {:<12} C{:<2} {}",
            slot + 1,
            p.to_string(),
            community,
            bar(run.heat.heat(*p), max)
        );
    }
    if layout.len() > 15 {
        println!("  ... {} more bins", layout.len() - 15);
    }
}

fn print_summary(run: &SimulationRun) {
    println!("\n── Strongest relationships ──");
    for e in &run.top_edges {
        println!("  {:<12} ↔ {:<12} {:>4} orders", e.source.to_string(), e.target.to_string(), e.weight);
    }

    let c = &run.comparison;
    println!("\n── Pick figures ──");
    println!("  orders                 {}", c.baseline.orders);
    println!("  picks per order        {:.2}", c.baseline.mean_picks_per_order);
    println!("  mean span (baseline)   {:.2} bins", c.baseline.mean_pick_span);
    println!("  mean span (optimized)  {:.2} bins", c.optimized.mean_pick_span);
    println!("  improvement            {:.1}%", c.span_improvement() * 100.0);
    if run.plan.fallback {
        println!("  (no co-occurrence signal: heat-only layout)");
    }
}

fn main() -> bin_slotting::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = PipelineConfig::default().with_seed(42);

    println!("=== Spectral communities (seed {}) ===", config.seed.unwrap_or_default());
    let run = pipeline::run(&config)?;
    print_layout("Baseline (random)", &run, &run.baseline);
    print_layout("Optimized", &run, run.optimized());
    print_summary(&run);

    println!("\n=== Min-cut communities, same orders ===");
    let mincut = pipeline::run_with_detector(&config, MinCutDetector::new())?;
    print_summary(&mincut);

    println!("\n=== Cache re-run with fresh seeds ===");
    let cache = ResultCache::warm(PipelineConfig::default())?;
    let first = cache.ready()?.seed;
    let second = cache.rerun()?.seed;
    let published = cache.optimized_view(|v| v.top_edges.len())?;
    println!("  seed {} → {} ({} top edges published)", first, second, published);

    Ok(())
}
