use clap::Parser;

#[derive(Debug, Parser, Clone)]
#[clap(
    version,
    about = "Consolidation engine for distributed load-test telemetry - tails per-agent sample streams, windows them into a fleet-wide time series, and tracks distributed job completion."
)]
pub struct EngineArgs {
    /// Root directory holding one stats directory per job
    #[arg(long = "stats-root")]
    pub stats_root: String,

    /// Job id to consolidate; repeat for multiple jobs
    #[arg(long = "job", required = true)]
    pub jobs: Vec<String>,

    /// Alive-agent count assumed when extrapolating bucket averages
    #[arg(long = "agents", default_value_t = 1)]
    pub agents: usize,

    /// Keep consolidating on a fixed delay until interrupted instead of
    /// running one final pass
    #[arg(long = "follow")]
    pub follow: bool,

    /// Delay between consolidation passes (follow mode)
    #[arg(long = "tick-interval-ms")]
    pub tick_interval_ms: Option<u64>,

    /// Path to a loadgrid.toml / loadgrid.json config file
    #[arg(long = "config")]
    pub config: Option<String>,

    /// Enable debug logging
    #[arg(short, long)]
    pub verbose: bool,
}
