use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tracing::info;

use crate::args::EngineArgs;
use crate::config::{load_config, EngineConfig};
use crate::consolidator::{Consolidator, StatsLayout};
use crate::error::AppResult;
use crate::job::InMemoryJobRegistry;
use crate::logger;
use crate::trigger::ConsolidationTrigger;

/// Binary entry point: parse arguments, set up logging, and run the engine
/// on a dedicated runtime.
///
/// # Errors
///
/// Returns an error when arguments or config are invalid, the runtime
/// cannot be built, or a final consolidation pass fails.
pub fn run() -> AppResult<()> {
    let Some(args) = parse_args()? else {
        return Ok(());
    };
    logger::init_logging(args.verbose);

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    runtime.block_on(run_async(args))
}

fn parse_args() -> AppResult<Option<EngineArgs>> {
    match EngineArgs::try_parse() {
        Ok(args) => Ok(Some(args)),
        // Help and version are rendered output, not failures.
        Err(err)
            if matches!(
                err.kind(),
                clap::error::ErrorKind::DisplayHelp | clap::error::ErrorKind::DisplayVersion
            ) =>
        {
            err.print()?;
            Ok(None)
        }
        Err(err) => Err(err.into()),
    }
}

async fn run_async(args: EngineArgs) -> AppResult<()> {
    let config = load_config(args.config.as_deref())?
        .map_or_else(|| Ok(EngineConfig::default()), |file| EngineConfig::apply(&file))?;
    let tick_interval_ms = args.tick_interval_ms.unwrap_or(config.tick_interval_ms);

    let registry = Arc::new(InMemoryJobRegistry::new());
    for job_id in &args.jobs {
        registry.create_job(job_id);
        for index in 0..args.agents {
            registry.update_job(job_id, |state| {
                state.mark_agent_running(&format!("agent-{}", index));
            })?;
        }
    }

    let layout = StatsLayout::new(PathBuf::from(&args.stats_root));
    let consolidator = Arc::new(Consolidator::new(config, layout, registry));
    for job_id in &args.jobs {
        consolidator.register_job(job_id).await;
    }

    if args.follow {
        let trigger = ConsolidationTrigger::spawn(
            Arc::clone(&consolidator),
            Duration::from_millis(tick_interval_ms),
        );
        tokio::signal::ctrl_c().await?;
        info!("Interrupted; flushing tracked jobs");
        trigger.shutdown().await;
    }

    for job_id in &args.jobs {
        consolidator.deregister_job(job_id).await?;
    }
    Ok(())
}
