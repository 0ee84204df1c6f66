//! `ampcss build`: one build cycle, then exit.

use anyhow::{Context, Result};

use crate::config::Config;
use crate::log;
use crate::pipeline::{self, BuildReport, WriteOutcome};

pub fn run_build(config: &Config) -> Result<()> {
    let report = pipeline::build(config).context("build failed")?;
    print_report(config, &report);
    Ok(())
}

fn print_report(config: &Config, report: &BuildReport) {
    for (path, outcome) in &report.outputs {
        let label = match outcome {
            WriteOutcome::Written => "wrote",
            WriteOutcome::Unchanged => "unchanged",
        };
        log!("build"; "{} {}", label, config.root_relative(path).display());
    }

    log!(
        "build";
        "{} entr{} compiled in {} ms",
        report.entries,
        if report.entries == 1 { "y" } else { "ies" },
        report.elapsed.as_millis()
    );
}
