//! `ampcss watch`: build, then rebuild on change until Ctrl+C.

use anyhow::Result;

use crate::config::Config;
use crate::core::setup_shutdown_handler;
use crate::{log, watch};

pub fn run_watch(config: &Config) -> Result<()> {
    setup_shutdown_handler()?;
    watch::watch(config)?;
    log!("watch"; "stopped");
    Ok(())
}
