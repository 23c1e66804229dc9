mod cli;
mod config;
mod errors;
mod logging;

use std::fs;
use std::path::Path;

use clap::Parser;
use color_eyre::Result;
use color_eyre::eyre::WrapErr;
use intake::Step;
use intake::core::intent::parse_script;
use intake::core::{EffectExecutor, JsonFileSink, Session};
use strum::IntoEnumIterator;
use tracing::{debug, info, warn};

use crate::cli::{Cli, Cmd};
use crate::config::Config;

fn main() -> Result<()> {
    errors::init()?;
    let args = Cli::parse();

    config::ensure_data_and_config_dirs_exist()?;
    let cfg = Config::new().wrap_err("failed to load configuration")?;
    let _guard = logging::init(&cfg.log_dir())?;

    let files = cfg.loaded_files();
    if files.is_empty() {
        warn!(
            config_dir = %cfg.config.config_dir.display(),
            "no configuration file found; using built-in defaults"
        );
    } else {
        debug!(?files, "configuration loaded");
    }

    match args.cmd {
        Cmd::Replay { script, out, print } => {
            let out = out.unwrap_or_else(|| cfg.output_dir());
            replay(&cfg, &script, &out, print)
        }
        Cmd::Options => {
            println!("{}", serde_json::to_string_pretty(&cfg.catalog)?);
            Ok(())
        }
        Cmd::Steps => {
            for step in Step::iter() {
                println!(
                    "{}. {} [{}] forward: {:?}, back: {:?}",
                    step.index() + 1,
                    step.title(),
                    step,
                    step.next_label(),
                    step.back_label().unwrap_or("-"),
                );
            }
            Ok(())
        }
    }
}

/// Drive one fresh session through a script, the way a user would click
/// through the form: rejected steps are logged and the replay goes on.
fn replay(cfg: &Config, script: &Path, out: &Path, print: bool) -> Result<()> {
    let source = fs::read_to_string(script)
        .wrap_err_with(|| format!("cannot read script {}", script.display()))?;
    let steps = parse_script(&source)?;

    let mut session = Session::new(cfg.catalog.clone());
    let mut executor = EffectExecutor::new(JsonFileSink::new(out));
    info!(session = %session.id(), steps = steps.len(), "replay started");

    for (n, step) in steps.into_iter().enumerate() {
        let intent = match step.into_intent() {
            Ok(intent) => intent,
            Err(e) => {
                warn!(step = n, error = %e, "script step skipped");
                continue;
            }
        };
        // rejections are logged by the session and surfaced in the view
        if let Ok(effects) = session.apply(intent) {
            executor.run(effects)?;
        }
    }

    info!(
        session = %session.id(),
        step = %session.step(),
        submitted = session.is_submitted(),
        delivered = executor.delivered(),
        "replay finished"
    );
    if session.is_submitted() {
        eprintln!(
            "submitted: {}",
            executor.sink().path_for(session.id()).display()
        );
    }
    if print {
        println!("{}", serde_json::to_string_pretty(&session.view())?);
    }
    Ok(())
}
