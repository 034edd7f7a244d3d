// Copyright (c) 2026 The cspta developers.
//
// This source code is licensed under the GNU license found in the
// LICENSE file in the root directory of this source tree.

//! The main routine of `cspta`: load a program model from a JSON
//! description, run the selected pointer analysis, and dump the requested
//! results.

use anyhow::{Context, Result};
use log::*;
use std::env;

use cspta::model::loader;
use cspta::pta;
use cspta::util::options::AnalysisOptions;

fn main() -> Result<()> {
    // Initialize the logger.
    if env::var("CSPTA_LOG").is_ok() {
        let e = env_logger::Env::new()
            .filter("CSPTA_LOG")
            .write_style("CSPTA_LOG_STYLE");
        env_logger::init_from_env(e);
    }

    // Get any options specified via the CSPTA_FLAGS environment variable.
    let mut options = AnalysisOptions::default();
    let flags = env::var("CSPTA_FLAGS").unwrap_or_default();
    let env_args: Vec<String> = serde_json::from_str(&flags).unwrap_or_default();
    options.parse_from_args(&env_args);

    // Let arguments supplied on the command line override the environment.
    let args: Vec<String> = env::args().skip(1).collect();
    options.parse_from_args(&args);
    info!("PTA Options: {:?}", options);

    let input = options
        .input
        .clone()
        .context("no input program model given")?;
    let text =
        std::fs::read_to_string(&input).with_context(|| format!("failed to read {input}"))?;
    let mut program = loader::load_program(&text)?;

    if let Some(entry) = &options.entry_func {
        let method = program
            .find_method(entry)
            .with_context(|| format!("entry method {entry} not found"))?;
        program.set_entry_point(method);
    }

    pta::run_analysis(&program, &options)?;
    Ok(())
}
