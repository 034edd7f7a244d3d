// Copyright (c) 2026 The cspta developers.
//
// This source code is licensed under the GNU license found in the
// LICENSE file in the root directory of this source tree.

//! Analysis options.

use clap::parser::ValueSource;
use clap::{Arg, Command};

use crate::pta::PTAType;

const CSPTA_USAGE: &str = r#"cspta [OPTIONS] INPUT"#;

/// Creates the clap::Command metadata for argument parsing.
fn make_options_parser() -> Command<'static> {
    Command::new("cspta")
        .no_binary_name(true)
        .override_usage(CSPTA_USAGE)
        .arg(Arg::new("entry-func")
            .long("entry-func")
            .takes_value(true)
            .help("The `Class.method` name of the entry method from which the pointer analysis begins."))
        .arg(Arg::new("pta-type")
            .long("pta-type")
            .takes_value(true)
            .value_parser(["ci", "insensitive", "callsite-sensitive", "cs", "object-sensitive", "obj"])
            .default_value("callsite-sensitive")
            .help("The type of pointer analysis.")
            .long_help("Context-insensitive, callsite-sensitive and object-sensitive pointer analyses are supported now."))
        .arg(Arg::new("context-depth")
            .long("context-depth")
            .takes_value(true)
            .value_parser(clap::value_parser!(u32))
            .default_value("1")
            .help("The context depth limit for a context-sensitive pointer analysis."))
        .arg(Arg::new("heap-context-depth")
            .long("heap-context-depth")
            .takes_value(true)
            .value_parser(clap::value_parser!(u32))
            .help("The heap context depth limit; defaults to context-depth - 1."))
        .arg(Arg::new("pre-build-model")
            .long("pre-build-model")
            .takes_value(false)
            .help("Materialize the full program model before solving and report its size."))
        .arg(Arg::new("implicit-entries")
            .long("implicit-entries")
            .takes_value(false)
            .help("Analyze the implicit entry points in addition to the designated entry."))
        .arg(Arg::new("verbose-propagation")
            .long("verbose-propagation")
            .takes_value(false)
            .help("Trace every points-to propagation step."))
        .arg(Arg::new("dump-stats")
            .long("dump-stats")
            .takes_value(false)
            .help("Dump the statistics of the analysis results."))
        .arg(Arg::new("call-graph-output")
            .long("dump-call-graph")
            .takes_value(true)
            .help("Dump the call graph in DOT format to the output file."))
        .arg(Arg::new("pts-output")
            .long("dump-pts")
            .takes_value(true)
            .help("Dump points-to results to the output file."))
        .arg(Arg::new("INPUT")
            .help("The program model file to be analyzed."))
}

#[derive(Clone, Debug)]
pub struct AnalysisOptions {
    pub entry_func: Option<String>,
    pub pta_type: PTAType,
    // options for context-sensitive analysis
    pub context_depth: u32,
    pub heap_context_depth: Option<u32>,

    pub pre_build_model: bool,
    pub analyze_implicit_entries: bool,
    pub verbose_propagation: bool,

    pub dump_stats: bool,
    pub call_graph_output: Option<String>,
    pub pts_output: Option<String>,

    pub input: Option<String>,
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        AnalysisOptions {
            entry_func: None,
            pta_type: PTAType::CallSiteSensitive,
            context_depth: 1,
            heap_context_depth: None,
            pre_build_model: false,
            analyze_implicit_entries: false,
            verbose_propagation: false,
            dump_stats: false,
            call_graph_output: None,
            pts_output: None,
            input: None,
        }
    }
}

impl AnalysisOptions {
    /// Parses options from the given command-line arguments, overriding the
    /// current values.
    pub fn parse_from_args(&mut self, args: &[String]) {
        let matches = make_options_parser().get_matches_from(args.iter());

        if let Some(entry) = matches.get_one::<String>("entry-func") {
            self.entry_func = Some(entry.clone());
        }
        // Defaulted arguments only override when given explicitly, so a
        // later parse (command line) does not clobber an earlier one
        // (environment) with the default.
        if matches.value_source("pta-type") == Some(ValueSource::CommandLine) {
            let pta_type = matches.get_one::<String>("pta-type").unwrap();
            self.pta_type = match pta_type.as_str() {
                "ci" | "insensitive" => PTAType::ContextInsensitive,
                "callsite-sensitive" | "cs" => PTAType::CallSiteSensitive,
                "object-sensitive" | "obj" => PTAType::ObjectSensitive,
                _ => unreachable!("rejected by the value parser"),
            };
        }
        if matches.value_source("context-depth") == Some(ValueSource::CommandLine) {
            self.context_depth = *matches.get_one::<u32>("context-depth").unwrap();
        }
        if let Some(depth) = matches.get_one::<u32>("heap-context-depth") {
            self.heap_context_depth = Some(*depth);
        }
        self.pre_build_model |= matches.is_present("pre-build-model");
        self.analyze_implicit_entries |= matches.is_present("implicit-entries");
        self.verbose_propagation |= matches.is_present("verbose-propagation");
        self.dump_stats |= matches.is_present("dump-stats");
        if let Some(output) = matches.get_one::<String>("call-graph-output") {
            self.call_graph_output = Some(output.clone());
        }
        if let Some(output) = matches.get_one::<String>("pts-output") {
            self.pts_output = Some(output.clone());
        }
        if let Some(input) = matches.get_one::<String>("INPUT") {
            self.input = Some(input.clone());
        }
    }

    /// The effective heap context depth.
    pub fn heap_depth(&self) -> u32 {
        self.heap_context_depth
            .unwrap_or_else(|| self.context_depth.saturating_sub(1))
    }
}
