#![warn(clippy::pedantic, elided_lifetimes_in_paths, explicit_outlives_requirements)]
#![allow(non_snake_case)]

//! Dumps DUN files of an extracted archive as PNG images.

use {
	clap::Parser,
	const_format::concatcp,
	dunconv::{config::Config, dump::{Dumper, DUMP_PREFIX}},
	log::{error, warn},
	std::{path::PathBuf, process::ExitCode},
};

#[derive(Parser)]
#[clap(version, about)]
struct Args {
	/// Dump job configuration.
	#[clap(long, default_value = "dump.toml")]
	config: PathBuf,

	#[clap(long, default_value = concatcp!(DUMP_PREFIX, "_dun_/"))]
	output: PathBuf,

	/// Dump every DUN file of the path table.
	#[clap(short, long)]
	all: bool,

	dunNames: Vec<String>,
}

fn main() -> ExitCode {
	env_logger::init();
	let Args { config, output, all, mut dunNames } = Args::parse();
	let dumper = match Config::load(&config).and_then(|config| Dumper::new(config, output)) {
		Ok(dumper) => dumper,
		Err(err) => {
			error!("{err}");
			return ExitCode::FAILURE;
		}
	};
	if all {
		dunNames.extend(dumper.config().dunNames().map(str::to_owned));
	}
	if dunNames.is_empty() {
		warn!("no DUN files given");
	}
	let mut exitCode = ExitCode::SUCCESS;
	for dunName in &dunNames {
		if let Err(err) = dumper.dumpDun(dunName) {
			error!("{dunName}: {err}");
			exitCode = ExitCode::FAILURE;
		}
	}
	exitCode
}
