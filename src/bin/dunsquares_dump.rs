#![warn(clippy::pedantic, elided_lifetimes_in_paths, explicit_outlives_requirements)]
#![allow(non_snake_case)]

//! Dumps headerless square id planes, one byte per square, as PNG images.

use {
	clap::Parser,
	const_format::concatcp,
	dunconv::{
		config::Config,
		dump::{Dumper, DUMP_PREFIX},
		level::Level,
	},
	log::error,
	std::{fs, path::PathBuf, process::ExitCode},
};

#[derive(Parser)]
#[clap(version, about)]
struct Args {
	#[clap(long, default_value = "dump.toml")]
	config: PathBuf,

	#[clap(long, default_value = concatcp!(DUMP_PREFIX, "_dunsquares_/"))]
	output: PathBuf,

	/// Level whose squares the planes refer to.
	#[clap(long, default_value = "l1")]
	level: Level,

	/// Squares per row.
	#[clap(long, default_value_t = 40)]
	width: usize,

	/// Rows of squares.
	#[clap(long, default_value_t = 40)]
	height: usize,

	#[clap(required = true)]
	paths: Vec<PathBuf>,
}

fn main() -> ExitCode {
	env_logger::init();
	let Args { config, output, level, width, height, paths } = Args::parse();
	let dumper = match Config::load(&config).and_then(|config| Dumper::new(config, output)) {
		Ok(dumper) => dumper,
		Err(err) => {
			error!("{err}");
			return ExitCode::FAILURE;
		}
	};
	let mut exitCode = ExitCode::SUCCESS;
	for path in &paths {
		let result = fs::read(path).map_err(|source| dunconv::Error::Io { path: path.clone(), source }).and_then(
			|squareIdsPlus1| {
				dumper.dumpSquareIds(&path.to_string_lossy(), &squareIdsPlus1, [width, height], level)
			},
		);
		if let Err(err) = result {
			error!("{path:?}: {err}");
			exitCode = ExitCode::FAILURE;
		}
	}
	exitCode
}
