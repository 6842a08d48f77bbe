use std::{fs, path::PathBuf, process::ExitCode};

use anyhow::Context;
use clap::{Parser, ValueEnum};

use moq_wire::{Error, Session};

mod render;

/// Decode and validate one MoQT wire buffer.
#[derive(Parser)]
#[command(name = "moq-wire", version, about)]
struct Cli {
	/// Which channel the buffer was captured from.
	#[arg(value_enum)]
	channel: Channel,

	/// Hex input; ASCII whitespace is stripped before decoding.
	#[arg(long, conflicts_with = "file")]
	hex: Option<String>,

	/// Read raw bytes from a file instead.
	#[arg(long)]
	file: Option<PathBuf>,

	/// Render the decoded record as JSON instead of indented text.
	#[arg(long)]
	json: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Channel {
	/// A framed control stream message.
	Control,
	/// An entire unidirectional data stream.
	Stream,
	/// A single datagram payload.
	Datagram,
}

fn main() -> ExitCode {
	tracing_subscriber::fmt()
		.with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
		.with_writer(std::io::stderr)
		.init();

	let cli = Cli::parse();

	let input = match read_input(&cli) {
		Ok(input) => input,
		Err(err) => {
			eprintln!("error: {err:#}");
			return ExitCode::from(1);
		}
	};
	tracing::debug!(channel = ?cli.channel, size = input.len(), "decoding");

	let mut session = Session::new();
	let result = match cli.channel {
		Channel::Control => session.validate_control(&input),
		Channel::Stream => session.validate_stream(&input),
		Channel::Datagram => session.validate_datagram(&input),
	};

	match result {
		Ok(record) => {
			if cli.json {
				println!("{:#}", render::to_json(&record));
			} else {
				print!("{}", render::pretty(&record));
			}
			ExitCode::SUCCESS
		}
		Err(err) => {
			eprintln!("{err} (termination code {:#04x})", err.to_code());
			match err {
				Error::Validation(_) => ExitCode::from(2),
				Error::Protocol(_) => ExitCode::from(3),
			}
		}
	}
}

fn read_input(cli: &Cli) -> anyhow::Result<Vec<u8>> {
	match (&cli.hex, &cli.file) {
		(Some(input), None) => {
			let stripped: String = input.chars().filter(|c| !c.is_ascii_whitespace()).collect();
			hex::decode(&stripped).context("invalid hex input")
		}
		(None, Some(path)) => fs::read(path).with_context(|| format!("reading {}", path.display())),
		_ => anyhow::bail!("provide exactly one of --hex or --file"),
	}
}
