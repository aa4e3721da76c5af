mod config;
mod maildrop;

use std::io::{self, BufRead, Write};

use skiff::smtp::Session;
use tracing::error;
use tracing_subscriber::EnvFilter;

use config::Config;
use maildrop::Maildrop;

fn main() {
	tracing_subscriber::fmt()
		.with_env_filter(EnvFilter::from_default_env())
		.with_writer(io::stderr)
		.init();

	let config = match Config::get() {
		Some(config) => config,
		None => return,
	};

	let mut session = Session::new(Maildrop::new(config.maildrop));

	let mut stdin = io::stdin().lock();
	let mut stdout = io::stdout();

	let mut line = String::new();
	loop {
		line.clear();

		match stdin.read_line(&mut line) {
			// A read of nothing is the end of input, which is not the same
			// thing as reading a blank line
			Ok(0) => break,
			Ok(_) => {}
			Err(err) => {
				error!("failed reading stdin: {}", err);
				std::process::exit(1);
			}
		}

		// The grammar's line terminator is a bare newline; clients speaking
		// CRLF get normalized at this edge
		if line.ends_with("\r\n") {
			let len = line.len();
			line.replace_range(len - 2.., "\n");
		}

		match session.line(&line) {
			Ok(Some(reply)) => {
				if writeln!(stdout, "{}", reply).is_err() {
					break;
				}
			}
			Ok(None) => {}
			Err(err) => {
				error!("session halted: {}", err);
				std::process::exit(1);
			}
		}
	}
}
