use std::path::PathBuf;

use confindent::Confindent;
use getopts::Options;

pub struct Config {
	pub maildrop: PathBuf,
}

impl Config {
	fn print_usage<S: AsRef<str>>(prgm: S, opts: &Options) {
		let brief = format!("Usage: {} [options]", prgm.as_ref());
		println!("{}", opts.usage(&brief));
	}

	pub fn get() -> Option<Self> {
		let args: Vec<String> = std::env::args().collect();

		let mut opts = Options::new();
		opts.optflag("h", "help", "Print this help message");
		opts.optopt(
			"m",
			"maildrop",
			"The directory completed messages are appended under, one file per recipient\nDefault: /var/mail/skiff",
			"PATH",
		);
		opts.optopt(
			"c",
			"config",
			"An alternate location to read the config from\nDefault: /etc/skiff/skiff.conf",
			"PATH",
		);

		let matches = match opts.parse(&args[1..]) {
			Ok(m) => m,
			Err(_e) => return None,
		};

		if matches.opt_present("help") {
			Self::print_usage(&args[0], &opts);
			return None;
		}

		let conf_path = matches
			.opt_str("config")
			.unwrap_or("/etc/skiff/skiff.conf".into());

		// The config file is optional; the maildrop has a usable default and
		// everything else comes over stdin.
		let config = Confindent::from_file(conf_path)
			.or_else(|_| Confindent::from_file("skiff.conf"))
			.ok();

		// Options specified on the command line take priority
		let maildrop = matches
			.opt_str("maildrop")
			.or_else(|| {
				config
					.as_ref()
					.and_then(|conf| conf.child_value("Maildrop").map(String::from))
			})
			.unwrap_or("/var/mail/skiff".into());

		Some(Self {
			maildrop: maildrop.into(),
		})
	}
}
