use std::{
	fs::{self, OpenOptions},
	io::{self, Write},
	path::PathBuf,
};

use skiff::{smtp::args::ForwardPath, MailStore};

/// One file per recipient under a single directory, append-only. The grammar
/// already limits a mailbox to printable, non-special characters with no path
/// separators, so the bare `local@domain` is usable as a file name.
pub struct Maildrop {
	root: PathBuf,
}

impl Maildrop {
	pub fn new<B: Into<PathBuf>>(root: B) -> Self {
		Self { root: root.into() }
	}

	fn recipient_path(&self, recipient: &ForwardPath) -> PathBuf {
		self.root.join(recipient.mailbox())
	}
}

impl MailStore for Maildrop {
	fn append(&mut self, recipient: &ForwardPath, body: &str) -> io::Result<()> {
		fs::create_dir_all(&self.root)?;

		let mut file = OpenOptions::new()
			.create(true)
			.append(true)
			.open(self.recipient_path(recipient))?;

		file.write_all(body.as_bytes())?;
		file.write_all(b"\n")
	}
}
