use super::args::{ForwardPath, ReversePath};

/// Everything gathered between MAIL FROM and the terminating dot. Only ever
/// non-empty in the middle of a transaction; finalizing or resetting clears
/// the whole thing at once.
#[derive(Default, Clone, Debug)]
pub struct Envelope {
	pub reverse_path: Option<ReversePath>,
	pub forward_paths: Vec<ForwardPath>,
	pub body: Vec<String>,
}

impl Envelope {
	pub fn new() -> Self {
		Self::default()
	}

	/// Accumulate one line of mail data, terminator and all; the terminator
	/// comes back when the message is assembled.
	pub fn push_line(&mut self, line: &str) {
		self.body.push(line.trim_end_matches('\n').to_string());
	}

	/// Render the finished message: the From line, a To line per recipient in
	/// the order they arrived, then the data lines.
	pub fn assemble(&self) -> String {
		let mut lines = Vec::with_capacity(1 + self.forward_paths.len() + self.body.len());

		if let Some(reverse_path) = &self.reverse_path {
			lines.push(format!("From: {}", reverse_path));
		}

		for forward_path in &self.forward_paths {
			lines.push(format!("To: {}", forward_path));
		}

		lines.extend(self.body.iter().cloned());
		lines.join("\n")
	}

	pub fn clear(&mut self) {
		self.reverse_path = None;
		self.forward_paths.clear();
		self.body.clear();
	}

	pub fn is_empty(&self) -> bool {
		self.reverse_path.is_none() && self.forward_paths.is_empty() && self.body.is_empty()
	}
}
