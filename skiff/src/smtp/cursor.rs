use thiserror::Error;

/// A read position over a single line of input. One of these is created for
/// every line the server receives and thrown away once the line has been
/// classified; nothing holds a cursor across lines.
pub struct Cursor<'a> {
	line: &'a str,
	position: usize,
}

impl<'a> Cursor<'a> {
	pub fn new(line: &'a str) -> Self {
		Self { line, position: 0 }
	}

	/// The character under the cursor, or None once we've run off the end.
	pub fn current_char(&self) -> Option<char> {
		self.line.as_bytes().get(self.position).map(|byte| *byte as char)
	}

	pub fn advance(&mut self) {
		if !self.is_at_end() {
			self.position += 1;
		}
	}

	pub fn is_at_end(&self) -> bool {
		self.position >= self.line.len()
	}

	pub fn position(&self) -> usize {
		self.position
	}

	/// Jump back to a position saved earlier by the caller. Grammar rules use
	/// this to undo a tentative match; a target outside [0, len] is a bug in
	/// the rule, not bad input.
	pub fn rewind(&mut self, target: usize) -> Result<(), CursorFault> {
		if target > self.line.len() {
			return Err(CursorFault::OutOfRange {
				target,
				length: self.line.len(),
			});
		}

		self.position = target;
		Ok(())
	}

	/// The text consumed since `from`, which must be a position previously
	/// returned by [`Cursor::position`]. Matched spans are always ASCII, so
	/// slicing on byte positions is safe.
	pub fn span(&self, from: usize) -> &'a str {
		&self.line[from..self.position]
	}
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum CursorFault {
	#[error("rewind target {target} outside of line bounds [0, {length}]")]
	OutOfRange { target: usize, length: usize },
}
