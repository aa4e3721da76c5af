use thiserror::Error;

use super::{
	args::{ForwardPath, Path, ReversePath},
	command::{Command, CommandKind},
	cursor::{Cursor, CursorFault},
};

/// The characters <special> forbids inside a <string>, so they can never
/// appear in a local-part.
const SPECIAL: &[char] = &[
	'<', '>', '(', ')', '[', ']', '\\', '.', ',', ';', ':', '@', '"',
];

/// How an attempted rule left the matcher: `Ok(true)` matched and consumed its
/// text, `Ok(false)` did not match and put the cursor back where it started.
/// `Err` is a broken contract inside the matcher itself (empty literal,
/// rewind out of bounds) and aborts the session rather than becoming a reply.
type Attempt = Result<bool, GrammarFault>;

/// Recursive-descent recognizer for the command grammar, one method per rule.
/// Commands are matched in two phases so the server can tell *which* command
/// a line holds before deciding whether to parse its parameters: [`recognize`]
/// consumes only the fixed tokens (`MAIL FROM:` and friends), and
/// [`complete`] takes the rest of the rule from wherever recognition stopped.
///
/// [`recognize`]: Matcher::recognize
/// [`complete`]: Matcher::complete
pub struct Matcher<'a> {
	cursor: Cursor<'a>,
}

impl<'a> Matcher<'a> {
	pub fn new(line: &'a str) -> Self {
		Self {
			cursor: Cursor::new(line),
		}
	}

	/// Which command's fixed tokens start this line, if any. Leaves the
	/// cursor just past those tokens, ready for [`Matcher::complete`].
	pub fn recognize(&mut self) -> Result<Option<CommandKind>, GrammarFault> {
		if self.recognize_mail_from()? {
			Ok(Some(CommandKind::MailFrom))
		} else if self.recognize_rcpt_to()? {
			Ok(Some(CommandKind::RcptTo))
		} else if self.match_literal("DATA")? {
			Ok(Some(CommandKind::Data))
		} else {
			Ok(None)
		}
	}

	/// The rest of the rule for an already-recognized command. `None` means
	/// the parameters were malformed; recognition committed us to this
	/// command, so there is nothing left to backtrack to.
	pub fn complete(&mut self, kind: CommandKind) -> Result<Option<Command>, GrammarFault> {
		match kind {
			CommandKind::MailFrom => Ok(self
				.complete_path()?
				.map(|path| Command::Mail(ReversePath(path)))),
			CommandKind::RcptTo => Ok(self
				.complete_path()?
				.map(|path| Command::Rcpt(ForwardPath(path)))),
			CommandKind::Data => {
				self.nullspace();
				if self.crlf()? && self.cursor.is_at_end() {
					Ok(Some(Command::Data))
				} else {
					Ok(None)
				}
			}
		}
	}

	/// A path standing alone as the entire input, for [`std::str::FromStr`]
	/// on the argument types.
	pub fn bare_path(&mut self) -> Result<Option<Path>, GrammarFault> {
		match self.path()? {
			Some(path) if self.cursor.is_at_end() => Ok(Some(path)),
			_ => Ok(None),
		}
	}

	fn recognize_mail_from(&mut self) -> Attempt {
		let start = self.cursor.position();
		if self.match_literal("MAIL")? && self.whitespace()? && self.match_literal("FROM:")? {
			return Ok(true);
		}

		self.cursor.rewind(start)?;
		Ok(false)
	}

	fn recognize_rcpt_to(&mut self) -> Attempt {
		let start = self.cursor.position();
		if self.match_literal("RCPT")? && self.whitespace()? && self.match_literal("TO:")? {
			return Ok(true);
		}

		self.cursor.rewind(start)?;
		Ok(false)
	}

	/// `nullspace path nullspace CRLF`, the shared tail of the MAIL and RCPT
	/// rules.
	fn complete_path(&mut self) -> Result<Option<Path>, GrammarFault> {
		self.nullspace();
		let path = match self.path()? {
			Some(path) => path,
			None => return Ok(None),
		};

		self.nullspace();
		if self.crlf()? && self.cursor.is_at_end() {
			Ok(Some(path))
		} else {
			Ok(None)
		}
	}

	/// Consumes `expected` exactly, or nothing. An empty or non-ASCII
	/// `expected` is a bug in the grammar, not a parse failure.
	fn match_literal(&mut self, expected: &str) -> Attempt {
		if expected.is_empty() {
			return Err(GrammarFault::EmptyLiteral);
		}

		let start = self.cursor.position();
		for expected_char in expected.chars() {
			if !expected_char.is_ascii() {
				self.cursor.rewind(start)?;
				return Err(GrammarFault::NonAsciiLiteral(expected_char));
			}

			if self.cursor.current_char() != Some(expected_char) {
				self.cursor.rewind(start)?;
				return Ok(false);
			}

			self.cursor.advance();
		}

		Ok(true)
	}

	fn path(&mut self) -> Result<Option<Path>, GrammarFault> {
		let start = self.cursor.position();
		if !self.match_literal("<")? {
			return Ok(None);
		}

		let mailbox = match self.mailbox()? {
			Some(mailbox) => mailbox,
			None => {
				self.cursor.rewind(start)?;
				return Ok(None);
			}
		};

		if !self.match_literal(">")? {
			self.cursor.rewind(start)?;
			return Ok(None);
		}

		Ok(Some(mailbox))
	}

	fn mailbox(&mut self) -> Result<Option<Path>, GrammarFault> {
		let start = self.cursor.position();

		let local_start = self.cursor.position();
		if !self.string()? {
			return Ok(None);
		}
		let local_part = self.cursor.span(local_start);

		if !self.match_literal("@")? {
			self.cursor.rewind(start)?;
			return Ok(None);
		}

		let domain_start = self.cursor.position();
		if !self.domain()? {
			self.cursor.rewind(start)?;
			return Ok(None);
		}
		let domain = self.cursor.span(domain_start);

		Ok(Some(Path::new(local_part, domain)))
	}

	/// `element | element "." domain`, resolved greedily: take the dotted
	/// form if the rest of it parses, otherwise give the dot back and settle
	/// for the single element. Never an error from here; if no element
	/// matches at all, that's the caller's failure to report.
	fn domain(&mut self) -> Attempt {
		if !self.element()? {
			return Ok(false);
		}

		let after_element = self.cursor.position();
		if self.match_literal(".")? && !self.domain()? {
			self.cursor.rewind(after_element)?;
		}

		Ok(true)
	}

	/// `name | letter`, longest first. Trying the bare letter first would
	/// accept one character of a multi-character name and strand the rest.
	fn element(&mut self) -> Attempt {
		let start = self.cursor.position();
		if self.name()? {
			return Ok(true);
		}

		self.cursor.rewind(start)?;
		Ok(self.letter())
	}

	fn name(&mut self) -> Attempt {
		let start = self.cursor.position();
		if self.letter() && self.let_dig_str() {
			return Ok(true);
		}

		self.cursor.rewind(start)?;
		Ok(false)
	}

	fn let_dig_str(&mut self) -> bool {
		if !self.let_dig() {
			return false;
		}

		while self.let_dig() {}
		true
	}

	fn let_dig(&mut self) -> bool {
		self.letter() || self.digit()
	}

	fn letter(&mut self) -> bool {
		self.take_if(|c| c.is_ascii_alphabetic())
	}

	fn digit(&mut self) -> bool {
		self.take_if(|c| c.is_ascii_digit())
	}

	fn string(&mut self) -> Attempt {
		if !self.char_token() {
			return Ok(false);
		}

		while self.char_token() {}
		Ok(true)
	}

	/// One <char>: printable ASCII that is neither <special> nor <sp>.
	fn char_token(&mut self) -> bool {
		self.take_if(|c| c.is_ascii_graphic() && !SPECIAL.contains(&c))
	}

	fn sp(&mut self) -> bool {
		self.take_if(|c| c == ' ' || c == '\t')
	}

	/// One or more <sp>.
	fn whitespace(&mut self) -> Attempt {
		if !self.sp() {
			return Ok(false);
		}

		while self.sp() {}
		Ok(true)
	}

	/// Zero or more <sp>. Can't fail, so nothing to report.
	fn nullspace(&mut self) {
		while self.sp() {}
	}

	fn crlf(&mut self) -> Attempt {
		self.match_literal("\n")
	}

	fn take_if<F: Fn(char) -> bool>(&mut self, accept: F) -> bool {
		match self.cursor.current_char() {
			Some(c) if accept(c) => {
				self.cursor.advance();
				true
			}
			_ => false,
		}
	}
}

/// True if this line is the lone dot that ends mail data. Only whole lines
/// come through here, so the dot is always checked at the start of the line.
pub fn is_data_end(line: &str) -> Result<bool, GrammarFault> {
	let mut matcher = Matcher::new(line);
	Ok(matcher.match_literal(".")? && matcher.crlf()? && matcher.cursor.is_at_end())
}

/// Mail data is accepted nearly verbatim, but it still has to be 7-bit text:
/// printable ASCII, blanks, and the line terminator.
pub fn is_clean_body_line(line: &str) -> bool {
	line.chars()
		.all(|c| c.is_ascii_graphic() || c == ' ' || c == '\t' || c == '\n')
}

#[derive(Error, Debug)]
pub enum GrammarFault {
	#[error("match_literal called with an empty expected string")]
	EmptyLiteral,
	#[error("match_literal called with non-ascii character {0:?}")]
	NonAsciiLiteral(char),
	#[error(transparent)]
	Cursor(#[from] CursorFault),
}

#[cfg(test)]
mod test {
	use super::*;

	fn domain_of(line: &str) -> Option<String> {
		let mut matcher = Matcher::new(line);
		if !matcher.domain().unwrap() {
			return None;
		}

		Some(matcher.cursor.span(0).to_string())
	}

	fn valid_domains() -> Vec<String> {
		let mut valid = vec![];
		let elements = ["a", "ab", "a1", "abc123", "x0y"];

		for element in elements {
			valid.push(element.to_string());
		}

		for element in elements {
			for element2 in elements {
				valid.push(format!("{}.{}", element, element2));
			}
		}

		valid
	}

	fn valid_local_parts() -> Vec<String> {
		vec![
			String::from("a"),
			String::from("alice"),
			String::from("alice-smith"),
			String::from("a+b"),
			String::from("user!#$%"),
			String::from("1234"),
		]
	}

	fn invalid_local_parts() -> Vec<String> {
		vec![
			String::from(""),
			String::from("a b"),
			String::from("a.b"),
			String::from("a@b"),
			String::from("\"quoted\""),
			String::from("back\\slash"),
		]
	}

	#[test]
	fn domain_pass() {
		for domain in valid_domains() {
			assert_eq!(
				domain_of(&domain).as_deref(),
				Some(domain.as_str()),
				"failed on {}",
				domain
			);
		}
	}

	#[test]
	fn domain_backtracks_trailing_dot() {
		// The dot is not part of the domain; it has to be given back
		assert_eq!(domain_of("abc.").as_deref(), Some("abc"));
		assert_eq!(domain_of("a.b.").as_deref(), Some("a.b"));
	}

	#[test]
	fn domain_stops_at_empty_element() {
		// a..b can only match as far as the first element
		assert_eq!(domain_of("a..b").as_deref(), Some("a"));
		assert_eq!(domain_of(".a"), None);
		assert_eq!(domain_of("1a"), None);
	}

	#[test]
	fn element_prefers_longest_match() {
		let mut matcher = Matcher::new("ab1");
		assert!(matcher.element().unwrap());
		assert_eq!(matcher.cursor.span(0), "ab1");
	}

	#[test]
	fn path_pass() {
		for domain in valid_domains() {
			for local in valid_local_parts() {
				let path = format!("<{}@{}>", local, domain);
				let parsed: Result<Path, _> = path.parse();
				assert!(parsed.is_ok(), "failed on {}", path);
			}
		}
	}

	#[test]
	fn path_fail() {
		let mut bad = vec![
			String::from("<a@b"),
			String::from("a@b>"),
			String::from("a@b"),
			String::from("<@b>"),
			String::from("<a@>"),
			String::from("<a@b> "),
			String::from("<a@b.>"),
			String::from("<a@a..b>"),
			String::from("<a@.b>"),
			String::from("<a@1b>"),
		];

		for local in invalid_local_parts() {
			bad.push(format!("<{}@example.com>", local));
		}

		for path in bad {
			let parsed: Result<Path, _> = path.parse();
			assert!(parsed.is_err(), "passed on {}", path);
		}
	}

	#[test]
	fn recognize_consumes_fixed_tokens_only() {
		let mut matcher = Matcher::new("MAIL FROM:<a@b>\n");
		assert_eq!(matcher.recognize().unwrap(), Some(CommandKind::MailFrom));
		assert_eq!(matcher.cursor.position(), "MAIL FROM:".len());
	}

	#[test]
	fn recognize_misspelled_keyword() {
		let mut matcher = Matcher::new("MAL FROM:<a@b>\n");
		assert_eq!(matcher.recognize().unwrap(), None);
		// and nothing may be left consumed after the failed attempts
		assert_eq!(matcher.cursor.position(), 0);
	}

	#[test]
	fn recognize_requires_whitespace_between_tokens() {
		let mut matcher = Matcher::new("MAILFROM:<a@b>\n");
		assert_eq!(matcher.recognize().unwrap(), None);
	}

	#[test]
	fn recognition_is_rerunnable_after_rewind() {
		// Backtracking must be pure: a failed attempt followed by a rewind
		// reproduces the same outcome from the same position
		let mut matcher = Matcher::new("RCPT TO:<b@c>\n");
		assert!(!matcher.recognize_mail_from().unwrap());
		let first_stop = matcher.cursor.position();
		assert!(!matcher.recognize_mail_from().unwrap());
		assert_eq!(matcher.cursor.position(), first_stop);
		assert_eq!(matcher.recognize().unwrap(), Some(CommandKind::RcptTo));
	}

	#[test]
	fn complete_mail_from() {
		let mut matcher = Matcher::new("MAIL FROM: <alice@x.com> \n");
		let kind = matcher.recognize().unwrap().unwrap();
		match matcher.complete(kind).unwrap() {
			Some(Command::Mail(reverse)) => assert_eq!(reverse.to_string(), "<alice@x.com>"),
			other => panic!("expected a mail command, got {:?}", other),
		}
	}

	#[test]
	fn complete_rejects_missing_bracket() {
		let mut matcher = Matcher::new("MAIL FROM:<a@b.c\n");
		let kind = matcher.recognize().unwrap().unwrap();
		assert!(matcher.complete(kind).unwrap().is_none());
	}

	#[test]
	fn complete_rejects_trailing_garbage() {
		let mut matcher = Matcher::new("DATA x\n");
		assert_eq!(matcher.recognize().unwrap(), Some(CommandKind::Data));
		assert!(matcher.complete(CommandKind::Data).unwrap().is_none());
	}

	#[test]
	fn data_end_only_matches_lone_dot() {
		assert!(is_data_end(".\n").unwrap());
		assert!(!is_data_end("..\n").unwrap());
		assert!(!is_data_end(".").unwrap());
		assert!(!is_data_end(". \n").unwrap());
		assert!(!is_data_end("a.\n").unwrap());
	}

	#[test]
	fn body_line_validation() {
		assert!(is_clean_body_line("Hello there\n"));
		assert!(is_clean_body_line("\n"));
		assert!(is_clean_body_line("tabs\tare fine\n"));
		assert!(!is_clean_body_line("bell\u{7}\n"));
		assert!(!is_clean_body_line("caf\u{e9}\n"));
	}

	#[test]
	fn literal_contract_violations() {
		let mut matcher = Matcher::new("MAIL\n");
		assert!(matches!(
			matcher.match_literal(""),
			Err(GrammarFault::EmptyLiteral)
		));
		assert!(matches!(
			matcher.match_literal("é"),
			Err(GrammarFault::NonAsciiLiteral('é'))
		));
		// faults must not move the cursor either
		assert_eq!(matcher.cursor.position(), 0);
	}
}
