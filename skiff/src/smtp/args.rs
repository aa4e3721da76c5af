use std::{
	fmt::{Display, Formatter},
	str::FromStr,
};

use thiserror::Error;

use super::grammar::{GrammarFault, Matcher};

/// A mailbox in angle brackets, the argument to MAIL and RCPT. The grammar
/// here has no null path and no source routes; a path is always
/// `<local-part@domain>`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Path {
	pub local_part: String,
	pub domain: String,
}

impl Path {
	pub fn new<S: Into<String>>(local_part: S, domain: S) -> Self {
		Self {
			local_part: local_part.into(),
			domain: domain.into(),
		}
	}

	/// The bare `local-part@domain`, without the brackets. Used as the
	/// recipient key when a message is handed to the store.
	pub fn mailbox(&self) -> String {
		format!("{}@{}", self.local_part, self.domain)
	}
}

impl Display for Path {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		write!(f, "<{}@{}>", self.local_part, self.domain)
	}
}

impl FromStr for Path {
	type Err = ParsePathError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		let mut matcher = Matcher::new(s);
		match matcher.bare_path() {
			Ok(Some(path)) => Ok(path),
			Ok(None) => Err(ParsePathError::InvalidSyntax),
			Err(fault) => Err(ParsePathError::Grammar(fault)),
		}
	}
}

/// The sender's path from MAIL FROM.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReversePath(pub Path);

/// A recipient's path from RCPT TO.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ForwardPath(pub Path);

impl ForwardPath {
	pub fn mailbox(&self) -> String {
		self.0.mailbox()
	}
}

impl Display for ReversePath {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}", self.0)
	}
}

impl Display for ForwardPath {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}", self.0)
	}
}

impl FromStr for ReversePath {
	type Err = ParsePathError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Ok(Self(s.parse()?))
	}
}

impl FromStr for ForwardPath {
	type Err = ParsePathError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Ok(Self(s.parse()?))
	}
}

#[derive(Error, Debug)]
pub enum ParsePathError {
	#[error("invalid path syntax")]
	InvalidSyntax,
	#[error(transparent)]
	Grammar(#[from] GrammarFault),
}
