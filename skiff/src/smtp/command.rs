use std::fmt::{Display, Formatter};

use super::args::{ForwardPath, ReversePath};

/// Which command a line's fixed tokens identify, before its parameters have
/// been looked at. The server needs this early so it can reject a command
/// that's out of sequence without parsing parameters it would throw away.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CommandKind {
	MailFrom,
	RcptTo,
	Data,
}

impl Display for CommandKind {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		match self {
			CommandKind::MailFrom => write!(f, "MAIL FROM"),
			CommandKind::RcptTo => write!(f, "RCPT TO"),
			CommandKind::Data => write!(f, "DATA"),
		}
	}
}

/// A fully parsed command, parameters included.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
	Mail(ReversePath),
	Rcpt(ForwardPath),
	Data,
}

impl Display for Command {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		match self {
			Command::Mail(reverse_path) => write!(f, "MAIL FROM:{}", reverse_path),
			Command::Rcpt(forward_path) => write!(f, "RCPT TO:{}", forward_path),
			Command::Data => write!(f, "DATA"),
		}
	}
}
