use std::fmt::{Display, Formatter};

/// Every reply this server can send, one per processed line. Interior mail
/// data produces no reply at all, which is represented by the server handing
/// back `None` rather than by a variant here.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReplyCode {
	Okay,                // 250
	StartMailInput,      // 354
	UnrecognizedCommand, // 500
	InvalidParameters,   // 501
	BadCommandSequence,  // 503
}

impl ReplyCode {
	pub fn as_code(&self) -> u16 {
		match self {
			ReplyCode::Okay => 250,
			ReplyCode::StartMailInput => 354,
			ReplyCode::UnrecognizedCommand => 500,
			ReplyCode::InvalidParameters => 501,
			ReplyCode::BadCommandSequence => 503,
		}
	}

	fn message(&self) -> &'static str {
		match self {
			ReplyCode::Okay => "OK",
			ReplyCode::StartMailInput => "Start mail input; end with <CRLF>.<CRLF>",
			ReplyCode::UnrecognizedCommand => "Syntax error, command unrecognized",
			ReplyCode::InvalidParameters => "Syntax error in parameters or arguments",
			ReplyCode::BadCommandSequence => "Bad sequence of commands",
		}
	}
}

impl Display for ReplyCode {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		write!(f, "{} {}", self.as_code(), self.message())
	}
}
