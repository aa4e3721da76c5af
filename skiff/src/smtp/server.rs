use std::io;

use thiserror::Error;
use tracing::debug;

use crate::store::MailStore;

use super::{
	args::{ForwardPath, ReversePath},
	command::{Command, CommandKind},
	grammar::{self, GrammarFault, Matcher},
	message::Envelope,
	response::ReplyCode,
};

/// One mail conversation, fed a line at a time. A session lives as long as
/// the connection does and cycles back to expecting MAIL FROM after every
/// finished message, so it handles any number of messages in sequence.
pub struct Session<S: MailStore> {
	state: State,
	envelope: Envelope,
	store: S,
}

impl<S: MailStore> Session<S> {
	pub fn new(store: S) -> Self {
		Self {
			state: Default::default(),
			envelope: Envelope::new(),
			store,
		}
	}

	/// Process one full input line, terminator included. Returns the reply
	/// for the line, or None for interior mail data. An Err here is not a
	/// protocol error; it means the session itself broke (a grammar contract
	/// violation or a store failure) and should not be fed further lines.
	pub fn line(&mut self, line: &str) -> Result<Option<ReplyCode>, SessionError> {
		if self.state == State::LoadingData {
			return self.loading_data(line);
		}

		let mut matcher = Matcher::new(line);
		let kind = match matcher.recognize()? {
			Some(kind) => kind,
			None => {
				debug!("line did not start any known command");
				return Ok(Some(ReplyCode::UnrecognizedCommand));
			}
		};

		// An out-of-sequence command is rejected before its parameters are
		// even looked at, so a 503 always wins over the 501 those parameters
		// might have earned.
		if !self.state.permits(kind) {
			debug!(%kind, state = ?self.state, "command out of sequence");
			return Ok(Some(ReplyCode::BadCommandSequence));
		}

		match matcher.complete(kind)? {
			Some(command) => Ok(Some(self.run_command(command))),
			None => {
				debug!(%kind, "malformed parameters");
				Ok(Some(ReplyCode::InvalidParameters))
			}
		}
	}

	fn run_command(&mut self, command: Command) -> ReplyCode {
		match command {
			Command::Mail(reverse_path) => self.mail(reverse_path),
			Command::Rcpt(forward_path) => self.rcpt(forward_path),
			Command::Data => self.data(),
		}
	}

	fn mail(&mut self, reverse_path: ReversePath) -> ReplyCode {
		debug!(%reverse_path, "sender accepted");
		self.envelope.reverse_path = Some(reverse_path);
		self.state = State::ExpectingRcptTo;

		ReplyCode::Okay
	}

	fn rcpt(&mut self, forward_path: ForwardPath) -> ReplyCode {
		debug!(%forward_path, "recipient accepted");
		self.envelope.forward_paths.push(forward_path);
		self.state = State::ExpectingRcptToOrData;

		ReplyCode::Okay
	}

	fn data(&mut self) -> ReplyCode {
		self.state = State::LoadingData;

		ReplyCode::StartMailInput
	}

	fn loading_data(&mut self, line: &str) -> Result<Option<ReplyCode>, SessionError> {
		if grammar::is_data_end(line)? {
			return self.finalize().map(Some);
		}

		if !grammar::is_clean_body_line(line) {
			return Ok(Some(ReplyCode::InvalidParameters));
		}

		self.envelope.push_line(line);
		Ok(None)
	}

	/// The terminating dot arrived: hand the assembled message to the store,
	/// once per recipient, and start over.
	fn finalize(&mut self) -> Result<ReplyCode, SessionError> {
		let body = self.envelope.assemble();
		for forward_path in &self.envelope.forward_paths {
			self.store.append(forward_path, &body)?;
		}

		debug!(
			recipients = self.envelope.forward_paths.len(),
			"message finalized"
		);

		self.envelope.clear();
		self.state = State::ExpectingMailFrom;

		Ok(ReplyCode::Okay)
	}
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum State {
	ExpectingMailFrom,
	ExpectingRcptTo,
	ExpectingRcptToOrData,
	LoadingData,
}

impl State {
	fn permits(self, kind: CommandKind) -> bool {
		matches!(
			(self, kind),
			(State::ExpectingMailFrom, CommandKind::MailFrom)
				| (State::ExpectingRcptTo, CommandKind::RcptTo)
				| (State::ExpectingRcptToOrData, CommandKind::RcptTo)
				| (State::ExpectingRcptToOrData, CommandKind::Data)
		)
	}
}

impl Default for State {
	fn default() -> Self {
		Self::ExpectingMailFrom
	}
}

#[derive(Error, Debug)]
pub enum SessionError {
	#[error("grammar contract violated: {0}")]
	Grammar(#[from] GrammarFault),
	#[error("failed to store message: {0}")]
	Store(#[from] io::Error),
}
