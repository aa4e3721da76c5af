use std::io;

use crate::smtp::args::ForwardPath;

/// Where finalized messages go. The session calls [`MailStore::append`] once
/// per recipient when the terminating dot arrives, and any error comes
/// straight back out of the session untouched; retrying is the caller's
/// business, not ours.
pub trait MailStore {
	fn append(&mut self, recipient: &ForwardPath, body: &str) -> io::Result<()>;
}
