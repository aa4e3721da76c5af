pub mod args;
mod command;
mod cursor;
mod grammar;
mod message;
mod response;
mod server;

pub use command::{Command, CommandKind};
pub use cursor::{Cursor, CursorFault};
pub use grammar::{GrammarFault, Matcher};
pub use message::Envelope;
pub use response::ReplyCode;
pub use server::{Session, SessionError};
