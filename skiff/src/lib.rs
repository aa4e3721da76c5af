pub mod smtp;
pub mod store;

pub use store::MailStore;
