//! Chat notification adapter

pub mod slack;
pub mod traits;

pub use slack::SlackNotifier;
pub use traits::{Notifier, NullNotifier};
