pub mod client;
pub mod notifier;

pub use client::{AutomationClient, AutomationError, AutomationReply};
pub use notifier::ChannelNotifier;
