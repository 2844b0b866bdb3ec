//! Ready-made event subscribers.

mod channel;
mod log;

pub use channel::ChannelSubscriber;
pub use log::LogSubscriber;
