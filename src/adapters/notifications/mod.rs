//! Notification dispatcher adapters.

mod http_dispatcher;
mod recording;

pub use http_dispatcher::HttpNotificationDispatcher;
pub use recording::{LogNotificationDispatcher, RecordingNotificationDispatcher};
