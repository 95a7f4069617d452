mod telegram;

pub use telegram::{NotificationSink, SinkError, StdoutSink, TelegramSink};
