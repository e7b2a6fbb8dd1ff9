//! Customer notification through the messaging service.

mod sender;

pub use sender::{Notification, NotificationOutcome, NotificationSender};
