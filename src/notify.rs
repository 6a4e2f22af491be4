//! Notification bus for property validation failures.
//!
//! The bus is an explicitly constructed instance passed by reference to
//! whichever component needs to publish or subscribe. Its lifecycle is owned
//! by the top-level application wiring; there is no module-level singleton
//! and no global state. Subscribers are invoked synchronously, in
//! subscription order, on the publishing thread.

use serde::{Deserialize, Serialize};

/// One validation notification: which node it concerns, the offending
/// property (if any), and the ordered failure descriptions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    /// Id of the node the failure belongs to.
    pub source: String,
    /// Property name within the node's bag, when the failure is
    /// property-scoped.
    pub property: Option<String>,
    /// Human-readable failure descriptions, in validation order.
    pub messages: Vec<String>,
}

type Subscriber = Box<dyn Fn(&Notification) + Send + Sync>;

/// Synchronous subscribe/publish bus.
#[derive(Default)]
pub struct NotificationBus {
    subscribers: Vec<Subscriber>,
}

impl NotificationBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self, subscriber: impl Fn(&Notification) + Send + Sync + 'static) {
        self.subscribers.push(Box::new(subscriber));
    }

    pub fn publish(&self, notification: &Notification) {
        for subscriber in &self.subscribers {
            subscriber(notification);
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }
}

impl std::fmt::Debug for NotificationBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NotificationBus")
            .field("subscribers", &self.subscribers.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    fn note(source: &str, property: &str, message: &str) -> Notification {
        Notification {
            source: source.to_string(),
            property: Some(property.to_string()),
            messages: vec![message.to_string()],
        }
    }

    #[test]
    fn delivers_to_all_subscribers_in_subscription_order() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let mut bus = NotificationBus::new();

        for tag in ["first", "second"] {
            let seen = Arc::clone(&seen);
            bus.subscribe(move |n| {
                seen.lock().unwrap().push((tag, n.clone()));
            });
        }

        bus.publish(&note("el-1", "text", "Required"));

        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 2);
        assert_eq!(seen[0].0, "first");
        assert_eq!(seen[1].0, "second");
        assert_eq!(seen[0].1.messages, vec!["Required"]);
    }

    #[test]
    fn publish_with_no_subscribers_is_a_no_op() {
        let bus = NotificationBus::new();
        bus.publish(&note("el-1", "text", "Required"));
        assert_eq!(bus.subscriber_count(), 0);
    }
}
