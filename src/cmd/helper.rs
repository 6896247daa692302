use std::sync::mpsc::Sender;
use log::debug;
use serde_json::{json, Value};
use tokio::sync::mpsc::{self, UnboundedSender};

use crate::cmd::Message;

pub const NOTIFICATION_TEST: &str = "SOLAR_MONITOR-NOTIFICATION_TEST";

#[derive(Debug, Clone, PartialEq)]
pub struct Notification {
    pub name: String,
    pub payload: Value,
}

/// Request side of the echo helper.
#[derive(Clone)]
pub struct HelperHandle {
    tx: UnboundedSender<Notification>,
}

impl HelperHandle {
    pub fn notify(&self, name: &str, payload: Value) {
        let notification = Notification { name: name.to_string(), payload };
        if self.tx.send(notification).is_err() {
            debug!("Helper task is gone, dropping notification {name}");
        }
    }
}

/// Answers every known notification with an empty object on the app channel.
pub fn spawn_helper(app_tx: Sender<Message>) -> HelperHandle {
    let (tx, mut rx) = mpsc::unbounded_channel::<Notification>();
    tokio::spawn(async move {
        while let Some(notification) = rx.recv().await {
            if notification.name != NOTIFICATION_TEST {
                debug!("Unknown notification {}", notification.name);
                continue;
            }
            let reply = Notification { name: notification.name, payload: json!({}) };
            if app_tx.send(Message::Notification(reply)).is_err() {
                break;
            }
        }
    });
    HelperHandle { tx }
}
