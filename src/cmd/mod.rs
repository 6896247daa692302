pub mod fetch;
pub mod helper;
pub mod poll_state;
pub mod telemetry;

use std::{sync::mpsc::Sender, time::Duration};
use log::{error, info, warn};
use tokio::task::JoinHandle;

use crate::{
    cmd::{
        fetch::TelemetrySource,
        helper::{HelperHandle, Notification, NOTIFICATION_TEST},
        poll_state::{PollEvent, PollState, PollTiming},
        telemetry::Telemetry,
    },
    error::FetchError,
};

#[derive(Debug)]
pub enum Message {
    Telemetry(Telemetry),
    FetchFailed(String),
    /// The server answered 401, polling has stopped.
    AuthFailed,
    Notification(Notification),
}

/// Polls `source` until the server refuses us or the app hangs up.
/// The first fetch happens right away.
pub fn spawn_poller(
    source: TelemetrySource,
    timing: PollTiming,
    tx: Sender<Message>,
    helper: HelperHandle,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut state = PollState::Idle;
        let mut delay = Duration::ZERO;
        loop {
            tokio::time::sleep(delay).await;
            state = state.on(PollEvent::TimerFire, &timing).state;

            let (event, message) = match source.fetch().await {
                Ok(telemetry) => {
                    match serde_json::to_value(telemetry) {
                        Ok(payload) => helper.notify(NOTIFICATION_TEST, payload),
                        Err(err) => warn!("Could not encode notification: {}", err),
                    }
                    (PollEvent::Success, Message::Telemetry(telemetry))
                }
                Err(FetchError::Unauthorized) => {
                    error!("Inverter server answered 401, polling stopped");
                    (PollEvent::AuthFailure, Message::AuthFailed)
                }
                Err(err) => {
                    warn!("Could not load data: {}", err);
                    (PollEvent::OtherFailure, Message::FetchFailed(err.to_string()))
                }
            };
            if tx.send(message).is_err() {
                info!("App channel closed, poller exiting");
                break;
            }

            let transition = state.on(event, &timing);
            state = transition.state;
            match transition.next_fire {
                Some(next) => delay = next,
                None => break,
            }
        }
    })
}
