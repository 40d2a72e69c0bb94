//! Left-click listener polling the global pointer state

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use device_query::{DeviceQuery, DeviceState, MouseState};
use tokio::sync::mpsc;

use crate::domain::session::ClickEvent;

/// Pointer poll interval (60Hz)
const POLL_INTERVAL: Duration = Duration::from_millis(16);

/// device_query numbers buttons from 1
const LEFT_BUTTON: usize = 1;

/// Streams left-button presses, timestamped from when the listener started.
///
/// Polling runs on its own thread and stops once the listener is dropped.
/// Without access to the pointer (no display server, no accessibility
/// grant) the stream ends right away.
pub struct ClickListener {
    clicks: mpsc::UnboundedReceiver<ClickEvent>,
    stop: Arc<AtomicBool>,
}

impl ClickListener {
    /// Start listening; call this when the recording starts
    pub fn spawn() -> Self {
        let started = Instant::now();
        let (tx, clicks) = mpsc::unbounded_channel();
        let stop = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&stop);

        let spawned = thread::Builder::new()
            .name("click-listener".to_string())
            .spawn(move || poll(started, tx, flag));
        if let Err(e) = spawned {
            tracing::warn!(error = %e, "failed to start click listener");
        }

        Self { clicks, stop }
    }

    /// Next click, or `None` once the listener is gone
    pub async fn next(&mut self) -> Option<ClickEvent> {
        self.clicks.recv().await
    }
}

impl Drop for ClickListener {
    fn drop(&mut self) {
        self.stop.store(true, Ordering::SeqCst);
    }
}

#[cfg(any(target_os = "linux", target_os = "macos"))]
fn device_state() -> Option<DeviceState> {
    DeviceState::checked_new()
}

#[cfg(not(any(target_os = "linux", target_os = "macos")))]
fn device_state() -> Option<DeviceState> {
    Some(DeviceState::new())
}

fn poll(started: Instant, tx: mpsc::UnboundedSender<ClickEvent>, stop: Arc<AtomicBool>) {
    let Some(device) = device_state() else {
        tracing::warn!("pointer state unavailable, clicks will not be recorded");
        return;
    };

    let mut last = device.get_mouse();
    while !stop.load(Ordering::SeqCst) {
        thread::sleep(POLL_INTERVAL);
        let mouse = device.get_mouse();

        if let Some(click) = left_press(&last, &mouse, started.elapsed()) {
            tracing::debug!(x = click.x, y = click.y, ms = click.timestamp_ms, "click");
            if tx.send(click).is_err() {
                break;
            }
        }
        last = mouse;
    }
    tracing::debug!("click listener stopped");
}

/// The click made between two samples, if the left button went down
fn left_press(prev: &MouseState, now: &MouseState, since_start: Duration) -> Option<ClickEvent> {
    let was_down = prev.button_pressed.get(LEFT_BUTTON).copied().unwrap_or(false);
    let is_down = now.button_pressed.get(LEFT_BUTTON).copied().unwrap_or(false);
    if was_down || !is_down {
        return None;
    }

    let (x, y) = now.coords;
    let timestamp_ms = u64::try_from(since_start.as_millis()).unwrap_or(u64::MAX);
    Some(ClickEvent::new(f64::from(x), f64::from(y), timestamp_ms))
}
