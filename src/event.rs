use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;
use std::time::Duration;

use crossterm::event::{self, Event, KeyEvent, KeyEventKind};

#[derive(Debug)]
pub enum TermEvent {
    Key(KeyEvent),
    /// No input within one tick; used to redraw the running timer.
    Tick,
    Resize,
}

/// Reads crossterm events on a background thread and forwards them over a
/// channel. The thread exits once the receiver is dropped.
pub struct EventPump {
    rx: Receiver<TermEvent>,
}

impl EventPump {
    pub fn spawn(tick_rate: Duration) -> Self {
        let (tx, rx) = mpsc::channel();
        thread::spawn(move || pump(&tx, tick_rate));
        Self { rx }
    }

    pub fn next(&self) -> anyhow::Result<TermEvent> {
        Ok(self.rx.recv()?)
    }
}

fn pump(tx: &Sender<TermEvent>, tick_rate: Duration) {
    loop {
        let forwarded = if event::poll(tick_rate).unwrap_or(false) {
            match event::read() {
                // release and repeat events would double-enter digits
                Ok(Event::Key(key)) if key.kind == KeyEventKind::Press => {
                    Some(TermEvent::Key(key))
                }
                Ok(Event::Resize(..)) => Some(TermEvent::Resize),
                _ => None,
            }
        } else {
            Some(TermEvent::Tick)
        };
        if let Some(ev) = forwarded
            && tx.send(ev).is_err()
        {
            return;
        }
    }
}
