use crossterm::event::{self, KeyEvent, KeyEventKind};
use std::time::Duration;
use tokio::sync::mpsc;

#[derive(Debug)]
pub enum Event {
    Key(KeyEvent),
    Paste(String),
    Resize,
    Tick,
}

/// Terminal input pump. A dedicated thread blocks on crossterm and forwards
/// key presses, pastes and resizes, emitting `Tick` whenever `tick_rate`
/// passes without input.
pub struct EventHandler {
    rx: mpsc::UnboundedReceiver<Event>,
    _tx: mpsc::UnboundedSender<Event>,
}

impl EventHandler {
    pub fn new(tick_rate: Duration) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let event_tx = tx.clone();

        std::thread::spawn(move || {
            loop {
                let next = if event::poll(tick_rate).unwrap_or(false) {
                    match event::read() {
                        // Release and repeat events would double every keystroke on Windows
                        Ok(event::Event::Key(key)) if key.kind == KeyEventKind::Press => Some(Event::Key(key)),
                        Ok(event::Event::Paste(text)) => Some(Event::Paste(text)),
                        Ok(event::Event::Resize(_, _)) => Some(Event::Resize),
                        _ => None,
                    }
                } else {
                    Some(Event::Tick)
                };

                if let Some(event) = next {
                    if event_tx.send(event).is_err() {
                        break;
                    }
                }
            }
        });

        Self { rx, _tx: tx }
    }

    pub async fn next(&mut self) -> Option<Event> {
        self.rx.recv().await
    }
}
