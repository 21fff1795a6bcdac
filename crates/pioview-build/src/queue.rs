use crossbeam_channel::{Receiver, Sender, TryRecvError, unbounded};
use pioview_log::RenderEvent;

/// Creates an unbounded FIFO of render events for one producer and one consumer.
pub fn event_queue() -> (EventSender, EventReceiver) {
    let (tx, rx) = unbounded();
    (EventSender { tx }, EventReceiver { rx })
}

/// Producer half of the render queue.
#[derive(Debug, Clone)]
pub struct EventSender {
    tx: Sender<RenderEvent>,
}

impl EventSender {
    /// Enqueues an event. Never blocks.
    pub fn push(&self, event: RenderEvent) {
        if self.tx.send(event).is_err() {
            // Only happens once the viewer has gone away.
            log::trace!("render queue closed, dropping event");
        }
    }

    pub fn push_all(&self, events: impl IntoIterator<Item = RenderEvent>) {
        for event in events {
            self.push(event);
        }
    }
}

/// Consumer half of the render queue.
#[derive(Debug)]
pub struct EventReceiver {
    rx: Receiver<RenderEvent>,
}

impl EventReceiver {
    /// Returns the next event in enqueue order, or `None` if nothing is queued
    /// right now.
    pub fn pop_nonblocking(&self) -> Option<RenderEvent> {
        match self.rx.try_recv() {
            Ok(event) => Some(event),
            Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.rx.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rx.len()
    }
}
