//! Consumer side of a build: drains the render queue on a timer tick and
//! decides when the build is over.

use crate::BuildError;
use crate::pump::{PumpReport, StreamPump};
use crate::queue::{EventReceiver, event_queue};
use pioview_log::RenderEvent;
use std::io::{self, BufReader, Read};
use std::thread::{self, JoinHandle};
use std::time::Duration;

/// What the producer thread hands back when it exits.
pub type BuildOutcome = Result<PumpReport, BuildError>;

/// Destination for render events, e.g. a terminal or a saved transcript.
pub trait EventSink {
    fn write_event(&mut self, event: &RenderEvent) -> io::Result<()>;

    /// Called whenever the queue runs dry.
    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl EventSink for Vec<RenderEvent> {
    fn write_event(&mut self, event: &RenderEvent) -> io::Result<()> {
        self.push(event.clone());
        Ok(())
    }
}

/// Result of one [`BuildMonitor::tick`].
#[derive(Debug)]
pub enum Tick {
    Event(RenderEvent),
    /// Nothing queued; the producer may still be running.
    Idle,
    /// Producer exited and every event it pushed has been handed out.
    /// Returned exactly once.
    Completed(BuildOutcome),
}

/// Watches one producer thread and the queue it fills.
pub struct BuildMonitor {
    receiver: EventReceiver,
    producer: Option<JoinHandle<BuildOutcome>>,
    complete: bool,
}

impl BuildMonitor {
    pub fn new(receiver: EventReceiver, producer: JoinHandle<BuildOutcome>) -> Self {
        Self {
            receiver,
            producer: Some(producer),
            complete: false,
        }
    }

    /// Hands out the next queued event, or reports completion.
    ///
    /// Completion requires both an exited producer and an empty queue. The
    /// producer is checked before the queue, so an event pushed just before the
    /// producer exits is never missed.
    pub fn tick(&mut self) -> Tick {
        if self.complete {
            return Tick::Idle;
        }
        let producer_done = self
            .producer
            .as_ref()
            .is_none_or(|handle| handle.is_finished());

        if let Some(event) = self.receiver.pop_nonblocking() {
            return Tick::Event(event);
        }
        if !producer_done {
            return Tick::Idle;
        }

        self.complete = true;
        let outcome = match self.producer.take() {
            Some(handle) => handle.join().unwrap_or(Err(BuildError::ProducerPanicked)),
            None => Ok(PumpReport::default()),
        };
        Tick::Completed(outcome)
    }

    pub fn is_complete(&self) -> bool {
        self.complete
    }

    /// Feeds `sink` until the build completes, sleeping `poll_interval`
    /// whenever the queue is empty.
    pub fn run_to_completion(
        mut self,
        sink: &mut dyn EventSink,
        poll_interval: Duration,
    ) -> BuildOutcome {
        loop {
            match self.tick() {
                Tick::Event(event) => sink.write_event(&event).map_err(BuildError::Sink)?,
                Tick::Idle => {
                    sink.flush().map_err(BuildError::Sink)?;
                    thread::sleep(poll_interval);
                }
                Tick::Completed(outcome) => {
                    sink.flush().map_err(BuildError::Sink)?;
                    return outcome;
                }
            }
        }
    }
}

/// Pumps an arbitrary byte stream (a pipe, a saved log) on a worker thread.
pub fn pump_stream<R>(reader: R) -> Result<BuildMonitor, BuildError>
where
    R: Read + Send + 'static,
{
    let (sender, receiver) = event_queue();
    let producer = thread::Builder::new()
        .name("pioview-pump".into())
        .spawn(move || {
            StreamPump::new(BufReader::new(reader), sender)
                .run()
                .map_err(BuildError::from)
        })
        .map_err(BuildError::Thread)?;
    Ok(BuildMonitor::new(receiver, producer))
}
