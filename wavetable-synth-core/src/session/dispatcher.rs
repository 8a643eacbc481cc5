use std::io;
use std::sync::Arc;
use std::thread;

use crossbeam_channel::{bounded, unbounded, Receiver, Sender};

use crate::models::error::SynthError;
use crate::session::command::{CommandOutcome, SynthCommand};
use crate::traits::wavetable_synthesizer::WavetableSynthesizer;

type CommandResult = Result<CommandOutcome, SynthError>;

struct Job {
    command: SynthCommand,
    reply: Sender<CommandResult>,
}

/// Runs synthesizer commands on a dedicated worker thread.
///
/// Keeps blocking engine calls off the caller's thread (typically the UI
/// thread). A single worker drains the queue, so commands run in submission
/// order.
///
/// ```text
/// submit() ─▶ [unbounded queue] ─▶ "synth-commands" thread ─▶ WavetableSynthesizer
///    │                                      │
///    └──── CommandTicket ◀── reply (1) ─────┘
/// ```
pub struct CommandDispatcher {
    sender: Option<Sender<Job>>,
    worker: Option<thread::JoinHandle<()>>,
}

impl CommandDispatcher {
    pub fn spawn(synth: Arc<dyn WavetableSynthesizer>) -> io::Result<Self> {
        let (sender, receiver) = unbounded::<Job>();

        let worker = thread::Builder::new()
            .name("synth-commands".into())
            .spawn(move || {
                for job in receiver.iter() {
                    let result = job.command.apply(synth.as_ref());
                    if let Err(ref e) = result {
                        log::debug!("{} failed on worker: {}", job.command.name(), e);
                    }
                    // The submitter may have dropped its ticket.
                    let _ = job.reply.send(result);
                }
                log::debug!("Command worker drained, exiting");
            })?;

        Ok(Self {
            sender: Some(sender),
            worker: Some(worker),
        })
    }

    /// Queue `command` and return a ticket for its result.
    pub fn submit(&self, command: SynthCommand) -> Result<CommandTicket, SynthError> {
        let sender = self.sender.as_ref().ok_or(SynthError::DispatcherClosed)?;
        let (reply, receiver) = bounded(1);
        sender
            .send(Job { command, reply })
            .map_err(|_| SynthError::DispatcherClosed)?;
        Ok(CommandTicket { command, receiver })
    }

    /// Queue `command` and block until it ran.
    pub fn run(&self, command: SynthCommand) -> CommandResult {
        self.submit(command)?.wait()
    }

    pub fn is_running(&self) -> bool {
        self.sender.is_some()
    }

    /// Stop accepting commands, let queued ones finish, and join the worker.
    pub fn shutdown(&mut self) {
        // Dropping the only sender ends the worker loop once the queue drains.
        self.sender.take();
        if let Some(handle) = self.worker.take() {
            if handle.join().is_err() {
                log::error!("Synth command worker panicked");
            }
        }
    }
}

impl Drop for CommandDispatcher {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// Pending result of a submitted command.
pub struct CommandTicket {
    command: SynthCommand,
    receiver: Receiver<CommandResult>,
}

impl CommandTicket {
    pub fn command(&self) -> SynthCommand {
        self.command
    }

    /// Block until the command has run to completion.
    pub fn wait(self) -> CommandResult {
        self.receiver.recv().unwrap_or(Err(SynthError::DispatcherClosed))
    }

    /// The result, if the command already ran.
    pub fn try_result(&self) -> Option<CommandResult> {
        self.receiver.try_recv().ok()
    }
}
