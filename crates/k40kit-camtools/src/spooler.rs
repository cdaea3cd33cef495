//! Job spooler
//!
//! FIFO queue of laser operations waiting to be streamed to an interpreter.

use crate::error::{OperationError, OperationResult};
use crate::operation::{LaserOperation, OperationType};
use k40kit_core::{Interpreter, RealtimeCommand};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use uuid::Uuid;

/// Status of the job currently being streamed.
pub const STATUS_RUNNING: &str = "Running";

/// A queued operation and its identifier.
#[derive(Debug, Clone)]
pub struct SpoolerJob {
    pub id: Uuid,
    pub operation: LaserOperation,
}

/// One display row of the spooler queue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobSummary {
    pub index: usize,
    pub id: Uuid,
    pub kind: OperationType,
    pub status: String,
    pub speed: f64,
    pub settings: String,
    pub estimate: String,
}

#[derive(Debug, Default)]
pub struct Spooler {
    queue: VecDeque<SpoolerJob>,
}

impl Spooler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a job and return its id.
    pub fn send_job(&mut self, operation: LaserOperation) -> Uuid {
        let id = Uuid::new_v4();
        tracing::debug!("Spooling job {}: {}", id, operation);
        self.queue.push_back(SpoolerJob { id, operation });
        id
    }

    pub fn clear_queue(&mut self) {
        tracing::debug!("Clearing {} spooled jobs", self.queue.len());
        self.queue.clear();
    }

    /// Remove the job at `index`.
    pub fn remove_job(&mut self, index: usize) -> OperationResult<SpoolerJob> {
        let len = self.queue.len();
        self.queue
            .remove(index)
            .ok_or(OperationError::JobNotFound { index, len })
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn jobs(&self) -> impl Iterator<Item = &SpoolerJob> {
        self.queue.iter()
    }

    pub fn summary(&self) -> Vec<JobSummary> {
        self.queue
            .iter()
            .enumerate()
            .map(|(index, job)| JobSummary {
                index,
                id: job.id,
                kind: job.operation.op_type(),
                status: job.operation.status().to_string(),
                speed: job.operation.speed(),
                settings: job.operation.to_string(),
                estimate: job.operation.time_estimate(),
            })
            .collect()
    }

    /// Stream the front job into `interpreter`.
    ///
    /// Returns the number of commands sent.
    pub fn run_next(&mut self, interpreter: &mut dyn Interpreter) -> OperationResult<usize> {
        let mut job = self.queue.pop_front().ok_or(OperationError::EmptyQueue)?;
        job.operation.set_status(STATUS_RUNNING);
        tracing::info!("Running job {}: {}", job.id, job.operation);

        let mut sent = 0;
        for command in job.operation.generate() {
            interpreter.command(command);
            sent += 1;
        }
        tracing::debug!("Job {} sent {} commands", job.id, sent);
        Ok(sent)
    }

    /// Forward a realtime signal straight to the interpreter.
    pub fn realtime(&self, interpreter: &mut dyn Interpreter, command: RealtimeCommand) {
        tracing::info!("Realtime {}", command);
        interpreter.realtime_command(command);
    }

    pub fn emergency_stop(&self, interpreter: &mut dyn Interpreter) {
        self.realtime(interpreter, RealtimeCommand::Reset);
    }
}
