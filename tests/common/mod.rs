#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use async_trait::async_trait;
use rpc_stream_cancel::{Metadata, RpcStream, TransportError};
use tokio::sync::Notify;

pub fn setup_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::TRACE)
        .with_test_writer()
        .try_init();
}

#[derive(Clone, Debug, PartialEq)]
pub enum Call {
    Recv,
    Send(String),
    End,
    Cancel,
}

/// What the next `recv_message()` does.
pub enum Step {
    Message(&'static str),
    EndOfStream,
    Fail(&'static str),
    /// Never resolves.
    Block,
    /// Resolves with the message once the gate is opened.
    Gated(Arc<Notify>, &'static str),
}

/// Scripted stream that records every call made on it.
pub struct ScriptedStream {
    metadata: Metadata,
    script: Mutex<VecDeque<Step>>,
    calls: Mutex<Vec<Call>>,
    abandoned: AtomicUsize,
    reads: AtomicUsize,
    read_started: Notify,
    fail_sends: bool,
    fail_end: bool,
    fail_cancel: bool,
}

impl ScriptedStream {
    pub fn new(script: Vec<Step>) -> Arc<ScriptedStream> {
        Self::build(script, false, false, false)
    }

    pub fn failing_sends(script: Vec<Step>) -> Arc<ScriptedStream> {
        Self::build(script, true, false, false)
    }

    pub fn failing_end(script: Vec<Step>) -> Arc<ScriptedStream> {
        Self::build(script, false, true, false)
    }

    pub fn failing_cancel(script: Vec<Step>) -> Arc<ScriptedStream> {
        Self::build(script, false, false, true)
    }

    fn build(
        script: Vec<Step>,
        fail_sends: bool,
        fail_end: bool,
        fail_cancel: bool,
    ) -> Arc<ScriptedStream> {
        Arc::new(ScriptedStream {
            metadata: Metadata::from([("authorization".to_string(), "Bearer test".to_string())]),
            script: Mutex::new(script.into()),
            calls: Mutex::new(Vec::new()),
            abandoned: AtomicUsize::new(0),
            reads: AtomicUsize::new(0),
            read_started: Notify::new(),
            fail_sends,
            fail_end,
            fail_cancel,
        })
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn count(&self, call: &Call) -> usize {
        self.calls.lock().unwrap().iter().filter(|c| *c == call).count()
    }

    /// Reads dropped before they resolved.
    pub fn abandoned(&self) -> usize {
        self.abandoned.load(Ordering::SeqCst)
    }

    /// Wait until `n` reads have been issued.
    pub async fn wait_for_reads(&self, n: usize) {
        while self.reads.load(Ordering::SeqCst) < n {
            self.read_started.notified().await;
        }
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }
}

struct PendingRead<'a> {
    abandoned: &'a AtomicUsize,
    resolved: bool,
}

impl Drop for PendingRead<'_> {
    fn drop(&mut self) {
        if !self.resolved {
            self.abandoned.fetch_add(1, Ordering::SeqCst);
        }
    }
}

#[async_trait]
impl RpcStream for ScriptedStream {
    type Outbound = String;
    type Inbound = String;

    fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    async fn recv_message(&self) -> Result<Option<String>, TransportError> {
        self.record(Call::Recv);
        self.reads.fetch_add(1, Ordering::SeqCst);
        self.read_started.notify_one();

        let mut pending = PendingRead { abandoned: &self.abandoned, resolved: false };
        let step = self.script.lock().unwrap().pop_front().unwrap_or(Step::EndOfStream);
        let result = match step {
            Step::Message(m) => Ok(Some(m.to_string())),
            Step::EndOfStream => Ok(None),
            Step::Fail(reason) => Err(TransportError::new(reason)),
            Step::Block => std::future::pending().await,
            Step::Gated(gate, m) => {
                gate.notified().await;
                Ok(Some(m.to_string()))
            }
        };
        pending.resolved = true;
        result
    }

    async fn send_message(&self, message: String) -> Result<(), TransportError> {
        self.record(Call::Send(message));
        if self.fail_sends {
            return Err(TransportError::new("send failed"));
        }
        Ok(())
    }

    async fn end(&self) -> Result<(), TransportError> {
        self.record(Call::End);
        if self.fail_end {
            return Err(TransportError::new("end failed"));
        }
        Ok(())
    }

    async fn cancel(&self) -> Result<(), TransportError> {
        self.record(Call::Cancel);
        if self.fail_cancel {
            return Err(TransportError::new("cancel failed"));
        }
        Ok(())
    }
}
