//! The triage desk: the async orchestrator that wires pipeline stages
//! together.
//!
//! Single logical thread of control. Oracle work runs in spawned tasks whose
//! results flow back in as events tagged with the call id (or capture epoch)
//! they were issued for, so a late reply can never pollute a newer call.

use std::sync::Arc;

use chrono::Utc;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::event::{Event, StateDelta};
use super::factory::CallRecordFactory;
use super::state::DashboardState;
use super::transcript::CaptureEpoch;
use crate::capture::CaptureEvent;
use crate::classify::Classifier;
use crate::oracle::Oracle;
use crate::records::CallId;
use crate::responders::{Responder, ResponderSet};

const EVENT_CHANNEL_CAPACITY: usize = 100;

pub struct TriageDesk {
    pub state: DashboardState,
    classifier: Classifier,
    responders: ResponderSet,
    factory: CallRecordFactory,
    tx: mpsc::Sender<Event>,
    receiver: mpsc::Receiver<Event>,
}

impl TriageDesk {
    pub fn new(oracle: Arc<dyn Oracle>) -> Self {
        Self::with_state(oracle, DashboardState::new())
    }

    /// Start from restored state (e.g. a persisted snapshot).
    pub fn with_state(oracle: Arc<dyn Oracle>, state: DashboardState) -> Self {
        let (tx, receiver) = mpsc::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            state,
            classifier: Classifier::new(oracle.clone()),
            responders: ResponderSet::new(oracle),
            factory: CallRecordFactory::new(),
            tx,
            receiver,
        }
    }

    /// Handle for external sources: capture engines, UI actions.
    pub fn sender(&self) -> mpsc::Sender<Event> {
        self.tx.clone()
    }

    pub async fn handle(&mut self, event: Event) {
        match event {
            Event::Capture(CaptureEvent::Fragment { speaker, text }) => {
                if self.state.listening {
                    self.state.reduce(StateDelta::LineAppended { speaker, text });
                } else {
                    debug!("fragment ignored, not listening");
                }
            }
            Event::Capture(CaptureEvent::Ended) => {
                // Stop listening; captured lines are kept.
                self.state.reduce(StateDelta::ListeningChanged(false));
            }
            Event::Capture(CaptureEvent::Failed(reason)) => {
                warn!(%reason, "capture source failed");
                self.state.reduce(StateDelta::ListeningChanged(false));
            }
            Event::SetListening(listening) => {
                self.state.reduce(StateDelta::ListeningChanged(listening));
            }
            Event::EndCall => {
                if self.state.live.is_empty() {
                    debug!("end-call ignored, buffer is empty");
                } else {
                    self.end_call().await;
                }
            }
            Event::RequestFurtherQuestions => {
                self.request_live_questions();
            }
            Event::MarkDangerous => {
                self.state.reduce(StateDelta::ManualDangerMark);
            }
            Event::Dispatch { id } => {
                self.state.reduce(StateDelta::Dispatched { id, at: Utc::now() });
            }
            Event::SetView(view) => {
                self.state.reduce(StateDelta::ViewChanged(view));
            }
            Event::GuidanceReady { id, kind, items } => {
                self.state.reduce(StateDelta::GuidanceReady { id, kind, items });
            }
            Event::LiveQuestionsReady { epoch, items } => {
                self.state
                    .reduce(StateDelta::LiveQuestionsReady { epoch, items });
            }
        }
    }

    /// End-call sequence: freeze, classify (bounded by the client timeout),
    /// finalize into the stores, clear the buffer, then fire the best-effort
    /// guidance generators.
    async fn end_call(&mut self) {
        self.state.reduce(StateDelta::ListeningChanged(false));
        self.state.reduce(StateDelta::CallFrozen);

        // Freeze before any oracle call is issued.
        let frozen = self.state.live.freeze();
        let text = frozen.text();

        let classification = self.classifier.classify(&text).await;
        let (record, entry) = self.factory.finalize(frozen, &classification, Utc::now());
        let id = record.id.clone();
        info!(
            %id,
            level = %classification.level,
            source = ?classification.source,
            "call finalized"
        );

        let banner = format!("AI Analysis: Danger Level: {}", classification.level);
        self.state.reduce(StateDelta::CallFinalized {
            record,
            entry,
            banner,
        });

        // Guidance never blocks the next call.
        self.spawn_guidance(self.responders.comforting.clone(), id.clone(), text.clone());
        self.spawn_guidance(self.responders.details.clone(), id, text);
    }

    fn spawn_guidance(&self, responder: Responder, id: CallId, text: String) {
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let kind = responder.kind();
            let items = responder.generate(&text).await;
            let _ = tx.send(Event::GuidanceReady { id, kind, items }).await;
        });
    }

    /// Mid-call further questions against a frozen copy of the live buffer.
    /// The reply is tagged with the capture epoch and discarded if a new call
    /// has started by the time it lands.
    fn request_live_questions(&self) {
        if self.state.live.is_empty() {
            debug!("further questions ignored, buffer is empty");
            return;
        }
        let frozen = self.state.live.freeze();
        let epoch: CaptureEpoch = frozen.epoch;
        let text = frozen.text();
        let responder = self.responders.further.clone();
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let items = responder.generate(&text).await;
            let _ = tx.send(Event::LiveQuestionsReady { epoch, items }).await;
        });
    }

    /// Process queued events (capture fragments, spawned guidance results)
    /// for up to `window`, then return.
    pub async fn drain_for(&mut self, window: std::time::Duration) {
        let deadline = tokio::time::Instant::now() + window;
        loop {
            match tokio::time::timeout_at(deadline, self.receiver.recv()).await {
                Ok(Some(event)) => self.handle(event).await,
                Ok(None) | Err(_) => break,
            }
        }
    }

    /// Event loop driver. Runs until cancelled, then hands back the final
    /// state.
    pub async fn run(mut self, cancel: CancellationToken) -> DashboardState {
        info!("triage desk running");
        loop {
            tokio::select! {
                _ = cancel.cancelled() => break,
                event = self.receiver.recv() => match event {
                    Some(event) => self.handle(event).await,
                    None => break,
                },
            }
        }
        self.state
    }
}
