//! The prediction form controller.
//!
//! Owns the single [`FormState`] of a session inside a `watch` channel. Field edits and
//! submission steps each replace that value in one step, and any number of renderers can
//! subscribe to see every transition.

use crate::client::PredictionClient;
use crate::prediction::{DebugReport, Prediction};
use crate::record::{coerce_number, ClinicalRecord, Field};
use crate::state::FormState;
use crate::{FormResult, PredictError, PredictResult};
use tokio::sync::watch;

/// How a call to [`FormController::submit`] ended.
#[derive(Clone, Debug, PartialEq)]
pub enum SubmitOutcome {
    Succeeded(Prediction),
    /// The attempt failed; carries the message now shown in the form.
    Failed(String),
    /// Another submission was still in flight, so nothing was sent.
    AlreadyInFlight,
}

pub struct FormController<C> {
    client: C,
    state: watch::Sender<FormState>,
}

impl<C: PredictionClient> FormController<C> {
    /// Create a controller holding the default record.
    pub fn new(client: C) -> Self {
        let initial = FormState::default();
        for field in initial.record.off_table_fields() {
            tracing::warn!(
                "default {} = {} is not in its option table",
                field,
                initial.record.get(field)
            );
        }

        Self {
            client,
            state: watch::Sender::new(initial),
        }
    }

    /// Snapshot of the current state.
    pub fn state(&self) -> FormState {
        self.state.borrow().clone()
    }

    /// Receiver that observes every state transition.
    pub fn subscribe(&self) -> watch::Receiver<FormState> {
        self.state.subscribe()
    }

    /// Coerce `raw` and store it in `field`, leaving every other field as it was.
    ///
    /// Unparseable input is stored as `NaN`; it is only rejected when submitted.
    pub fn update_field(&self, field: Field, raw: &str) {
        let value = coerce_number(raw);
        tracing::debug!("update {} = {}", field, value);
        self.transition(|state| state.with_field(field, value));
    }

    /// Same as [`update_field`](Self::update_field) for a field named by its wire key.
    pub fn update_field_by_name(&self, name: &str, raw: &str) -> FormResult<Field> {
        let field: Field = name.parse()?;
        self.update_field(field, raw);
        Ok(field)
    }

    /// Send the current record for classification.
    ///
    /// Sets `loading` and clears the error before anything is sent, and always clears
    /// `loading` again afterwards, including when this future is dropped mid-request. A call
    /// made while another submission is pending is refused without sending anything.
    pub async fn submit(&self) -> SubmitOutcome {
        let Some(record) = self.try_begin() else {
            tracing::warn!("submission ignored: a prediction request is already in flight");
            return SubmitOutcome::AlreadyInFlight;
        };

        let mut guard = LoadingGuard {
            state: &self.state,
            armed: true,
        };

        tracing::info!("submitting clinical record for prediction");
        let outcome = self.request(&record).await;
        guard.armed = false;
        self.transition(|state| state.settle(&outcome));

        match outcome {
            Ok(prediction) => {
                tracing::info!("prediction received: {}", prediction.label());
                SubmitOutcome::Succeeded(prediction)
            }
            Err(err) => {
                let message = err.display_message();
                tracing::warn!("prediction failed: {}", message);
                SubmitOutcome::Failed(message)
            }
        }
    }

    /// Ask the service to explain its classification of the current record.
    ///
    /// Leaves the form state untouched.
    pub async fn explain(&self) -> PredictResult<DebugReport> {
        let record = self.state.borrow().record;
        let body = record.to_request()?;
        self.client.explain(&body).await
    }

    async fn request(&self, record: &ClinicalRecord) -> Result<Prediction, PredictError> {
        let body = record.to_request()?;
        self.client.predict(&body).await
    }

    /// Atomically enter the loading state, returning the record to send.
    fn try_begin(&self) -> Option<ClinicalRecord> {
        let mut snapshot = None;
        self.state.send_if_modified(|state| {
            if state.loading {
                return false;
            }
            snapshot = Some(state.record);
            *state = std::mem::take(state).begin_submission();
            true
        });
        snapshot
    }

    fn transition(&self, f: impl FnOnce(FormState) -> FormState) {
        self.state.send_modify(|state| *state = f(std::mem::take(state)));
    }
}

/// Clears `loading` if a submission is abandoned before it settles.
struct LoadingGuard<'a> {
    state: &'a watch::Sender<FormState>,
    armed: bool,
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        if self.armed {
            tracing::warn!("prediction request dropped before completion");
            self.state.send_modify(|state| state.loading = false);
        }
    }
}
