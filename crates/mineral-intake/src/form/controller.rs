//! The form lifecycle state machine.
//!
//! ```text
//! Empty -> Editing -> Submitting -> NavigatedAway
//!                        |
//!                        v
//!              EditingWithError -> Editing | Submitting
//! ```
//!
//! Submission can be driven in one call ([`AssetForm::submit`]) or in two
//! halves ([`AssetForm::begin_submit`] / [`AssetForm::complete_submit`]) when
//! the caller owns the transport. Either way a second submit while one is in
//! flight does nothing.

use tracing::{debug, info, warn};

use crate::catalog::Catalog;
use crate::config::IntakeConfig;
use crate::error::{IntakeError, SubmitError};
use crate::form::{build_payload_batch, Field, FormPhase, FormState, TypeResolver};
use crate::model::{AssetRecord, PayloadBatch};
use crate::service::{record_path, RecordFetcher, TransactionSubmitter};
use crate::validate::validate_batch;

/// Result of a submit request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// The batch was accepted; the route of the new asset's page.
    Navigated(String),
    /// A submission was already in flight; nothing was sent.
    AlreadySubmitting,
}

/// One instance of the asset intake form.
#[derive(Debug)]
pub struct AssetForm<'c> {
    catalog: &'c Catalog,
    config: IntakeConfig,
    state: FormState,
    phase: FormPhase,
    last_error: Option<IntakeError>,
}

impl<'c> AssetForm<'c> {
    pub fn new(catalog: &'c Catalog, config: IntakeConfig) -> Self {
        Self {
            catalog,
            config,
            state: FormState::new(),
            phase: FormPhase::Empty,
            last_error: None,
        }
    }

    pub fn phase(&self) -> FormPhase {
        self.phase
    }

    pub fn state(&self) -> &FormState {
        &self.state
    }

    /// The most recent fetch, validation or submission error, if any.
    pub fn last_error(&self) -> Option<&IntakeError> {
        self.last_error.as_ref()
    }

    /// Loads the parent record when `parent_id` is given.
    ///
    /// A failed fetch is recorded and returned; the form stays usable as a
    /// parentless form.
    pub async fn init<F>(&mut self, fetcher: &F, parent_id: Option<&str>) -> Result<(), IntakeError>
    where
        F: RecordFetcher + ?Sized,
    {
        let Some(parent_id) = parent_id else {
            return Ok(());
        };
        let path = record_path(parent_id);
        match fetcher.get(&path).await {
            Ok(record) => {
                self.attach_parent(record);
                Ok(())
            }
            Err(e) => {
                warn!(%path, error = %e, "parent fetch failed");
                let err = IntakeError::from(e);
                self.last_error = Some(err.clone());
                Err(err)
            }
        }
    }

    /// Attaches a fetched record as the parent container.
    pub fn attach_parent(&mut self, record: AssetRecord) {
        info!(parent = %record.record_id, properties = record.properties.len(), "attached parent record");
        self.state.parent = Some(record.into());
    }

    /// Runs the resolver: mirrors inherited fields and returns the types the
    /// user may pick.
    pub fn selectable_types(&mut self) -> Vec<&'c str> {
        TypeResolver::new(self.catalog).resolve(&mut self.state)
    }

    /// Edits one field.
    pub fn set_field(&mut self, field: Field, value: impl Into<String>) -> Result<(), IntakeError> {
        match self.phase {
            FormPhase::Submitting | FormPhase::NavigatedAway => {
                Err(IntakeError::FormLocked { phase: self.phase })
            }
            FormPhase::Empty | FormPhase::Editing | FormPhase::EditingWithError => {
                self.state.set(field, value);
                self.phase = FormPhase::Editing;
                Ok(())
            }
        }
    }

    /// Validates the form and builds its batch, entering `Submitting`.
    ///
    /// Returns `Ok(None)` when a submission is already in flight.
    pub fn begin_submit(&mut self) -> Result<Option<PayloadBatch>, IntakeError> {
        match self.phase {
            FormPhase::Submitting => {
                debug!(record_id = %self.state.id, "submit ignored, already submitting");
                return Ok(None);
            }
            FormPhase::NavigatedAway => return Err(IntakeError::FormLocked { phase: self.phase }),
            FormPhase::Empty | FormPhase::Editing | FormPhase::EditingWithError => {}
        }

        match self.prepare_batch() {
            Ok(batch) => {
                info!(record_id = %self.state.id, payloads = batch.len(), "submitting");
                self.phase = FormPhase::Submitting;
                self.last_error = None;
                Ok(Some(batch))
            }
            Err(e) => Err(self.fail(e)),
        }
    }

    /// Applies the submitter's answer for the batch from [`begin_submit`].
    ///
    /// On success returns the route of the new asset's page.
    ///
    /// [`begin_submit`]: AssetForm::begin_submit
    pub fn complete_submit(&mut self, result: Result<(), SubmitError>) -> Result<String, IntakeError> {
        if self.phase != FormPhase::Submitting {
            return Err(IntakeError::NotSubmitting { phase: self.phase });
        }
        match result {
            Ok(()) => {
                let route = self.config.asset_path(&self.state.id);
                info!(record_id = %self.state.id, %route, "submission accepted");
                self.phase = FormPhase::NavigatedAway;
                Ok(route)
            }
            Err(e) => {
                warn!(record_id = %self.state.id, error = %e, "submission failed");
                Err(self.fail(e.into()))
            }
        }
    }

    /// Abandons an in-flight submission.
    ///
    /// The form moves to `EditingWithError` with
    /// [`IntakeError::SubmitCancelled`]. Whether the ledger saw the batch is
    /// unknown. Returns `false` when nothing was in flight.
    pub fn cancel_submit(&mut self) -> bool {
        if self.phase != FormPhase::Submitting {
            return false;
        }
        warn!(record_id = %self.state.id, "submission abandoned before completion");
        self.fail(IntakeError::SubmitCancelled);
        true
    }

    /// Validates, builds and submits the batch.
    ///
    /// Dropping the returned future before it completes cancels the
    /// submission as [`cancel_submit`] does.
    ///
    /// [`cancel_submit`]: AssetForm::cancel_submit
    pub async fn submit<S>(&mut self, submitter: &S) -> Result<SubmitOutcome, IntakeError>
    where
        S: TransactionSubmitter + ?Sized,
    {
        let Some(batch) = self.begin_submit()? else {
            return Ok(SubmitOutcome::AlreadySubmitting);
        };
        let in_flight = InFlight {
            form: self,
            settled: false,
        };
        let result = submitter.submit(&batch, in_flight.form.config.sign).await;
        in_flight.settle(result).map(SubmitOutcome::Navigated)
    }

    fn prepare_batch(&mut self) -> Result<PayloadBatch, IntakeError> {
        let selectable = self.selectable_types();
        self.state.validate(&selectable)?;

        let batch = build_payload_batch(&self.state, &self.config.record_type, unix_now())?;
        if self.config.strict {
            validate_batch(&batch, self.catalog.schema_context())?;
        }
        Ok(batch)
    }

    fn fail(&mut self, err: IntakeError) -> IntakeError {
        self.phase = FormPhase::EditingWithError;
        self.last_error = Some(err.clone());
        err
    }
}

/// Cancels the submission on drop unless it was settled.
struct InFlight<'a, 'c> {
    form: &'a mut AssetForm<'c>,
    settled: bool,
}

impl InFlight<'_, '_> {
    fn settle(mut self, result: Result<(), SubmitError>) -> Result<String, IntakeError> {
        self.settled = true;
        self.form.complete_submit(result)
    }
}

impl Drop for InFlight<'_, '_> {
    fn drop(&mut self) {
        if !self.settled {
            self.form.cancel_submit();
        }
    }
}

fn unix_now() -> i64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::tests::sample_catalog;
    use crate::error::{FetchError, FormError, ValidationError};
    use crate::model::{Payload, Value};
    use crate::service::StaticRecordFetcher;
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::Mutex;
    use std::time::Duration;

    #[derive(Default)]
    struct RecordingSubmitter {
        batches: Mutex<Vec<(PayloadBatch, bool)>>,
    }

    #[async_trait]
    impl TransactionSubmitter for RecordingSubmitter {
        async fn submit(&self, batch: &PayloadBatch, sign: bool) -> Result<(), SubmitError> {
            self.batches.lock().unwrap().push((batch.clone(), sign));
            Ok(())
        }
    }

    struct StalledSubmitter;

    #[async_trait]
    impl TransactionSubmitter for StalledSubmitter {
        async fn submit(&self, _batch: &PayloadBatch, _sign: bool) -> Result<(), SubmitError> {
            std::future::pending().await
        }
    }

    struct RejectingSubmitter;

    #[async_trait]
    impl TransactionSubmitter for RejectingSubmitter {
        async fn submit(&self, _batch: &PayloadBatch, _sign: bool) -> Result<(), SubmitError> {
            Err(SubmitError::Rejected("invalid signature".into()))
        }
    }

    fn fill(form: &mut AssetForm<'_>, mineral_type: &str) {
        for (field, value) in [
            (Field::Id, "A1"),
            (Field::Tag, "T1"),
            (Field::Type, mineral_type),
            (Field::Status, "Mined"),
            (Field::Container, "Bag"),
            (Field::Origin, "DRC"),
            (Field::Zone, "Z1"),
            (Field::Weight, "10"),
        ] {
            form.set_field(field, value).unwrap();
        }
    }

    fn parent_fetcher() -> StaticRecordFetcher {
        let record: AssetRecord = serde_json::from_value(json!({
            "recordId": "P-1",
            "recordType": "mineral",
            "properties": [
                { "name": "tag", "value": "PT" },
                { "name": "type", "value": "Coltan Ore" },
                { "name": "origin", "value": "Rwanda" },
                { "name": "zone", "value": "Z2" }
            ]
        }))
        .unwrap();
        StaticRecordFetcher::new([record])
    }

    #[tokio::test]
    async fn test_submit_without_parent() {
        let catalog = sample_catalog();
        let mut form = AssetForm::new(&catalog, IntakeConfig::default());
        assert_eq!(form.phase(), FormPhase::Empty);

        form.init(&StaticRecordFetcher::empty(), None).await.unwrap();
        fill(&mut form, "Coltan Ore");
        assert_eq!(form.phase(), FormPhase::Editing);

        let submitter = RecordingSubmitter::default();
        let outcome = form.submit(&submitter).await.unwrap();
        assert_eq!(outcome, SubmitOutcome::Navigated("/assets/A1".into()));
        assert_eq!(form.phase(), FormPhase::NavigatedAway);

        let batches = submitter.batches.lock().unwrap();
        assert_eq!(batches.len(), 1);
        let (batch, sign) = &batches[0];
        assert!(*sign);
        assert_eq!(batch.len(), 1);
        assert_eq!(batch.creates().next().unwrap().properties.len(), 7);
    }

    #[tokio::test]
    async fn test_submit_with_parent() {
        let catalog = sample_catalog();
        let mut form = AssetForm::new(&catalog, IntakeConfig::default());
        form.init(&parent_fetcher(), Some("P-1")).await.unwrap();
        assert_eq!(form.selectable_types(), vec!["Coltan Concentrate"]);
        assert_eq!(form.state().origin, "Rwanda");

        fill(&mut form, "Coltan Concentrate");
        let submitter = RecordingSubmitter::default();
        form.submit(&submitter).await.unwrap();

        let batches = submitter.batches.lock().unwrap();
        let batch = &batches[0].0;
        assert!(matches!(&batch.payloads[0], Payload::FinalizeRecord(f) if f.record_id == "P-1"));
        let create = batch.creates().next().unwrap();
        // The parent's origin wins over the value typed by the user.
        assert_eq!(
            create.property("origin").map(|p| &p.value),
            Some(&Value::Enum("Rwanda".into()))
        );
        assert_eq!(
            create.property("parent_tag").map(|p| &p.value),
            Some(&Value::String("PT".into()))
        );
    }

    #[tokio::test]
    async fn test_fetch_failure_is_reported_and_form_stays_usable() {
        let catalog = sample_catalog();
        let mut form = AssetForm::new(&catalog, IntakeConfig::default());
        let err = form
            .init(&StaticRecordFetcher::empty(), Some("P-404"))
            .await
            .unwrap_err();
        assert_eq!(
            err,
            IntakeError::ParentFetch(FetchError::NotFound {
                path: "records/P-404".into()
            })
        );
        assert_eq!(form.last_error(), Some(&err));
        assert!(form.state().parent.is_none());

        fill(&mut form, "Gold Ore");
        let outcome = form.submit(&RecordingSubmitter::default()).await.unwrap();
        assert!(matches!(outcome, SubmitOutcome::Navigated(_)));
    }

    #[tokio::test]
    async fn test_rejected_submit_allows_retry() {
        let catalog = sample_catalog();
        let mut form = AssetForm::new(&catalog, IntakeConfig::default());
        fill(&mut form, "Coltan Ore");

        let err = form.submit(&RejectingSubmitter).await.unwrap_err();
        assert!(matches!(err, IntakeError::Submit(SubmitError::Rejected(_))));
        assert_eq!(form.phase(), FormPhase::EditingWithError);
        assert_eq!(form.last_error(), Some(&err));

        let outcome = form.submit(&RecordingSubmitter::default()).await.unwrap();
        assert_eq!(outcome, SubmitOutcome::Navigated("/assets/A1".into()));
        assert!(form.last_error().is_none());
    }

    #[test]
    fn test_double_submit_is_ignored() {
        let catalog = sample_catalog();
        let mut form = AssetForm::new(&catalog, IntakeConfig::default());
        fill(&mut form, "Coltan Ore");

        assert!(form.begin_submit().unwrap().is_some());
        assert_eq!(form.phase(), FormPhase::Submitting);
        assert!(form.begin_submit().unwrap().is_none());
        assert_eq!(
            form.set_field(Field::Tag, "T2"),
            Err(IntakeError::FormLocked {
                phase: FormPhase::Submitting
            })
        );

        assert_eq!(form.complete_submit(Ok(())).unwrap(), "/assets/A1");
        assert_eq!(
            form.complete_submit(Ok(())),
            Err(IntakeError::NotSubmitting {
                phase: FormPhase::NavigatedAway
            })
        );
        assert!(form.begin_submit().is_err());
        assert!(form.set_field(Field::Tag, "T3").is_err());
    }

    #[tokio::test]
    async fn test_submit_while_in_flight_reports_already_submitting() {
        let catalog = sample_catalog();
        let mut form = AssetForm::new(&catalog, IntakeConfig::default());
        fill(&mut form, "Coltan Ore");
        form.begin_submit().unwrap();

        let submitter = RecordingSubmitter::default();
        assert_eq!(
            form.submit(&submitter).await.unwrap(),
            SubmitOutcome::AlreadySubmitting
        );
        assert!(submitter.batches.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_dropped_submit_releases_form() {
        let catalog = sample_catalog();
        let mut form = AssetForm::new(&catalog, IntakeConfig::default());
        fill(&mut form, "Coltan Ore");

        let timed_out =
            tokio::time::timeout(Duration::from_millis(10), form.submit(&StalledSubmitter)).await;
        assert!(timed_out.is_err());
        assert_eq!(form.phase(), FormPhase::EditingWithError);
        assert_eq!(form.last_error(), Some(&IntakeError::SubmitCancelled));

        form.set_field(Field::Tag, "T2").unwrap();
        let outcome = form.submit(&RecordingSubmitter::default()).await.unwrap();
        assert_eq!(outcome, SubmitOutcome::Navigated("/assets/A1".into()));
    }

    #[test]
    fn test_cancel_submit() {
        let catalog = sample_catalog();
        let mut form = AssetForm::new(&catalog, IntakeConfig::default());
        fill(&mut form, "Coltan Ore");
        assert!(!form.cancel_submit());
        assert_eq!(form.phase(), FormPhase::Editing);

        form.begin_submit().unwrap();
        assert!(form.cancel_submit());
        assert_eq!(form.phase(), FormPhase::EditingWithError);
        assert_eq!(
            form.complete_submit(Ok(())),
            Err(IntakeError::NotSubmitting {
                phase: FormPhase::EditingWithError
            })
        );
        assert!(form.begin_submit().unwrap().is_some());
    }

    #[test]
    fn test_invalid_form_moves_to_error_then_editing() {
        let catalog = sample_catalog();
        let mut form = AssetForm::new(&catalog, IntakeConfig::default());
        fill(&mut form, "Tantalum");

        let err = form.begin_submit().unwrap_err();
        assert!(matches!(
            err,
            IntakeError::Form(FormError::TypeNotSelectable { .. })
        ));
        assert_eq!(form.phase(), FormPhase::EditingWithError);

        form.set_field(Field::Type, "Gold Ore").unwrap();
        assert_eq!(form.phase(), FormPhase::Editing);
        assert!(form.begin_submit().unwrap().is_some());
    }

    #[test]
    fn test_strict_mode_checks_options() {
        let catalog = sample_catalog();
        let mut form = AssetForm::new(&catalog, IntakeConfig::default());
        fill(&mut form, "Coltan Ore");
        form.set_field(Field::Container, "Barrel").unwrap();
        assert!(matches!(
            form.begin_submit(),
            Err(IntakeError::Invalid(ValidationError::UnknownOption { .. }))
        ));

        let config = IntakeConfig {
            strict: false,
            ..IntakeConfig::default()
        };
        let mut lenient = AssetForm::new(&catalog, config);
        fill(&mut lenient, "Coltan Ore");
        lenient.set_field(Field::Container, "Barrel").unwrap();
        assert!(lenient.begin_submit().unwrap().is_some());
    }

    #[test]
    fn test_custom_route_and_record_type() {
        let catalog = sample_catalog();
        let config = IntakeConfig::from_json(r#"{"assetRoute": "/minerals/"}"#).unwrap();
        let mut form = AssetForm::new(&catalog, config);
        fill(&mut form, "Gold Ore");

        let batch = form.begin_submit().unwrap().unwrap();
        assert_eq!(batch.creates().next().unwrap().record_type, "mineral");
        assert_eq!(form.complete_submit(Ok(())).unwrap(), "/minerals/A1");
    }
}
