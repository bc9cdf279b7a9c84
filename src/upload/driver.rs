//! Drives an [`UploadPipeline`] against the real network and clock.

use thiserror::Error;
use tokio::time::{interval_at, sleep, Instant, MissedTickBehavior};

use super::{PipelineError, UploadPipeline};
use crate::analysis::{AnalysisResult, DecodeError};
use crate::client::AnalysisApi;
use crate::persist::{ResultStore, StorageError};
use crate::routing::Route;

/// Moves the user to another view
pub trait Navigator: Send + Sync {
    fn navigate(&self, route: Route);
}

#[derive(Error, Debug)]
pub enum UploadError {
    #[error(transparent)]
    Pipeline(#[from] PipelineError),

    /// The upload failed; carries the message shown to the user
    #[error("{0}")]
    Failed(String),

    #[error("Failed to store analysis: {0}")]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Decode(#[from] DecodeError),
}

/// Upload the selected file and see the pipeline through to navigation.
///
/// The progress ticker runs only while the request is in flight. On
/// success the result is written to `store` once, after the analyzing
/// delay, and `navigator` is sent to the results view once, after the
/// redirect delay. `observe` is called after every visible change.
pub async fn run_upload<F>(
    pipeline: &mut UploadPipeline,
    api: &dyn AnalysisApi,
    store: &dyn ResultStore,
    navigator: &dyn Navigator,
    mut observe: F,
) -> Result<AnalysisResult, UploadError>
where
    F: FnMut(&UploadPipeline),
{
    let file = pipeline.begin_upload()?;
    let timing = pipeline.timing().clone();
    observe(pipeline);

    let outcome = {
        let upload = api.predict_risk(&file);
        tokio::pin!(upload);

        let mut ticker = interval_at(Instant::now() + timing.tick_interval, timing.tick_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                biased;
                outcome = &mut upload => break outcome,
                _ = ticker.tick() => {
                    pipeline.tick();
                    observe(pipeline);
                }
            }
        }
    };

    let result = match outcome {
        Ok(result) => result,
        Err(e) => {
            tracing::debug!("predict_risk failed: {}", e);
            pipeline.upload_failed(e.server_message())?;
            observe(pipeline);

            let message = pipeline.error().unwrap_or_default().to_string();
            return Err(UploadError::Failed(message));
        }
    };

    pipeline.upload_succeeded(result)?;
    observe(pipeline);

    sleep(timing.analyzing_delay).await;
    let result = pipeline.analysis_elapsed()?;
    if let Err(e) = store.save_result(&result.to_json()?) {
        pipeline.store_failed()?;
        observe(pipeline);
        return Err(e.into());
    }
    observe(pipeline);

    sleep(timing.redirect_delay).await;
    if let Some(route) = pipeline.take_redirect() {
        tracing::info!(route = %route, "Analysis stored, showing results");
        navigator.navigate(route);
    }

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::{PreventionPlan, PreventionRequest, Risk};
    use crate::client::ClientError;
    use crate::persist::MemoryStore;
    use crate::upload::{UploadFile, UploadPhase, UploadTiming};
    use async_trait::async_trait;
    use std::sync::Mutex;
    use std::time::Duration;

    /// Answers after a fixed delay
    struct SlowApi {
        delay: Duration,
        fail_with: Option<Option<String>>,
    }

    #[async_trait]
    impl AnalysisApi for SlowApi {
        async fn predict_risk(&self, file: &UploadFile) -> Result<AnalysisResult, ClientError> {
            sleep(self.delay).await;
            match &self.fail_with {
                Some(message) => Err(ClientError::Api {
                    status: 500,
                    message: message.clone(),
                }),
                None => Ok(AnalysisResult {
                    file_processed: file.name.clone(),
                    genomic_summary: Default::default(),
                    identified_risks: vec![Risk::new("Diabetes", 0.7, "")],
                }),
            }
        }

        async fn prevention_plan(&self, _: &PreventionRequest) -> Result<PreventionPlan, ClientError> {
            Ok(PreventionPlan::default())
        }
    }

    #[derive(Default)]
    struct RecordingNavigator {
        visits: Mutex<Vec<Route>>,
    }

    impl Navigator for RecordingNavigator {
        fn navigate(&self, route: Route) {
            self.visits.lock().unwrap().push(route);
        }
    }

    fn pipeline_with_file() -> UploadPipeline {
        let mut pipeline = UploadPipeline::new(UploadTiming::default());
        pipeline
            .select_file(UploadFile::new("genome.vcf", b"data".to_vec()))
            .unwrap();
        pipeline
    }

    #[tokio::test(start_paused = true)]
    async fn test_success_writes_once_and_navigates_once() {
        let api = SlowApi {
            delay: Duration::from_millis(700),
            fail_with: None,
        };
        let store = MemoryStore::new();
        let navigator = RecordingNavigator::default();
        let mut pipeline = pipeline_with_file();

        let result = run_upload(&mut pipeline, &api, &store, &navigator, |_| {})
            .await
            .unwrap();

        assert_eq!(result.file_processed, "genome.vcf");
        assert_eq!(store.result_writes(), 1);
        assert_eq!(*navigator.visits.lock().unwrap(), vec![Route::Results]);
        assert_eq!(pipeline.phase(), UploadPhase::Done);
        assert_eq!(pipeline.progress(), 100);

        let stored = store.load_result().unwrap().unwrap();
        assert_eq!(AnalysisResult::from_json(&stored).unwrap(), result);
    }

    #[tokio::test(start_paused = true)]
    async fn test_progress_capped_while_waiting() {
        let api = SlowApi {
            delay: Duration::from_secs(10),
            fail_with: None,
        };
        let store = MemoryStore::new();
        let navigator = RecordingNavigator::default();
        let mut pipeline = pipeline_with_file();

        let mut seen = Vec::new();
        run_upload(&mut pipeline, &api, &store, &navigator, |p| {
            seen.push((p.phase(), p.progress()))
        })
        .await
        .unwrap();

        let while_uploading: Vec<u8> = seen
            .iter()
            .filter(|(phase, _)| *phase == UploadPhase::Uploading)
            .map(|(_, p)| *p)
            .collect();
        assert!(while_uploading.iter().all(|p| *p <= 90));
        assert_eq!(while_uploading.last(), Some(&90));
        assert!(while_uploading.windows(2).all(|w| w[0] <= w[1]));

        assert!(seen.contains(&(UploadPhase::Analyzing, 100)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_timing_of_write_and_redirect() {
        let api = SlowApi {
            delay: Duration::from_millis(500),
            fail_with: None,
        };
        let store = MemoryStore::new();
        let navigator = RecordingNavigator::default();
        let mut pipeline = pipeline_with_file();

        let start = Instant::now();
        run_upload(&mut pipeline, &api, &store, &navigator, |_| {})
            .await
            .unwrap();

        // 500ms upload + 2000ms analyzing + 1500ms redirect
        let elapsed = start.elapsed();
        assert!(elapsed >= Duration::from_millis(4000), "{:?}", elapsed);
        assert!(elapsed < Duration::from_millis(4050), "{:?}", elapsed);
    }

    #[tokio::test(start_paused = true)]
    async fn test_failure_resets_progress() {
        let api = SlowApi {
            delay: Duration::from_millis(900),
            fail_with: Some(Some("Unsupported file type".to_string())),
        };
        let store = MemoryStore::new();
        let navigator = RecordingNavigator::default();
        let mut pipeline = pipeline_with_file();

        let err = run_upload(&mut pipeline, &api, &store, &navigator, |_| {})
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "Unsupported file type");
        assert_eq!(pipeline.phase(), UploadPhase::Failed);
        assert_eq!(pipeline.progress(), 0);
        assert_eq!(store.result_writes(), 0);
        assert!(navigator.visits.lock().unwrap().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_failure_without_message_uses_fallback() {
        let api = SlowApi {
            delay: Duration::from_millis(100),
            fail_with: Some(None),
        };
        let store = MemoryStore::new();
        let navigator = RecordingNavigator::default();
        let mut pipeline = pipeline_with_file();

        let err = run_upload(&mut pipeline, &api, &store, &navigator, |_| {})
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Upload failed. Please try again.");
    }

    /// A result slot that cannot be written
    struct ReadOnlyStore;

    impl ResultStore for ReadOnlyStore {
        fn load_result(&self) -> crate::persist::StorageResult<Option<String>> {
            Ok(None)
        }

        fn save_result(&self, _: &str) -> crate::persist::StorageResult<()> {
            Err(StorageError::Poisoned)
        }

        fn clear_result(&self) -> crate::persist::StorageResult<()> {
            Ok(())
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_store_failure_returns_to_failed_without_redirect() {
        let api = SlowApi {
            delay: Duration::from_millis(100),
            fail_with: None,
        };
        let navigator = RecordingNavigator::default();
        let mut pipeline = pipeline_with_file();

        let err = run_upload(&mut pipeline, &api, &ReadOnlyStore, &navigator, |_| {})
            .await
            .unwrap_err();

        assert!(matches!(err, UploadError::Storage(_)));
        assert_eq!(pipeline.phase(), UploadPhase::Failed);
        assert_eq!(pipeline.error(), Some(crate::upload::STORE_FAILED_MESSAGE));
        assert!(navigator.visits.lock().unwrap().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_no_file_makes_no_request() {
        let api = SlowApi {
            delay: Duration::ZERO,
            fail_with: None,
        };
        let store = MemoryStore::new();
        let navigator = RecordingNavigator::default();
        let mut pipeline = UploadPipeline::default();

        let err = run_upload(&mut pipeline, &api, &store, &navigator, |_| {})
            .await
            .unwrap_err();

        assert!(matches!(err, UploadError::Pipeline(PipelineError::NoFile)));
        assert_eq!(pipeline.error(), Some("Please select a file first"));
        assert_eq!(store.result_writes(), 0);
    }
}
