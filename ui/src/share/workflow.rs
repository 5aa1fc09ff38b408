//! Capture-then-share sequencing.
//!
//! ```text
//! Idle -> Capturing -> Sharing -> Completed
//!             |           |
//!             +-----------+-----> Failed
//! ```
//!
//! `Completed` and `Failed` end one invocation; the next trigger starts over
//! from `Capturing`. Triggers that arrive while a run is in flight are
//! ignored. Failures are logged here, once, and handed back to the caller.

use std::cell::Cell;

use thiserror::Error;
use tracing::{debug, error, info};

use super::capture::{CaptureError, CaptureOptions, CaptureRegion, CaptureService};
use super::service::{ShareConfig, ShareError, ShareService};
use crate::core::platform::platform_string;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WorkflowState {
    #[default]
    Idle,
    Capturing,
    Sharing,
    Completed,
    Failed,
}

impl WorkflowState {
    pub fn is_busy(&self) -> bool {
        matches!(self, WorkflowState::Capturing | WorkflowState::Sharing)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShareOutcome {
    /// The share surface resolved (shared or dismissed by the user).
    Completed,
    /// A run was already in flight; nothing happened.
    Ignored,
}

#[derive(Debug, Error)]
pub enum WorkflowError {
    #[error("capture failed: {0}")]
    Capture(#[source] CaptureError),
    #[error("share failed: {0}")]
    Share(#[source] ShareError),
}

type TransitionHook = Box<dyn Fn(WorkflowState)>;

pub struct ShareWorkflow<C, S> {
    capture: C,
    share: S,
    options: CaptureOptions,
    config: ShareConfig,
    state: Cell<WorkflowState>,
    observers: Vec<TransitionHook>,
}

impl<C, S> ShareWorkflow<C, S>
where
    C: CaptureService,
    S: ShareService,
{
    pub fn new(capture: C, share: S) -> Self {
        Self {
            capture,
            share,
            options: CaptureOptions::default(),
            config: ShareConfig::default(),
            state: Cell::new(WorkflowState::Idle),
            observers: Vec::new(),
        }
    }

    pub fn with_options(mut self, options: CaptureOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_config(mut self, config: ShareConfig) -> Self {
        self.config = config;
        self
    }

    /// Registers a callback invoked after every state change.
    pub fn on_transition(mut self, hook: impl Fn(WorkflowState) + 'static) -> Self {
        self.observers.push(Box::new(hook));
        self
    }

    pub fn state(&self) -> WorkflowState {
        self.state.get()
    }

    pub fn is_busy(&self) -> bool {
        self.state.get().is_busy()
    }

    pub fn options(&self) -> &CaptureOptions {
        &self.options
    }

    pub fn capture_service(&self) -> &C {
        &self.capture
    }

    pub fn share_service(&self) -> &S {
        &self.share
    }

    /// Captures `region` and opens the share surface with the result.
    pub async fn capture_and_share(
        &self,
        region: &CaptureRegion,
    ) -> Result<ShareOutcome, WorkflowError> {
        if self.is_busy() {
            debug!(state = ?self.state(), "share already in flight; ignoring trigger");
            return Ok(ShareOutcome::Ignored);
        }

        self.transition(WorkflowState::Capturing);
        let locator = match self.capture.capture(region, &self.options).await {
            Ok(locator) => locator,
            Err(err) => return Err(self.fail(WorkflowError::Capture(err))),
        };
        debug!(%locator, "score card captured");

        self.transition(WorkflowState::Sharing);
        let request = self.config.request_for(locator, self.options.format);
        if let Err(err) = self.share.share(&request).await {
            return Err(self.fail(WorkflowError::Share(err)));
        }

        self.transition(WorkflowState::Completed);
        info!(url = %request.url, "share surface resolved");
        Ok(ShareOutcome::Completed)
    }

    fn fail(&self, err: WorkflowError) -> WorkflowError {
        error!(error = %err, platform = %platform_string(), "Error sharing score");
        self.transition(WorkflowState::Failed);
        err
    }

    fn transition(&self, next: WorkflowState) {
        self.state.set(next);
        for hook in &self.observers {
            hook(next);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use async_trait::async_trait;
    use futures::channel::oneshot;
    use futures::executor::block_on;
    use tracing::{Event, Level, Subscriber};
    use tracing_subscriber::layer::{Context, SubscriberExt};
    use tracing_subscriber::Layer;

    use super::*;
    use crate::core::scorecard::ScoreCard;
    use crate::share::capture::{ArtifactLocator, ImageFormat};
    use crate::share::service::ShareRequest;

    struct ErrorCounter(Arc<AtomicUsize>);

    impl<S: Subscriber> Layer<S> for ErrorCounter {
        fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
            if *event.metadata().level() == Level::ERROR {
                self.0.fetch_add(1, Ordering::SeqCst);
            }
        }
    }

    /// Drives `fut` to completion and reports how many error events it logged.
    fn run_logged<F: std::future::Future>(fut: F) -> (F::Output, usize) {
        let count = Arc::new(AtomicUsize::new(0));
        let subscriber = tracing_subscriber::registry().with(ErrorCounter(count.clone()));
        let output = tracing::subscriber::with_default(subscriber, || block_on(fut));
        (output, count.load(Ordering::SeqCst))
    }

    #[derive(Default)]
    struct StubCapture {
        fail: bool,
        calls: Cell<usize>,
        gate: RefCell<Option<oneshot::Receiver<()>>>,
    }

    #[async_trait(?Send)]
    impl CaptureService for StubCapture {
        async fn capture(
            &self,
            _region: &CaptureRegion,
            options: &CaptureOptions,
        ) -> Result<ArtifactLocator, CaptureError> {
            self.calls.set(self.calls.get() + 1);
            let gate = self.gate.borrow_mut().take();
            if let Some(gate) = gate {
                let _ = gate.await;
            }
            if self.fail {
                return Err(CaptureError::Unavailable("view not mounted".into()));
            }
            Ok(ArtifactLocator::new(format!(
                "file://tmp/a.{}",
                options.format.extension()
            )))
        }
    }

    #[derive(Default)]
    struct StubShare {
        fail: bool,
        requests: RefCell<Vec<ShareRequest>>,
    }

    #[async_trait(?Send)]
    impl ShareService for StubShare {
        async fn share(&self, request: &ShareRequest) -> Result<(), ShareError> {
            self.requests.borrow_mut().push(request.clone());
            if self.fail {
                return Err(ShareError::Platform("no share target".into()));
            }
            Ok(())
        }
    }

    fn region() -> CaptureRegion {
        CaptureRegion::for_card(ScoreCard::mountain_view())
    }

    #[test]
    fn successful_run_completes_and_shares_jpeg_once() {
        let workflow = ShareWorkflow::new(StubCapture::default(), StubShare::default());
        let (outcome, errors) = run_logged(workflow.capture_and_share(&region()));

        assert_eq!(outcome.unwrap(), ShareOutcome::Completed);
        assert_eq!(workflow.state(), WorkflowState::Completed);
        assert_eq!(errors, 0);

        let requests = workflow.share_service().requests.borrow();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].mime, "image/jpeg");
        assert_eq!(requests[0].title, "My Golf Score");
        assert_eq!(requests[0].url.as_str(), "file://tmp/a.jpg");
    }

    #[test]
    fn capture_failure_skips_share_and_logs_once() {
        let capture = StubCapture {
            fail: true,
            ..Default::default()
        };
        let workflow = ShareWorkflow::new(capture, StubShare::default());
        let (outcome, errors) = run_logged(workflow.capture_and_share(&region()));

        assert!(matches!(outcome, Err(WorkflowError::Capture(_))));
        assert_eq!(workflow.state(), WorkflowState::Failed);
        assert!(workflow.share_service().requests.borrow().is_empty());
        assert_eq!(errors, 1);
    }

    #[test]
    fn share_failure_fails_after_single_capture() {
        let share = StubShare {
            fail: true,
            ..Default::default()
        };
        let workflow = ShareWorkflow::new(StubCapture::default(), share);
        let (outcome, errors) = run_logged(workflow.capture_and_share(&region()));

        assert!(matches!(outcome, Err(WorkflowError::Share(_))));
        assert_eq!(workflow.state(), WorkflowState::Failed);
        assert_eq!(workflow.capture_service().calls.get(), 1);
        assert_eq!(errors, 1);
    }

    #[test]
    fn observers_see_every_transition() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = seen.clone();
        let workflow = ShareWorkflow::new(StubCapture::default(), StubShare::default())
            .on_transition(move |state| sink.borrow_mut().push(state));

        block_on(workflow.capture_and_share(&region())).unwrap();

        assert_eq!(
            *seen.borrow(),
            vec![
                WorkflowState::Capturing,
                WorkflowState::Sharing,
                WorkflowState::Completed
            ]
        );
    }

    #[test]
    fn trigger_while_capturing_is_ignored() {
        let (release, gate) = oneshot::channel();
        let capture = StubCapture {
            gate: RefCell::new(Some(gate)),
            ..Default::default()
        };
        let workflow = ShareWorkflow::new(capture, StubShare::default());
        let region = region();

        let (first, second, ()) = block_on(async {
            futures::join!(
                workflow.capture_and_share(&region),
                async {
                    assert_eq!(workflow.state(), WorkflowState::Capturing);
                    workflow.capture_and_share(&region).await
                },
                async {
                    let _ = release.send(());
                }
            )
        });

        assert_eq!(first.unwrap(), ShareOutcome::Completed);
        assert_eq!(second.unwrap(), ShareOutcome::Ignored);
        assert_eq!(workflow.capture_service().calls.get(), 1);
        assert_eq!(workflow.share_service().requests.borrow().len(), 1);
    }

    #[test]
    fn failed_run_can_be_retriggered() {
        let share = StubShare {
            fail: true,
            ..Default::default()
        };
        let workflow = ShareWorkflow::new(StubCapture::default(), share);
        let region = region();

        assert!(block_on(workflow.capture_and_share(&region)).is_err());
        assert!(!workflow.is_busy());
        assert!(block_on(workflow.capture_and_share(&region)).is_err());
        assert_eq!(workflow.capture_service().calls.get(), 2);
    }

    #[test]
    fn png_options_flow_into_share_type() {
        let workflow = ShareWorkflow::new(StubCapture::default(), StubShare::default())
            .with_options(CaptureOptions {
                format: ImageFormat::Png,
                quality: 1.0,
            });
        assert_eq!(workflow.options().format, ImageFormat::Png);
        block_on(workflow.capture_and_share(&region())).unwrap();
        let requests = workflow.share_service().requests.borrow();
        assert_eq!(requests[0].mime, "image/png");
        assert_eq!(requests[0].url.as_str(), "file://tmp/a.png");
    }
}
