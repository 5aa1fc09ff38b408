//! End-to-end runs of the share workflow against scripted services.

use std::cell::{Cell, RefCell};

use async_trait::async_trait;
use futures::executor::block_on;

use ui::core::scorecard::ScoreCard;
use ui::share::{
    ArtifactLocator, CaptureError, CaptureOptions, CaptureRegion, CaptureService, ImageFormat,
    ShareConfig, ShareError, ShareOutcome, ShareRequest, ShareService, ShareWorkflow,
    WorkflowError, WorkflowState,
};

/// Returns a fixed locator and remembers what it was asked to capture.
struct FixedCapture {
    locator: &'static str,
    seen: RefCell<Vec<(CaptureRegion, CaptureOptions)>>,
}

impl FixedCapture {
    fn new(locator: &'static str) -> Self {
        Self {
            locator,
            seen: RefCell::new(Vec::new()),
        }
    }
}

#[async_trait(?Send)]
impl CaptureService for FixedCapture {
    async fn capture(
        &self,
        region: &CaptureRegion,
        options: &CaptureOptions,
    ) -> Result<ArtifactLocator, CaptureError> {
        self.seen.borrow_mut().push((region.clone(), *options));
        Ok(ArtifactLocator::from(self.locator))
    }
}

/// Fails the first `failures` shares, then resolves.
#[derive(Default)]
struct FlakyShare {
    failures: Cell<usize>,
    requests: RefCell<Vec<ShareRequest>>,
}

#[async_trait(?Send)]
impl ShareService for FlakyShare {
    async fn share(&self, request: &ShareRequest) -> Result<(), ShareError> {
        self.requests.borrow_mut().push(request.clone());
        let remaining = self.failures.get();
        if remaining > 0 {
            self.failures.set(remaining - 1);
            return Err(ShareError::Platform("activity controller failed".into()));
        }
        Ok(())
    }
}

#[test]
fn mountain_view_share_uses_captured_locator() {
    let card = ScoreCard::new("Mountain View Golf Club", [4, 3, 5, 4, 3, 4, 5, 3, 4]);
    assert_eq!(card.total_score(), 35);
    assert_eq!(card.total_label(), "Total Score: 35");

    let workflow = ShareWorkflow::new(
        FixedCapture::new("file://tmp/a.jpg"),
        FlakyShare::default(),
    );
    let outcome = block_on(workflow.capture_and_share(&CaptureRegion::for_card(card.clone())));
    assert_eq!(outcome.unwrap(), ShareOutcome::Completed);
    assert_eq!(workflow.state(), WorkflowState::Completed);

    let seen = workflow.capture_service().seen.borrow();
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].0.card, card);
    assert_eq!(seen[0].1.format, ImageFormat::Jpg);
    assert!((seen[0].1.quality - 0.9).abs() < f32::EPSILON);

    let requests = workflow.share_service().requests.borrow();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].title, "My Golf Score");
    assert_eq!(requests[0].url.as_str(), "file://tmp/a.jpg");
    assert_eq!(requests[0].mime, "image/jpeg");
}

#[test]
fn retry_after_share_failure_succeeds() {
    let share = FlakyShare {
        failures: Cell::new(1),
        ..Default::default()
    };
    let workflow = ShareWorkflow::new(FixedCapture::new("file://tmp/b.jpg"), share);
    let region = CaptureRegion::for_card(ScoreCard::default());

    let first = block_on(workflow.capture_and_share(&region));
    assert!(matches!(first, Err(WorkflowError::Share(ShareError::Platform(_)))));
    assert_eq!(workflow.state(), WorkflowState::Failed);

    let second = block_on(workflow.capture_and_share(&region));
    assert_eq!(second.unwrap(), ShareOutcome::Completed);
    assert_eq!(workflow.capture_service().seen.borrow().len(), 2);
    assert_eq!(workflow.share_service().requests.borrow().len(), 2);
}

#[test]
fn custom_copy_reaches_the_share_surface() {
    let config = ShareConfig {
        title: "Front nine".into(),
        message: "Par-ish.".into(),
    };
    let workflow = ShareWorkflow::new(FixedCapture::new("file://tmp/c.jpg"), FlakyShare::default())
        .with_config(config);
    block_on(workflow.capture_and_share(&CaptureRegion::for_card(ScoreCard::default()))).unwrap();

    let requests = workflow.share_service().requests.borrow();
    assert_eq!(requests[0].title, "Front nine");
    assert_eq!(requests[0].message, "Par-ish.");
}

#[test]
fn substituted_card_is_what_gets_captured() {
    let card = ScoreCard::new("Test Links", [3; 9]);
    let workflow = ShareWorkflow::new(FixedCapture::new("file://tmp/d.jpg"), FlakyShare::default());
    block_on(workflow.capture_and_share(&CaptureRegion::for_card(card))).unwrap();

    let seen = workflow.capture_service().seen.borrow();
    assert_eq!(seen[0].0.card.course_name(), "Test Links");
    assert_eq!(seen[0].0.card.total_score(), 27);
}
