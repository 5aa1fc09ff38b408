//! Capture-and-share: turning the on-screen card into an image and handing it
//! to the platform.

pub mod capture;
pub mod render;
pub mod service;
pub mod workflow;

#[cfg(not(target_arch = "wasm32"))]
mod native;
#[cfg(not(target_arch = "wasm32"))]
pub use native::FileCapture;
#[cfg(not(any(target_arch = "wasm32", target_os = "android", target_os = "ios")))]
pub use native::ClipboardShare;

#[cfg(any(
    target_os = "android",
    target_os = "ios",
    all(test, not(target_arch = "wasm32"))
))]
mod sheet;
#[cfg(any(target_os = "android", target_os = "ios"))]
pub use sheet::SheetShare;

#[cfg(target_arch = "wasm32")]
mod web;
#[cfg(target_arch = "wasm32")]
pub use web::{BlobCapture, DownloadShare};

pub use capture::{
    ArtifactLocator, CaptureError, CaptureOptions, CaptureRegion, CaptureService, ImageFormat,
};
pub use service::{ShareConfig, ShareError, ShareRequest, ShareService};
pub use workflow::{ShareOutcome, ShareWorkflow, WorkflowError, WorkflowState};

#[cfg(not(target_arch = "wasm32"))]
pub type PlatformCapture = FileCapture;
#[cfg(not(any(target_arch = "wasm32", target_os = "android", target_os = "ios")))]
pub type PlatformShare = ClipboardShare;
#[cfg(any(target_os = "android", target_os = "ios"))]
pub type PlatformShare = SheetShare;

#[cfg(target_arch = "wasm32")]
pub type PlatformCapture = BlobCapture;
#[cfg(target_arch = "wasm32")]
pub type PlatformShare = DownloadShare;

/// Workflow wired to this target's capture and share services.
pub fn platform_workflow() -> ShareWorkflow<PlatformCapture, PlatformShare> {
    ShareWorkflow::new(PlatformCapture::platform_default(), PlatformShare::default())
}
