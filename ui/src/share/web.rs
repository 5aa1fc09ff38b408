//! Browser services: captures become object URLs, sharing downloads them.

use async_trait::async_trait;
use tracing::info;
use wasm_bindgen::JsCast;
use web_sys::{Blob, BlobPropertyBag, HtmlAnchorElement, Url};

use super::capture::{
    ArtifactLocator, CaptureError, CaptureOptions, CaptureRegion, CaptureService, ImageFormat,
};
use super::render;
use super::service::{ShareError, ShareRequest, ShareService};
use crate::core::format::timestamp_slug;

#[derive(Debug, Clone, Default)]
pub struct BlobCapture;

impl BlobCapture {
    pub fn platform_default() -> Self {
        Self
    }
}

#[async_trait(?Send)]
impl CaptureService for BlobCapture {
    async fn capture(
        &self,
        region: &CaptureRegion,
        options: &CaptureOptions,
    ) -> Result<ArtifactLocator, CaptureError> {
        // No worker threads here: let the disabled button paint before
        // rendering holds the main thread.
        gloo_timers::future::TimeoutFuture::new(0).await;
        let bytes = render::render_and_encode(region, options)?;

        let array = js_sys::Uint8Array::from(bytes.as_slice());
        let parts = js_sys::Array::new();
        parts.push(&array.buffer());

        let opts = BlobPropertyBag::new();
        opts.set_type(options.format.mime());
        let blob = Blob::new_with_u8_array_sequence_and_options(&parts, &opts)
            .map_err(|_| CaptureError::Unavailable("Failed to create blob".into()))?;
        let url = Url::create_object_url_with_blob(&blob)
            .map_err(|_| CaptureError::Unavailable("Unable to create object URL".into()))?;

        info!(bytes = bytes.len(), "capture ready as object URL");
        Ok(ArtifactLocator::new(url))
    }
}

/// Hands the artifact to the browser as a file download.
#[derive(Debug, Clone, Default)]
pub struct DownloadShare;

#[async_trait(?Send)]
impl ShareService for DownloadShare {
    async fn share(&self, request: &ShareRequest) -> Result<(), ShareError> {
        let extension = ImageFormat::from_mime(&request.mime)
            .ok_or_else(|| ShareError::UnsupportedType(request.mime.clone()))?
            .extension();
        let platform = |msg: &str| ShareError::Platform(msg.to_string());

        let document = web_sys::window()
            .and_then(|w| w.document())
            .ok_or_else(|| platform("Document unavailable"))?;
        let anchor: HtmlAnchorElement = document
            .create_element("a")
            .map_err(|_| platform("Unable to create anchor"))?
            .dyn_into()
            .map_err(|_| platform("Anchor cast failed"))?;
        anchor.set_href(request.url.as_str());
        anchor.set_download(&format!("scorecard-{}.{extension}", timestamp_slug()));
        anchor.set_title(&request.title);
        anchor.style().set_property("display", "none").ok();

        document
            .body()
            .ok_or_else(|| platform("Missing body"))?
            .append_child(&anchor)
            .map_err(|_| platform("Unable to attach anchor"))?;
        anchor.click();
        anchor.remove();
        Url::revoke_object_url(request.url.as_str()).ok();

        info!(title = %request.title, "score card download started");
        Ok(())
    }
}
