//! Mobile share sheet. The shell's webview opens the system sheet through the
//! Web Share API, handed the captured file as base64.

use async_trait::async_trait;
use base64::Engine as _;
use serde::Serialize;
use tracing::info;

use super::capture::ImageFormat;
use super::native::off_ui_thread;
use super::service::{ShareError, ShareRequest, ShareService};

const OPEN_SHEET_JS: &str = r#"
const { title, text, mime, name, data } = await dioxus.recv();
if (!navigator.canShare) {
    return "unavailable";
}
const bytes = Uint8Array.from(atob(data), (c) => c.charCodeAt(0));
const file = new File([bytes], name, { type: mime });
if (!navigator.canShare({ files: [file] })) {
    return "unavailable";
}
try {
    await navigator.share({ title, text, files: [file] });
    return "shared";
} catch (err) {
    return err && err.name === "AbortError" ? "dismissed" : "failed: " + err;
}
"#;

#[derive(Debug, Serialize, PartialEq)]
struct SheetPayload {
    title: String,
    text: String,
    mime: String,
    name: String,
    data: String,
}

impl SheetPayload {
    fn new(request: &ShareRequest, bytes: &[u8]) -> Result<Self, ShareError> {
        let format = ImageFormat::from_mime(&request.mime)
            .ok_or_else(|| ShareError::UnsupportedType(request.mime.clone()))?;
        Ok(Self {
            title: request.title.clone(),
            text: request.message.clone(),
            mime: request.mime.clone(),
            name: format!("scorecard.{}", format.extension()),
            data: base64::engine::general_purpose::STANDARD.encode(bytes),
        })
    }
}

#[derive(Debug, PartialEq, Eq)]
enum SheetOutcome {
    Shared,
    Dismissed,
    Unavailable,
    Failed(String),
}

impl SheetOutcome {
    fn parse(raw: &str) -> Self {
        match raw {
            "shared" => SheetOutcome::Shared,
            "dismissed" => SheetOutcome::Dismissed,
            "unavailable" => SheetOutcome::Unavailable,
            other => SheetOutcome::Failed(
                other.strip_prefix("failed: ").unwrap_or(other).to_string(),
            ),
        }
    }

    /// A dismissed sheet still counts as resolved.
    fn into_result(self) -> Result<(), ShareError> {
        match self {
            SheetOutcome::Shared | SheetOutcome::Dismissed => Ok(()),
            SheetOutcome::Unavailable => Err(ShareError::Platform(
                "share sheet unavailable in this webview".into(),
            )),
            SheetOutcome::Failed(reason) => Err(ShareError::Platform(reason)),
        }
    }
}

/// Opens the system share sheet with the captured image attached.
#[derive(Debug, Clone, Default)]
pub struct SheetShare;

#[async_trait(?Send)]
impl ShareService for SheetShare {
    async fn share(&self, request: &ShareRequest) -> Result<(), ShareError> {
        let artifact_error = |reason: String| ShareError::Artifact {
            locator: request.url.clone(),
            reason,
        };
        let path = request
            .url
            .file_path()
            .ok_or_else(|| artifact_error("not a file locator".into()))?;
        let bytes = off_ui_thread(move || std::fs::read(path))
            .await
            .map_err(ShareError::Platform)?
            .map_err(|err| artifact_error(err.to_string()))?;
        let payload = SheetPayload::new(request, &bytes)?;

        let eval = dioxus::document::eval(OPEN_SHEET_JS);
        eval.send(payload)
            .map_err(|err| ShareError::Platform(format!("{err:?}")))?;
        let raw: String = eval
            .join()
            .await
            .map_err(|err| ShareError::Platform(format!("{err:?}")))?;

        let outcome = SheetOutcome::parse(&raw);
        info!(title = %request.title, ?outcome, "share sheet closed");
        outcome.into_result()
    }
}
