//! Native services: captures land in the app cache directory. Desktop shells
//! share by placing the image on the system clipboard.

#[cfg(not(any(target_os = "android", target_os = "ios")))]
use std::borrow::Cow;
use std::fs;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::{debug, info, warn};

use super::capture::{ArtifactLocator, CaptureError, CaptureOptions, CaptureRegion, CaptureService};
use super::render;
#[cfg(not(any(target_os = "android", target_os = "ios")))]
use super::service::{ShareError, ShareRequest, ShareService};
use crate::core::format::timestamp_slug;

/// Runs `job` on tokio's blocking pool so the UI thread keeps rendering.
/// Without a runtime (plain executors in tests) the job runs inline.
pub(crate) async fn off_ui_thread<T, F>(job: F) -> Result<T, String>
where
    T: Send + 'static,
    F: FnOnce() -> T + Send + 'static,
{
    match tokio::runtime::Handle::try_current() {
        Ok(handle) => handle
            .spawn_blocking(job)
            .await
            .map_err(|err| err.to_string()),
        Err(_) => {
            debug!("no tokio runtime; running blocking job inline");
            Ok(job())
        }
    }
}

#[derive(Debug, Clone)]
pub struct FileCapture {
    dir: PathBuf,
}

impl FileCapture {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// `<cache dir>/captures`, or the system temp dir when no home is known.
    pub fn platform_default() -> Self {
        match capture_dir() {
            Ok(dir) => Self::new(dir),
            Err(err) => {
                warn!(error = %err, "falling back to temp dir for captures");
                Self::new(std::env::temp_dir().join("fairway-captures"))
            }
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

fn capture_dir() -> Result<PathBuf, String> {
    let dirs = directories::ProjectDirs::from("com", "Fairway", "Fairway")
        .ok_or("Unable to determine cache directory")?;
    Ok(dirs.cache_dir().join("captures"))
}

/// Renders, encodes and writes one artifact; returns its absolute path.
fn write_capture(
    dir: &Path,
    region: &CaptureRegion,
    options: &CaptureOptions,
) -> Result<PathBuf, CaptureError> {
    let bytes = render::render_and_encode(region, options)?;

    fs::create_dir_all(dir)?;
    let id = uuid::Uuid::new_v4().simple().to_string();
    let filename = format!(
        "scorecard-{}-{}.{}",
        timestamp_slug(),
        &id[..8],
        options.format.extension()
    );
    let path = dir.join(filename);
    fs::write(&path, &bytes)?;
    info!(path = %path.display(), bytes = bytes.len(), "capture written");

    Ok(fs::canonicalize(path)?)
}

#[async_trait(?Send)]
impl CaptureService for FileCapture {
    async fn capture(
        &self,
        region: &CaptureRegion,
        options: &CaptureOptions,
    ) -> Result<ArtifactLocator, CaptureError> {
        let dir = self.dir.clone();
        let region = region.clone();
        let options = *options;
        let path = off_ui_thread(move || write_capture(&dir, &region, &options))
            .await
            .map_err(CaptureError::Unavailable)??;

        ArtifactLocator::from_file_path(&path).ok_or_else(|| {
            CaptureError::Unavailable(format!("no file URI for {}", path.display()))
        })
    }
}

/// Copies the captured image to the clipboard, ready to paste into any
/// messaging app.
#[cfg(not(any(target_os = "android", target_os = "ios")))]
#[derive(Debug, Clone, Default)]
pub struct ClipboardShare;

#[cfg(not(any(target_os = "android", target_os = "ios")))]
fn copy_to_clipboard(path: &Path, locator: ArtifactLocator) -> Result<(), ShareError> {
    let pixels = image::open(path)
        .map_err(|err| ShareError::Artifact {
            locator,
            reason: err.to_string(),
        })?
        .into_rgba8();
    let (width, height) = pixels.dimensions();

    let mut clipboard =
        arboard::Clipboard::new().map_err(|err| ShareError::Platform(err.to_string()))?;
    clipboard
        .set_image(arboard::ImageData {
            width: width as usize,
            height: height as usize,
            bytes: Cow::Owned(pixels.into_raw()),
        })
        .map_err(|err| ShareError::Platform(err.to_string()))
}

#[cfg(not(any(target_os = "android", target_os = "ios")))]
#[async_trait(?Send)]
impl ShareService for ClipboardShare {
    async fn share(&self, request: &ShareRequest) -> Result<(), ShareError> {
        if !request.mime.starts_with("image/") {
            return Err(ShareError::UnsupportedType(request.mime.clone()));
        }
        let path = request
            .url
            .file_path()
            .ok_or_else(|| ShareError::Artifact {
                locator: request.url.clone(),
                reason: "not a file locator".into(),
            })?;

        let locator = request.url.clone();
        off_ui_thread(move || copy_to_clipboard(&path, locator))
            .await
            .map_err(ShareError::Platform)??;

        info!(title = %request.title, url = %request.url, "score card copied to clipboard");
        Ok(())
    }
}
