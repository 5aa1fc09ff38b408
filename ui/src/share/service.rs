//! Share service contract: hand a captured artifact to the platform share surface.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::capture::{ArtifactLocator, ImageFormat};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShareRequest {
    pub title: String,
    pub message: String,
    pub url: ArtifactLocator,
    #[serde(rename = "type")]
    pub mime: String,
}

/// Copy attached to every share.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShareConfig {
    pub title: String,
    pub message: String,
}

impl ShareConfig {
    pub fn request_for(&self, url: ArtifactLocator, format: ImageFormat) -> ShareRequest {
        ShareRequest {
            title: self.title.clone(),
            message: self.message.clone(),
            url,
            mime: format.mime().to_string(),
        }
    }
}

impl Default for ShareConfig {
    fn default() -> Self {
        Self {
            title: "My Golf Score".to_string(),
            message: "Check out my golf score from today!".to_string(),
        }
    }
}

#[derive(Debug, Error)]
pub enum ShareError {
    #[error("cannot share content of type {0}")]
    UnsupportedType(String),
    #[error("artifact {locator} unreadable: {reason}")]
    Artifact {
        locator: ArtifactLocator,
        reason: String,
    },
    #[error("share surface failed: {0}")]
    Platform(String),
}

/// Resolves `Ok(())` once the share surface is dismissed, whether the user
/// completed or cancelled it.
#[async_trait(?Send)]
pub trait ShareService {
    async fn share(&self, request: &ShareRequest) -> Result<(), ShareError>;
}
