//! # SDA Docker Image Utilities
//!
//! File: cli/src/common/docker/images.rs
//!
//! ## Overview
//!
//! Image handling needed before a container can be created: checking whether
//! `image:tag` is present locally and pulling it when it is not. Pull progress
//! is drained and discarded; only failures surface.
//!
use crate::core::error::{Result, SdaError};
use anyhow::anyhow;
use bollard::{image::CreateImageOptions, Docker};
use futures_util::StreamExt;
use tracing::{debug, error, info, instrument};

/// Checks whether an image exists locally.
///
/// # Returns
///
/// * `Ok(true)` if `inspect_image` succeeds, `Ok(false)` on a 404.
///
/// # Errors
///
/// Returns `SdaError::DockerApi` for any other Docker API failure.
#[instrument(skip(docker), fields(image = %image_ref))]
pub async fn image_exists(docker: &Docker, image_ref: &str) -> Result<bool> {
    match docker.inspect_image(image_ref).await {
        Ok(_) => {
            debug!("Image '{}' exists locally.", image_ref);
            Ok(true)
        }
        Err(bollard::errors::Error::DockerResponseServerError {
            status_code: 404, ..
        }) => {
            debug!("Image '{}' not found locally (404).", image_ref);
            Ok(false)
        }
        Err(e) => {
            error!("Failed to inspect image '{}': {:?}", image_ref, e);
            Err(anyhow!(SdaError::DockerApi { source: e })
                .context(format!("Failed to inspect image '{}'", image_ref)))
        }
    }
}

/// Pulls `image:tag`, draining the progress stream.
///
/// # Errors
///
/// Returns `SdaError::DockerApi` if any item of the pull stream is an error
/// (unknown image, registry unreachable, authentication required).
#[instrument(skip(docker), fields(image = %image, tag = %tag))]
pub async fn pull_image(docker: &Docker, image: &str, tag: &str) -> Result<()> {
    info!("Pulling image {}:{}", image, tag);
    let options = CreateImageOptions {
        from_image: image.to_string(),
        tag: tag.to_string(),
        ..Default::default()
    };
    let mut stream = docker.create_image(Some(options), None, None);
    while let Some(item) = stream.next().await {
        match item {
            Ok(progress) => debug!("Pull progress: {:?}", progress.status),
            Err(e) => {
                error!("Failed to pull image {}:{}: {:?}", image, tag, e);
                return Err(anyhow!(SdaError::DockerApi { source: e })
                    .context(format!("Failed to pull image '{}:{}'", image, tag)));
            }
        }
    }
    info!("Pulled image {}:{}", image, tag);
    Ok(())
}
