use anyhow::Context;
use bytes::Bytes;
use tracing::debug;

use crate::state::AppState;

pub struct UploadItem<'a> {
    pub body: Bytes,
    pub content_type: &'a str,
}

pub async fn upload_image(st: &AppState, img: UploadItem<'_>) -> anyhow::Result<String> {
    let size = img.body.len();
    let url = st
        .images
        .put_image(img.body, img.content_type)
        .await
        .with_context(|| format!("put_image {} ({} bytes)", img.content_type, size))?;
    debug!(content_type = img.content_type, size, %url, "image stored");
    Ok(url)
}
