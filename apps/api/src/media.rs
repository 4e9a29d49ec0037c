//! File uploads for certificate and language attachments.

use async_trait::async_trait;
use aws_sdk_s3::primitives::ByteStream;
use bytes::Bytes;
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;

/// One file pulled out of a multipart request.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub file_name: String,
    pub content_type: Option<String>,
    pub bytes: Bytes,
}

#[async_trait]
pub trait MediaStore: Send + Sync {
    /// Stores the file under `folder` and returns its public URL.
    async fn upload_file(
        &self,
        user_id: Uuid,
        file: UploadedFile,
        folder: &str,
    ) -> Result<String, AppError>;

    /// Removes a file previously returned by `upload_file`.
    async fn delete_file(&self, url: &str) -> Result<(), AppError>;
}

pub struct S3MediaStore {
    client: aws_sdk_s3::Client,
    bucket: String,
    endpoint: String,
}

impl S3MediaStore {
    pub fn new(client: aws_sdk_s3::Client, bucket: String, endpoint: String) -> Self {
        Self {
            client,
            bucket,
            endpoint: endpoint.trim_end_matches('/').to_string(),
        }
    }

    fn public_url(&self, key: &str) -> String {
        format!("{}/{}/{}", self.endpoint, self.bucket, key)
    }

    /// Inverse of `public_url`. `None` for URLs outside this bucket.
    fn key_from_url<'u>(&self, url: &'u str) -> Option<&'u str> {
        url.strip_prefix(&self.endpoint)?
            .strip_prefix('/')?
            .strip_prefix(self.bucket.as_str())?
            .strip_prefix('/')
            .filter(|key| !key.is_empty())
    }
}

/// Keeps the key readable and path-safe.
fn sanitize_file_name(name: &str) -> String {
    let cleaned: String = name
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or_default()
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect();
    if cleaned.trim_matches('.').is_empty() {
        "upload".to_string()
    } else {
        cleaned
    }
}

pub fn object_key(folder: &str, user_id: Uuid, file_name: &str) -> String {
    format!(
        "{folder}/{user_id}/{}-{}",
        Uuid::new_v4(),
        sanitize_file_name(file_name)
    )
}

#[async_trait]
impl MediaStore for S3MediaStore {
    async fn upload_file(
        &self,
        user_id: Uuid,
        file: UploadedFile,
        folder: &str,
    ) -> Result<String, AppError> {
        let key = object_key(folder, user_id, &file.file_name);
        let content_type = file
            .content_type
            .unwrap_or_else(|| "application/octet-stream".to_string());

        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(&key)
            .body(ByteStream::from(file.bytes))
            .content_type(content_type)
            .send()
            .await
            .map_err(|e| AppError::Storage(format!("S3 upload failed: {e}")))?;

        info!("Uploaded s3://{}/{}", self.bucket, key);
        Ok(self.public_url(&key))
    }

    async fn delete_file(&self, url: &str) -> Result<(), AppError> {
        let key = self
            .key_from_url(url)
            .ok_or_else(|| AppError::Storage(format!("Not an object in {}: {url}", self.bucket)))?;

        self.client
            .delete_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| AppError::Storage(format!("S3 delete failed: {e}")))?;

        info!("Deleted s3://{}/{}", self.bucket, key);
        Ok(())
    }
}

/// Records uploads and hands back deterministic URLs.
#[cfg(test)]
#[derive(Default)]
pub struct MemoryMediaStore {
    pub uploads: tokio::sync::Mutex<Vec<(Uuid, String, usize)>>,
}

#[cfg(test)]
#[async_trait]
impl MediaStore for MemoryMediaStore {
    async fn upload_file(
        &self,
        user_id: Uuid,
        file: UploadedFile,
        folder: &str,
    ) -> Result<String, AppError> {
        let url = format!("memory://{folder}/{user_id}/{}", file.file_name);
        self.uploads
            .lock()
            .await
            .push((user_id, url.clone(), file.bytes.len()));
        Ok(url)
    }

    async fn delete_file(&self, url: &str) -> Result<(), AppError> {
        self.uploads.lock().await.retain(|(_, stored, _)| stored != url);
        Ok(())
    }
}
