use std::path::PathBuf;

use async_trait::async_trait;
use uuid::Uuid;

use kernel::repository::image::ImageStorage;
use shared::{config::StorageConfig, error::{AppError, AppResult}};

/// ローカルディスク上の画像置き場。ファイル名は UUID で生成し、
/// `/uploads/<ファイル名>` の URL パスで配信する。
pub struct LocalImageStorage {
    upload_dir: PathBuf,
}

const URL_PREFIX: &str = "/uploads/";

impl LocalImageStorage {
    pub fn new(config: &StorageConfig) -> Self {
        Self {
            upload_dir: PathBuf::from(&config.upload_dir),
        }
    }
}

#[async_trait]
impl ImageStorage for LocalImageStorage {
    async fn save(&self, original_filename: &str, content: Vec<u8>) -> AppResult<String> {
        let ext = original_filename.rsplit('.').next().unwrap_or("bin");
        let filename = format!("{}.{ext}", Uuid::new_v4());

        tokio::fs::create_dir_all(&self.upload_dir)
            .await
            .map_err(AppError::ImageStoreError)?;
        tokio::fs::write(self.upload_dir.join(&filename), content)
            .await
            .map_err(AppError::ImageStoreError)?;
        Ok(format!("{URL_PREFIX}{filename}"))
    }

    async fn delete(&self, image_url: &str) -> AppResult<()> {
        let Some(filename) = image_url.strip_prefix(URL_PREFIX) else {
            return Err(AppError::UnprocessableEntity(format!(
                "画像の URL パスが不正です：{image_url}"
            )));
        };
        // ディレクトリの外を指すパスは受け付けない
        if filename.contains('/') || filename.contains("..") {
            return Err(AppError::UnprocessableEntity(format!(
                "画像の URL パスが不正です：{image_url}"
            )));
        }

        match tokio::fs::remove_file(self.upload_dir.join(filename)).await {
            Ok(()) => Ok(()),
            // 既に消えている場合は部屋の削除を止めない
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::warn!(%image_url, "image file was already gone");
                Ok(())
            }
            Err(e) => Err(AppError::ImageStoreError(e)),
        }
    }
}
