use async_trait::async_trait;
use shared::error::AppResult;

/// 部屋画像の置き場。生成したファイル名をキーにした blob ストアとして扱う。
#[async_trait]
pub trait ImageStorage: Send + Sync {
    // 画像を保存し、配信用の URL パスを返す
    async fn save(&self, original_filename: &str, content: Vec<u8>) -> AppResult<String>;
    // URL パスで指定された画像を削除する。存在しない場合もエラーにしない
    async fn delete(&self, image_url: &str) -> AppResult<()>;
}
