use async_trait::async_trait;

use crate::errors::AppError;

/// Seam for the translation endpoint: `{text, target, source}` in,
/// translated text out. The Worker-backed implementation lives in
/// `external::worker`.
#[async_trait]
pub trait Translator: Send + Sync {
    async fn translate(
        &self,
        text: &str,
        target: &str,
        source: &str,
    ) -> Result<String, AppError>;
}
