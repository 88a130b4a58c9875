use tracing::warn;

use crate::errors::AppError;
use crate::external::translator::Translator;
use crate::models::content::ContentBlock;
use crate::services::content_parser::parse_html_content;

pub const DEFAULT_LANGUAGE: &str = "en";

/// Language codes the translation Worker accepts.
pub const SUPPORTED_LANGUAGES: [&str; 12] = [
    "en", "es", "fr", "de", "it", "pt", "bg", "tr", "ja", "zh", "hi", "ar",
];

pub fn validate_language(code: &str) -> Result<(), AppError> {
    if SUPPORTED_LANGUAGES.contains(&code) {
        Ok(())
    } else {
        Err(AppError::Validation(format!(
            "Unsupported language: {}",
            code
        )))
    }
}

// ==============================================================================
// Batch Translation
// ==============================================================================

/// Translate several texts in one request by joining them with newlines and
/// splitting the response.
///
/// The join protocol cannot represent newlines inside an input, so embedded
/// newlines are flattened to spaces before joining; and if the response
/// still splits to the wrong count, the originals are returned rather than
/// misaligned translations. Failures degrade to the originals as well.
pub async fn batch_translate(
    translator: &dyn Translator,
    texts: &[String],
    target: &str,
    source: &str,
) -> Vec<String> {
    if texts.is_empty() {
        return Vec::new();
    }

    let sanitized: Vec<String> = texts
        .iter()
        .map(|text| {
            if text.contains('\n') || text.contains('\r') {
                warn!("Flattening embedded newlines before batch translation");
                text.split(['\n', '\r'])
                    .filter(|part| !part.is_empty())
                    .collect::<Vec<_>>()
                    .join(" ")
            } else {
                text.clone()
            }
        })
        .collect();

    let combined = sanitized.join("\n");
    let translated = match translator.translate(&combined, target, source).await {
        Ok(translated) => translated,
        Err(e) => {
            warn!("Batch translation failed, keeping originals: {}", e);
            return texts.to_vec();
        }
    };

    let parts: Vec<String> = translated.split('\n').map(str::to_string).collect();
    if parts.len() != texts.len() {
        warn!(
            "Batch translation returned {} segments for {} inputs, keeping originals",
            parts.len(),
            texts.len()
        );
        return texts.to_vec();
    }

    parts
}

// ==============================================================================
// Article Translation
// ==============================================================================

#[derive(Debug, Clone)]
pub struct TranslatedArticle {
    pub title: String,
    pub blocks: Vec<ContentBlock>,
}

/// Translate an article's title and raw HTML body, then re-parse the
/// translated HTML into content blocks so the renderer never touches HTML.
pub async fn translate_article(
    translator: &dyn Translator,
    title: &str,
    content_html: &str,
    target: &str,
) -> Result<TranslatedArticle, AppError> {
    validate_language(target)?;

    if target == DEFAULT_LANGUAGE {
        return Ok(TranslatedArticle {
            title: title.to_string(),
            blocks: parse_html_content(content_html),
        });
    }

    let title = translator
        .translate(title, target, DEFAULT_LANGUAGE)
        .await?;
    let translated_html = translator
        .translate(content_html, target, DEFAULT_LANGUAGE)
        .await?;

    Ok(TranslatedArticle {
        title,
        blocks: parse_html_content(&translated_html),
    })
}
