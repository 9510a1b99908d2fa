//! Inline image payloads carried in `answer_image`.
//!
//! Evaluators may attach a photo as a `data:image/<type>;base64,<payload>` URL.
//! Before an answer is persisted every inline payload is decoded, handed to
//! the [`ImageStore`], and replaced with the stored reference.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;

use geria_core::models::evaluation_answer::FormAnswer;
use geria_core::models::submission::INLINE_IMAGE_PREFIX;

use crate::collaborators::ImageStore;
use crate::error::EvaluationError;

/// A decoded inline image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InlineImage {
    pub content_type: &'static str,
    pub extension: &'static str,
    pub bytes: Vec<u8>,
}

const SUPPORTED: &[(&str, &str)] = &[
    ("image/png", "png"),
    ("image/jpeg", "jpg"),
    ("image/jpg", "jpg"),
    ("image/webp", "webp"),
    ("image/gif", "gif"),
];

pub fn is_inline(value: &str) -> bool {
    value.starts_with(INLINE_IMAGE_PREFIX)
}

/// Decode a `data:` URL. Only base64-encoded images of a supported type are accepted.
pub fn parse_data_url(url: &str) -> Result<InlineImage, EvaluationError> {
    let malformed =
        |reason: &str| EvaluationError::BadRequest(format!("malformed inline image: {reason}"));

    let rest = url
        .strip_prefix(INLINE_IMAGE_PREFIX)
        .ok_or_else(|| malformed("expected a data: URL"))?;
    let (header, payload) = rest
        .split_once(',')
        .ok_or_else(|| malformed("missing payload separator"))?;
    let media_type = header
        .strip_suffix(";base64")
        .ok_or_else(|| malformed("payload must be base64"))?;

    let (content_type, extension) = SUPPORTED
        .iter()
        .find(|(mime, _)| mime.eq_ignore_ascii_case(media_type))
        .copied()
        .ok_or_else(|| malformed(&format!("unsupported media type {media_type:?}")))?;

    let bytes = STANDARD
        .decode(payload.trim())
        .map_err(|e| malformed(&e.to_string()))?;
    if bytes.is_empty() {
        return Err(malformed("empty payload"));
    }

    Ok(InlineImage {
        content_type,
        extension,
        bytes,
    })
}

/// Store every inline image in `answers` and swap in the stored references.
///
/// All payloads across every form are decoded before anything is stored, so
/// a malformed image stores nothing. Returns the number of images stored.
pub async fn store_inline_images(
    images: &dyn ImageStore,
    answers: &mut [FormAnswer],
) -> Result<usize, EvaluationError> {
    let mut decoded = Vec::new();
    for (form, answer) in answers.iter().enumerate() {
        for (question, qa) in answer.question_answers.iter().enumerate() {
            if let Some(url) = qa.answer_image.as_deref()
                && is_inline(url)
            {
                decoded.push((form, question, parse_data_url(url)?));
            }
        }
    }

    let count = decoded.len();
    for (form, question, image) in decoded {
        let reference = images.store(image).await?;
        answers[form].question_answers[question].answer_image = Some(reference);
    }

    if count > 0 {
        tracing::debug!(forms = answers.len(), count, "stored inline images");
    }
    Ok(count)
}
