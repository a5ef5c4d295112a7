//! Positional pairing of text and image results

use crate::delivery::looks_like_error;
use crate::state::{FinalOutput, ImageGenerationOutput, MergedItem, TextGenerationOutput};

/// Build the final output from whichever sub-outputs are present.
///
/// Texts and images are paired by index up to the longer list; a missing
/// item or field on either side contributes `None`. A sentinel error output
/// contributes no items, and an embedded `Error: ...` value becomes `None`.
pub fn merge_results(
    text_output: Option<&TextGenerationOutput>,
    image_output: Option<&ImageGenerationOutput>,
) -> FinalOutput {
    let texts: Vec<Option<String>> = text_output
        .and_then(|output| output.parsed())
        .map(|batch| {
            batch
                .blogs
                .iter()
                .map(|item| usable(item.as_ref().and_then(|t| t.content_of_blog.as_ref()), "text"))
                .collect()
        })
        .unwrap_or_default();

    let images: Vec<Option<String>> = image_output
        .and_then(|output| output.parsed())
        .map(|batch| {
            batch
                .images
                .iter()
                .map(|item| usable(item.as_ref().and_then(|i| i.image_url.as_ref()), "image"))
                .collect()
        })
        .unwrap_or_default();

    let len = texts.len().max(images.len());
    let combined_results = (0..len)
        .map(|i| {
            MergedItem::new(
                texts.get(i).cloned().flatten(),
                images.get(i).cloned().flatten(),
            )
        })
        .collect();

    FinalOutput {
        text_generation_results: text_output.cloned(),
        image_generation_results: image_output.cloned(),
        combined_results,
    }
}

/// Drop values that carry a tool error instead of content
fn usable(value: Option<&String>, kind: &str) -> Option<String> {
    match value {
        Some(v) if looks_like_error(v) => {
            tracing::warn!("Dropping {} result that holds an error: {}", kind, v);
            None
        }
        other => other.cloned(),
    }
}
