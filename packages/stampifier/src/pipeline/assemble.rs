//! Stamp page assembly and ordering.

use tracing::{debug, warn};

use crate::error::Result;
use crate::matching::match_text_and_media;
use crate::types::content::{ContentUnit, MediaItem, SentenceWithAttributes};
use crate::types::descriptors::DescriptorEmbeddings;
use crate::types::stamp_page::StampPage;

/// Build one candidate page per content unit, in unit order.
pub fn assemble_stamp_pages(
    units: Vec<ContentUnit>,
    descriptors: &DescriptorEmbeddings,
) -> Vec<StampPage> {
    units
        .into_iter()
        .map(|unit| match unit {
            ContentUnit::MatchedPair(sentence, media) => {
                StampPage::media_with_sentence(media.content_index, &sentence)
            }
            ContentUnit::Sentence(sentence) => StampPage::text_only(&sentence),
            ContentUnit::Media(media) => {
                StampPage::media_only(media.content_index, media.description_embedding)
            }
            ContentUnit::Quote(quote) => {
                StampPage::quoted(quote.content_index, quote.text, quote.embedding)
            }
            ContentUnit::Embedded(item) => {
                let descriptor = match descriptors.get(item.content_type) {
                    Some(embedding) => embedding.clone(),
                    None => {
                        warn!(
                            content_type = ?item.content_type,
                            content_index = item.content_index,
                            "No descriptor embedding for embedded content, page covers nothing"
                        );
                        Vec::new()
                    }
                };
                StampPage::embedded(item.content_index, descriptor)
            }
        })
        .collect()
}

/// Match title sentences to media and put each matched title on every
/// page showing that media.
///
/// Unmatched titles and media are ignored. Returns the number of pages
/// that received a title.
pub fn apply_title_matches(
    pages: &mut [StampPage],
    titles: Vec<SentenceWithAttributes>,
    media: &[MediaItem],
) -> Result<usize> {
    if titles.is_empty() || media.is_empty() {
        return Ok(0);
    }

    let matches = match_text_and_media(titles, media.to_vec())?;
    let mut titled = 0;
    for (title, media) in &matches.matched {
        for page in pages.iter_mut().filter(|p| {
            p.media_index == Some(media.content_index)
                && !p.is_embedded_content
                && !p.is_quoted_content
        }) {
            page.set_overlay_title(title.text.clone());
            titled += 1;
        }
    }

    debug!(titles = matches.matched.len(), pages = titled, "Applied overlay titles");
    Ok(titled)
}

/// Stable sort by position in the source document.
pub fn sort_by_document_position(pages: &mut [StampPage]) {
    pages.sort_by(|a, b| a.document_position().total_cmp(&b.document_position()));
}

/// Number the pages `0..n` in their current order.
pub fn assign_stamp_positions(pages: &mut [StampPage]) {
    for (position, page) in pages.iter_mut().enumerate() {
        page.stamp_position = Some(position);
    }
}
