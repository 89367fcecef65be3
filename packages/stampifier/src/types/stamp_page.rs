//! Stamp page types - one card of the generated story.

use serde::{Deserialize, Serialize};

use super::content::{Embedding, SentenceWithAttributes};

/// The kind of stamp page, derived from the content bound to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StampPageType {
    TextOnly,
    MediaOnly,
    /// Media with either an overlay title or an overlay text
    MediaWithText,
    MediaWithTextAndTitle,
    Embedded,
    Quoted,
}

/// Coarse grouping of stamp page types used to reward variety.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CoarseType {
    Text,
    Visual,
    Embedded,
    Quoted,
}

impl StampPageType {
    /// Score of the richest page type.
    pub const MAX_SCORE: f32 = 20.0;

    /// Relative "interest" of the page type.
    pub fn score(&self) -> f32 {
        match self {
            StampPageType::TextOnly => 1.0,
            StampPageType::Quoted => 2.5,
            StampPageType::Embedded => 5.0,
            StampPageType::MediaOnly => 7.5,
            StampPageType::MediaWithText => 10.0,
            StampPageType::MediaWithTextAndTitle => Self::MAX_SCORE,
        }
    }

    pub fn coarse(&self) -> CoarseType {
        match self {
            StampPageType::TextOnly => CoarseType::Text,
            StampPageType::MediaOnly
            | StampPageType::MediaWithText
            | StampPageType::MediaWithTextAndTitle => CoarseType::Visual,
            StampPageType::Embedded => CoarseType::Embedded,
            StampPageType::Quoted => CoarseType::Quoted,
        }
    }
}

/// A candidate stamp page.
///
/// Created once per content unit. After creation only `overlay_title`
/// (title matching) and `stamp_position` (final ordering) change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StampPage {
    /// Content index of the media, embed or quote shown on the page
    pub media_index: Option<usize>,

    /// Content index of the paragraph the overlay text came from
    pub para_index: Option<usize>,

    pub sentence_in_para_index: usize,

    pub sentence_weight: f32,

    pub is_embedded_content: bool,

    pub is_quoted_content: bool,

    pub overlay_title: Option<String>,

    pub overlay_text: Option<String>,

    pub overlay_font_style: Option<String>,

    /// Index of the page in the final story, set after picking
    pub stamp_position: Option<usize>,

    /// Embedding of whatever best describes the page.
    ///
    /// The sentence embedding for text pages, the description embedding
    /// for media-only pages, a per-type descriptor for embeds.
    pub stamp_descriptor_embedding: Embedding,

    pub stamp_type: StampPageType,
}

impl StampPage {
    /// A page that only shows a summary sentence.
    pub fn text_only(sentence: &SentenceWithAttributes) -> Self {
        let mut page = Self::blank(sentence.embedding.clone());
        page.set_sentence(sentence);
        page.refresh_stamp_type();
        page
    }

    /// A page that only shows a media item.
    pub fn media_only(media_index: usize, descriptor: Embedding) -> Self {
        let mut page = Self::blank(descriptor);
        page.media_index = Some(media_index);
        page.refresh_stamp_type();
        page
    }

    /// A page showing a media item with a matched sentence as overlay text.
    pub fn media_with_sentence(media_index: usize, sentence: &SentenceWithAttributes) -> Self {
        let mut page = Self::blank(sentence.embedding.clone());
        page.media_index = Some(media_index);
        page.set_sentence(sentence);
        page.refresh_stamp_type();
        page
    }

    /// A page showing third-party embedded content.
    pub fn embedded(content_index: usize, descriptor: Embedding) -> Self {
        let mut page = Self::blank(descriptor);
        page.media_index = Some(content_index);
        page.is_embedded_content = true;
        page.refresh_stamp_type();
        page
    }

    /// A page showing a quote.
    pub fn quoted(content_index: usize, text: impl Into<String>, descriptor: Embedding) -> Self {
        let mut page = Self::blank(descriptor);
        page.media_index = Some(content_index);
        page.is_quoted_content = true;
        page.overlay_text = Some(text.into());
        page.refresh_stamp_type();
        page
    }

    fn blank(descriptor: Embedding) -> Self {
        Self {
            media_index: None,
            para_index: None,
            sentence_in_para_index: 0,
            sentence_weight: 0.0,
            is_embedded_content: false,
            is_quoted_content: false,
            overlay_title: None,
            overlay_text: None,
            overlay_font_style: None,
            stamp_position: None,
            stamp_descriptor_embedding: descriptor,
            stamp_type: StampPageType::TextOnly,
        }
    }

    fn set_sentence(&mut self, sentence: &SentenceWithAttributes) {
        self.para_index = Some(sentence.paragraph_index);
        self.sentence_in_para_index = sentence.sentence_index_in_para;
        self.sentence_weight = sentence.sentence_weight;
        self.overlay_text = Some(sentence.text.clone());
        self.overlay_font_style = sentence.font_style.clone();
    }

    /// Set the overlay title and re-derive the page type.
    pub fn set_overlay_title(&mut self, title: impl Into<String>) {
        self.overlay_title = Some(title.into());
        self.refresh_stamp_type();
    }

    /// Derive the page type from the content currently bound to the page.
    pub fn classify(&self) -> StampPageType {
        if self.is_embedded_content {
            return StampPageType::Embedded;
        }
        if self.is_quoted_content {
            return StampPageType::Quoted;
        }
        match (
            self.media_index,
            self.overlay_title.is_some(),
            self.overlay_text.is_some(),
        ) {
            (None, _, _) => StampPageType::TextOnly,
            (Some(_), true, true) => StampPageType::MediaWithTextAndTitle,
            (Some(_), true, false) | (Some(_), false, true) => StampPageType::MediaWithText,
            (Some(_), false, false) => StampPageType::MediaOnly,
        }
    }

    pub fn refresh_stamp_type(&mut self) {
        self.stamp_type = self.classify();
    }

    /// Position of the page content in the source document.
    ///
    /// Pages with text sort by their weighted sentence index, other pages
    /// by the content index of their media.
    pub fn document_position(&self) -> f32 {
        match (self.para_index, self.media_index) {
            (Some(para), _) => para as f32 + self.sentence_in_para_index as f32 * self.sentence_weight,
            (None, Some(media)) => media as f32,
            (None, None) => f32::MAX,
        }
    }
}

/// Result of capping a candidate list.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PickedStampPages {
    /// Pages kept for the story
    pub capped_stamp_pages: Vec<StampPage>,

    /// Pages left out, kept for later use
    pub unused_stamp_pages: Vec<StampPage>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sentence(text: &str, para: usize) -> SentenceWithAttributes {
        SentenceWithAttributes::new(text, para, vec![1.0, 0.0])
    }

    #[test]
    fn test_classify_page_types() {
        assert_eq!(StampPage::text_only(&sentence("a", 0)).stamp_type, StampPageType::TextOnly);
        assert_eq!(StampPage::media_only(2, vec![]).stamp_type, StampPageType::MediaOnly);
        assert_eq!(
            StampPage::media_with_sentence(2, &sentence("a", 0)).stamp_type,
            StampPageType::MediaWithText
        );
        assert_eq!(StampPage::embedded(5, vec![]).stamp_type, StampPageType::Embedded);
        assert_eq!(StampPage::quoted(6, "q", vec![]).stamp_type, StampPageType::Quoted);
    }

    #[test]
    fn test_overlay_title_upgrades_type() {
        let mut page = StampPage::media_only(1, vec![]);
        page.set_overlay_title("Title");
        assert_eq!(page.stamp_type, StampPageType::MediaWithText);

        let mut page = StampPage::media_with_sentence(1, &sentence("a", 0));
        page.set_overlay_title("Title");
        assert_eq!(page.stamp_type, StampPageType::MediaWithTextAndTitle);
    }

    #[test]
    fn test_scores_increase_with_richness() {
        let ordered = [
            StampPageType::TextOnly,
            StampPageType::Quoted,
            StampPageType::Embedded,
            StampPageType::MediaOnly,
            StampPageType::MediaWithText,
            StampPageType::MediaWithTextAndTitle,
        ];
        for pair in ordered.windows(2) {
            assert!(pair[0].score() < pair[1].score());
        }
        assert_eq!(StampPageType::MediaWithTextAndTitle.score(), StampPageType::MAX_SCORE);
    }

    #[test]
    fn test_document_position() {
        let text = StampPage::text_only(
            &sentence("a", 4).with_position_in_paragraph(2, 0.5),
        );
        assert_eq!(text.document_position(), 5.0);
        assert_eq!(StampPage::media_only(7, vec![]).document_position(), 7.0);
    }
}
