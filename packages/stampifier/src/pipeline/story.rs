//! Stamp story builder.
//!
//! Runs the full selection flow for one source page:
//!
//! ```text
//! sentences + media ─► text-media matching ─► assembly ─► titles
//!   ─► sort by document position ─► picker ─► final order ─► positions
//! ```

use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use super::assemble::{
    apply_title_matches, assemble_stamp_pages, assign_stamp_positions, sort_by_document_position,
};
use crate::error::Result;
use crate::matching::{match_text_and_media, UnusedContents};
use crate::picking::{partition, StampPagePicker};
use crate::types::config::{CappingMethod, StoryConfig};
use crate::types::content::{ContentUnit, EmbeddedItem, MediaItem, QuoteItem, SentenceWithAttributes};
use crate::types::descriptors::DescriptorEmbeddings;
use crate::types::stamp_page::StampPage;

/// Extracted content of one source page.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StampStoryInput {
    /// Summary sentences, in document order
    pub sentences: Vec<SentenceWithAttributes>,

    #[serde(default)]
    pub media: Vec<MediaItem>,

    #[serde(default)]
    pub quotes: Vec<QuoteItem>,

    #[serde(default)]
    pub embedded: Vec<EmbeddedItem>,

    /// Title sentences, matched to media for overlay titles
    #[serde(default)]
    pub titles: Vec<SentenceWithAttributes>,
}

/// The stamp pages of one story.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StampStory {
    /// Pages to render, with `stamp_position` set `0..n`
    pub stamp_pages: Vec<StampPage>,

    /// Candidates left out
    pub unused_stamp_pages: Vec<StampPage>,

    /// Strategy that picked the pages
    pub capping_method: CappingMethod,
}

/// Builds stamp stories with one configuration and descriptor map.
#[derive(Debug, Clone, Default)]
pub struct StampStoryBuilder {
    config: StoryConfig,
    descriptors: DescriptorEmbeddings,
    picker: StampPagePicker,
}

impl StampStoryBuilder {
    pub fn new(config: StoryConfig, descriptors: DescriptorEmbeddings) -> Self {
        let picker = StampPagePicker::new(config.picker.clone());
        Self {
            config,
            descriptors,
            picker,
        }
    }

    pub fn config(&self) -> &StoryConfig {
        &self.config
    }

    /// Candidate stamp pages in document order, before capping.
    pub fn candidates(&self, input: &StampStoryInput) -> Result<Vec<StampPage>> {
        let matched = match_text_and_media(input.sentences.clone(), input.media.clone())?;

        let mut units: Vec<ContentUnit> = matched
            .matched
            .into_iter()
            .map(|(sentence, media)| ContentUnit::MatchedPair(sentence, media))
            .collect();
        match matched.unused {
            UnusedContents::Sentences(sentences) => {
                units.extend(sentences.into_iter().map(ContentUnit::Sentence))
            }
            UnusedContents::Media(media) => units.extend(media.into_iter().map(ContentUnit::Media)),
            UnusedContents::None => {}
        }
        units.extend(input.quotes.iter().cloned().map(ContentUnit::Quote));
        units.extend(input.embedded.iter().cloned().map(ContentUnit::Embedded));

        let mut pages = assemble_stamp_pages(units, &self.descriptors);
        apply_title_matches(&mut pages, input.titles.clone(), &input.media)?;
        sort_by_document_position(&mut pages);
        Ok(pages)
    }

    /// Build the story for one page of content.
    #[instrument(skip_all, fields(
        sentences = input.sentences.len(),
        media = input.media.len(),
        max_pages = self.config.max_pages,
    ))]
    pub fn build(&self, input: &StampStoryInput) -> Result<StampStory> {
        let pages = self.candidates(input)?;
        let selection = self.picker.select(
            &pages,
            &input.sentences,
            self.config.max_pages,
            self.config.capping_method,
        )?;

        let ordered = selection.ordered;
        let mut picked = partition(pages, &selection);
        if !ordered {
            sort_by_document_position(&mut picked.capped_stamp_pages);
        }
        assign_stamp_positions(&mut picked.capped_stamp_pages);

        info!(
            pages = picked.capped_stamp_pages.len(),
            unused = picked.unused_stamp_pages.len(),
            method = %selection.method,
            "Built stamp story"
        );

        Ok(StampStory {
            stamp_pages: picked.capped_stamp_pages,
            unused_stamp_pages: picked.unused_stamp_pages,
            capping_method: selection.method,
        })
    }
}
