//! Article extraction
//!
//! Turns the raw HTML returned by the wiki into an [`ArticleRecord`]: the
//! first description paragraph (cleaned by [`sanitize`]), a representative
//! image, the canonical article link and a display name.

pub mod sanitize;

use dom_query::{Document, Selection};
use thiserror::Error;
use tracing::debug;

use crate::data::ArticleRecord;

/// Description paragraph candidates, in document order
///
/// Intro extracts put paragraphs at the top level; parsed revisions wrap them
/// in `.mw-parser-output`. Empty placeholder paragraphs are skipped.
const DESCRIPTION_SELECTOR: &str =
    "body > p:not(.mw-empty-elt), body > div.mw-parser-output > p:not(.mw-empty-elt)";

/// Image containers searched in priority order
pub const IMAGE_CONTAINERS: &[&str] = &[".infobox_v2", ".infobox", ".thumb"];

/// Avatar path relative to the site base URL, used when no image is found
pub const DEFAULT_AVATAR_PATH: &str = "/images/upload/author-avatar.jpg";

/// Errors that can occur while extracting an article
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ExtractionError {
    /// The raw HTML has no description paragraph
    #[error("No description paragraph found in article HTML")]
    MissingParagraph,
}

/// Builds [`ArticleRecord`]s from raw article HTML
#[derive(Debug, Clone)]
pub struct ContentExtractor {
    default_image: String,
}

impl Default for ContentExtractor {
    fn default() -> Self {
        Self::new("")
    }
}

impl ContentExtractor {
    /// Creates an extractor whose fallback image lives under `site_base_url`
    pub fn new(site_base_url: &str) -> Self {
        Self {
            default_image: default_avatar_url(site_base_url),
        }
    }

    /// Image URL used when the article has none
    pub fn default_image(&self) -> &str {
        &self.default_image
    }

    /// Extracts a record from `raw_html`
    ///
    /// # Arguments
    /// * `raw_html` - HTML fragment returned by the wiki
    /// * `title` - Requested title, used verbatim in the source link
    /// * `wiki_url` - Language-scoped wiki root, e.g. `http://en.wikipedia.org`
    ///
    /// # Returns
    /// * `Ok(ArticleRecord)` - The cleaned record
    /// * `Err(ExtractionError::MissingParagraph)` - If no paragraph describes the article
    pub fn extract(
        &self,
        raw_html: &str,
        title: &str,
        wiki_url: &str,
    ) -> Result<ArticleRecord, ExtractionError> {
        let doc = Document::from(raw_html);

        let description = doc.select(DESCRIPTION_SELECTOR).first();
        if !description.exists() {
            return Err(ExtractionError::MissingParagraph);
        }

        sanitize::sanitize(&description, wiki_url);

        let image_url = find_image(&doc).unwrap_or_else(|| self.default_image.clone());
        let display_name = find_display_name(&description);

        debug!(
            title,
            image = %image_url,
            display_name = ?display_name,
            "extracted article"
        );

        Ok(ArticleRecord {
            html_fragment: description.html().to_string(),
            image_url,
            source_url: format!("{wiki_url}/wiki/{title}"),
            display_name,
        })
    }
}

/// Fallback avatar for a site base URL
pub fn default_avatar_url(site_base_url: &str) -> String {
    format!(
        "{}{}",
        site_base_url.trim_end_matches('/'),
        DEFAULT_AVATAR_PATH
    )
}

/// First image `src` inside the highest-priority container that has one
fn find_image(doc: &Document) -> Option<String> {
    IMAGE_CONTAINERS.iter().find_map(|container| {
        doc.select(&format!("{container} img"))
            .nodes()
            .iter()
            .find_map(|node| Selection::from(*node).attr("src"))
            .map(|src| src.to_string())
    })
}

/// Text of the first strong element, as is
fn find_display_name(description: &Selection) -> Option<String> {
    let strong = description.select("strong").first();
    strong.exists().then(|| strong.text().to_string())
}
