//! In-place cleanup of the description paragraph
//!
//! Every pass mutates the selected paragraph directly; the caller serializes it
//! afterwards.

use dom_query::Selection;

/// Elements dropped from the description and replaced by a single space
///
/// Covers pronunciation glyphs, citation markers, print-only chrome and media
/// "play" icons.
pub const NOISE_SELECTORS: &[&str] = &[".unicode", ".reference", ".noprint", "img[alt=play]"];

/// Phonetic transcription markup collapsed to plain text
pub const PHONETIC_SELECTOR: &str = ".IPA";

/// Site-relative article links start with this prefix
pub const WIKI_PATH_PREFIX: &str = "/wiki/";

/// Runs every cleanup pass over `description`
///
/// `wiki_url` is the language-scoped wiki root (no trailing slash) used to make
/// article links absolute.
pub fn sanitize(description: &Selection, wiki_url: &str) {
    strip_noise(description);
    strengthen_bold(description);
    flatten_phonetics(description);
    absolutize_links(description, wiki_url);
}

/// Replaces noise elements with a single space so neighbouring words stay apart
pub fn strip_noise(description: &Selection) {
    for selector in NOISE_SELECTORS {
        for node in description.select(selector).nodes() {
            Selection::from(*node).replace_with_html(" ");
        }
    }
}

/// Turns `<b>` into `<strong>` holding only the element's text
pub fn strengthen_bold(description: &Selection) {
    for node in description.select("b").nodes() {
        let sel = Selection::from(*node);
        let text = sel.text();
        sel.set_text(&text);
        sel.rename("strong");
    }
}

/// Drops the inner markup of phonetic transcriptions, keeping their text
pub fn flatten_phonetics(description: &Selection) {
    for node in description.select(PHONETIC_SELECTOR).nodes() {
        let sel = Selection::from(*node);
        let text = sel.text();
        sel.set_text(&text);
    }
}

/// Prefixes `/wiki/...` hrefs with the wiki root
pub fn absolutize_links(description: &Selection, wiki_url: &str) {
    for node in description.select("a[href]").nodes() {
        let sel = Selection::from(*node);
        let Some(href) = sel.attr("href") else {
            continue;
        };
        if href.starts_with(WIKI_PATH_PREFIX) {
            let absolute = format!("{wiki_url}{}", &*href);
            sel.set_attr("href", &absolute);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dom_query::Document;

    fn paragraph(doc: &Document) -> Selection<'_> {
        doc.select("p").first()
    }

    #[test]
    fn test_reference_replaced_by_space() {
        let doc = Document::from(
            r##"<p>Paris<sup class="reference"><a href="#cite-1">[1]</a></sup>is big.</p>"##,
        );
        let p = paragraph(&doc);

        strip_noise(&p);

        let text = p.text().to_string();
        assert!(doc.select(".reference").is_empty());
        assert!(!text.contains("[1]"));
        assert!(text.contains("Paris is"), "words should stay apart: {text}");
        assert!(!text.contains("Parisis"));
    }

    #[test]
    fn test_all_noise_kinds_removed() {
        let doc = Document::from(
            r#"<p>A<span class="unicode">ˈ</span>B<span class="noprint">edit</span>C<img alt="play" src="play.png">D</p>"#,
        );
        let p = paragraph(&doc);

        strip_noise(&p);

        assert!(doc.select(".unicode").is_empty());
        assert!(doc.select(".noprint").is_empty());
        assert!(doc.select("img").is_empty());
        assert!(!p.text().contains("edit"));
    }

    #[test]
    fn test_noise_outside_description_untouched() {
        let doc = Document::from(
            r#"<p>Intro<sup class="reference">[1]</sup></p><div><sup class="reference">[2]</sup></div>"#,
        );

        strip_noise(&paragraph(&doc));

        assert_eq!(doc.select(".reference").length(), 1);
    }

    #[test]
    fn test_bold_becomes_strong_with_text_only() {
        let doc = Document::from(r#"<p><b>Paris</b> is the capital.</p>"#);
        let p = paragraph(&doc);

        strengthen_bold(&p);

        assert!(doc.select("b").is_empty());
        let strong = doc.select("p strong");
        assert_eq!(strong.length(), 1);
        assert_eq!(strong.text().to_string(), "Paris");
        assert!(p.html().contains("<strong>Paris</strong>"));
    }

    #[test]
    fn test_bold_markup_is_flattened_and_escaped() {
        let doc = Document::from(r#"<p><b><i>Tom</i> &amp; Jerry</b></p>"#);
        let p = paragraph(&doc);

        strengthen_bold(&p);

        let strong = doc.select("strong");
        assert!(strong.select("i").is_empty());
        assert_eq!(strong.text().to_string(), "Tom & Jerry");
        assert!(strong.inner_html().contains("&amp;"));
    }

    #[test]
    fn test_phonetics_collapsed_to_text() {
        let doc = Document::from(
            r#"<p>Paris (<span class="IPA"><a href="/wiki/Help:IPA">/ˈpær.ɪs/</a></span>)</p>"#,
        );
        let p = paragraph(&doc);

        flatten_phonetics(&p);

        let ipa = doc.select(".IPA");
        assert!(ipa.select("a").is_empty());
        assert_eq!(ipa.text().to_string(), "/ˈpær.ɪs/");
    }

    #[test]
    fn test_phonetic_text_stays_escaped() {
        let doc = Document::from(r#"<p><span class="IPA"><i>a</i> &lt;b&gt; &amp; c</span></p>"#);
        let p = paragraph(&doc);

        flatten_phonetics(&p);

        let ipa = doc.select(".IPA");
        assert!(ipa.select("i").is_empty());
        assert!(ipa.select("b").is_empty());
        assert_eq!(ipa.text().to_string(), "a <b> & c");
        assert!(ipa.inner_html().contains("&lt;b&gt;"));
    }

    #[test]
    fn test_wiki_links_made_absolute() {
        let doc = Document::from(
            r#"<p>Capital of <a href="/wiki/France">France</a>, see <a href="https://example.org/x">site</a>.</p>"#,
        );
        let p = paragraph(&doc);

        absolutize_links(&p, "http://en.wikipedia.org");

        let hrefs: Vec<String> = doc
            .select("a")
            .nodes()
            .iter()
            .filter_map(|node| Selection::from(*node).attr("href").map(|h| h.to_string()))
            .collect();
        assert_eq!(
            hrefs,
            vec![
                "http://en.wikipedia.org/wiki/France".to_string(),
                "https://example.org/x".to_string(),
            ]
        );
    }

    #[test]
    fn test_sanitize_runs_every_pass() {
        let doc = Document::from(
            r#"<p><b>Lyon</b><sup class="reference">[1]</sup>is in <a href="/wiki/France">France</a>.</p>"#,
        );
        let p = paragraph(&doc);

        sanitize(&p, "http://fr.wikipedia.org");

        let html = p.html().to_string();
        assert!(html.contains("<strong>Lyon</strong>"));
        assert!(html.contains(r#"href="http://fr.wikipedia.org/wiki/France""#));
        assert!(!html.contains("reference"));
    }
}
