use crate::error::{CollectError, Result};
use crate::lyrics::clean_lyrics;
use scraper::{Html, Node, Selector};
use serde::{Deserialize, Serialize};

/// Markup markers used to find lyrics and album on a song page.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScrapeRules {
    /// CSS selector of the lyrics container.
    pub lyrics_selector: String,
    /// Text of the inline label that precedes the album name.
    pub album_label: String,
}

impl Default for ScrapeRules {
    fn default() -> Self {
        Self {
            lyrics_selector: "div.lyrics".to_string(),
            album_label: "Album".to_string(),
        }
    }
}

/// A parsed lyrics page.
pub struct SongPage {
    document: Html,
}

impl SongPage {
    pub fn parse(html: &str) -> Self {
        Self {
            document: Html::parse_document(html),
        }
    }
}

/// Pulls lyrics and album out of a [`SongPage`] according to [`ScrapeRules`].
#[derive(Debug, Clone)]
pub struct PageExtractor {
    lyrics: Selector,
    labels: Selector,
    album_label: String,
}

impl PageExtractor {
    pub fn new(rules: &ScrapeRules) -> Result<Self> {
        let lyrics = Selector::parse(&rules.lyrics_selector).map_err(|e| {
            CollectError::Extraction(format!(
                "invalid lyrics selector '{}': {e:?}",
                rules.lyrics_selector
            ))
        })?;
        let labels = Selector::parse("span")
            .map_err(|e| CollectError::Extraction(format!("label selector: {e:?}")))?;
        Ok(Self {
            lyrics,
            labels,
            album_label: rules.album_label.clone(),
        })
    }

    /// Text of the first lyrics container, `<br>` kept as line breaks, then
    /// normalised with [`clean_lyrics`].
    pub fn lyrics(&self, page: &SongPage) -> Result<String> {
        let container = page.document.select(&self.lyrics).next().ok_or_else(|| {
            CollectError::Extraction("lyrics container not found".to_string())
        })?;

        let mut raw = String::new();
        for node in container.descendants() {
            match node.value() {
                Node::Text(text) => raw.push_str(text),
                Node::Element(el) if el.name() == "br" => raw.push('\n'),
                _ => {}
            }
        }

        Ok(clean_lyrics(&raw))
    }

    /// The trimmed text of the label right after the one reading exactly
    /// `album_label`, or an empty string when the page has no album.
    pub fn album(&self, page: &SongPage) -> String {
        let mut labels = page
            .document
            .select(&self.labels)
            .map(|el| el.text().collect::<String>());

        labels
            .by_ref()
            .find(|text| *text == self.album_label)
            .and_then(|_| labels.next())
            .map(|text| text.trim().to_string())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"
<html><body>
  <div class="header">
    <span>Produced by</span><span>Someone</span>
    <span>Album</span>
    <span>
      Swimming
    </span>
    <span>Album</span><span>Not this one</span>
  </div>
  <div class="lyrics">
    <p>[Verse 1]<br>My regrets look just like texts I shouldn't send<br>
    And I <a href="/annotation">spend</a> my days  (days) up getting high<br><br>[Chorus]<br>Come back to earth</p>
  </div>
</body></html>
"#;

    fn extractor() -> PageExtractor {
        PageExtractor::new(&ScrapeRules::default()).unwrap()
    }

    #[test]
    fn test_album_follows_label() {
        let page = SongPage::parse(PAGE);
        assert_eq!(extractor().album(&page), "Swimming");
    }

    #[test]
    fn test_album_missing_is_empty() {
        let page = SongPage::parse("<html><body><span>Albums</span><span>X</span></body></html>");
        assert_eq!(extractor().album(&page), "");
    }

    #[test]
    fn test_album_label_last_on_page() {
        let page = SongPage::parse("<html><body><span>Album</span></body></html>");
        assert_eq!(extractor().album(&page), "");
    }

    #[test]
    fn test_lyrics_from_container() {
        let page = SongPage::parse(PAGE);
        let lyrics = extractor().lyrics(&page).unwrap();
        // Indentation from the HTML source survives, collapsed to one space.
        assert_eq!(
            lyrics,
            "My regrets look just like texts I shouldn't send\n \
             And I spend my days up getting high\n\
             Come back to earth"
        );
    }

    #[test]
    fn test_missing_container_is_extraction_error() {
        let page = SongPage::parse("<html><body><div class=\"bio\">no lyrics</div></body></html>");
        let err = extractor().lyrics(&page).unwrap_err();
        assert!(matches!(err, CollectError::Extraction(_)));
    }

    #[test]
    fn test_custom_selector_and_label() {
        let rules = ScrapeRules {
            lyrics_selector: "div[data-lyrics-container='true']".to_string(),
            album_label: "Album".to_string(),
        };
        let page = SongPage::parse(
            "<div data-lyrics-container=\"true\">Line one<br>(Ooh)<br>Line two</div>",
        );
        let lyrics = PageExtractor::new(&rules).unwrap().lyrics(&page).unwrap();
        assert_eq!(lyrics, "Line one\nLine two");
    }

    #[test]
    fn test_invalid_selector_rejected() {
        let rules = ScrapeRules {
            lyrics_selector: "div[".to_string(),
            ..ScrapeRules::default()
        };
        assert!(PageExtractor::new(&rules).is_err());
    }
}
