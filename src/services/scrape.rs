//! Search result page scraping.
//!
//! All knowledge of the catalog's markup lives here. The rest of the crate
//! only sees [`RawFragment`]s, so a markup change means swapping this
//! component (or its selectors) and nothing else.

use scraper::{ElementRef, Html, Selector};

use crate::error::{AppError, Result};
use crate::models::SelectorConfig;

/// Untrimmed text pieces belonging to one search result.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawFragment {
    /// `href` of the primary anchor, as written in the page
    pub href: String,
    pub title: String,
    pub authors: String,
    pub publisher: String,
    pub annotation: String,
}

/// Turns a fetched page into the result fragments it contains.
pub trait PageScraper: Send + Sync {
    /// Fragments in page order, one per primary anchor.
    fn scrape(&self, html: &str) -> Result<Vec<RawFragment>>;
}

/// [`PageScraper`] driven by CSS selectors.
pub struct HtmlPageScraper {
    record_anchor: Selector,
    primary_anchor_class: String,
    info_container: Selector,
    title: Selector,
    author_icon: Selector,
    publisher_icon: Selector,
    annotation: Selector,
}

impl HtmlPageScraper {
    /// Compile the configured selectors.
    pub fn new(config: &SelectorConfig) -> Result<Self> {
        Ok(Self {
            record_anchor: Self::parse_selector(&config.record_anchor)?,
            primary_anchor_class: config.primary_anchor_class.clone(),
            info_container: Self::parse_selector(&config.info_container)?,
            title: Self::parse_selector(&config.title)?,
            author_icon: Self::parse_selector(&config.author_icon)?,
            publisher_icon: Self::parse_selector(&config.publisher_icon)?,
            annotation: Self::parse_selector(&config.annotation)?,
        })
    }

    /// A page renders both a cover link and a title link per record. Only
    /// the one carrying the primary class is the record root.
    fn is_primary(&self, anchor: &ElementRef) -> bool {
        anchor.value().attr("class") == Some(self.primary_anchor_class.as_str())
    }

    fn fragment(&self, anchor: ElementRef) -> RawFragment {
        let href = anchor.value().attr("href").unwrap_or_default().to_string();

        // The info block is a descendant of the anchor's parent.
        let info = anchor
            .parent()
            .and_then(ElementRef::wrap)
            .and_then(|parent| parent.select(&self.info_container).next());

        let Some(info) = info else {
            return RawFragment {
                href,
                ..RawFragment::default()
            };
        };

        RawFragment {
            href,
            title: first_text(&info, &self.title),
            authors: icon_link_text(&info, &self.author_icon),
            publisher: icon_link_text(&info, &self.publisher_icon),
            annotation: first_text(&info, &self.annotation),
        }
    }

    fn parse_selector(s: &str) -> Result<Selector> {
        Selector::parse(s).map_err(|e| AppError::selector(s, format!("{e:?}")))
    }
}

impl PageScraper for HtmlPageScraper {
    fn scrape(&self, html: &str) -> Result<Vec<RawFragment>> {
        let document = Html::parse_document(html);
        let fragments = document
            .select(&self.record_anchor)
            .filter(|anchor| self.is_primary(anchor))
            .map(|anchor| self.fragment(anchor))
            .collect();
        Ok(fragments)
    }
}

fn first_text(scope: &ElementRef, selector: &Selector) -> String {
    scope
        .select(selector)
        .next()
        .map(|el| el.text().collect())
        .unwrap_or_default()
}

/// Text of the link wrapping an icon span.
fn icon_link_text(scope: &ElementRef, icon: &Selector) -> String {
    scope
        .select(icon)
        .next()
        .and_then(|span| span.parent())
        .and_then(ElementRef::wrap)
        .map(|link| link.text().collect())
        .unwrap_or_default()
}
