use scraper::{ElementRef, Selector};
use url::Url;

use crate::parser::dom::first_descendant_named;
use crate::parser::ProfileDocument;

/// Why a directory entry produced no profile URL.
#[derive(Debug, thiserror::Error)]
pub enum UnresolvedEntry {
    #[error("no link in entry")]
    NoAnchor,
    #[error("link has no href")]
    NoHref,
    #[error("cannot resolve {href:?}: {source}")]
    Invalid {
        href: String,
        source: url::ParseError,
    },
}

/// Member thumbnails on a listing page, in page order.
pub fn entries<'a>(listing: &'a ProfileDocument, entry: &Selector) -> Vec<ElementRef<'a>> {
    listing.html().select(entry).collect()
}

/// Profile URL of one entry: its first link's `href`, resolved against the
/// listing page.
pub fn profile_url(entry: ElementRef<'_>, listing_url: &Url) -> Result<Url, UnresolvedEntry> {
    let anchor = first_descendant_named(entry, "a").ok_or(UnresolvedEntry::NoAnchor)?;
    let href = anchor.value().attr("href").ok_or(UnresolvedEntry::NoHref)?;
    listing_url
        .join(href.trim())
        .map_err(|source| UnresolvedEntry::Invalid {
            href: href.to_string(),
            source,
        })
}
