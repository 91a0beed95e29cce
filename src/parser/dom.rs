use scraper::ElementRef;
use url::Url;

/// Element children only, skipping text and comment nodes.
pub fn element_children<'a>(el: ElementRef<'a>) -> impl Iterator<Item = ElementRef<'a>> + 'a {
    el.children().filter_map(ElementRef::wrap)
}

/// The `n`th element child (0-based), if the element has that many.
pub fn nth_element_child(el: ElementRef<'_>, n: usize) -> Option<ElementRef<'_>> {
    element_children(el).nth(n)
}

pub fn has_element_children(el: ElementRef<'_>) -> bool {
    element_children(el).next().is_some()
}

/// Strict descendants in document order; the element itself is excluded.
pub fn descendant_elements<'a>(el: ElementRef<'a>) -> impl Iterator<Item = ElementRef<'a>> + 'a {
    el.descendants().skip(1).filter_map(ElementRef::wrap)
}

/// First strict descendant with the given (lowercase) tag name.
pub fn first_descendant_named<'a>(el: ElementRef<'a>, tag: &str) -> Option<ElementRef<'a>> {
    descendant_elements(el).find(|e| tag_name(*e) == tag)
}

pub fn tag_name<'a>(el: ElementRef<'a>) -> &'a str {
    el.value().name()
}

/// Concatenation of every descendant text node, untrimmed.
pub fn text_content(el: ElementRef<'_>) -> String {
    el.text().collect()
}

/// The anchor's `href` the way a browser reports it on the DOM property.
///
/// Absolute hrefs come back verbatim, relative ones are joined onto `base`.
/// A missing attribute gives the empty string; an href that cannot be
/// resolved is returned as written.
pub fn resolve_href(anchor: ElementRef<'_>, base: &Url) -> String {
    let Some(raw) = anchor.value().attr("href") else {
        return String::new();
    };
    let raw = raw.trim();
    if Url::parse(raw).is_ok() {
        return raw.to_string();
    }
    base.join(raw)
        .map(|u| u.to_string())
        .unwrap_or_else(|_| raw.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use scraper::{Html, Selector};

    fn first<'a>(html: &'a Html, css: &str) -> ElementRef<'a> {
        html.select(&Selector::parse(css).unwrap()).next().unwrap()
    }

    #[test]
    fn children_skip_text_nodes() {
        let html = Html::parse_document("<div id=x> a <b>1</b> c <i>2</i> </div>");
        let div = first(&html, "#x");
        let tags: Vec<_> = element_children(div).map(tag_name).collect();
        assert_eq!(tags, vec!["b", "i"]);
        assert_eq!(nth_element_child(div, 1).map(tag_name), Some("i"));
        assert!(nth_element_child(div, 2).is_none());
    }

    #[test]
    fn text_content_keeps_whitespace() {
        let html = Html::parse_document("<div id=x> a <b>1</b> c </div>");
        assert_eq!(text_content(first(&html, "#x")), " a 1 c ");
    }

    #[test]
    fn descendant_search_excludes_self() {
        let html = Html::parse_document("<a id=outer href=/x>t</a>");
        assert!(first_descendant_named(first(&html, "#outer"), "a").is_none());
    }

    #[test]
    fn href_resolution() {
        let base = Url::parse("https://dir.test/members/profile.aspx?id=1").unwrap();
        let html = Html::parse_document(
            r#"<a id=abs href="http://x.test">x</a>
               <a id=rel href="/member/7">y</a>
               <a id=none>z</a>
               <a id=mail href="mailto:a@b.test">m</a>"#,
        );
        assert_eq!(resolve_href(first(&html, "#abs"), &base), "http://x.test");
        assert_eq!(
            resolve_href(first(&html, "#rel"), &base),
            "https://dir.test/member/7"
        );
        assert_eq!(resolve_href(first(&html, "#none"), &base), "");
        assert_eq!(resolve_href(first(&html, "#mail"), &base), "mailto:a@b.test");
    }
}
