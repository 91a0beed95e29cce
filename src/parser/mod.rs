pub mod dom;
pub mod groups;
pub mod record;
pub mod shapes;

use std::sync::LazyLock;

use scraper::{Html, Selector};
use url::Url;

pub use record::{FieldValue, Link, ListItem, MemberRecord};

static GROUP_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(".form-group").unwrap());
static LABEL_SELECTOR: LazyLock<Selector> = LazyLock::new(|| Selector::parse("label").unwrap());
static BASE_SELECTOR: LazyLock<Selector> = LazyLock::new(|| Selector::parse("base[href]").unwrap());

/// One rendered profile page: the parsed tree and the URL it came from.
pub struct ProfileDocument {
    html: Html,
    url: Url,
    base: Url,
}

impl ProfileDocument {
    pub fn parse(source: &str, url: Url) -> Self {
        let html = Html::parse_document(source);
        let base = document_base(&html, &url);
        Self { html, url, base }
    }

    pub fn html(&self) -> &Html {
        &self.html
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    /// URL relative links resolve against: the first `<base href>` joined
    /// onto the page URL, or the page URL itself.
    pub fn base_url(&self) -> &Url {
        &self.base
    }
}

fn document_base(html: &Html, url: &Url) -> Url {
    html.select(&BASE_SELECTOR)
        .next()
        .and_then(|base| base.value().attr("href"))
        .and_then(|href| url.join(href.trim()).ok())
        .unwrap_or_else(|| url.clone())
}

impl std::fmt::Debug for ProfileDocument {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProfileDocument")
            .field("url", &self.url.as_str())
            .finish_non_exhaustive()
    }
}

/// Selectors naming the field-group and label roles of a profile page.
#[derive(Debug, Clone)]
pub struct ProfileSelectors {
    pub group: Selector,
    pub label: Selector,
}

impl Default for ProfileSelectors {
    fn default() -> Self {
        Self {
            group: GROUP_SELECTOR.clone(),
            label: LABEL_SELECTOR.clone(),
        }
    }
}

/// Extract one member record from a profile page.
///
/// `None` when the page has no field groups at all; otherwise a record with
/// one entry per group that resolved, later labels overwriting earlier ones.
pub fn extract_member(doc: &ProfileDocument, selectors: &ProfileSelectors) -> Option<MemberRecord> {
    let candidates = groups::find_groups(doc.html(), &selectors.group);
    if candidates.is_empty() {
        return None;
    }

    let mut record = MemberRecord::new();
    for group in candidates {
        let Some(resolved) = groups::resolve_group(group, &selectors.label) else {
            continue;
        };
        let value = shapes::classify_value(resolved.value, doc.base_url());
        record.insert(resolved.label_text(), value);
    }
    Some(record)
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(body: &str) -> ProfileDocument {
        let url = Url::parse("https://dir.test/directory/profile.aspx?id=42").unwrap();
        ProfileDocument::parse(&format!("<html><body>{body}<div id=footer></div></body></html>"), url)
    }

    fn extract(body: &str) -> Option<MemberRecord> {
        extract_member(&doc(body), &ProfileSelectors::default())
    }

    #[test]
    fn no_groups_is_none() {
        assert!(extract("<div class=panel><label>Name</label><div>x</div></div>").is_none());
    }

    #[test]
    fn all_groups_discarded_is_empty_record() {
        let r = extract(r#"<div class="form-group"><span>no label</span><div>x</div></div>"#).unwrap();
        assert!(r.is_empty());
    }

    #[test]
    fn address_scenario() {
        let r = extract(
            r#"<div class="form-group"><label>Address</label><address>123 Main St</address></div>"#,
        )
        .unwrap();
        assert_eq!(serde_json::to_string(&r).unwrap(), r#"{"Address":"123 Main St"}"#);
    }

    #[test]
    fn links_scenario() {
        let r = extract(
            r#"<div class="form-group"><label>Links</label><ul><li><a href="http://x.test">Site</a></li><li>Other</li></ul></div>"#,
        )
        .unwrap();
        assert_eq!(
            serde_json::to_string(&r).unwrap(),
            r#"{"Links":[{"data":"Site","link":"http://x.test"},"Other"]}"#
        );
    }

    #[test]
    fn later_label_wins() {
        let r = extract(
            r#"<div class="form-group"><label>Phone</label><div>111</div></div>
               <div class="form-group"><label>Email</label><div>a@b.test</div></div>
               <div class="form-group"><label>Phone</label><div>222</div></div>"#,
        )
        .unwrap();
        assert_eq!(r.len(), 2);
        assert_eq!(r.get("Phone"), Some(&FieldValue::text("222")));
        assert_eq!(r.labels().collect::<Vec<_>>(), vec!["Phone", "Email"]);
    }

    #[test]
    fn discarded_groups_do_not_stop_assembly() {
        let r = extract(
            r#"<div class="form-group"><label>Fax</label></div>
               <div class="form-group"><label>Logo</label><div><img src=l.png></div></div>
               <div class="form-group"><label>Firm</label><i></i><div>Acme LLP</div></div>"#,
        )
        .unwrap();
        assert_eq!(r.get("Fax"), None);
        assert_eq!(r.get("Logo"), Some(&FieldValue::Absent));
        assert_eq!(r.get("Firm"), Some(&FieldValue::text("Acme LLP")));
    }

    #[test]
    fn relative_links_resolve_against_page() {
        let r = extract(
            r#"<div class="form-group"><label>Web</label><div><a href="/site/9">Firm site</a></div></div>"#,
        )
        .unwrap();
        assert_eq!(
            r.get("Web"),
            Some(&FieldValue::Link(Link::new("Firm site", "https://dir.test/site/9")))
        );
    }

    #[test]
    fn base_element_overrides_page_url() {
        let url = Url::parse("https://dir.test/a/profile.aspx").unwrap();
        let d = ProfileDocument::parse(
            r#"<html><head><base href="https://cdn.test/"></head><body>
               <div class="form-group"><label>W</label><div><a href="x">t</a></div></div>
               </body></html>"#,
            url,
        );
        assert_eq!(d.base_url().as_str(), "https://cdn.test/");
        let r = extract_member(&d, &ProfileSelectors::default()).unwrap();
        assert_eq!(
            serde_json::to_string(&r).unwrap(),
            r#"{"W":{"data":"t","link":"https://cdn.test/x"}}"#
        );
    }

    #[test]
    fn relative_base_element_joins_page_url() {
        let url = Url::parse("https://dir.test/a/profile.aspx").unwrap();
        let d = ProfileDocument::parse(r#"<html><head><base href="/static/"></head></html>"#, url);
        assert_eq!(d.base_url().as_str(), "https://dir.test/static/");
    }

    #[test]
    fn reextraction_is_stable() {
        let d = doc(
            r#"<div class="form-group"><label>Name</label><div><span>Jane</span> Doe</div></div>
               <div class="form-group"><label>Areas</label><ul><li>Tax</li><li>Estate</li></ul></div>"#,
        );
        let sel = ProfileSelectors::default();
        assert_eq!(extract_member(&d, &sel), extract_member(&d, &sel));
    }

    #[test]
    fn custom_selectors() {
        let sel = ProfileSelectors {
            group: Selector::parse(".field").unwrap(),
            label: Selector::parse("dt").unwrap(),
        };
        let d = doc(r#"<dl class="field"><dt>Bar No.</dt><dd>24001234</dd></dl>"#);
        let r = extract_member(&d, &sel).unwrap();
        assert_eq!(r.get("Bar No."), Some(&FieldValue::text("24001234")));
    }
}
