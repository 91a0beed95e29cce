use scraper::ElementRef;
use url::Url;

use super::dom::{
    descendant_elements, first_descendant_named, has_element_children, nth_element_child,
    resolve_href, tag_name, text_content,
};
use super::record::{FieldValue, Link, ListItem};

/// Turn a field's value region into a [`FieldValue`] by its structural shape.
///
/// Precedence:
/// 1. no element children → whole text
/// 2. `<address>` → whole text
/// 3. `<ul>` → one item per `<li>`, a link if the item holds an anchor
/// 4. otherwise by first element child: `<span>` text, `<a>` link, `<p>`
///    link-or-text, anything else absent
///
/// Never fails; unknown layouts come back as [`FieldValue::Absent`].
pub fn classify_value(region: ElementRef<'_>, base: &Url) -> FieldValue {
    if !has_element_children(region) {
        return FieldValue::Text(text_content(region));
    }

    match tag_name(region) {
        "address" => FieldValue::Text(text_content(region)),
        "ul" => classify_list(region, base),
        _ => classify_by_first_child(region, base),
    }
}

fn classify_list(list: ElementRef<'_>, base: &Url) -> FieldValue {
    let items: Vec<ListItem> = descendant_elements(list)
        .filter(|e| tag_name(*e) == "li")
        .map(|li| match first_descendant_named(li, "a") {
            Some(a) => ListItem::Link(Link::new(text_content(a), resolve_href(a, base))),
            None => ListItem::Text(text_content(li)),
        })
        .collect();

    if items.is_empty() {
        FieldValue::Absent
    } else {
        FieldValue::ItemList(items)
    }
}

fn classify_by_first_child(region: ElementRef<'_>, base: &Url) -> FieldValue {
    let Some(child) = nth_element_child(region, 0) else {
        return FieldValue::Absent;
    };

    match tag_name(child) {
        "span" => FieldValue::Text(text_content(region)),
        "a" => {
            let own = text_content(region);
            let text = if own.is_empty() { text_content(child) } else { own };
            FieldValue::Link(Link::new(text, resolve_href(child, base)))
        }
        "p" => match first_descendant_named(child, "a") {
            Some(a) => FieldValue::Link(Link::new(text_content(region), resolve_href(a, base))),
            None => FieldValue::Text(text_content(region)),
        },
        _ => FieldValue::Absent,
    }
}
