use scraper::{ElementRef, Html, Selector};

use super::dom::{descendant_elements, nth_element_child, text_content};

/// A field group with both its label and its value region located.
#[derive(Debug, Clone, Copy)]
pub struct ResolvedGroup<'a> {
    pub label: ElementRef<'a>,
    pub value: ElementRef<'a>,
}

impl ResolvedGroup<'_> {
    pub fn label_text(&self) -> String {
        text_content(self.label)
    }
}

/// Every element matching the group selector, in document order.
pub fn find_groups<'a>(html: &'a Html, group: &Selector) -> Vec<ElementRef<'a>> {
    html.select(group).collect()
}

/// First strict descendant of `group` matching the label selector.
pub fn find_label<'a>(group: ElementRef<'a>, label: &Selector) -> Option<ElementRef<'a>> {
    descendant_elements(group).find(|e| label.matches(e))
}

/// The third element child, or the second when the layout drops the
/// decorative middle child.
pub fn find_value_region(group: ElementRef<'_>) -> Option<ElementRef<'_>> {
    nth_element_child(group, 2).or_else(|| nth_element_child(group, 1))
}

/// Locate label and value region, or `None` when the group is to be dropped.
pub fn resolve_group<'a>(group: ElementRef<'a>, label: &Selector) -> Option<ResolvedGroup<'a>> {
    let label = find_label(group, label)?;
    let value = find_value_region(group)?;
    Some(ResolvedGroup { label, value })
}
