use indexmap::IndexMap;

/// A hyperlinked datum. Serialized with the directory's established keys
/// `data` / `link`.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct Link {
    #[serde(rename = "data")]
    pub text: String,
    #[serde(rename = "link")]
    pub url: String,
}

impl Link {
    pub fn new(text: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            url: url.into(),
        }
    }
}

/// One entry of an item list: either plain text or a link.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
#[serde(untagged)]
pub enum ListItem {
    Text(String),
    Link(Link),
}

/// Value of one profile field, chosen by the shape of its value region.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    Text(String),
    Link(Link),
    ItemList(Vec<ListItem>),
    /// Structure matched no known layout. Serialized as `null`.
    Absent,
}

impl FieldValue {
    pub fn text(s: impl Into<String>) -> Self {
        FieldValue::Text(s.into())
    }
}

/// Label → value mapping for one member, in document order.
///
/// Re-inserting a label keeps the label's original position and replaces
/// its value.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize)]
#[serde(transparent)]
pub struct MemberRecord {
    fields: IndexMap<String, FieldValue>,
}

impl MemberRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set `label` to `value`, returning the value it replaced.
    pub fn insert(&mut self, label: String, value: FieldValue) -> Option<FieldValue> {
        self.fields.insert(label, value)
    }

    pub fn get(&self, label: &str) -> Option<&FieldValue> {
        self.fields.get(label)
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}
