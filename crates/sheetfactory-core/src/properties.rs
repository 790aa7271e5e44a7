//! Document-level metadata

/// Descriptive properties of a workbook
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DocumentProperties {
    pub title: Option<String>,
    pub subject: Option<String>,
    pub creator: Option<String>,
    pub keywords: Option<String>,
    pub description: Option<String>,
    pub company: Option<String>,
}

impl DocumentProperties {
    /// Check whether no property is set
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}
