use serde::{Deserialize, Serialize};

use crate::config::AttributeConfig;
use crate::dom::{Element, is_dataset_falsy};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ModalSize {
    #[serde(rename = "sm")]
    Small,
    #[default]
    #[serde(rename = "md")]
    Medium,
    #[serde(rename = "lg")]
    Large,
    #[serde(rename = "xl")]
    ExtraLarge,
    #[serde(rename = "fullscreen")]
    Fullscreen,
}

impl ModalSize {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "sm" | "small" => Some(Self::Small),
            "md" | "medium" => Some(Self::Medium),
            "lg" | "large" => Some(Self::Large),
            "xl" | "extra-large" => Some(Self::ExtraLarge),
            "fullscreen" => Some(Self::Fullscreen),
            _ => None,
        }
    }
}

/// Options of one modal open. Persisted in history, so plain data only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ModalOptions {
    pub size: ModalSize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub css_class: Option<String>,
    pub dismissible: bool,
}

impl Default for ModalOptions {
    fn default() -> Self {
        Self {
            size: ModalSize::default(),
            title: None,
            css_class: None,
            dismissible: true,
        }
    }
}

impl ModalOptions {
    /// Reads `data-naja-modal-{size,title,class,dismissible}` from the opener.
    ///
    /// Invalid values fall back to defaults rather than failing the open.
    pub fn from_element(opener: &Element, attributes: &AttributeConfig) -> Self {
        let mut options = Self::default();

        if let Some(raw) = opener.attr(&attributes.modal_option("size")) {
            match ModalSize::parse(raw) {
                Some(size) => options.size = size,
                None => tracing::debug!(raw, "unknown modal size"),
            }
        }
        options.title = non_blank(opener.attr(&attributes.modal_option("title")));
        options.css_class = non_blank(opener.attr(&attributes.modal_option("class")));
        options.dismissible = !is_dataset_falsy(opener, &attributes.modal_option("dismissible"));
        options
    }
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}
