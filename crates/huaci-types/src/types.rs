use serde::{Deserialize, Serialize};

pub const NO_DEFINITION: &str = "no definition";
pub const REQUEST_ERROR: &str = "request error";
pub const LOOKUP_FAILED: &str = "lookup failed";
pub const TRANSLATION_FAILED: &str = "translation failed";

/// Modifier key held while the pointer event fired
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModifierKey {
    #[default]
    None,
    Alt,
    Ctrl,
    Shift,
}

impl ModifierKey {
    pub fn is(self, key: DrawKey) -> bool {
        matches!(
            (self, key),
            (ModifierKey::Alt, DrawKey::Alt)
                | (ModifierKey::Ctrl, DrawKey::Ctrl)
                | (ModifierKey::Shift, DrawKey::Shift)
        )
    }
}

/// Modifier that turns a mouse-up into a sentence translation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DrawKey {
    Alt,
    #[default]
    Ctrl,
    Shift,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TriggerKind {
    DoubleClick,
    MouseUp,
}

/// A text selection on a page, consumed immediately
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectionEvent {
    pub text: String,
    pub page_x: f64,
    pub page_y: f64,
    #[serde(default)]
    pub modifier: ModifierKey,
    pub trigger: TriggerKind,
    pub hostname: String,
}

/// A document-level click, used to close panels
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClickEvent {
    pub page_x: f64,
    pub page_y: f64,
    #[serde(default)]
    pub modifier: ModifierKey,
}

/// One lookup, named by provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", content = "msg")]
pub enum LookupRequest {
    #[serde(rename = "dictionary")]
    Dictionary(String),
    #[serde(rename = "baidu")]
    TranslateBaidu(String),
    #[serde(rename = "tencent")]
    TranslateTencent(String),
    #[serde(rename = "addWord")]
    AddWord(String),
}

impl LookupRequest {
    pub fn query(&self) -> &str {
        match self {
            LookupRequest::Dictionary(q)
            | LookupRequest::TranslateBaidu(q)
            | LookupRequest::TranslateTencent(q)
            | LookupRequest::AddWord(q) => q,
        }
    }

    pub fn provider_name(&self) -> &'static str {
        match self {
            LookupRequest::Dictionary(_) => "dictionary",
            LookupRequest::TranslateBaidu(_) => "baidu",
            LookupRequest::TranslateTencent(_) => "tencent",
            LookupRequest::AddWord(_) => "addWord",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DictionaryResult {
    pub found: bool,
    pub headword: String,
    pub definitions: Vec<String>,
    /// Set only when `found` is false
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl DictionaryResult {
    pub fn found(headword: impl Into<String>, definitions: Vec<String>) -> Self {
        Self {
            found: true,
            headword: headword.into(),
            definitions,
            message: None,
        }
    }

    pub fn not_found(headword: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            found: false,
            headword: headword.into(),
            definitions: vec![],
            message: Some(message.into()),
        }
    }
}

/// `text` is the translation when `ok`, the failure message otherwise
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslationResult {
    pub ok: bool,
    pub text: String,
}

impl TranslationResult {
    pub fn ok(text: impl Into<String>) -> Self {
        Self {
            ok: true,
            text: text.into(),
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            text: message.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddWordResult {
    pub success: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum LookupResult {
    Dictionary(DictionaryResult),
    Translation(TranslationResult),
    AddWord(AddWordResult),
}

impl LookupResult {
    pub fn is_success(&self) -> bool {
        match self {
            LookupResult::Dictionary(r) => r.found,
            LookupResult::Translation(r) => r.ok,
            LookupResult::AddWord(r) => r.success,
        }
    }
}
