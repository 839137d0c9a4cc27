use std::fmt;

use huaci_types::{
    DictionaryResult, LOOKUP_FAILED, LookupRequest, LookupResult, TRANSLATION_FAILED,
    TranslationResult,
};

/// Panels open this far right of and below the pointer
pub const POINTER_OFFSET: f64 = 25.0;

pub const LOADING_TEXT: &str = "Looking up...";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PanelId(pub u64);

impl fmt::Display for PanelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "panel-{}", self.0)
    }
}

/// Colour state of the "save word" heart
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveIndicator {
    Idle,
    Saved,
}

/// Everything a surface needs to draw one panel
#[derive(Debug, Clone, PartialEq)]
pub struct PanelView {
    pub id: PanelId,
    /// Text the user selected; what "save word" sends
    pub query: String,
    pub left: f64,
    pub top: f64,
    pub title: String,
    pub title_link: Option<String>,
    pub lines: Vec<String>,
    pub pending: bool,
    /// Present only on dictionary panels that found the word
    pub save: Option<SaveIndicator>,
}

pub fn dictionary_link(word: &str) -> String {
    format!("https://cn.bing.com/dict/{word}")
}

/// Placeholder shown while the request is in flight
pub fn pending_view(id: PanelId, page_x: f64, page_y: f64, request: &LookupRequest) -> PanelView {
    let (title, title_link) = match request {
        LookupRequest::Dictionary(word) | LookupRequest::AddWord(word) => {
            (word.clone(), Some(dictionary_link(word)))
        }
        LookupRequest::TranslateBaidu(_) => ("Baidu Translate".to_string(), None),
        LookupRequest::TranslateTencent(_) => ("Tencent Translate".to_string(), None),
    };

    PanelView {
        id,
        query: request.query().to_string(),
        left: page_x + POINTER_OFFSET,
        top: page_y + POINTER_OFFSET,
        title,
        title_link,
        lines: vec![LOADING_TEXT.to_string()],
        pending: true,
        save: None,
    }
}

/// Replace the placeholder content with a lookup result
pub fn apply_result(view: &PanelView, result: &LookupResult) -> PanelView {
    let mut next = view.clone();
    next.pending = false;

    match result {
        LookupResult::Dictionary(DictionaryResult {
            found: true,
            headword,
            definitions,
            ..
        }) => {
            next.title = headword.clone();
            next.title_link = Some(dictionary_link(headword));
            next.lines = definitions.clone();
            next.save = Some(SaveIndicator::Idle);
        }
        LookupResult::Dictionary(DictionaryResult { message, .. }) => {
            next.lines = vec![message.clone().unwrap_or_else(|| LOOKUP_FAILED.to_string())];
            next.save = None;
        }
        LookupResult::Translation(TranslationResult { ok: true, text }) => {
            next.lines = vec![text.clone()];
        }
        LookupResult::Translation(TranslationResult { text, .. }) => {
            let message = if text.is_empty() { TRANSLATION_FAILED } else { text.as_str() };
            next.lines = vec![message.to_string()];
        }
        LookupResult::AddWord(saved) => {
            // content is untouched; only the indicator may flip
            next.pending = view.pending;
            if saved.success && next.save.is_some() {
                next.save = Some(SaveIndicator::Saved);
            }
        }
    }

    next
}
