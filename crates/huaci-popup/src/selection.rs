use std::sync::LazyLock;

use huaci_config::{Settings, TranslateProvider};
use huaci_types::{LookupRequest, SelectionEvent, TriggerKind};
use regex::Regex;

static WORD_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9]+$").expect("word pattern is valid"));

/// Whether `text` can go to the dictionary as a single word
pub fn is_single_word(text: &str) -> bool {
    WORD_RE.is_match(text.trim())
}

/// Trim and fold line breaks and runs of whitespace into single spaces
pub fn normalize_sentence(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Decide whether a selection opens a popup, and with which request.
///
/// Double-click with `clickLookup` looks up single words only. Mouse-up with
/// the configured draw key held translates any selection when sentence
/// translation is on.
pub fn qualify(event: &SelectionEvent, settings: &Settings) -> Option<LookupRequest> {
    if settings.is_ignored(&event.hostname) {
        tracing::debug!("selection ignored on {}", event.hostname);
        return None;
    }

    let text = event.text.trim();
    if text.is_empty() {
        return None;
    }

    match event.trigger {
        TriggerKind::DoubleClick => {
            if settings.click_lookup && is_single_word(text) {
                Some(LookupRequest::Dictionary(text.to_string()))
            } else {
                None
            }
        }
        TriggerKind::MouseUp => {
            let chord = event.modifier.is(settings.draw_key);
            if !(chord && settings.draw_lookup && settings.translate) {
                return None;
            }

            let query = normalize_sentence(text);
            Some(match settings.translate_provider {
                TranslateProvider::Baidu => LookupRequest::TranslateBaidu(query),
                TranslateProvider::Tencent => LookupRequest::TranslateTencent(query),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use huaci_types::{DrawKey, ModifierKey};

    fn event(text: &str, trigger: TriggerKind, modifier: ModifierKey) -> SelectionEvent {
        SelectionEvent {
            text: text.to_string(),
            page_x: 10.0,
            page_y: 20.0,
            modifier,
            trigger,
            hostname: "en.wikipedia.org".to_string(),
        }
    }

    fn translating() -> Settings {
        Settings {
            translate: true,
            ..Settings::default()
        }
    }

    #[test]
    fn single_word_pattern() {
        assert!(is_single_word("hello123"));
        assert!(is_single_word("  Hello "));
        assert!(!is_single_word("hello world"));
        assert!(!is_single_word("héllo"));
        assert!(!is_single_word("don't"));
        assert!(!is_single_word(""));
    }

    #[test]
    fn double_click_word_goes_to_dictionary() {
        let request = qualify(
            &event(" serendipity ", TriggerKind::DoubleClick, ModifierKey::None),
            &Settings::default(),
        );
        assert_eq!(request, Some(LookupRequest::Dictionary("serendipity".into())));
    }

    #[test]
    fn double_click_sentence_does_nothing() {
        let request = qualify(
            &event("hello world", TriggerKind::DoubleClick, ModifierKey::None),
            &translating(),
        );
        assert_eq!(request, None);
    }

    #[test]
    fn double_click_disabled() {
        let settings = Settings {
            click_lookup: false,
            ..Settings::default()
        };
        assert_eq!(
            qualify(&event("word", TriggerKind::DoubleClick, ModifierKey::None), &settings),
            None
        );
    }

    #[test]
    fn modifier_mouse_up_translates_anything() {
        let request = qualify(
            &event("Good\n  morning, world", TriggerKind::MouseUp, ModifierKey::Ctrl),
            &translating(),
        );
        assert_eq!(
            request,
            Some(LookupRequest::TranslateBaidu("Good morning, world".into()))
        );

        let tencent = Settings {
            translate_provider: TranslateProvider::Tencent,
            ..translating()
        };
        assert_eq!(
            qualify(&event("word", TriggerKind::MouseUp, ModifierKey::Ctrl), &tencent),
            Some(LookupRequest::TranslateTencent("word".into()))
        );
    }

    #[test]
    fn mouse_up_needs_the_configured_key_and_translation() {
        let e = event("hello world", TriggerKind::MouseUp, ModifierKey::Alt);
        assert_eq!(qualify(&e, &translating()), None);

        let alt = Settings {
            draw_key: DrawKey::Alt,
            ..translating()
        };
        assert!(qualify(&e, &alt).is_some());

        let off = Settings {
            draw_key: DrawKey::Alt,
            ..Settings::default()
        };
        assert_eq!(qualify(&e, &off), None);

        let plain = event("hello world", TriggerKind::MouseUp, ModifierKey::None);
        assert_eq!(qualify(&plain, &translating()), None);
    }

    #[test]
    fn ignored_sites_never_qualify() {
        let mut e = event("hello", TriggerKind::DoubleClick, ModifierKey::None);
        e.hostname = "dict.eudic.net".to_string();
        assert_eq!(qualify(&e, &Settings::default()), None);

        e.hostname = "example.com".to_string();
        let settings = Settings {
            ignore_sites: vec!["example.com".into()],
            ..Settings::default()
        };
        assert_eq!(qualify(&e, &settings), None);
    }

    #[test]
    fn blank_selection_is_ignored() {
        assert_eq!(
            qualify(&event("   \n", TriggerKind::MouseUp, ModifierKey::Ctrl), &translating()),
            None
        );
    }
}
