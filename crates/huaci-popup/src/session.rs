use std::sync::Arc;

use async_trait::async_trait;
use huaci_config::SettingsStore;
use huaci_core::LookupService;
use huaci_types::{ClickEvent, LookupRequest, LookupResult, SelectionEvent};
use tokio::sync::Mutex;
use tokio::task::JoinHandle;

use crate::manager::{Dispatch, PopupManager, PopupSurface};
use crate::view::PanelId;

/// Anything that can turn a request into a result
#[async_trait]
pub trait LookupBackend: Send + Sync {
    async fn lookup(&self, request: LookupRequest) -> LookupResult;
}

#[async_trait]
impl LookupBackend for LookupService {
    async fn lookup(&self, request: LookupRequest) -> LookupResult {
        self.handle(request).await
    }
}

/// Drives a `PopupManager` from page events. Every dispatched lookup runs in
/// its own task, and results are applied to whichever panel asked for them.
pub struct PopupSession<S, B> {
    manager: Arc<Mutex<PopupManager<S>>>,
    backend: Arc<B>,
    settings: Arc<SettingsStore>,
}

impl<S, B> Clone for PopupSession<S, B> {
    fn clone(&self) -> Self {
        Self {
            manager: self.manager.clone(),
            backend: self.backend.clone(),
            settings: self.settings.clone(),
        }
    }
}

impl<S, B> PopupSession<S, B>
where
    S: PopupSurface + Send + 'static,
    B: LookupBackend + 'static,
{
    pub fn new(surface: S, backend: Arc<B>, settings: Arc<SettingsStore>) -> Self {
        Self {
            manager: Arc::new(Mutex::new(PopupManager::new(surface))),
            backend,
            settings,
        }
    }

    pub fn manager(&self) -> &Arc<Mutex<PopupManager<S>>> {
        &self.manager
    }

    /// Handle a selection; returns the new panel and its lookup task
    pub async fn on_selection(&self, event: SelectionEvent) -> Option<(PanelId, JoinHandle<()>)> {
        let settings = self.settings.snapshot();
        let dispatch = self.manager.lock().await.on_selection(&event, &settings)?;
        let panel = dispatch.panel;
        Some((panel, self.spawn(dispatch)))
    }

    pub async fn on_click(&self, click: ClickEvent) -> Vec<PanelId> {
        let settings = self.settings.snapshot();
        self.manager.lock().await.on_click(&click, &settings)
    }

    pub async fn on_save_clicked(&self, panel: PanelId) -> Option<JoinHandle<()>> {
        let dispatch = self.manager.lock().await.on_save_clicked(panel)?;
        Some(self.spawn(dispatch))
    }

    fn spawn(&self, dispatch: Dispatch) -> JoinHandle<()> {
        let manager = self.manager.clone();
        let backend = self.backend.clone();

        tokio::spawn(async move {
            let Dispatch { panel, request } = dispatch;
            let result = backend.lookup(request).await;
            manager.lock().await.on_result(panel, &result);
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::manager::tests::{RecordingSurface, double_click};
    use huaci_types::{AddWordResult, DictionaryResult, ModifierKey, NO_DEFINITION};
    use std::collections::HashMap;
    use std::time::Duration;

    /// Answers each word after its own delay so completion order can be forced
    struct DelayedBackend {
        delays: HashMap<String, u64>,
    }

    #[async_trait]
    impl LookupBackend for DelayedBackend {
        async fn lookup(&self, request: LookupRequest) -> LookupResult {
            let word = request.query().to_string();
            let delay = self.delays.get(&word).copied().unwrap_or(0);
            tokio::time::sleep(Duration::from_millis(delay)).await;

            match request {
                LookupRequest::AddWord(_) => LookupResult::AddWord(AddWordResult { success: true }),
                _ if word == "zzxq" => {
                    LookupResult::Dictionary(DictionaryResult::not_found(word, NO_DEFINITION))
                }
                _ => LookupResult::Dictionary(DictionaryResult::found(
                    word.clone(),
                    vec![format!("def of {word}")],
                )),
            }
        }
    }

    fn session(delays: &[(&str, u64)]) -> PopupSession<RecordingSurface, DelayedBackend> {
        let backend = DelayedBackend {
            delays: delays.iter().map(|(w, d)| (w.to_string(), *d)).collect(),
        };
        PopupSession::new(
            RecordingSurface::default(),
            Arc::new(backend),
            Arc::new(SettingsStore::default()),
        )
    }

    #[tokio::test]
    async fn concurrent_selections_update_their_own_panels() {
        let session = session(&[("slow", 80), ("zzxq", 5)]);

        let (slow, slow_task) = session.on_selection(double_click("slow", 0.0, 0.0)).await.unwrap();
        let (fast, fast_task) = session.on_selection(double_click("zzxq", 400.0, 0.0)).await.unwrap();

        fast_task.await.unwrap();
        {
            let manager = session.manager().lock().await;
            assert!(manager.panel(slow).unwrap().pending);
            assert_eq!(manager.panel(fast).unwrap().lines, vec![NO_DEFINITION]);
        }

        slow_task.await.unwrap();
        let manager = session.manager().lock().await;
        assert_eq!(manager.panel(slow).unwrap().lines, vec!["def of slow"]);
        assert_eq!(manager.panel(fast).unwrap().lines, vec![NO_DEFINITION]);
    }

    #[tokio::test]
    async fn closing_before_result_drops_it() {
        let session = session(&[("apple", 30)]);
        let (panel, task) = session.on_selection(double_click("apple", 0.0, 0.0)).await.unwrap();

        let closed = session
            .on_click(ClickEvent {
                page_x: 900.0,
                page_y: 900.0,
                modifier: ModifierKey::None,
            })
            .await;
        assert_eq!(closed, vec![panel]);

        task.await.unwrap();
        let manager = session.manager().lock().await;
        assert!(manager.panel(panel).is_none());
        assert!(manager.surface().updated.is_empty());
    }

    #[tokio::test]
    async fn save_round_trip() {
        let session = session(&[]);
        let (panel, task) = session.on_selection(double_click("apple", 0.0, 0.0)).await.unwrap();
        task.await.unwrap();

        session.on_save_clicked(panel).await.unwrap().await.unwrap();

        let manager = session.manager().lock().await;
        assert_eq!(
            manager.panel(panel).unwrap().save,
            Some(crate::view::SaveIndicator::Saved)
        );
    }
}
