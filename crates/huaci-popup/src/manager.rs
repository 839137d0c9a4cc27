use std::collections::BTreeMap;

use huaci_config::Settings;
use huaci_types::{ClickEvent, LookupRequest, LookupResult, SelectionEvent};

use crate::selection::qualify;
use crate::view::{PanelId, PanelView, SaveIndicator, apply_result, pending_view};

/// Where panels are actually drawn. Implementations own layout, so hit
/// testing is delegated back to them.
pub trait PopupSurface {
    fn mount(&mut self, view: &PanelView);
    fn update(&mut self, view: &PanelView);
    fn remove(&mut self, id: PanelId);
    /// Whether the page point lies inside the drawn panel
    fn contains(&self, id: PanelId, page_x: f64, page_y: f64) -> bool;
}

/// A request the caller must run, and the panel its result belongs to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dispatch {
    pub panel: PanelId,
    pub request: LookupRequest,
}

/// Tracks every open panel. Absent from `panels` means closed.
pub struct PopupManager<S> {
    surface: S,
    panels: BTreeMap<PanelId, PanelView>,
    next_id: u64,
}

impl<S: PopupSurface> PopupManager<S> {
    pub fn new(surface: S) -> Self {
        Self {
            surface,
            panels: BTreeMap::new(),
            next_id: 1,
        }
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn panel(&self, id: PanelId) -> Option<&PanelView> {
        self.panels.get(&id)
    }

    pub fn open_panels(&self) -> impl Iterator<Item = &PanelView> {
        self.panels.values()
    }

    /// Open a placeholder for a qualifying selection
    pub fn on_selection(&mut self, event: &SelectionEvent, settings: &Settings) -> Option<Dispatch> {
        let request = qualify(event, settings)?;

        let id = PanelId(self.next_id);
        self.next_id += 1;

        let view = pending_view(id, event.page_x, event.page_y, &request);
        self.surface.mount(&view);
        self.panels.insert(id, view);
        tracing::debug!("{id} pending on {}", request.provider_name());

        Some(Dispatch { panel: id, request })
    }

    /// Apply a result. Returns false when the panel is already gone.
    pub fn on_result(&mut self, id: PanelId, result: &LookupResult) -> bool {
        let Some(current) = self.panels.get_mut(&id) else {
            tracing::debug!("dropping result for closed {id}");
            return false;
        };

        let next = apply_result(current, result);
        if next != *current {
            self.surface.update(&next);
            *current = next;
        }
        true
    }

    /// Close every panel the click landed outside of. Clicks made with the
    /// draw key held belong to a selection chord and close nothing.
    pub fn on_click(&mut self, click: &ClickEvent, settings: &Settings) -> Vec<PanelId> {
        if click.modifier.is(settings.draw_key) {
            return Vec::new();
        }

        let outside: Vec<PanelId> = self
            .panels
            .keys()
            .copied()
            .filter(|id| !self.surface.contains(*id, click.page_x, click.page_y))
            .collect();

        for id in &outside {
            self.close(*id);
        }
        outside
    }

    /// Remove a panel; closing twice is a no-op
    pub fn close(&mut self, id: PanelId) -> bool {
        if self.panels.remove(&id).is_none() {
            return false;
        }
        self.surface.remove(id);
        tracing::debug!("{id} closed");
        true
    }

    /// The save button on a found dictionary panel
    pub fn on_save_clicked(&self, id: PanelId) -> Option<Dispatch> {
        let view = self.panels.get(&id)?;
        match view.save {
            Some(SaveIndicator::Idle) => Some(Dispatch {
                panel: id,
                request: LookupRequest::AddWord(view.query.clone()),
            }),
            _ => None,
        }
    }
}
