//! The application state store.
//!
//! [`StudioStore`] owns the single [`StudioState`] of an editing session and
//! a bounded snapshot history of its document part. Document edits go
//! through historied mutators, each of which is exactly one undo step.
//! Viewport and UI mutators change state directly and never touch history.
//!
//! ```
//! use maskit::{StudioStore, FilterKind};
//!
//! let mut store = StudioStore::new();
//! store.add_mask_layer();
//! store.set_filter(FilterKind::Blur, 4.0);
//! assert_eq!(store.document().mask_layers.len(), 1);
//!
//! store.undo();
//! store.undo();
//! assert!(store.document().mask_layers.is_empty());
//! assert!(store.can_redo());
//! ```

mod factory;
mod history;

pub use factory::{
    create_default_gradient_stop, create_default_linear_gradient, create_default_mask_layer,
    create_linear_gradient,
};
pub use history::{History, MAX_HISTORY};

use log::debug;

use crate::css;
use crate::model::{
    BlendMode, ClipPath, CssOutputTab, DocumentState, DropShadow, FilterKind, Filters, ImageData,
    MaskImage, MaskLayer, SidebarPanel, StudioState, Viewport, generate_id,
};
use crate::preset::PresetPatch;

pub const MIN_ZOOM: f64 = 0.1;
pub const MAX_ZOOM: f64 = 5.0;
pub const ZOOM_STEP: f64 = 0.1;

#[derive(Debug, Clone, Default)]
pub struct StudioStore {
    state: StudioState,
    history: History<DocumentState>,
}

impl StudioStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a session from an existing state with empty history.
    pub fn with_state(state: StudioState) -> Self {
        Self {
            state,
            history: History::default(),
        }
    }

    pub fn state(&self) -> &StudioState {
        &self.state
    }

    /// The document part of the state, the input to CSS generation and export.
    pub fn document(&self) -> &DocumentState {
        &self.state.document
    }

    pub fn into_state(self) -> StudioState {
        self.state
    }

    /// Stylesheet for one of the CSS output views.
    pub fn css(&self, tab: CssOutputTab) -> String {
        css::generate_css_for_tab(&self.state.document, tab)
    }

    // ========================================================================
    // History plumbing
    // ========================================================================

    fn commit(&mut self, edit: impl FnOnce(&mut DocumentState)) {
        let snapshot = self.state.document.clone();
        edit(&mut self.state.document);
        self.history.record(snapshot);
    }

    /// Like [`Self::commit`], but records nothing when `edit` reports that it
    /// found nothing to change. `edit` must leave the document untouched in
    /// that case.
    fn try_commit(&mut self, edit: impl FnOnce(&mut DocumentState) -> bool) -> bool {
        let snapshot = self.state.document.clone();
        let changed = edit(&mut self.state.document);
        if changed {
            self.history.record(snapshot);
        }
        changed
    }

    /// Restores the previous document. Returns false when there is none.
    ///
    /// ```
    /// use maskit::{FilterKind, StudioStore};
    ///
    /// let mut store = StudioStore::new();
    /// store.set_filter(FilterKind::Sepia, 40.0);
    /// assert!(store.undo());
    /// assert_eq!(store.document().filters.sepia, 0.0);
    /// assert!(!store.undo());
    /// assert!(store.redo());
    /// assert_eq!(store.document().filters.sepia, 40.0);
    /// ```
    pub fn undo(&mut self) -> bool {
        let current = std::mem::take(&mut self.state.document);
        match self.history.undo(current) {
            Ok(previous) => {
                self.state.document = previous;
                true
            }
            Err(current) => {
                self.state.document = current;
                false
            }
        }
    }

    /// Re-applies the last undone document. Returns false when there is none.
    pub fn redo(&mut self) -> bool {
        let current = std::mem::take(&mut self.state.document);
        match self.history.redo(current) {
            Ok(next) => {
                self.state.document = next;
                true
            }
            Err(current) => {
                self.state.document = current;
                false
            }
        }
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    // ========================================================================
    // Image
    // ========================================================================

    /// Sets the source image as one undo step.
    pub fn set_image(&mut self, image: ImageData) {
        self.commit(|doc| doc.image = Some(image));
    }

    /// Removes the source image as one undo step.
    pub fn clear_image(&mut self) {
        self.commit(|doc| doc.image = None);
    }

    // ========================================================================
    // Mask layers
    // ========================================================================

    /// Appends a default layer named `Layer N` and makes it active.
    pub fn add_mask_layer(&mut self) -> String {
        let name = format!("Layer {}", self.state.document.mask_layers.len() + 1);
        let layer = create_default_mask_layer(Some(&name));
        let id = layer.id.clone();
        self.commit(|doc| {
            doc.active_mask_layer_id = Some(layer.id.clone());
            doc.mask_layers.push(layer);
        });
        id
    }

    /// Removes a layer. If it was active, the first remaining layer becomes
    /// active, or none when the list is now empty.
    pub fn remove_mask_layer(&mut self, id: &str) -> bool {
        self.try_commit(|doc| {
            let before = doc.mask_layers.len();
            doc.mask_layers.retain(|l| l.id != id);
            if doc.mask_layers.len() == before {
                return false;
            }
            if doc.active_mask_layer_id.as_deref() == Some(id) {
                doc.active_mask_layer_id = doc.mask_layers.first().map(|l| l.id.clone());
            }
            true
        })
    }

    /// Inserts a deep copy right after the source layer and activates it.
    /// Returns the copy's id.
    pub fn duplicate_mask_layer(&mut self, id: &str) -> Option<String> {
        let index = self
            .state
            .document
            .mask_layers
            .iter()
            .position(|l| l.id == id)?;

        let mut copy = self.state.document.mask_layers[index].clone();
        copy.id = generate_id();
        copy.name = format!("{} (copy)", copy.name);
        let copy_id = copy.id.clone();

        self.commit(|doc| {
            doc.active_mask_layer_id = Some(copy.id.clone());
            doc.mask_layers.insert(index + 1, copy);
        });
        Some(copy_id)
    }

    /// Shows or hides a layer. Returns false for an unknown id.
    pub fn toggle_mask_layer_visibility(&mut self, id: &str) -> bool {
        self.update_mask_layer(id, |layer| layer.visible = !layer.visible)
    }

    /// Selects the layer the editors work on. Not an undo step.
    pub fn set_active_mask_layer(&mut self, id: Option<String>) {
        self.state.document.active_mask_layer_id = id;
    }

    /// Rebuilds the layer order from `ids`. Unknown ids are skipped and
    /// layers missing from `ids` are dropped.
    pub fn reorder_mask_layers<S: AsRef<str>>(&mut self, ids: &[S]) {
        self.commit(|doc| {
            let mut remaining = std::mem::take(&mut doc.mask_layers);
            let mut reordered = Vec::with_capacity(ids.len());
            for id in ids {
                if let Some(pos) = remaining.iter().position(|l| l.id == id.as_ref()) {
                    reordered.push(remaining.swap_remove(pos));
                }
            }
            if !remaining.is_empty() {
                debug!("reorder dropped {} layer(s) absent from the id list", remaining.len());
            }
            doc.mask_layers = reordered;
        });
    }

    /// Edits one layer in place. Returns false, recording nothing, when the
    /// id is unknown.
    pub fn update_mask_layer(&mut self, id: &str, edit: impl FnOnce(&mut MaskLayer)) -> bool {
        self.try_commit(|doc| match doc.layer_mut(id) {
            Some(layer) => {
                edit(layer);
                true
            }
            None => false,
        })
    }

    /// Replaces a layer's mask image. Returns false for an unknown id.
    pub fn update_mask_image(&mut self, layer_id: &str, mask_image: MaskImage) -> bool {
        self.update_mask_layer(layer_id, |layer| layer.mask_image = mask_image)
    }

    // ========================================================================
    // Filters, blend mode, clip path
    // ========================================================================

    /// Sets one scalar filter as one undo step.
    pub fn set_filter(&mut self, kind: FilterKind, value: f64) {
        self.commit(|doc| doc.filters.set(kind, value));
    }

    /// Edits the drop shadow in place as one undo step.
    pub fn update_drop_shadow(&mut self, edit: impl FnOnce(&mut DropShadow)) {
        self.commit(|doc| edit(&mut doc.filters.drop_shadow));
    }

    /// Puts every filter back to its neutral value.
    pub fn reset_filters(&mut self) {
        self.commit(|doc| doc.filters = Filters::default());
    }

    /// Sets the `mix-blend-mode` of the image.
    pub fn set_blend_mode(&mut self, mode: BlendMode) {
        self.commit(|doc| doc.blend_mode = mode);
    }

    /// Replaces the clip path as one undo step.
    pub fn set_clip_path(&mut self, clip_path: ClipPath) {
        self.commit(|doc| doc.clip_path = clip_path);
    }

    // ========================================================================
    // Presets and restore
    // ========================================================================

    /// Applies the keys present in `patch` as a single undo step.
    pub fn apply_preset(&mut self, patch: &PresetPatch) {
        self.commit(|doc| patch.apply_to(doc));
    }

    /// Replaces the whole state. The previous document is one undo step away.
    pub fn restore_state(&mut self, state: StudioState) {
        let StudioState {
            document,
            viewport,
            ui,
        } = state;
        self.commit(|doc| *doc = document);
        self.state.viewport = viewport;
        self.state.ui = ui;
    }

    // ========================================================================
    // Viewport (no history)
    // ========================================================================

    /// Sets the zoom as given. Only the keyboard steps clamp.
    pub fn set_viewport_zoom(&mut self, zoom: f64) {
        self.state.viewport.zoom = zoom;
    }

    /// Sets the pan offset.
    pub fn set_viewport_pan(&mut self, pan_x: f64, pan_y: f64) {
        self.state.viewport.pan_x = pan_x;
        self.state.viewport.pan_y = pan_y;
    }

    /// Zoom 1, no pan.
    pub fn reset_viewport(&mut self) {
        self.state.viewport = Viewport::default();
    }

    /// Zooms in by [`ZOOM_STEP`], clamped to [`MAX_ZOOM`].
    pub fn zoom_in(&mut self) {
        self.step_zoom(ZOOM_STEP);
    }

    /// Zooms out by [`ZOOM_STEP`], clamped to [`MIN_ZOOM`].
    pub fn zoom_out(&mut self) {
        self.step_zoom(-ZOOM_STEP);
    }

    fn step_zoom(&mut self, delta: f64) {
        let zoom = ((self.state.viewport.zoom + delta) * 10.0).round() / 10.0;
        self.state.viewport.zoom = zoom.clamp(MIN_ZOOM, MAX_ZOOM);
    }

    // ========================================================================
    // UI (no history)
    // ========================================================================

    /// Selects the sidebar panel.
    pub fn set_active_panel(&mut self, panel: SidebarPanel) {
        self.state.ui.active_panel = panel;
    }

    /// Expands or collapses the CSS output pane.
    pub fn toggle_css_output(&mut self) {
        self.state.ui.css_output_expanded = !self.state.ui.css_output_expanded;
    }

    /// Selects which stylesheet the CSS output pane shows.
    pub fn set_css_output_tab(&mut self, tab: CssOutputTab) {
        self.state.ui.css_output_tab = tab;
    }

    /// Opens the export dialog.
    pub fn open_export_dialog(&mut self) {
        self.state.ui.export_dialog_open = true;
    }

    /// Closes the export dialog. Exports call this on every attempt.
    pub fn close_export_dialog(&mut self) {
        self.state.ui.export_dialog_open = false;
    }
}
