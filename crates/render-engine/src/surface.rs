//! Renderable surfaces and the off-screen document.
//!
//! The result view hands the exporter a [`RenderableSurface`] rather than a
//! live node. The exporter composes a fresh [`ExportLayout`] from it and
//! attaches that layout to a [`DocumentHost`] for the duration of the
//! export. [`OffscreenContainer`] brackets the attachment: whatever happens
//! while it is alive, dropping it detaches the container.

use std::collections::BTreeMap;

use heartify_display_model::{DisplayController, NamePair};

use crate::layout::{ExportLayout, TextMetrics};

/// Position given to every off-screen container, well outside any viewport.
pub const OFFSCREEN_ORIGIN: (i32, i32) = (-10_000, -10_000);

/// Something the exporter can synthesize an image from.
pub trait RenderableSurface {
    /// The names being presented.
    fn names(&self) -> &NamePair;

    /// Build the fixed-geometry tree for export.
    fn export_layout(&self, metrics: &dyn TextMetrics) -> ExportLayout {
        ExportLayout::compose(self.names(), metrics)
    }
}

impl RenderableSurface for NamePair {
    fn names(&self) -> &NamePair {
        self
    }
}

/// Something that may currently present a [`RenderableSurface`].
pub trait SurfaceSource {
    fn surface(&self) -> Option<&dyn RenderableSurface>;
}

/// Only the result view is exportable.
impl SurfaceSource for DisplayController {
    fn surface(&self) -> Option<&dyn RenderableSurface> {
        self.shown().map(|pair| pair as &dyn RenderableSurface)
    }
}

/// Identifier of an attached container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ContainerId(u64);

/// A document that temporarily holds export trees.
pub trait DocumentHost {
    /// Attach a layout and return its handle.
    fn attach(&mut self, layout: ExportLayout) -> ContainerId;

    /// Remove a container. Returns `false` if it was not attached.
    fn detach(&mut self, id: ContainerId) -> bool;

    /// The layout held by an attached container.
    fn layout(&self, id: ContainerId) -> Option<&ExportLayout>;

    /// Number of containers currently attached.
    fn attached_count(&self) -> usize;
}

#[derive(Debug, Clone)]
struct Attached {
    layout: ExportLayout,
    origin: (i32, i32),
}

/// In-memory document with every container placed at [`OFFSCREEN_ORIGIN`].
#[derive(Debug, Default)]
pub struct OffscreenDocument {
    next_id: u64,
    containers: BTreeMap<ContainerId, Attached>,
}

impl OffscreenDocument {
    pub fn new() -> Self {
        Self::default()
    }

    /// Where a container was placed.
    pub fn origin(&self, id: ContainerId) -> Option<(i32, i32)> {
        self.containers.get(&id).map(|c| c.origin)
    }
}

impl DocumentHost for OffscreenDocument {
    fn attach(&mut self, layout: ExportLayout) -> ContainerId {
        let id = ContainerId(self.next_id);
        self.next_id += 1;
        self.containers.insert(
            id,
            Attached {
                layout,
                origin: OFFSCREEN_ORIGIN,
            },
        );
        id
    }

    fn detach(&mut self, id: ContainerId) -> bool {
        self.containers.remove(&id).is_some()
    }

    fn layout(&self, id: ContainerId) -> Option<&ExportLayout> {
        self.containers.get(&id).map(|c| &c.layout)
    }

    fn attached_count(&self) -> usize {
        self.containers.len()
    }
}

/// Scoped attachment of one export tree.
pub struct OffscreenContainer<'h, H: DocumentHost + ?Sized> {
    host: &'h mut H,
    id: ContainerId,
}

impl<'h, H: DocumentHost + ?Sized> OffscreenContainer<'h, H> {
    /// Attach `layout` to `host` until the guard is dropped.
    pub fn attach(host: &'h mut H, layout: ExportLayout) -> Self {
        let id = host.attach(layout);
        tracing::trace!(?id, "Attached off-screen container");
        Self { host, id }
    }

    pub fn id(&self) -> ContainerId {
        self.id
    }

    /// The attached layout.
    pub fn layout(&self) -> Option<&ExportLayout> {
        self.host.layout(self.id)
    }
}

impl<H: DocumentHost + ?Sized> Drop for OffscreenContainer<'_, H> {
    fn drop(&mut self) {
        if self.host.detach(self.id) {
            tracing::trace!(id = ?self.id, "Detached off-screen container");
        } else {
            tracing::warn!(id = ?self.id, "Off-screen container was already detached");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::EstimatedMetrics;

    fn layout() -> ExportLayout {
        let names = NamePair::new("Romeo", "Juliet").unwrap();
        names.export_layout(&EstimatedMetrics::default())
    }

    #[test]
    fn test_controller_surface_follows_view() {
        let mut controller = DisplayController::new();
        assert!(controller.surface().is_none());

        controller.submit(" Romeo ", "Juliet").unwrap();
        let surface = controller.surface().unwrap();
        assert_eq!(surface.names().first(), "Romeo");
        assert_eq!(surface.export_layout(&EstimatedMetrics::default()).height(), 267);

        controller.reset();
        assert!(controller.surface().is_none());
    }

    #[test]
    fn test_container_detaches_on_drop() {
        let mut doc = OffscreenDocument::new();
        {
            let container = OffscreenContainer::attach(&mut doc, layout());
            assert_eq!(container.layout().unwrap().width(), 1000);
        }
        assert_eq!(doc.attached_count(), 0);
    }

    #[test]
    fn test_container_detaches_on_early_return() {
        fn fails(doc: &mut OffscreenDocument) -> Result<(), &'static str> {
            let _container = OffscreenContainer::attach(doc, layout());
            Err("rasterization failed")
        }

        let mut doc = OffscreenDocument::new();
        assert!(fails(&mut doc).is_err());
        assert_eq!(doc.attached_count(), 0);
    }

    #[test]
    fn test_container_detaches_on_panic() {
        let mut doc = OffscreenDocument::new();
        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let _container = OffscreenContainer::attach(&mut doc, layout());
            panic!("boom");
        }));
        assert!(result.is_err());
        assert_eq!(doc.attached_count(), 0);
    }

    #[test]
    fn test_containers_are_placed_offscreen() {
        let mut doc = OffscreenDocument::new();
        let a = doc.attach(layout());
        let b = doc.attach(layout());
        assert_ne!(a, b);
        assert_eq!(doc.origin(a), Some(OFFSCREEN_ORIGIN));
        assert_eq!(doc.attached_count(), 2);
        assert!(doc.detach(a));
        assert!(!doc.detach(a));
        assert_eq!(doc.attached_count(), 1);
    }
}
