//! Host contracts: the viewport the engine attaches to, and the sink that
//! receives published grids.

use std::sync::Arc;

use foundation::GeoBounds;
use foundation::math::{GeoPoint, Projection};
use runtime::{EventBus, Handler, ListenerId};
use serde::{Deserialize, Serialize};

use crate::snapshot::GraticuleSnapshot;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewportEventKind {
    /// Full reset (first layout, projection change, ...).
    ViewReset,
    Move,
    MoveEnd,
    Zoom,
    ZoomEnd,
    Resize,
}

/// Everything a recompute reads from the host, captured at one instant:
/// the bounds, the zoom, and the projection valid at that zoom.
#[derive(Clone)]
pub struct ViewState {
    pub bounds: GeoBounds,
    pub zoom: f64,
    pub projection: Arc<dyn Projection>,
}

impl ViewState {
    pub fn new(bounds: GeoBounds, zoom: f64, projection: Arc<dyn Projection>) -> Self {
        Self {
            bounds,
            zoom,
            projection,
        }
    }
}

impl std::fmt::Debug for ViewState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ViewState")
            .field("bounds", &self.bounds)
            .field("zoom", &self.zoom)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Clone)]
pub struct ViewportChange {
    pub kind: ViewportEventKind,
    pub view: ViewState,
}

pub type ViewportHandler = Handler<ViewportChange>;

/// The pannable, zoomable map the engine draws over.
pub trait MapViewport {
    fn bounds(&self) -> GeoBounds;
    fn zoom(&self) -> f64;
    fn projection(&self) -> Arc<dyn Projection>;
    fn on(&mut self, kind: ViewportEventKind, handler: ViewportHandler) -> ListenerId;
    fn off(&mut self, id: ListenerId) -> bool;

    fn view_state(&self) -> ViewState {
        ViewState::new(self.bounds(), self.zoom(), self.projection())
    }
}

/// Receives grids as they are swapped in.
///
/// Called with the engine's writer lock held: a viewport event raised from
/// inside `publish` is coalesced into the next pass, not run re-entrantly.
pub trait GraticuleSink: Send {
    fn publish(&mut self, snapshot: &Arc<GraticuleSnapshot>);
    fn clear(&mut self);
}

/// In-memory viewport: a centre, a zoom and a pixel size over a projection.
pub struct MemoryViewport<P> {
    center: GeoPoint,
    zoom: f64,
    size_px: [f64; 2],
    projection: Arc<P>,
    events: EventBus<ViewportEventKind, ViewportChange>,
}

impl<P: Projection + 'static> MemoryViewport<P> {
    pub fn new(projection: P, center: GeoPoint, zoom: f64, size_px: [f64; 2]) -> Self {
        Self {
            center,
            zoom,
            size_px,
            projection: Arc::new(projection),
            events: EventBus::new(),
        }
    }

    pub fn center(&self) -> GeoPoint {
        self.center
    }

    pub fn size_px(&self) -> [f64; 2] {
        self.size_px
    }

    pub fn pan_to(&mut self, center: GeoPoint) {
        self.center = center;
        self.emit(ViewportEventKind::Move);
        self.emit(ViewportEventKind::MoveEnd);
    }

    pub fn set_zoom(&mut self, zoom: f64) {
        self.zoom = zoom;
        self.emit(ViewportEventKind::Zoom);
        self.emit(ViewportEventKind::ZoomEnd);
        self.emit(ViewportEventKind::MoveEnd);
    }

    pub fn resize(&mut self, size_px: [f64; 2]) {
        self.size_px = size_px;
        self.emit(ViewportEventKind::Resize);
        self.emit(ViewportEventKind::MoveEnd);
    }

    /// Swaps the projection and announces it with a reset.
    pub fn set_projection(&mut self, projection: P) {
        self.projection = Arc::new(projection);
        self.emit(ViewportEventKind::ViewReset);
    }

    pub fn reset(&mut self) {
        self.emit(ViewportEventKind::ViewReset);
    }

    pub fn listener_count(&self, kind: ViewportEventKind) -> usize {
        self.events.listener_count(kind)
    }

    fn emit(&mut self, kind: ViewportEventKind) -> usize {
        let change = ViewportChange {
            kind,
            view: self.view_state(),
        };
        self.events.emit(kind, &change)
    }
}

impl<P: Projection + 'static> MapViewport for MemoryViewport<P> {
    fn bounds(&self) -> GeoBounds {
        let mid = self.projection.project(self.center, self.zoom);
        let [w, h] = self.size_px;
        let nw = self
            .projection
            .unproject(mid.offset(-w * 0.5, -h * 0.5), self.zoom);
        let se = self
            .projection
            .unproject(mid.offset(w * 0.5, h * 0.5), self.zoom);
        GeoBounds::from_corners(nw, se)
    }

    fn zoom(&self) -> f64 {
        self.zoom
    }

    fn projection(&self) -> Arc<dyn Projection> {
        self.projection.clone()
    }

    fn on(&mut self, kind: ViewportEventKind, handler: ViewportHandler) -> ListenerId {
        self.events.on(kind, handler)
    }

    fn off(&mut self, id: ListenerId) -> bool {
        self.events.off(id)
    }
}

#[cfg(test)]
mod tests {
    use super::{MapViewport, MemoryViewport, ViewportChange, ViewportEventKind};
    use foundation::GeoBounds;
    use foundation::math::{Equirectangular, GeoPoint, WebMercator};
    use parking_lot::Mutex;
    use std::sync::Arc;

    #[test]
    fn bounds_follow_center_and_size() {
        let mut vp = MemoryViewport::new(
            Equirectangular::with_scale_at(100.0, 8.0),
            GeoPoint::new(0.0, 0.0),
            8.0,
            [2000.0, 1000.0],
        );
        assert_eq!(vp.bounds(), GeoBounds::new(-5.0, -10.0, 5.0, 10.0));

        vp.pan_to(GeoPoint::new(1.0, 2.0));
        assert_eq!(vp.bounds(), GeoBounds::new(-4.0, -8.0, 6.0, 12.0));
    }

    #[test]
    fn mercator_bounds_cover_world_at_zoom_one() {
        let vp = MemoryViewport::new(
            WebMercator::default(),
            GeoPoint::new(0.0, 0.0),
            1.0,
            [512.0, 512.0],
        );
        let b = vp.bounds();
        assert!((b.west + 180.0).abs() < 1e-9 && (b.east - 180.0).abs() < 1e-9);
        assert!(b.north > 60.0 && b.north < 85.1, "north={}", b.north);
        assert!((b.south + b.north).abs() < 1e-9);
    }

    #[test]
    fn zoom_emits_zoom_and_move_events() {
        let mut vp = MemoryViewport::new(
            Equirectangular::new(1.0),
            GeoPoint::new(0.0, 0.0),
            0.0,
            [100.0, 100.0],
        );
        let seen = Arc::new(Mutex::new(Vec::new()));
        for kind in [ViewportEventKind::ZoomEnd, ViewportEventKind::MoveEnd] {
            let seen = Arc::clone(&seen);
            vp.on(
                kind,
                Box::new(move |change: &ViewportChange| {
                    seen.lock().push((change.kind, change.view.zoom))
                }),
            );
        }

        vp.set_zoom(3.0);
        assert_eq!(
            *seen.lock(),
            vec![(ViewportEventKind::ZoomEnd, 3.0), (ViewportEventKind::MoveEnd, 3.0)]
        );
    }

    #[test]
    fn set_projection_resets_with_new_scale() {
        let mut vp = MemoryViewport::new(
            Equirectangular::with_scale_at(100.0, 8.0),
            GeoPoint::new(0.0, 0.0),
            8.0,
            [2000.0, 1000.0],
        );
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        vp.on(
            ViewportEventKind::ViewReset,
            Box::new(move |change: &ViewportChange| sink.lock().push(change.view.bounds)),
        );

        vp.set_projection(Equirectangular::with_scale_at(10.0, 8.0));
        assert_eq!(*seen.lock(), vec![GeoBounds::new(-50.0, -100.0, 50.0, 100.0)]);
        assert_eq!(vp.bounds(), GeoBounds::new(-50.0, -100.0, 50.0, 100.0));
    }

    #[test]
    fn off_unsubscribes() {
        let mut vp = MemoryViewport::new(
            Equirectangular::new(1.0),
            GeoPoint::new(0.0, 0.0),
            0.0,
            [100.0, 100.0],
        );
        let id = vp.on(ViewportEventKind::ViewReset, Box::new(|_: &ViewportChange| {}));
        assert_eq!(vp.listener_count(ViewportEventKind::ViewReset), 1);
        assert!(vp.off(id));
        assert_eq!(vp.listener_count(ViewportEventKind::ViewReset), 0);
    }
}
