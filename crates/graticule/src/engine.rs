//! Attach/detach lifecycle and the recompute loop.
//!
//! Each recompute reads one [`ViewState`], builds a complete
//! [`GraticuleSnapshot`] and swaps it in behind an `Arc`. Readers clone the
//! current `Arc` and never see a half-built grid. Requests that arrive while
//! a pass is running (from another thread, or re-entrantly from a sink) are
//! folded into a single follow-up pass over the latest view.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Weak};

use parking_lot::{Mutex, RwLock};
use runtime::ListenerId;
use tracing::{debug, trace, warn};

use crate::error::GraticuleError;
use crate::labels::{LabelConfig, build_labels};
use crate::lines::{LineRequest, build_lines};
use crate::options::GraticuleOptions;
use crate::snapshot::GraticuleSnapshot;
use crate::viewport::{GraticuleSink, MapViewport, ViewState, ViewportChange};

/// Build the grid for one view under the projection it carries. Pure: no
/// host state is consulted.
pub fn build_snapshot(
    options: &GraticuleOptions,
    view: &ViewState,
) -> Result<GraticuleSnapshot, GraticuleError> {
    if !view.bounds.is_finite() || !view.zoom.is_finite() {
        return Err(GraticuleError::InvalidViewport(format!(
            "non-finite view: bounds={:?} zoom={}",
            view.bounds, view.zoom
        )));
    }

    let padded = view.bounds.pad(options.pad);
    let set = build_lines(&LineRequest {
        bounds: padded,
        zoom: view.zoom,
        projection: view.projection.as_ref(),
        min_pixel_gap: options.min_pixel_gap,
    })?;

    // Labels anchor against the clamped working bounds, never the raw view.
    let labels = build_labels(
        &set.lines,
        &set.bounds,
        &LabelConfig {
            inset: options.label_inset,
            format: options.label_format,
            formatter: options.formatter.as_ref(),
        },
    );

    for warning in &set.warnings {
        debug!(?warning, "graticule warning");
    }

    Ok(GraticuleSnapshot {
        lines: set.lines,
        labels,
        warnings: set.warnings,
        bounds: Some(set.bounds),
    })
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub struct RecomputeStats {
    /// Snapshots swapped in.
    pub published: u64,
    /// Passes abandoned on error; the previous snapshot stayed in place.
    pub failed: u64,
    /// Requests superseded by a newer one before they ran.
    pub coalesced: u64,
}

struct Shared {
    options: GraticuleOptions,
    attached: AtomicBool,
    pending: Mutex<Option<ViewState>>,
    /// Held for the duration of a pass; owns the sink.
    writer: Mutex<Option<Box<dyn GraticuleSink>>>,
    current: RwLock<Arc<GraticuleSnapshot>>,
    published: AtomicU64,
    failed: AtomicU64,
    coalesced: AtomicU64,
}

impl Shared {
    fn new(options: GraticuleOptions, sink: Option<Box<dyn GraticuleSink>>) -> Self {
        Self {
            options,
            attached: AtomicBool::new(true),
            pending: Mutex::new(None),
            writer: Mutex::new(sink),
            current: RwLock::new(Arc::new(GraticuleSnapshot::default())),
            published: AtomicU64::new(0),
            failed: AtomicU64::new(0),
            coalesced: AtomicU64::new(0),
        }
    }

    fn request(&self, view: ViewState) {
        if !self.attached.load(Ordering::Acquire) {
            return;
        }
        if self.pending.lock().replace(view).is_some() {
            self.coalesced.fetch_add(1, Ordering::Relaxed);
        }

        loop {
            let Some(mut sink) = self.writer.try_lock() else {
                trace!("recompute in progress; request deferred");
                return;
            };
            loop {
                let next = self.pending.lock().take();
                let Some(view) = next else {
                    break;
                };
                self.recompute(view, &mut sink);
            }
            drop(sink);

            // A request may have landed between the last take and the unlock.
            if self.pending.lock().is_none() {
                return;
            }
        }
    }

    fn recompute(&self, view: ViewState, sink: &mut Option<Box<dyn GraticuleSink>>) {
        if !self.attached.load(Ordering::Acquire) {
            return;
        }
        match build_snapshot(&self.options, &view) {
            Ok(snapshot) => {
                let snapshot = Arc::new(snapshot);
                *self.current.write() = Arc::clone(&snapshot);
                let published = self.published.fetch_add(1, Ordering::Relaxed) + 1;
                debug!(
                    published,
                    lines = snapshot.lines.len(),
                    zoom = view.zoom,
                    "graticule published"
                );
                if let Some(sink) = sink.as_mut() {
                    sink.publish(&snapshot);
                }
            }
            Err(err) => {
                self.failed.fetch_add(1, Ordering::Relaxed);
                warn!(%err, zoom = view.zoom, "graticule recompute skipped; keeping previous grid");
            }
        }
    }

    fn shutdown(&self) {
        self.attached.store(false, Ordering::Release);
        let mut sink = self.writer.lock();
        self.pending.lock().take();
        *self.current.write() = Arc::new(GraticuleSnapshot::default());
        if let Some(sink) = sink.as_mut() {
            sink.clear();
        }
    }

    fn stats(&self) -> RecomputeStats {
        RecomputeStats {
            published: self.published.load(Ordering::Relaxed),
            failed: self.failed.load(Ordering::Relaxed),
            coalesced: self.coalesced.load(Ordering::Relaxed),
        }
    }
}

/// Cloneable handle for requesting recomputes from outside the viewport's
/// event flow (other threads, host timers). Inert once the engine detaches.
#[derive(Clone)]
pub struct RecomputeHandle {
    shared: Weak<Shared>,
}

impl RecomputeHandle {
    pub fn request(&self, view: ViewState) {
        if let Some(shared) = self.shared.upgrade() {
            shared.request(view);
        }
    }
}

impl std::fmt::Debug for RecomputeHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecomputeHandle")
            .field("live", &(self.shared.strong_count() > 0))
            .finish()
    }
}

struct Attachment {
    shared: Arc<Shared>,
    listeners: Vec<ListenerId>,
}

enum EngineState {
    Detached,
    Attached(Attachment),
}

/// Adaptive latitude/longitude grid over a host viewport.
pub struct GraticuleEngine {
    state: EngineState,
}

impl Default for GraticuleEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for GraticuleEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = match &self.state {
            EngineState::Detached => "detached",
            EngineState::Attached(_) => "attached",
        };
        f.debug_struct("GraticuleEngine").field("state", &state).finish()
    }
}

impl GraticuleEngine {
    pub fn new() -> Self {
        Self {
            state: EngineState::Detached,
        }
    }

    pub fn attach<V: MapViewport + ?Sized>(
        &mut self,
        viewport: &mut V,
        options: GraticuleOptions,
    ) -> Result<(), GraticuleError> {
        self.attach_inner(viewport, options, None)
    }

    pub fn attach_with_sink<V: MapViewport + ?Sized>(
        &mut self,
        viewport: &mut V,
        options: GraticuleOptions,
        sink: Box<dyn GraticuleSink>,
    ) -> Result<(), GraticuleError> {
        self.attach_inner(viewport, options, Some(sink))
    }

    fn attach_inner<V: MapViewport + ?Sized>(
        &mut self,
        viewport: &mut V,
        options: GraticuleOptions,
        sink: Option<Box<dyn GraticuleSink>>,
    ) -> Result<(), GraticuleError> {
        if matches!(self.state, EngineState::Attached(_)) {
            return Err(GraticuleError::AlreadyAttached);
        }
        options.validate()?;

        let kinds = options.subscribed_events();
        let shared = Arc::new(Shared::new(options, sink));
        let listeners: Vec<ListenerId> = kinds
            .into_iter()
            .map(|kind| {
                let weak = Arc::downgrade(&shared);
                viewport.on(
                    kind,
                    Box::new(move |change: &ViewportChange| {
                        if let Some(shared) = weak.upgrade() {
                            shared.request(change.view.clone());
                        }
                    }),
                )
            })
            .collect();
        debug!(?listeners, "graticule attached");

        self.state = EngineState::Attached(Attachment {
            shared: Arc::clone(&shared),
            listeners,
        });
        shared.request(viewport.view_state());
        Ok(())
    }

    /// Unsubscribes from `viewport` and clears the grid.
    ///
    /// `viewport` must be the one passed to `attach`. Listener ids are unique
    /// process-wide, so another viewport loses none of its own listeners; the
    /// engine's handlers left on the attached one stop recomputing once the
    /// engine has detached. Returns `false` if the engine was not attached.
    pub fn detach<V: MapViewport + ?Sized>(&mut self, viewport: &mut V) -> bool {
        let EngineState::Attached(attachment) =
            std::mem::replace(&mut self.state, EngineState::Detached)
        else {
            return false;
        };
        let expected = attachment.listeners.len();
        let removed = attachment
            .listeners
            .into_iter()
            .filter(|&id| viewport.off(id))
            .count();
        if removed != expected {
            warn!(removed, expected, "detach: viewport did not hold the engine's listeners");
        }
        attachment.shared.shutdown();
        debug!("graticule detached");
        true
    }

    pub fn is_attached(&self) -> bool {
        matches!(self.state, EngineState::Attached(_))
    }

    /// Most recently published grid; `None` while detached.
    pub fn snapshot(&self) -> Option<Arc<GraticuleSnapshot>> {
        match &self.state {
            EngineState::Detached => None,
            EngineState::Attached(a) => Some(Arc::clone(&a.shared.current.read())),
        }
    }

    /// Recompute for `view`. A no-op while detached.
    pub fn request_recompute(&self, view: ViewState) {
        if let EngineState::Attached(a) = &self.state {
            a.shared.request(view);
        }
    }

    pub fn handle(&self) -> Option<RecomputeHandle> {
        match &self.state {
            EngineState::Detached => None,
            EngineState::Attached(a) => Some(RecomputeHandle {
                shared: Arc::downgrade(&a.shared),
            }),
        }
    }

    pub fn options(&self) -> Option<&GraticuleOptions> {
        match &self.state {
            EngineState::Detached => None,
            EngineState::Attached(a) => Some(&a.shared.options),
        }
    }

    pub fn stats(&self) -> RecomputeStats {
        match &self.state {
            EngineState::Detached => RecomputeStats::default(),
            EngineState::Attached(a) => a.shared.stats(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snapshot::Axis;
    use crate::viewport::{MemoryViewport, ViewportEventKind};
    use foundation::GeoBounds;
    use foundation::math::{Equirectangular, GeoPoint, PixelPoint, Projection};
    use pretty_assertions::assert_eq;
    use std::sync::atomic::AtomicUsize;

    fn init_tracing() {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    }

    fn unit_viewport() -> MemoryViewport<Equirectangular> {
        // 100px per degree at zoom 8; a 2000px square shows 20 x 20 degrees.
        MemoryViewport::new(
            Equirectangular::with_scale_at(100.0, 8.0),
            GeoPoint::new(0.0, 0.0),
            8.0,
            [2000.0, 2000.0],
        )
    }

    #[derive(Default, Clone)]
    struct Recorder {
        seen: Arc<Mutex<Vec<Arc<GraticuleSnapshot>>>>,
        cleared: Arc<AtomicUsize>,
    }

    impl GraticuleSink for Recorder {
        fn publish(&mut self, snapshot: &Arc<GraticuleSnapshot>) {
            self.seen.lock().push(Arc::clone(snapshot));
        }

        fn clear(&mut self) {
            self.cleared.fetch_add(1, Ordering::SeqCst);
        }
    }

    /// Equirectangular below zoom 20, collapsed (zero spacing) above it.
    struct ZoomLimited(Equirectangular);

    impl Projection for ZoomLimited {
        fn project(&self, point: GeoPoint, zoom: f64) -> PixelPoint {
            if zoom > 20.0 {
                PixelPoint::new(0.0, 0.0)
            } else {
                self.0.project(point, zoom)
            }
        }

        fn unproject(&self, point: PixelPoint, zoom: f64) -> GeoPoint {
            if zoom > 20.0 {
                GeoPoint::new(0.0, 0.0)
            } else {
                self.0.unproject(point, zoom)
            }
        }
    }

    #[test]
    fn attach_publishes_grid_for_current_view() {
        init_tracing();
        let mut vp = unit_viewport();
        assert_eq!(vp.bounds(), GeoBounds::new(-10.0, -10.0, 10.0, 10.0));

        let mut engine = GraticuleEngine::new();
        engine.attach(&mut vp, GraticuleOptions::default()).unwrap();
        let snap = engine.snapshot().unwrap();

        // Padded by half the view on every side.
        let bounds = snap.bounds.unwrap();
        assert_eq!(bounds, GeoBounds::new(-20.0, -20.0, 20.0, 20.0));

        let meridians: Vec<_> = snap.lines_on(Axis::Meridian).collect();
        assert!(!meridians.is_empty());
        assert_eq!(meridians.len(), 41);
        for line in &meridians {
            assert_eq!(line.value, line.value.round());
            assert_eq!(line.from, GeoPoint::new(bounds.south, line.value));
            assert_eq!(line.to, GeoPoint::new(bounds.north, line.value));
        }

        assert_eq!(snap.labels.len(), snap.lines.len());
        let inset_lat = bounds.north - bounds.lat_span() * 0.02;
        for (line, label) in snap.lines.iter().zip(&snap.labels) {
            assert_eq!(label.axis, line.axis);
            assert_eq!(label.value, line.value);
            assert_eq!(label.text, format!("{}°", line.value));
            if line.axis == Axis::Meridian {
                assert_eq!(label.anchor, GeoPoint::new(inset_lat, line.value));
            }
        }
        assert_eq!(engine.stats().published, 1);
    }

    #[test]
    fn recompute_is_deterministic() {
        let mut vp = unit_viewport();
        let mut engine = GraticuleEngine::new();
        engine.attach(&mut vp, GraticuleOptions::default()).unwrap();

        let first = engine.snapshot().unwrap();
        engine.request_recompute(vp.view_state());
        let second = engine.snapshot().unwrap();

        assert!(!Arc::ptr_eq(&first, &second));
        assert_eq!(*first, *second);
    }

    #[test]
    fn redraws_only_on_subscribed_events() {
        let mut vp = unit_viewport();
        let mut engine = GraticuleEngine::new();
        let options = GraticuleOptions {
            redraw_events: vec![ViewportEventKind::ZoomEnd],
            ..GraticuleOptions::default()
        };
        engine.attach(&mut vp, options).unwrap();
        assert_eq!(vp.listener_count(ViewportEventKind::ViewReset), 1);
        assert_eq!(vp.listener_count(ViewportEventKind::ZoomEnd), 1);
        assert_eq!(vp.listener_count(ViewportEventKind::MoveEnd), 0);

        vp.pan_to(GeoPoint::new(5.0, 5.0));
        assert_eq!(engine.stats().published, 1);

        vp.set_zoom(9.0);
        assert_eq!(engine.stats().published, 2);
        let snap = engine.snapshot().unwrap();
        // 200px per degree now: the 100px gap snaps to 0.5 degrees.
        assert!(snap.lines_on(Axis::Meridian).any(|l| l.value == 5.5));

        vp.reset();
        assert_eq!(engine.stats().published, 3);
    }

    #[test]
    fn detach_unsubscribes_and_clears() {
        let mut vp = unit_viewport();
        let sink = Recorder::default();
        let mut engine = GraticuleEngine::new();
        engine
            .attach_with_sink(&mut vp, GraticuleOptions::default(), Box::new(sink.clone()))
            .unwrap();
        let handle = engine.handle().unwrap();
        assert_eq!(sink.seen.lock().len(), 1);

        assert!(engine.detach(&mut vp));
        assert!(!engine.is_attached());
        assert!(engine.snapshot().is_none());
        assert_eq!(vp.listener_count(ViewportEventKind::MoveEnd), 0);
        assert_eq!(vp.listener_count(ViewportEventKind::ViewReset), 0);
        assert_eq!(sink.cleared.load(Ordering::SeqCst), 1);

        // Events and requests after detach are no-ops.
        vp.pan_to(GeoPoint::new(1.0, 1.0));
        handle.request(vp.view_state());
        engine.request_recompute(vp.view_state());
        assert_eq!(sink.seen.lock().len(), 1);
        assert!(!engine.detach(&mut vp));
    }

    #[test]
    fn detach_from_another_viewport_keeps_its_listeners() {
        let mut vp = unit_viewport();
        let mut other = unit_viewport();
        let own = other.on(ViewportEventKind::MoveEnd, Box::new(|_: &ViewportChange| {}));
        let sink = Recorder::default();
        let mut engine = GraticuleEngine::new();
        engine
            .attach_with_sink(&mut vp, GraticuleOptions::default(), Box::new(sink.clone()))
            .unwrap();

        assert!(engine.detach(&mut other));
        assert_eq!(other.listener_count(ViewportEventKind::MoveEnd), 1);
        assert!(other.off(own));

        // Handlers stranded on the attached viewport no longer recompute.
        assert_eq!(vp.listener_count(ViewportEventKind::MoveEnd), 1);
        vp.pan_to(GeoPoint::new(3.0, 3.0));
        assert_eq!(sink.seen.lock().len(), 1);
    }

    #[test]
    fn projection_change_rebuilds_with_new_projection() {
        let mut vp = unit_viewport();
        let options = GraticuleOptions::default();
        let mut engine = GraticuleEngine::new();
        engine.attach(&mut vp, options.clone()).unwrap();
        assert_eq!(engine.snapshot().unwrap().lines_on(Axis::Meridian).count(), 41);

        // 10px per degree: the 100px gap snaps to 10 degrees.
        vp.set_projection(Equirectangular::with_scale_at(10.0, 8.0));
        let snap = engine.snapshot().unwrap();
        assert_eq!(*snap, build_snapshot(&options, &vp.view_state()).unwrap());

        let meridians = snap.values_on(Axis::Meridian);
        assert_eq!(meridians.len(), 37);
        assert_eq!(meridians.first(), Some(&-180.0));
        assert!(meridians.iter().all(|v| v % 10.0 == 0.0));
        assert_eq!(engine.stats().published, 2);
    }

    #[test]
    fn attach_twice_is_rejected() {
        let mut vp = unit_viewport();
        let mut engine = GraticuleEngine::new();
        engine.attach(&mut vp, GraticuleOptions::default()).unwrap();
        let err = engine
            .attach(&mut vp, GraticuleOptions::default())
            .unwrap_err();
        assert_eq!(err, GraticuleError::AlreadyAttached);
        assert_eq!(vp.listener_count(ViewportEventKind::MoveEnd), 1);
    }

    #[test]
    fn invalid_options_leave_engine_detached() {
        let mut vp = unit_viewport();
        let mut engine = GraticuleEngine::new();
        let options = GraticuleOptions {
            min_pixel_gap: -5.0,
            ..GraticuleOptions::default()
        };
        assert!(matches!(
            engine.attach(&mut vp, options),
            Err(GraticuleError::InvalidOptions(_))
        ));
        assert!(!engine.is_attached());
        assert_eq!(vp.listener_count(ViewportEventKind::ViewReset), 0);
    }

    #[test]
    fn failed_recompute_keeps_previous_snapshot() {
        init_tracing();
        let mut vp = MemoryViewport::new(
            ZoomLimited(Equirectangular::with_scale_at(100.0, 8.0)),
            GeoPoint::new(0.0, 0.0),
            8.0,
            [2000.0, 2000.0],
        );
        let mut engine = GraticuleEngine::new();
        engine.attach(&mut vp, GraticuleOptions::default()).unwrap();
        let before = engine.snapshot().unwrap();

        engine.request_recompute(ViewState::new(vp.bounds(), 25.0, vp.projection()));
        let after = engine.snapshot().unwrap();
        assert!(Arc::ptr_eq(&before, &after));
        assert_eq!(engine.stats().failed, 1);

        engine.request_recompute(ViewState::new(
            GeoBounds::new(f64::NAN, 0.0, 1.0, 1.0),
            8.0,
            vp.projection(),
        ));
        assert!(Arc::ptr_eq(&before, &engine.snapshot().unwrap()));
        assert_eq!(engine.stats().failed, 2);
    }

    #[test]
    fn viewport_outside_working_region_publishes_empty_grid() {
        let mut vp = MemoryViewport::new(
            Equirectangular::with_scale_at(100.0, 8.0),
            GeoPoint::new(88.0, 0.0),
            8.0,
            [200.0, 200.0],
        );
        let mut engine = GraticuleEngine::new();
        let options = GraticuleOptions {
            pad: 0.0,
            ..GraticuleOptions::default()
        };
        engine.attach(&mut vp, options).unwrap();
        let snap = engine.snapshot().unwrap();
        assert!(snap.is_empty());
        assert!(snap.labels.is_empty());
        assert_eq!(snap.warnings.len(), 1);
        assert_eq!(engine.stats().published, 1);
    }

    /// Sink that fires two more requests from inside its first publish.
    struct Reentrant {
        handle: Arc<Mutex<Option<RecomputeHandle>>>,
        views: [ViewState; 2],
        seen: Arc<Mutex<Vec<Arc<GraticuleSnapshot>>>>,
    }

    impl GraticuleSink for Reentrant {
        fn publish(&mut self, snapshot: &Arc<GraticuleSnapshot>) {
            self.seen.lock().push(Arc::clone(snapshot));
            let handle = self.handle.lock().take();
            if let Some(handle) = handle {
                handle.request(self.views[0].clone());
                handle.request(self.views[1].clone());
            }
        }

        fn clear(&mut self) {}
    }

    #[test]
    fn reentrant_requests_are_coalesced() {
        let mut vp = unit_viewport();
        let options = GraticuleOptions::default();
        let proj = vp.projection();
        let view = |lat: f64| {
            let bounds = GeoBounds::new(lat - 1.0, -1.0, lat + 1.0, 1.0);
            ViewState::new(bounds, 8.0, Arc::clone(&proj))
        };
        let (a, b, c) = (view(0.0), view(10.0), view(20.0));

        let handle_slot = Arc::new(Mutex::new(None));
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Reentrant {
            handle: Arc::clone(&handle_slot),
            views: [b, c.clone()],
            seen: Arc::clone(&seen),
        };

        let mut engine = GraticuleEngine::new();
        engine
            .attach_with_sink(&mut vp, options.clone(), Box::new(sink))
            .unwrap();
        *handle_slot.lock() = engine.handle();

        engine.request_recompute(a.clone());

        let seen = seen.lock();
        // Initial attach, then `a`, then only the newest of the two nested requests.
        assert_eq!(seen.len(), 3);
        assert_eq!(*seen[1], build_snapshot(&options, &a).unwrap());
        assert_eq!(*seen[2], build_snapshot(&options, &c).unwrap());
        assert_eq!(engine.stats().coalesced, 1);
        assert_eq!(engine.stats().published, 3);
        assert!(Arc::ptr_eq(&seen[2], &engine.snapshot().unwrap()));
    }

    #[test]
    fn concurrent_requests_never_mix_views() {
        let mut vp = unit_viewport();
        let options = GraticuleOptions::default();
        let proj = vp.projection();
        let sink = Recorder::default();
        let mut engine = GraticuleEngine::new();
        engine
            .attach_with_sink(&mut vp, options.clone(), Box::new(sink.clone()))
            .unwrap();

        let views: Vec<ViewState> = (0..4)
            .map(|i| {
                let c = i as f64 * 7.0;
                let bounds = GeoBounds::new(c - 3.0, c - 4.0, c + 3.0, c + 4.0);
                ViewState::new(bounds, 8.0, Arc::clone(&proj))
            })
            .collect();
        let mut expected: Vec<GraticuleSnapshot> = views
            .iter()
            .map(|v| build_snapshot(&options, v).unwrap())
            .collect();
        expected.push(build_snapshot(&options, &vp.view_state()).unwrap());

        let handle = engine.handle().unwrap();
        std::thread::scope(|s| {
            for view in &views {
                let handle = handle.clone();
                s.spawn(move || {
                    for _ in 0..25 {
                        handle.request(view.clone());
                    }
                });
            }
        });

        let seen = sink.seen.lock();
        assert!(seen.len() >= 2);
        for snap in seen.iter() {
            assert!(expected.iter().any(|e| e == snap.as_ref()));
        }
        let stats = engine.stats();
        assert_eq!(stats.published as usize, seen.len());
        assert_eq!(stats.published + stats.coalesced, 1 + 100);
    }
}
