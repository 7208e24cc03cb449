mod common;

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use common::{loaded, options, runtime, source};
use puppet_api_core::{EngineError, EngineFramework, FrameworkLifecycle};
use puppet_assets_core::{LoadError, MemorySource};
use puppet_orchestrator::{Runtime, RuntimeError, RuntimeOptions};
use puppet_test_fixtures::mocks::{ManualClock, ManualRefresh, MockEngine, MockSurface, RecordingAudioSink, StubDecoder};
use puppet_test_fixtures::puppets;

#[derive(Default)]
struct CountingFramework {
    starts: Arc<AtomicUsize>,
    disposals: Arc<AtomicUsize>,
}

impl EngineFramework for CountingFramework {
    fn start_up(&self) -> Result<(), EngineError> {
        self.starts.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn dispose(&self) {
        self.disposals.fetch_add(1, Ordering::SeqCst);
    }
}

fn sample_ref() -> String {
    puppets::settings_ref("sample").unwrap()
}

#[test]
fn missing_topology_fails_without_allocating_a_handle() {
    let files: MemorySource = puppets::files_without("sample", ".moc3").unwrap().into_iter().collect();
    let mut rt = runtime(options());
    let err = rt.load(&files, &sample_ref()).unwrap_err();
    match err {
        RuntimeError::Load(LoadError::MissingAsset { path }) => assert!(path.ends_with("sample.moc3")),
        other => panic!("unexpected {other:?}"),
    }
    assert!(!rt.is_loaded());
    assert!(rt.engine().live_handles().is_empty());
    assert!(rt.engine().consistency_checks.is_empty());
}

#[test]
fn missing_physics_only_disables_physics() {
    let files: MemorySource = puppets::files_without("sample", ".physics3.json").unwrap().into_iter().collect();
    let mut rt = runtime(options());
    rt.load(&files, &sample_ref()).expect("loads");
    assert!(!rt.has_physics());
    assert!(rt.has_pose());
    rt.tick(0.016).unwrap();
    assert_eq!(rt.engine().physics_steps, 0);
}

#[test]
fn engine_rejecting_physics_disables_it() {
    let mut engine = MockEngine::new();
    engine.reject_physics = true;
    let mut rt = Runtime::new(engine, MockSurface::new(64, 64), options());
    rt.load(&source("sample"), &sample_ref()).expect("loads");
    assert!(!rt.has_physics());
}

#[test]
fn load_populates_catalogs_and_uploads_textures() {
    let rt = loaded("sample", options());
    assert_eq!(rt.expressions(), vec!["Smile", "Angry"]);
    assert_eq!(rt.motions(), vec!["Idle_0", "TapBody_0", "TapBody_1"]);
    assert_eq!(rt.hit_area_names(), vec!["Head", "Body"]);
    assert_eq!(rt.surface().uploaded, vec![(0, 16, 16)]);
    assert_eq!(rt.engine().consistency_checks, vec![true]);
    assert_eq!(rt.motion_player().unwrap().library().len(), 3);
}

#[test]
fn hotkey_fallback_feeds_the_catalogs() {
    let rt = loaded("minimal", options());
    assert_eq!(rt.expressions(), vec!["Blush"]);
    assert_eq!(rt.motions(), vec!["Hotkeys_0"]);
}

#[test]
fn textures_are_capped_to_the_size_limit() {
    let rt = loaded(
        "sample",
        RuntimeOptions {
            max_texture_size: Some(8),
            ..options()
        },
    );
    assert_eq!(rt.surface().uploaded, vec![(0, 8, 8)]);
}

#[test]
fn keep_aspect_fits_the_surface_to_the_canvas() {
    let rt = loaded(
        "sample",
        RuntimeOptions {
            keep_aspect: true,
            ..options()
        },
    );
    assert_eq!((rt.surface().width, rt.surface().height), (600, 600));
}

#[test]
fn rejected_reload_keeps_the_current_model() {
    let mut rt = loaded("sample", options());
    let old = rt.handle().expect("loaded");

    let mut broken = source("sample");
    broken.insert("sample/sample.moc3", b"not a topology".to_vec());
    let err = rt.load(&broken, &sample_ref()).unwrap_err();
    assert!(matches!(err, RuntimeError::Engine(EngineError::TopologyRejected { .. })));
    assert_eq!(rt.handle(), Some(old));
    assert_eq!(rt.engine().live_handles(), vec![old]);
    rt.tick(0.016).expect("old model still runs");
}

#[test]
fn failed_texture_upload_leaves_nothing_loaded() {
    let mut rt = loaded("sample", options());
    rt.surface_mut().fail_uploads = true;
    assert!(matches!(
        rt.load(&source("sample"), &sample_ref()),
        Err(RuntimeError::Engine(EngineError::Surface { .. }))
    ));
    assert!(!rt.is_loaded());
    assert!(rt.engine().live_handles().is_empty());
    assert_eq!(rt.engine().released.len(), 2);
}

#[test]
fn successful_reload_releases_the_previous_model() {
    let mut rt = loaded("sample", options());
    let old = rt.handle().unwrap();
    rt.load(&source("minimal"), &puppets::settings_ref("minimal").unwrap())
        .expect("reload");
    assert_ne!(rt.handle(), Some(old));
    assert_eq!(rt.engine().released, vec![old]);
    assert_eq!(rt.surface().released_textures, 1);
    assert_eq!(rt.surface().uploaded, vec![(0, 8, 4)]);
}

#[test]
fn refresh_drives_the_loop_until_destroyed() {
    let clock = ManualClock::new();
    let refresh = ManualRefresh::new();
    let sink = RecordingAudioSink::new();
    let mut rt = runtime(options())
        .with_clock(clock.clone())
        .with_refresh(refresh.clone())
        .with_audio(sink.clone())
        .with_decoder(StubDecoder::tone(100, 1.0, 0.1));
    rt.load(&source("sample"), &sample_ref()).unwrap();

    let first = rt.pending_frame().expect("scheduled on load");
    assert!(rt.on_refresh(first).unwrap().is_some());
    let second = rt.pending_frame().expect("rescheduled");
    assert_ne!(first, second);
    assert!(rt.on_refresh(first).unwrap().is_none(), "stale request");

    clock.advance(0.25);
    let report = rt.on_refresh(second).unwrap().expect("frame");
    assert!((report.dt - 0.25).abs() < 1e-6);

    rt.input_audio(b"wav", true).unwrap();
    let pending = rt.pending_frame().unwrap();
    let stops_before = sink.stops();
    let hits = std::rc::Rc::new(std::cell::Cell::new(0));
    let h = std::rc::Rc::clone(&hits);
    rt.on_hit(move |_| h.set(h.get() + 1));

    let handle = rt.handle().unwrap();
    rt.destroy(false);
    assert_eq!(refresh.cancelled(), vec![pending]);
    assert!(sink.stops() > stops_before);
    assert!(!rt.lipsync().is_active());
    assert_eq!(rt.engine().released, vec![handle]);
    assert_eq!(rt.surface().released_textures, 1);
    assert!(rt.pending_frame().is_none());

    assert!(matches!(rt.tick(0.016), Err(RuntimeError::Destroyed)));
    assert!(matches!(rt.on_refresh(pending), Err(RuntimeError::Destroyed)));
    rt.pointer_down(400.0, 450.0);
    assert!(matches!(rt.pointer_up(400.0, 450.0), Err(RuntimeError::Destroyed)));
    assert_eq!(hits.get(), 0);
    rt.destroy(true);
}

#[test]
fn auto_animate_off_never_schedules() {
    let rt = loaded(
        "sample",
        RuntimeOptions {
            auto_animate: false,
            ..options()
        },
    );
    assert!(rt.pending_frame().is_none());
}

#[test]
fn framework_is_disposed_only_by_the_last_instance_that_asks() {
    let fw = CountingFramework::default();
    let starts = Arc::clone(&fw.starts);
    let disposals = Arc::clone(&fw.disposals);
    let lifecycle = FrameworkLifecycle::new(fw);

    let mut a = runtime(options()).with_framework(Arc::clone(&lifecycle));
    let mut b = runtime(options()).with_framework(Arc::clone(&lifecycle));
    a.load(&source("sample"), &sample_ref()).unwrap();
    b.load(&source("sample"), &sample_ref()).unwrap();
    a.load(&source("sample"), &sample_ref()).unwrap();
    assert_eq!(starts.load(Ordering::SeqCst), 1);
    assert_eq!(lifecycle.lease_count(), 2);

    a.destroy(true);
    assert_eq!(disposals.load(Ordering::SeqCst), 0);
    assert!(lifecycle.is_started());

    b.destroy(true);
    assert_eq!(disposals.load(Ordering::SeqCst), 1);
    assert!(!lifecycle.is_started());
}

#[test]
fn destroy_without_disposal_keeps_the_framework() {
    let lifecycle = FrameworkLifecycle::new(CountingFramework::default());
    let mut rt = runtime(options()).with_framework(Arc::clone(&lifecycle));
    rt.load(&source("sample"), &sample_ref()).unwrap();
    rt.destroy(false);
    assert_eq!(lifecycle.lease_count(), 0);
    assert!(lifecycle.is_started());
}
