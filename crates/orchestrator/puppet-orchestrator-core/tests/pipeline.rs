mod common;

use approx::assert_relative_eq;
use common::{loaded, options, runtime};
use puppet_animation_core::PlaybackPriority;
use puppet_api_core::ids::{
    PARAM_ANGLE_X, PARAM_ANGLE_Y, PARAM_ANGLE_Z, PARAM_BODY_ANGLE_X, PARAM_BREATH, PARAM_MOUTH_OPEN_Y,
};
use puppet_orchestrator::{FeatureFlags, FrameStep, RuntimeError, RuntimeOptions, SkipReason};
use puppet_test_fixtures::mocks::{default_layout, RecordingAudioSink, StubDecoder};

fn only(features: FeatureFlags) -> RuntimeOptions {
    RuntimeOptions {
        features,
        ..options()
    }
}

#[test]
fn breath_only_changes_breath_parameters() {
    let mut rt = loaded(
        "sample",
        only(FeatureFlags {
            enable_breath: true,
            ..FeatureFlags::none()
        }),
    );
    for _ in 0..10 {
        let report = rt.tick(1.0 / 60.0).expect("tick");
        assert!(report.ran(FrameStep::Breath));
        assert!(!report.ran(FrameStep::Motion));
    }

    let breath_ids = [PARAM_ANGLE_X, PARAM_ANGLE_Y, PARAM_ANGLE_Z, PARAM_BODY_ANGLE_X, PARAM_BREATH];
    for p in default_layout().parameters {
        let committed = rt.engine().committed(&p.id).expect("committed value");
        if breath_ids.contains(&p.id.as_str()) {
            assert_ne!(committed, p.default_value, "{} should breathe", p.id);
        } else {
            assert_eq!(committed, p.default_value, "{} should be untouched", p.id);
        }
    }
}

#[test]
fn steps_run_in_pipeline_order() {
    let mut rt = loaded("sample", options());
    let report = rt.tick(1.0 / 60.0).expect("tick");
    assert_eq!(
        report.steps,
        vec![
            FrameStep::Time,
            FrameStep::Camera,
            FrameStep::Checkpoint,
            FrameStep::Motion,
            FrameStep::Expression,
            FrameStep::Drag,
            FrameStep::EyeBlink,
            FrameStep::Movement,
            FrameStep::Breath,
            FrameStep::Physics,
            FrameStep::Pose,
            FrameStep::Commit,
            FrameStep::Draw,
        ]
    );
    assert_eq!(report.epoch, 1);
}

#[test]
fn eye_blink_yields_to_an_updating_motion() {
    let mut rt = loaded(
        "sample",
        RuntimeOptions {
            random_motion: false,
            ..options()
        },
    );
    // First tick queues the idle clip; it applies from the second.
    let first = rt.tick(1.0 / 60.0).unwrap();
    assert!(!first.motion_updated);
    assert!(first.ran(FrameStep::EyeBlink));

    let second = rt.tick(1.0 / 60.0).unwrap();
    assert!(second.motion_updated);
    assert!(!second.ran(FrameStep::EyeBlink));
    assert!(rt.motion_player().unwrap().queue().entries().any(|e| e.key.group == "Idle"));
}

#[test]
fn stopped_motion_returns_parameters_to_their_baseline() {
    let mut rt = loaded(
        "sample",
        only(FeatureFlags {
            enable_motion: true,
            ..FeatureFlags::none()
        }),
    );
    rt.start_motion("TapBody", 0, PlaybackPriority::Force).expect("start");
    for _ in 0..30 {
        rt.tick(1.0 / 60.0).unwrap();
    }
    assert!(rt.engine().committed(PARAM_ANGLE_Y).unwrap() > 5.0);
    assert_eq!(rt.parameters().unwrap().value_by_id(PARAM_ANGLE_Y), Some(0.0));

    rt.stop_motions();
    rt.set_features(FeatureFlags::none());
    for _ in 0..5 {
        rt.tick(1.0 / 60.0).unwrap();
    }
    assert_eq!(rt.engine().committed(PARAM_ANGLE_Y), Some(0.0));
}

#[test]
fn paused_keeps_camera_and_draw_only() {
    let mut rt = loaded("sample", options());
    rt.start_motion("TapBody", 1, PlaybackPriority::Normal).expect("start");
    rt.set_paused(true);
    assert!(rt.motion_player().unwrap().is_finished());

    rt.zoom_in(0.5);
    let report = rt.tick(1.0 / 60.0).unwrap();
    for step in [FrameStep::Drag, FrameStep::EyeBlink, FrameStep::Breath, FrameStep::Physics, FrameStep::Pose] {
        assert!(!report.ran(step), "{step:?} ran while paused");
    }
    assert!(report.ran(FrameStep::Camera));
    assert!(report.ran(FrameStep::Draw));
    // The zoom reached the submitted transform.
    let mvp = rt.surface().last_draw().expect("drawn").mvp;
    assert_relative_eq!(mvp[5], 1.5, epsilon = 1e-5);
}

#[test]
fn speed_scales_the_tick() {
    let mut rt = loaded(
        "sample",
        RuntimeOptions {
            speed: 2.0,
            ..options()
        },
    );
    let report = rt.tick(0.01).unwrap();
    assert_relative_eq!(report.dt, 0.02);
}

#[test]
fn physics_and_pose_follow_their_flags() {
    let mut rt = loaded("sample", options());
    assert!(rt.has_physics());
    assert!(rt.has_pose());
    rt.tick(0.016).unwrap();
    assert_eq!(rt.engine().physics_steps, 1);
    assert_eq!(rt.engine().pose_steps, 1);

    rt.set_features(FeatureFlags {
        enable_physics: false,
        ..FeatureFlags::all()
    });
    rt.tick(0.016).unwrap();
    assert_eq!(rt.engine().physics_steps, 1);
    assert_eq!(rt.engine().pose_steps, 2);
}

#[test]
fn lipsync_drives_the_mouth() {
    let sink = RecordingAudioSink::new();
    let mut rt = loaded(
        "sample",
        RuntimeOptions {
            lipsync_smoothing: 0.0,
            ..only(FeatureFlags {
                enable_lipsync: true,
                ..FeatureFlags::none()
            })
        },
    )
    .with_audio(sink.clone())
    .with_decoder(StubDecoder::tone(1000, 1.0, 0.1));

    rt.input_audio(b"wav", true).expect("audio starts");
    assert_eq!(sink.played(), vec![1000]);

    let report = rt.tick(0.1).unwrap();
    assert_relative_eq!(report.envelope.expect("envelope"), 0.5, epsilon = 1e-4);
    // Baseline 0, pulled 80% toward 0.5.
    assert_relative_eq!(rt.engine().committed(PARAM_MOUTH_OPEN_Y).unwrap(), 0.4, epsilon = 1e-4);

    rt.stop_audio();
    let report = rt.tick(0.1).unwrap();
    assert!(report.envelope.is_none());
    assert_eq!(rt.engine().committed(PARAM_MOUTH_OPEN_Y), Some(0.0));
}

#[test]
fn motion_voice_track_starts_with_the_motion() {
    let sink = RecordingAudioSink::new();
    let mut rt = loaded("sample", options())
        .with_audio(sink.clone())
        .with_decoder(StubDecoder::tone(1000, 0.5, 0.1));

    let started = rt.start_motion("TapBody", 0, PlaybackPriority::Normal).unwrap();
    assert!(started.has_voice);
    assert_eq!(sink.played(), vec![500]);
    assert!(rt.lipsync().is_active());

    // The voice belongs to the group, so every clip of it restarts the track.
    rt.start_motion("TapBody", 1, PlaybackPriority::Force).unwrap();
    assert_eq!(sink.played(), vec![500, 500]);
}

#[test]
fn undecodable_audio_is_reported() {
    let mut rt = loaded("sample", options()).with_decoder(StubDecoder::failing());
    assert!(matches!(rt.input_audio(b"junk", false), Err(RuntimeError::Audio { .. })));
    assert!(!rt.lipsync().is_active());

    let mut bare = loaded("sample", options());
    assert!(matches!(bare.input_audio(b"junk", false), Err(RuntimeError::Audio { .. })));
}

#[test]
fn lost_context_skips_the_frame() {
    let mut rt = loaded("sample", options());
    rt.surface_mut().lost = true;
    let report = rt.tick(0.016).unwrap();
    assert_eq!(report.skipped, Some(SkipReason::ContextLost));
    assert!(rt.surface().draws.is_empty());
}

#[test]
fn ticking_without_a_model_is_an_error() {
    let mut rt = runtime(options());
    assert!(matches!(rt.tick(0.016), Err(RuntimeError::NotLoaded)));
    assert!(matches!(
        rt.start_motion("Idle", 0, PlaybackPriority::Normal),
        Err(RuntimeError::NotLoaded)
    ));
    rt.stop_motions();
    rt.stop_motions();
}

#[test]
fn disabled_playback_is_distinguishable() {
    let mut rt = loaded("sample", only(FeatureFlags::none()));
    let err = rt.start_motion("Idle", 0, PlaybackPriority::Normal).unwrap_err();
    assert!(matches!(
        err,
        RuntimeError::Playback(puppet_animation_core::PlaybackError::Disabled)
    ));
    assert!(matches!(rt.set_expression("Smile"), Err(RuntimeError::Playback(_))));
}
