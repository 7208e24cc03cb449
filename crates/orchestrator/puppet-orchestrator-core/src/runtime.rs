//! The puppet runtime: owns the engine, the surface and every per-model
//! controller, and exposes loading, playback, camera and input operations.

use std::rc::Rc;
use std::sync::Arc;

use log::{debug, warn};
use puppet_animation_core::{
    Breath, EyeBlink, ExpressionPlayer, MotionCallbacks, MotionPlayer, PlaybackError,
    PlaybackPriority, StartedMotion, TargetPoint,
};
use puppet_api_core::ids::{
    DEFAULT_EYE_BLINK_IDS, DEFAULT_LIP_SYNC_IDS, HIT_AREA_BODY, HIT_AREA_HEAD, MOTION_GROUP_TAP_BODY,
};
use puppet_api_core::{
    AudioDecoder, AudioSink, CanvasInfo, Clock, FrameRequest, FrameworkLease, FrameworkLifecycle,
    ModelEngine, ModelHandle, ModelState, NullAudioSink, ParameterVector, PartOpacityVector,
    PixelBuffer, RefreshSignal, RenderSurface, Viewport,
};
use puppet_assets_core::texture::fit_within;
use puppet_assets_core::{load_bundle, BundleSource, ModelBundle};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::camera::{Camera, CameraState};
use crate::config::{FeatureFlags, RuntimeOptions};
use crate::controllers::{BlinkController, LipsyncEngine, MotionController};
use crate::diagnostics::{FrameReport, SkipReason};
use crate::error::RuntimeError;
use crate::events::{EventListeners, HitEvent, ListenerId};
use crate::frame_loop::FrameLoop;
use crate::framing::{framing_offset, opaque_rows, CharacterPosition};
use crate::scheduler::{run_frame, FrameLayers, FrameTarget};
use crate::touch::{hit_areas, TouchState};
use crate::viewport::{to_mvp, ModelMatrix, ViewTransform};

/// Everything tied to one loaded model. Dropped wholesale on reload.
struct LoadedModel {
    handle: ModelHandle,
    bundle: Rc<ModelBundle>,
    state: ModelState,
    canvas: CanvasInfo,
    model_matrix: ModelMatrix,
    motion: MotionController,
    expression: ExpressionPlayer,
    blink: BlinkController,
    breath: Breath,
    drag: TargetPoint,
    lip_sync_indices: Vec<usize>,
    has_physics: bool,
    has_pose: bool,
}

/// What a pointer release did.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TapOutcome {
    pub event: Option<HitEvent>,
    pub expression: Option<String>,
    pub motion: Option<StartedMotion>,
}

pub struct Runtime<E: ModelEngine, S: RenderSurface> {
    engine: E,
    surface: S,
    options: RuntimeOptions,
    camera: Camera,
    view: ViewTransform,
    touch: TouchState,
    lipsync: LipsyncEngine,
    listeners: EventListeners,
    frame_loop: FrameLoop,
    audio: Box<dyn AudioSink>,
    decoder: Option<Box<dyn AudioDecoder>>,
    framework: Option<Arc<FrameworkLifecycle>>,
    lease: Option<FrameworkLease>,
    model: Option<LoadedModel>,
    rng: StdRng,
    epoch: u64,
    destroyed: bool,
}

impl<E: ModelEngine, S: RenderSurface> Runtime<E, S> {
    pub fn new(engine: E, surface: S, options: RuntimeOptions) -> Self {
        let (w, h) = surface.size();
        let rng = match options.rng_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            camera: Camera::new(options.camera_state(), options.camera_limits()),
            view: ViewTransform::new(w, h),
            lipsync: LipsyncEngine::new(options.lipsync_smoothing),
            engine,
            surface,
            options,
            touch: TouchState::default(),
            listeners: EventListeners::new(),
            frame_loop: FrameLoop::default(),
            audio: Box::new(NullAudioSink),
            decoder: None,
            framework: None,
            lease: None,
            model: None,
            rng,
            epoch: 0,
            destroyed: false,
        }
    }

    pub fn with_audio(mut self, sink: impl AudioSink + 'static) -> Self {
        self.audio = Box::new(sink);
        self.audio.set_volume(self.options.volume);
        self
    }

    pub fn with_decoder(mut self, decoder: impl AudioDecoder + 'static) -> Self {
        self.decoder = Some(Box::new(decoder));
        self
    }

    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.frame_loop.set_clock(Box::new(clock));
        self
    }

    pub fn with_refresh(mut self, refresh: impl RefreshSignal + 'static) -> Self {
        self.frame_loop.set_refresh(Box::new(refresh));
        self
    }

    /// Share a process-wide engine framework. A lease is taken on first load.
    pub fn with_framework(mut self, framework: Arc<FrameworkLifecycle>) -> Self {
        self.framework = Some(framework);
        self
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut E {
        &mut self.engine
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn options(&self) -> &RuntimeOptions {
        &self.options
    }

    pub fn features(&self) -> FeatureFlags {
        self.options.features
    }

    pub fn set_features(&mut self, features: FeatureFlags) {
        self.options.features = features;
    }

    /// Pausing also stops every motion.
    pub fn set_paused(&mut self, paused: bool) {
        self.options.paused = paused;
        if paused {
            if let Some(model) = self.model.as_mut() {
                model.motion.stop_all();
            }
        }
    }

    pub fn set_speed(&mut self, speed: f32) {
        self.options.speed = speed.max(0.0);
    }

    pub fn set_volume(&mut self, volume: f32) {
        self.options.volume = volume.clamp(0.0, 1.0);
        self.audio.set_volume(self.options.volume);
    }

    pub fn set_lipsync_smoothing(&mut self, smoothing: f32) {
        self.options.lipsync_smoothing = smoothing;
        self.lipsync.set_smoothing(smoothing);
    }

    pub fn set_random_motion(&mut self, random_motion: bool) {
        self.options.random_motion = random_motion;
        if let Some(model) = self.model.as_mut() {
            model.motion.random_motion = random_motion;
        }
    }

    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    pub fn is_loaded(&self) -> bool {
        self.model.is_some()
    }

    pub fn handle(&self) -> Option<ModelHandle> {
        self.model.as_ref().map(|m| m.handle)
    }

    pub fn bundle(&self) -> Option<&ModelBundle> {
        self.model.as_ref().map(|m| m.bundle.as_ref())
    }

    pub fn has_physics(&self) -> bool {
        self.model.as_ref().is_some_and(|m| m.has_physics)
    }

    pub fn has_pose(&self) -> bool {
        self.model.as_ref().is_some_and(|m| m.has_pose)
    }

    pub fn parameters(&self) -> Option<&ParameterVector> {
        self.model.as_ref().map(|m| &m.state.parameters)
    }

    pub fn model_state(&self) -> Option<&ModelState> {
        self.model.as_ref().map(|m| &m.state)
    }

    pub fn motion_player(&self) -> Option<&MotionPlayer> {
        self.model.as_ref().map(|m| m.motion.player())
    }

    pub fn lipsync(&self) -> &LipsyncEngine {
        &self.lipsync
    }

    pub fn pending_frame(&self) -> Option<FrameRequest> {
        self.frame_loop.pending()
    }

    fn ensure_alive(&self) -> Result<(), RuntimeError> {
        if self.destroyed {
            return Err(RuntimeError::Destroyed);
        }
        Ok(())
    }

    fn model_mut(&mut self) -> Result<&mut LoadedModel, RuntimeError> {
        self.ensure_alive()?;
        self.model.as_mut().ok_or(RuntimeError::NotLoaded)
    }

    // ---------- loading ----------

    /// Load the bundle at `reference`, replacing the current model.
    ///
    /// The bundle is fetched completely before anything is touched. If the
    /// engine rejects the topology the previous model stays in place; if a
    /// texture upload fails afterwards no model is left loaded.
    pub fn load(&mut self, source: &dyn BundleSource, reference: &str) -> Result<(), RuntimeError> {
        self.ensure_alive()?;
        if self.lease.is_none() {
            if let Some(framework) = &self.framework {
                self.lease = Some(framework.acquire()?);
            }
        }

        let bundle = load_bundle(source, reference)?;
        let handle = self
            .engine
            .load_topology(&bundle.topology, self.options.check_consistency)?;
        let layout = match self.engine.initialize(handle) {
            Ok(layout) => layout,
            Err(e) => {
                self.engine.release(handle);
                return Err(e.into());
            }
        };

        let has_physics = self.load_capability(handle, "physics", bundle.physics.as_deref(), E::load_physics);
        let has_pose = self.load_capability(handle, "pose", bundle.pose.as_deref(), E::load_pose);
        self.load_capability(handle, "user data", bundle.user_data.as_deref(), E::load_user_data);

        self.unload();
        let max = self
            .options
            .max_texture_size
            .map_or(self.surface.max_texture_size(), |m| m.min(self.surface.max_texture_size()));
        for (index, texture) in bundle.textures.iter().enumerate() {
            let fitted = fit_within(texture, max);
            if let Err(e) = self
                .surface
                .upload_texture(index, &fitted, self.options.premultiplied_alpha)
            {
                self.engine.release(handle);
                self.surface.release_textures();
                return Err(e.into());
            }
        }

        let bundle = Rc::new(bundle);
        let settings = &bundle.settings;
        let parameters = ParameterVector::new(layout.parameters);
        let eye_blink_ids = effect_ids(settings.eye_blink_ids(), &DEFAULT_EYE_BLINK_IDS, &parameters);
        let lip_sync_ids = effect_ids(settings.lip_sync_ids(), &DEFAULT_LIP_SYNC_IDS, &parameters);
        let lip_sync_indices = lip_sync_ids.iter().filter_map(|id| parameters.index_of(id)).collect();

        let mut player = MotionPlayer::new(Rc::clone(&bundle), &self.options.animation);
        player.set_effect_ids(eye_blink_ids.clone(), lip_sync_ids);
        let motion_rng = StdRng::seed_from_u64(self.rng.gen());
        let blink_rng = StdRng::seed_from_u64(self.rng.gen());

        let mut model_matrix = ModelMatrix::new(layout.canvas);
        model_matrix.apply_layout(&settings.layout);

        let model = LoadedModel {
            handle,
            expression: ExpressionPlayer::from_bundle(&bundle, &self.options.animation),
            motion: MotionController::new(player, motion_rng, self.options.random_motion),
            blink: BlinkController::new(EyeBlink::new(eye_blink_ids), blink_rng),
            breath: Breath::default(),
            drag: TargetPoint::new(),
            state: ModelState::new(parameters, PartOpacityVector::new(layout.parts)),
            canvas: layout.canvas,
            model_matrix,
            lip_sync_indices,
            has_physics,
            has_pose,
            bundle,
        };
        debug!(
            "loaded '{reference}' as {handle:?}: {} bytes, {} motion(s), physics {has_physics}, pose {has_pose}",
            model.bundle.size_bytes(),
            model.motion.player().library().len(),
        );
        self.model = Some(model);
        self.resize();
        if self.options.auto_animate {
            self.frame_loop.schedule();
        }
        Ok(())
    }

    fn load_capability(
        &mut self,
        handle: ModelHandle,
        what: &str,
        data: Option<&[u8]>,
        load: fn(&mut E, ModelHandle, &[u8]) -> Result<(), puppet_api_core::EngineError>,
    ) -> bool {
        let Some(data) = data else {
            return false;
        };
        match load(&mut self.engine, handle, data) {
            Ok(()) => true,
            Err(e) => {
                warn!("{what} disabled: {e}");
                false
            }
        }
    }

    /// Tear down the current model, its textures and any audio.
    fn unload(&mut self) {
        if let Some(model) = self.model.take() {
            self.engine.release(model.handle);
            self.surface.release_textures();
            debug!("released {:?}", model.handle);
        }
        self.stop_audio();
        self.touch = TouchState::default();
    }

    // ---------- frames ----------

    /// Sync the view with the surface size, fitting the canvas when
    /// `keep_aspect` is set.
    pub fn resize(&mut self) {
        let (w, h) = self.surface.size();
        self.view.resize(w, h);
        if !self.options.keep_aspect {
            return;
        }
        if let Some(canvas) = self.model.as_ref().map(|m| m.canvas) {
            let (fw, fh) = self.view.fitted_size(&canvas, true);
            if (fw, fh) != (w, h) {
                self.surface.resize(fw, fh);
                self.view.resize(fw, fh);
            }
        }
    }

    /// Handle a refresh callback. Stale or cancelled requests are ignored.
    pub fn on_refresh(&mut self, request: FrameRequest) -> Result<Option<FrameReport>, RuntimeError> {
        self.ensure_alive()?;
        if !self.frame_loop.begin(request) {
            return Ok(None);
        }
        let report = self.update();
        if self.options.auto_animate && !self.destroyed {
            self.frame_loop.schedule();
        }
        report.map(Some)
    }

    /// One tick using the clock's elapsed time. Does not schedule another.
    pub fn update(&mut self) -> Result<FrameReport, RuntimeError> {
        let dt = self.frame_loop.delta();
        self.tick(dt)
    }

    /// One tick advancing by `dt` seconds before speed scaling.
    pub fn tick(&mut self, dt: f32) -> Result<FrameReport, RuntimeError> {
        self.ensure_alive()?;
        self.epoch = self.epoch.wrapping_add(1);
        let dt = dt.max(0.0) * self.options.speed;
        if self.model.is_none() {
            return Err(RuntimeError::NotLoaded);
        }
        if self.surface.context_lost() {
            return Ok(FrameReport::skipped(self.epoch, dt, SkipReason::ContextLost));
        }

        let (w, h) = self.surface.size();
        if self.view.size() != (w.max(1), h.max(1)) {
            self.resize();
        }
        let (w, h) = self.view.size();
        let camera = self.camera.state();
        let Some(model) = self.model.as_mut() else {
            return Err(RuntimeError::NotLoaded);
        };
        let mvp = self.view.projection() * self.view.view_matrix(&camera) * model.model_matrix.matrix();

        let layers = FrameLayers {
            motion: Some(&mut model.motion),
            expression: Some(&mut model.expression),
            drag: Some(&mut model.drag),
            eye_blink: Some(&mut model.blink),
            breath: Some(&mut model.breath),
            lipsync: Some(&mut self.lipsync),
            lip_sync_indices: &model.lip_sync_indices,
        };
        let target = FrameTarget {
            engine: &mut self.engine,
            surface: &mut self.surface,
            handle: model.handle,
            viewport: Viewport {
                x: 0,
                y: 0,
                width: w,
                height: h,
            },
            mvp: to_mvp(&mvp),
            physics: model.has_physics,
            pose: model.has_pose,
        };
        let report = run_frame(
            self.epoch,
            dt,
            &mut model.state,
            layers,
            target,
            &self.options.features,
            self.options.paused,
        );
        self.flush_voice();
        Ok(report)
    }

    // ---------- playback ----------

    fn playback_enabled(&self) -> Result<(), RuntimeError> {
        if !self.options.features.enable_motion {
            return Err(PlaybackError::Disabled.into());
        }
        Ok(())
    }

    pub fn start_motion(
        &mut self,
        group: &str,
        index: usize,
        priority: PlaybackPriority,
    ) -> Result<StartedMotion, RuntimeError> {
        self.start_motion_with(group, index, priority, MotionCallbacks::default())
    }

    pub fn start_motion_with(
        &mut self,
        group: &str,
        index: usize,
        priority: PlaybackPriority,
        callbacks: MotionCallbacks,
    ) -> Result<StartedMotion, RuntimeError> {
        self.playback_enabled()?;
        let started = self.model_mut()?.motion.start(group, index, priority, callbacks)?;
        self.flush_voice();
        Ok(started)
    }

    pub fn start_random_motion(
        &mut self,
        group: Option<&str>,
        priority: PlaybackPriority,
    ) -> Result<StartedMotion, RuntimeError> {
        self.start_random_motion_with(group, priority, MotionCallbacks::default())
    }

    pub fn start_random_motion_with(
        &mut self,
        group: Option<&str>,
        priority: PlaybackPriority,
        callbacks: MotionCallbacks,
    ) -> Result<StartedMotion, RuntimeError> {
        self.playback_enabled()?;
        let started = self.model_mut()?.motion.start_random(group, priority, callbacks)?;
        self.flush_voice();
        Ok(started)
    }

    /// Halt every motion. Safe to call repeatedly or with nothing loaded.
    pub fn stop_motions(&mut self) {
        if let Some(model) = self.model.as_mut() {
            model.motion.stop_all();
        }
    }

    pub fn set_expression(&mut self, name: &str) -> Result<(), RuntimeError> {
        if !self.options.features.enable_expression {
            return Err(PlaybackError::Disabled.into());
        }
        self.model_mut()?.expression.set_expression(name)?;
        Ok(())
    }

    /// `None` when the model declares no expressions.
    pub fn set_random_expression(&mut self) -> Result<Option<String>, RuntimeError> {
        if !self.options.features.enable_expression {
            return Err(PlaybackError::Disabled.into());
        }
        let model = self.model.as_mut().ok_or(RuntimeError::NotLoaded)?;
        Ok(model.expression.set_random_expression(&mut self.rng))
    }

    pub fn reset_expression(&mut self) {
        if let Some(model) = self.model.as_mut() {
            model.expression.reset();
        }
    }

    pub fn expressions(&self) -> Vec<String> {
        self.bundle()
            .map(|b| b.settings.expression_names().map(str::to_string).collect())
            .unwrap_or_default()
    }

    /// Every declared clip as `group_index`.
    pub fn motions(&self) -> Vec<String> {
        let Some(bundle) = self.bundle() else {
            return Vec::new();
        };
        bundle
            .motion_groups
            .iter()
            .flat_map(|g| (0..g.clips.len()).map(move |i| format!("{}_{i}", g.name)))
            .collect()
    }

    pub fn hit_area_names(&self) -> Vec<String> {
        self.bundle()
            .map(|b| b.settings.hit_areas.iter().map(|a| a.name.clone()).collect())
            .unwrap_or_default()
    }

    // ---------- audio ----------

    fn flush_voice(&mut self) {
        let Some(model) = self.model.as_mut() else {
            return;
        };
        let Some(group) = model.motion.take_pending_voice() else {
            return;
        };
        let Some(bytes) = model.motion.player().library().voice(&group).map(<[u8]>::to_vec) else {
            return;
        };
        let autoplay = self.options.autoplay_voice;
        if let Err(e) = self.input_audio(&bytes, autoplay) {
            warn!("voice track of '{group}' not started: {e}");
        }
    }

    /// Decode `bytes` and drive the mouth from it, optionally playing it.
    pub fn input_audio(&mut self, bytes: &[u8], play: bool) -> Result<(), RuntimeError> {
        self.ensure_alive()?;
        let decoder = self.decoder.as_ref().ok_or_else(|| RuntimeError::Audio {
            reason: "no audio decoder configured".into(),
        })?;
        let audio = decoder.decode(bytes)?;
        if audio.is_empty() {
            return Err(RuntimeError::Audio {
                reason: "decoded clip has no samples".into(),
            });
        }
        self.audio.stop();
        self.lipsync.start(&audio);
        if play {
            self.audio.play(audio);
        }
        Ok(())
    }

    pub fn stop_audio(&mut self) {
        self.audio.stop();
        self.lipsync.stop();
    }

    // ---------- camera ----------

    pub fn camera(&self) -> CameraState {
        self.camera.state()
    }

    pub fn set_camera(&mut self, state: CameraState) {
        self.camera.set_position(state.x, state.y);
        self.camera.set_scale(state.scale);
    }

    pub fn zoom_in(&mut self, factor: f32) -> bool {
        self.camera.zoom_in(factor)
    }

    pub fn zoom_out(&mut self, factor: f32) -> bool {
        self.camera.zoom_out(factor)
    }

    pub fn wheel(&mut self, px: f32, py: f32, delta_y: f32) -> bool {
        self.camera.wheel(&self.view, px, py, delta_y)
    }

    /// Reset the camera and re-frame the model.
    pub fn double_click(&mut self) -> Result<bool, RuntimeError> {
        if !self.camera.double_click() {
            return Ok(false);
        }
        if self.model.is_some() {
            self.auto_frame()?;
        }
        Ok(true)
    }

    /// Render at zero pan and move the camera so the silhouette sits near
    /// the top of the view. Returns the new vertical pan, or `None` when the
    /// frame could not be read or was empty.
    pub fn auto_frame(&mut self) -> Result<Option<f32>, RuntimeError> {
        let previous = self.camera.state();
        let scale = previous.scale;
        self.camera.set_position(0.0, 0.0);
        self.tick(0.0)?;
        let offset = self
            .surface
            .capture_frame(1.0 / scale)
            .and_then(|frame| framing_offset(&frame, scale));
        match offset {
            Some(y) => self.camera.set_position(0.0, y),
            None => self.camera.set_position(previous.x, previous.y),
        }
        Ok(offset)
    }

    /// Silhouette rows at neutral camera. The camera is left untouched.
    pub fn character_position(&mut self) -> Result<Option<CharacterPosition>, RuntimeError> {
        let previous = self.camera.state();
        self.camera.set_position(0.0, 0.0);
        self.camera.set_scale(1.0);
        let result = self.tick(0.0).map(|_| self.surface.capture_frame(1.0));
        self.set_camera(previous);
        Ok(result?.as_ref().and_then(opaque_rows))
    }

    /// Auto-frame, draw once and read the frame back. `face_crop` keeps a
    /// centred square a quarter of the width wide, from the top row.
    pub fn screenshot(&mut self, face_crop: bool) -> Result<Option<PixelBuffer>, RuntimeError> {
        self.auto_frame()?;
        self.tick(0.0)?;
        let Some(frame) = self.surface.capture_frame(1.0) else {
            return Ok(None);
        };
        if !face_crop {
            return Ok(Some(frame));
        }
        let size = frame.width / 4;
        Ok(Some(frame.crop((frame.width - size) / 2, 0, size, size)))
    }

    // ---------- input ----------

    pub fn pointer_down(&mut self, px: f32, py: f32) {
        if self.destroyed {
            return;
        }
        self.camera.pan_start(px, py);
        self.touch.pointer_down(px, py);
    }

    pub fn pointer_move(&mut self, px: f32, py: f32) {
        if self.destroyed || !self.touch.is_pressed() {
            return;
        }
        self.camera.pan_move(px, py);
        self.touch.pointer_move(px, py);
        let camera = self.camera.state();
        if let (Some(model), Some((x, y))) = (self.model.as_mut(), self.view.device_to_view(&camera, px, py)) {
            model.drag.set(x.clamp(-1.0, 1.0), y.clamp(-1.0, 1.0));
        }
    }

    /// Finish the gesture, hit-test the release point and run the built-in
    /// `Head` / `Body` reactions.
    pub fn pointer_up(&mut self, px: f32, py: f32) -> Result<TapOutcome, RuntimeError> {
        self.ensure_alive()?;
        self.camera.pan_end();
        let was_pressed = self.touch.pointer_up(px, py);
        let camera = self.camera.state();
        let view_point = self.view.device_to_view(&camera, px, py);
        let model = self.model.as_mut().ok_or(RuntimeError::NotLoaded)?;
        model.drag.set(0.0, 0.0);

        let mut outcome = TapOutcome::default();
        let Some((vx, vy)) = view_point.filter(|_| was_pressed) else {
            return Ok(outcome);
        };
        if !self.options.tap_interaction || model.state.opacity < 1.0 {
            return Ok(outcome);
        }
        let (mx, my) = model.model_matrix.invert_point(vx, vy);
        let regions = hit_areas(&self.engine, model.handle, &model.bundle.settings.hit_areas, mx, my);
        if regions.is_empty() {
            return Ok(outcome);
        }
        let event = HitEvent {
            regions,
            x: vx,
            y: vy,
        };
        debug!("hit {:?} at ({vx:.3}, {vy:.3})", event.regions);
        self.listeners.emit_hit(&event);

        if self.options.auto_interaction {
            if event.contains(HIT_AREA_HEAD) {
                match self.set_random_expression() {
                    Ok(name) => outcome.expression = name,
                    Err(e) => debug!("head tap ignored: {e}"),
                }
            }
            if event.contains(HIT_AREA_BODY) {
                match self.start_random_motion(Some(MOTION_GROUP_TAP_BODY), PlaybackPriority::Normal) {
                    Ok(started) => outcome.motion = Some(started),
                    Err(e) => debug!("body tap ignored: {e}"),
                }
            }
        }
        outcome.event = Some(event);
        Ok(outcome)
    }

    /// Whether the model-space point lies in the hit area called `name`.
    /// Always false while the puppet is not fully opaque.
    pub fn hit_test(&self, name: &str, x: f32, y: f32) -> Result<bool, RuntimeError> {
        self.ensure_alive()?;
        let model = self.model.as_ref().ok_or(RuntimeError::NotLoaded)?;
        if model.state.opacity < 1.0 {
            return Ok(false);
        }
        let area = model.bundle.settings.hit_areas.iter().find(|a| a.name == name);
        Ok(area.is_some_and(|a| self.engine.hit_test(model.handle, &a.id, x, y)))
    }

    /// Device pixel to view space under the current camera.
    pub fn transform_point(&self, px: f32, py: f32) -> Option<(f32, f32)> {
        self.view.device_to_view(&self.camera.state(), px, py)
    }

    // ---------- events ----------

    pub fn on_hit(&mut self, listener: impl FnMut(&HitEvent) + 'static) -> ListenerId {
        self.listeners.on_hit(listener)
    }

    pub fn off_hit(&mut self, id: ListenerId) -> bool {
        self.listeners.off_hit(id)
    }

    // ---------- teardown ----------

    /// Cancel the pending frame, stop audio, release the model and its
    /// textures, drop listeners and give back the framework lease. The
    /// framework is disposed only if `dispose_framework` is set and this was
    /// its last lease.
    pub fn destroy(&mut self, dispose_framework: bool) {
        if self.destroyed {
            return;
        }
        self.frame_loop.cancel();
        self.unload();
        self.listeners.clear();
        if let Some(lease) = self.lease.take() {
            lease.release(dispose_framework);
        }
        self.destroyed = true;
        debug!("runtime destroyed");
    }
}

/// Declared ids, or the defaults the model actually has.
fn effect_ids(declared: Vec<String>, defaults: &[&str], parameters: &ParameterVector) -> Vec<String> {
    if !declared.is_empty() {
        return declared;
    }
    defaults
        .iter()
        .filter(|id| parameters.contains(id))
        .map(|id| id.to_string())
        .collect()
}
