// controller.rs — perspective/orthographic mode controller
//
// Owns both cameras and decides, per state, who may write the camera pose:
// pointer look while idle in perspective, orbit while idle in orthographic,
// the transition itself while a handoff is in flight.

use crate::camera::{CameraMode, CameraState, Lens, Viewport};
use crate::config::DeckConfig;
use crate::error::CameraError;
use crate::look::LookState;
use crate::orbit::{DragMode, OrbitControls};
use crate::pose::{self, Pose};
use crate::projection;
use glam::{Mat4, Vec2, Vec3};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputOwner {
    PointerLook,
    Orbit,
    /// Transitioning: nothing but the controller writes the camera.
    None,
}

/// One independently timed animation track.
#[derive(Debug, Clone, Copy)]
struct Track {
    elapsed: f32,
    duration: f32,
    done: bool,
}

impl Track {
    fn new(duration: f32) -> Self {
        Self {
            elapsed: 0.0,
            duration,
            done: duration <= 0.0,
        }
    }

    fn progress(&self) -> f32 {
        if self.done || self.duration <= 0.0 {
            return 1.0;
        }
        (self.elapsed / self.duration).clamp(0.0, 1.0)
    }

    fn advance(&mut self, dt: f32) -> f32 {
        if !self.done {
            self.elapsed += dt;
            if self.progress() >= 1.0 {
                self.done = true;
            }
        }
        self.progress()
    }
}

#[derive(Debug, Clone)]
pub struct TransitionState {
    pub source: CameraMode,
    pub target: CameraMode,
    /// Controller clock (seconds since mount) when the handoff began.
    pub started_at: f32,
    pub start_pose: Pose,
    pub target_pose: Pose,
    pub start_intrinsic: f32,
    pub target_intrinsic: f32,
    from_projection: Mat4,
    to_projection: Mat4,
    pose_track: Track,
    projection_track: Track,
}

impl TransitionState {
    /// Overall progress: the slower of the two tracks.
    pub fn progress(&self) -> f32 {
        self.pose_track.progress().min(self.projection_track.progress())
    }

    /// Both tracks have reported completion.
    pub fn is_done(&self) -> bool {
        self.pose_track.done && self.projection_track.done
    }

    #[cfg(test)]
    pub fn pose_done(&self) -> bool {
        self.pose_track.done
    }

    #[cfg(test)]
    pub fn projection_done(&self) -> bool {
        self.projection_track.done
    }

    #[cfg(test)]
    pub fn endpoints(&self) -> (Mat4, Mat4) {
        (self.from_projection, self.to_projection)
    }
}

#[derive(Debug, Clone)]
pub enum ControllerState {
    IdlePerspective,
    IdleOrthographic,
    Transitioning(TransitionState),
}

#[derive(Debug, Clone)]
struct CameraRig {
    perspective: CameraState,
    orthographic: CameraState,
    active: CameraMode,
}

impl CameraRig {
    fn camera(&self, mode: CameraMode) -> &CameraState {
        match mode {
            CameraMode::Perspective => &self.perspective,
            CameraMode::Orthographic => &self.orthographic,
        }
    }

    fn camera_mut(&mut self, mode: CameraMode) -> &mut CameraState {
        match mode {
            CameraMode::Perspective => &mut self.perspective,
            CameraMode::Orthographic => &mut self.orthographic,
        }
    }
}

/// Read-only view for the status bar.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ControllerSnapshot {
    pub mode: CameraMode,
    /// (target, progress) while a handoff is in flight.
    pub transition: Option<(CameraMode, f32)>,
    pub look_offset: Vec2,
    pub intrinsic: f32,
}

pub struct ModeController {
    config: DeckConfig,
    rig: Option<CameraRig>,
    state: ControllerState,
    look: LookState,
    orbit: OrbitControls,
    /// Scene point the orbit target is placed in front of.
    focus: Vec3,
    clock: f32,
}

impl ModeController {
    pub fn new(config: DeckConfig) -> Self {
        let focus = config.camera.initial_target();
        let base = Pose::looking_at(config.camera.initial_position(), focus).orientation;
        Self {
            config,
            rig: None,
            state: ControllerState::IdlePerspective,
            look: LookState::new(base),
            orbit: OrbitControls::new(),
            focus,
            clock: 0.0,
        }
    }

    /// Creates both cameras for `viewport`. Until this runs every other entry
    /// point is a no-op. Calling it again only resizes.
    pub fn mount(&mut self, viewport: Viewport) {
        if self.rig.is_some() {
            self.resize(viewport);
            return;
        }
        let c = &self.config.camera;
        let pose = Pose::looking_at(c.initial_position(), c.initial_target());
        let perspective = CameraState::new(
            pose,
            Lens::perspective(c.perspective_fov, viewport, c.perspective_near, c.perspective_far),
        );
        let orthographic = CameraState::new(
            pose.moved_along_view(c.fly_back_distance),
            Lens::orthographic(c.ortho_zoom, viewport, c.ortho_near, c.ortho_far),
        );
        self.look.rearm(pose.orientation);
        self.rig = Some(CameraRig {
            perspective,
            orthographic,
            active: CameraMode::Perspective,
        });
        self.state = ControllerState::IdlePerspective;
        log::info!("cameras mounted at {}x{}", viewport.width, viewport.height);
    }

    pub fn is_mounted(&self) -> bool {
        self.rig.is_some()
    }

    #[cfg(test)]
    pub fn state(&self) -> &ControllerState {
        &self.state
    }

    pub fn is_transitioning(&self) -> bool {
        matches!(self.state, ControllerState::Transitioning(_))
    }

    pub fn input_owner(&self) -> InputOwner {
        match self.state {
            ControllerState::IdlePerspective => InputOwner::PointerLook,
            ControllerState::IdleOrthographic => InputOwner::Orbit,
            ControllerState::Transitioning(_) => InputOwner::None,
        }
    }

    /// The camera the renderer should draw with this frame.
    pub fn active_camera(&self) -> Option<&CameraState> {
        self.rig.as_ref().map(|rig| rig.camera(rig.active))
    }

    #[cfg(test)]
    pub fn camera(&self, mode: CameraMode) -> Option<&CameraState> {
        self.rig.as_ref().map(|rig| rig.camera(mode))
    }

    pub fn snapshot(&self) -> Option<ControllerSnapshot> {
        let cam = self.active_camera()?;
        let transition = match &self.state {
            ControllerState::Transitioning(tr) => Some((tr.target, tr.progress())),
            _ => None,
        };
        Some(ControllerSnapshot {
            mode: cam.mode(),
            transition,
            look_offset: self.look.current,
            intrinsic: cam.lens.intrinsic(),
        })
    }

    /// Mode toggle trigger. Returns whether a transition started; triggers
    /// while one is in flight are dropped.
    pub fn toggle(&mut self) -> bool {
        if self.rig.is_none() {
            log::debug!("toggle ignored: cameras not mounted");
            return false;
        }
        let source = match self.state {
            ControllerState::IdlePerspective => CameraMode::Perspective,
            ControllerState::IdleOrthographic => CameraMode::Orthographic,
            ControllerState::Transitioning(ref tr) => {
                log::debug!("toggle dropped: transition to {:?} in flight", tr.target);
                return false;
            }
        };
        self.begin_transition(source, source.toggled());
        true
    }

    fn begin_transition(&mut self, source: CameraMode, target: CameraMode) {
        if source == CameraMode::Orthographic {
            self.focus = self.orbit.target();
        }
        self.look.reset();
        self.orbit.detach();

        let c = &self.config.camera;
        let (distance, target_intrinsic) = match target {
            CameraMode::Orthographic => (c.fly_back_distance, c.ortho_zoom),
            CameraMode::Perspective => (-c.fly_back_distance, c.perspective_fov),
        };
        let pose_duration = c.pose_duration();
        let projection_duration = c.projection_duration();

        let Some(rig) = self.rig.as_mut() else {
            return;
        };

        let source_cam = rig.camera(source);
        let start_pose = source_cam.pose();
        let start_intrinsic = source_cam.lens.intrinsic();
        let from_projection = source_cam.projection();
        let target_pose = start_pose.moved_along_view(distance);

        let target_cam = rig.camera_mut(target);
        target_cam.lens.set_intrinsic(target_intrinsic);
        target_cam.update_projection();
        let to_projection = target_cam.projection();

        log::info!(
            "camera transition {:?} -> {:?} ({:.2}s pose, {:.2}s projection)",
            source,
            target,
            pose_duration,
            projection_duration
        );

        self.state = ControllerState::Transitioning(TransitionState {
            source,
            target,
            started_at: self.clock,
            start_pose,
            target_pose,
            start_intrinsic,
            target_intrinsic,
            from_projection,
            to_projection,
            pose_track: Track::new(pose_duration),
            projection_track: Track::new(projection_duration),
        });
    }

    /// Per-frame update. `pointer` is the normalized pointer sample.
    /// Returns whether the active camera changed.
    pub fn tick(&mut self, dt: f32, pointer: Vec2) -> bool {
        if self.rig.is_none() {
            return false;
        }
        if dt.is_finite() && dt > 0.0 {
            self.clock += dt;
        }

        match self.state {
            ControllerState::IdlePerspective => self.tick_look(dt, pointer),
            ControllerState::IdleOrthographic => false,
            ControllerState::Transitioning(_) => {
                match self.advance_transition(dt) {
                    Ok(true) => self.finish_transition(),
                    Ok(false) => {}
                    Err(e) => {
                        log::warn!("{}; snapping camera to transition target", e);
                        self.finish_transition();
                    }
                }
                true
            }
        }
    }

    fn tick_look(&mut self, dt: f32, pointer: Vec2) -> bool {
        let dt = if dt.is_finite() && dt > 0.0 { dt } else { 0.0 };
        let Some(rig) = self.rig.as_mut() else {
            return false;
        };
        let orientation = self.look.update(pointer, dt, &self.config.look);
        let cam = rig.camera_mut(CameraMode::Perspective);
        if cam.orientation == orientation {
            return false;
        }
        cam.orientation = orientation;
        true
    }

    /// Steps both tracks and writes the blend into the displayed camera.
    /// `Ok(true)` once every track is done.
    fn advance_transition(&mut self, dt: f32) -> Result<bool, CameraError> {
        if !dt.is_finite() || dt < 0.0 {
            return Err(CameraError::InvalidFrameTime(dt));
        }
        let easing = self.config.camera.easing;
        let ControllerState::Transitioning(tr) = &mut self.state else {
            return Ok(false);
        };
        let Some(rig) = self.rig.as_mut() else {
            return Ok(false);
        };

        let pose_t = easing.apply(tr.pose_track.advance(dt));
        let proj_t = easing.apply(tr.projection_track.advance(dt));

        let pose = pose::interpolate(&tr.start_pose, &tr.target_pose, pose_t);
        if !pose.is_finite() {
            return Err(CameraError::NonFinite { track: "pose" });
        }
        let proj = projection::blend(&tr.from_projection, &tr.to_projection, proj_t);
        if !proj.is_finite() {
            return Err(CameraError::NonFinite { track: "projection" });
        }

        let cam = rig.camera_mut(tr.source);
        cam.set_pose(&pose);
        cam.set_projection(proj);
        Ok(tr.is_done())
    }

    /// Commits the target state, swaps the active camera and arms the idle
    /// behaviour of the target mode. Also the failure fall-back.
    fn finish_transition(&mut self) {
        let Some(rig) = self.rig.as_mut() else {
            return;
        };
        let tr = match std::mem::replace(&mut self.state, ControllerState::IdlePerspective) {
            ControllerState::Transitioning(tr) => tr,
            idle => {
                self.state = idle;
                return;
            }
        };

        rig.camera_mut(tr.source).update_projection();

        let target_cam = rig.camera_mut(tr.target);
        target_cam.set_pose(&tr.target_pose);
        target_cam.lens.set_intrinsic(tr.target_intrinsic);
        target_cam.update_projection();
        rig.active = tr.target;

        let target_cam = rig.camera(tr.target);
        self.state = match tr.target {
            CameraMode::Perspective => {
                self.look.rearm(target_cam.orientation);
                ControllerState::IdlePerspective
            }
            CameraMode::Orthographic => {
                self.orbit.attach(target_cam, self.focus);
                ControllerState::IdleOrthographic
            }
        };
        log::info!(
            "camera transition to {:?} complete after {:.2}s (intrinsic {:.1} -> {:.1})",
            tr.target,
            self.clock - tr.started_at,
            tr.start_intrinsic,
            tr.target_intrinsic
        );
    }

    /// Viewport change: both lenses follow regardless of state. A handoff in
    /// flight re-snapshots its endpoints from the resized lenses.
    pub fn resize(&mut self, viewport: Viewport) {
        let easing = self.config.camera.easing;
        let Some(rig) = self.rig.as_mut() else {
            log::debug!("resize ignored: cameras not mounted");
            return;
        };
        for mode in [CameraMode::Perspective, CameraMode::Orthographic] {
            let cam = rig.camera_mut(mode);
            cam.lens.set_viewport(viewport);
            cam.update_projection();
        }
        if let ControllerState::Transitioning(tr) = &mut self.state {
            tr.from_projection = rig.camera(tr.source).projection();
            tr.to_projection = rig.camera(tr.target).projection();
            let t = easing.apply(tr.projection_track.progress());
            let blended = projection::blend(&tr.from_projection, &tr.to_projection, t);
            rig.camera_mut(tr.source).set_projection(blended);
        }
    }

    pub fn on_drag_start(&mut self, mode: DragMode) {
        if self.input_owner() == InputOwner::Orbit && self.rig.is_some() {
            self.orbit.begin_drag(mode);
        }
    }

    pub fn on_drag_end(&mut self) {
        self.orbit.end_drag();
    }

    /// Pointer motion in pixels. Only the orbit layer consumes it.
    pub fn on_drag(&mut self, delta_px: Vec2) -> bool {
        if self.input_owner() != InputOwner::Orbit {
            return false;
        }
        let Some(rig) = self.rig.as_mut() else {
            return false;
        };
        self.orbit
            .drag(rig.camera_mut(CameraMode::Orthographic), delta_px, &self.config.orbit)
    }

    pub fn on_scroll(&mut self, lines: f32) -> bool {
        if self.input_owner() != InputOwner::Orbit {
            return false;
        }
        let Some(rig) = self.rig.as_mut() else {
            return false;
        };
        self.orbit
            .zoom(rig.camera_mut(CameraMode::Orthographic), lines, &self.config.orbit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::easing::Easing;
    use glam::Quat;

    const DT: f32 = 1.0 / 60.0;

    fn mounted(config: DeckConfig) -> ModeController {
        let mut c = ModeController::new(config);
        c.mount(Viewport::new(1280, 720));
        c
    }

    fn run(c: &mut ModeController, seconds: f32, pointer: Vec2) {
        let frames = (seconds / DT).ceil() as usize;
        for _ in 0..frames {
            c.tick(DT, pointer);
        }
    }

    fn transition(c: &ModeController) -> &TransitionState {
        match c.state() {
            ControllerState::Transitioning(tr) => tr,
            other => panic!("expected a transition, got {:?}", other),
        }
    }

    #[test]
    fn starts_idle_in_perspective_with_pointer_look() {
        let c = mounted(DeckConfig::default());
        assert!(c.is_mounted());
        assert!(!c.is_transitioning());
        assert!(matches!(c.state(), ControllerState::IdlePerspective));
        assert_eq!(c.input_owner(), InputOwner::PointerLook);
        assert_eq!(c.active_camera().unwrap().mode(), CameraMode::Perspective);
    }

    #[test]
    fn unmounted_controller_is_inert() {
        let mut c = ModeController::new(DeckConfig::default());
        assert!(!c.is_mounted());
        assert!(!c.toggle());
        assert!(!c.tick(DT, Vec2::ONE));
        assert!(!c.on_scroll(1.0));
        c.resize(Viewport::new(10, 10));
        assert!(c.active_camera().is_none());
        assert!(c.snapshot().is_none());
        assert!(matches!(c.state(), ControllerState::IdlePerspective));
    }

    #[test]
    fn toggle_mid_transition_is_dropped() {
        let mut c = mounted(DeckConfig::default());
        assert!(c.toggle());
        assert_eq!(transition(&c).target, CameraMode::Orthographic);
        assert_eq!(c.input_owner(), InputOwner::None);

        run(&mut c, 0.3, Vec2::ZERO);
        let progress = transition(&c).progress();
        assert!(!c.toggle());
        let tr = transition(&c);
        assert_eq!(tr.target, CameraMode::Orthographic);
        assert_eq!(tr.progress(), progress);
    }

    #[test]
    fn completes_into_orthographic_with_orbit() {
        let mut c = mounted(DeckConfig::default());
        let start = c.active_camera().unwrap().pose();
        c.toggle();
        run(&mut c, 1.05, Vec2::ZERO);

        assert!(matches!(c.state(), ControllerState::IdleOrthographic));
        assert_eq!(c.input_owner(), InputOwner::Orbit);
        let cam = c.active_camera().unwrap();
        assert_eq!(cam.mode(), CameraMode::Orthographic);
        assert_eq!(cam.lens.intrinsic(), 50.0);
        assert_eq!(cam.projection(), cam.lens.projection());
        assert_eq!(cam.orientation, start.orientation);
        let expected = start.moved_along_view(-900.0).position;
        assert_eq!(cam.position, expected);

        // The old camera gets its own projection back.
        let persp = c.camera(CameraMode::Perspective).unwrap();
        assert_eq!(persp.projection(), persp.lens.projection());
    }

    #[test]
    fn displayed_camera_carries_the_blend() {
        let mut c = mounted(DeckConfig::default());
        c.toggle();
        let (from, to) = transition(&c).endpoints();
        c.tick(0.25, Vec2::ZERO);
        let expected = projection::blend(&from, &to, Easing::Quadratic.apply(0.25));
        let cam = c.active_camera().unwrap();
        assert_eq!(cam.mode(), CameraMode::Perspective);
        assert_eq!(cam.projection(), expected);
        assert!((cam.projection() * cam.projection_inverse()).abs_diff_eq(Mat4::IDENTITY, 1e-3));
    }

    #[test]
    fn round_trip_returns_to_the_starting_pose() {
        let mut c = mounted(DeckConfig::default());
        // Leave a look offset in place so the start pose is not the rest pose.
        run(&mut c, 0.5, Vec2::new(0.6, -0.4));
        let start = c.active_camera().unwrap().pose();

        c.toggle();
        run(&mut c, 1.05, Vec2::new(0.6, -0.4));
        assert!(matches!(c.state(), ControllerState::IdleOrthographic));
        c.toggle();
        run(&mut c, 1.05, Vec2::ZERO);
        assert!(matches!(c.state(), ControllerState::IdlePerspective));

        let end = c.active_camera().unwrap().pose();
        assert!(end.position.abs_diff_eq(start.position, 1e-3));
        assert!(end.orientation.abs_diff_eq(start.orientation, 1e-5));
        assert_eq!(c.active_camera().unwrap().lens.intrinsic(), 50.0);
    }

    #[test]
    fn pointer_is_ignored_in_orthographic() {
        let mut c = mounted(DeckConfig::default());
        c.toggle();
        run(&mut c, 1.05, Vec2::ZERO);
        let before = c.active_camera().unwrap().orientation;
        for i in 0..60 {
            let p = Vec2::new((i as f32 * 0.3).sin(), (i as f32 * 0.2).cos());
            assert!(!c.tick(DT, p));
        }
        assert_eq!(c.active_camera().unwrap().orientation, before);
    }

    #[test]
    fn pointer_look_moves_only_while_idle_in_perspective() {
        let mut c = mounted(DeckConfig::default());
        let base = c.active_camera().unwrap().orientation;
        assert!(c.tick(DT, Vec2::new(1.0, 0.0)));
        assert_ne!(c.active_camera().unwrap().orientation, base);

        c.toggle();
        assert_eq!(c.snapshot().unwrap().look_offset, Vec2::ZERO);
    }

    #[test]
    fn orbit_edits_are_the_start_of_the_next_transition() {
        let mut c = mounted(DeckConfig::default());
        c.toggle();
        run(&mut c, 1.05, Vec2::ZERO);

        c.on_drag_start(DragMode::Rotate);
        assert!(c.on_drag(Vec2::new(80.0, 0.0)));
        c.on_drag_end();
        assert!(c.on_scroll(2.0));
        let edited = c.active_camera().unwrap().clone();

        c.toggle();
        let tr = transition(&c);
        assert_eq!(tr.start_pose, edited.pose());
        assert_eq!(tr.start_intrinsic, edited.lens.intrinsic());
        assert_eq!(tr.endpoints().0, edited.projection());
    }

    #[test]
    fn orbit_input_is_refused_outside_orthographic_idle() {
        let mut c = mounted(DeckConfig::default());
        c.on_drag_start(DragMode::Rotate);
        assert!(!c.on_drag(Vec2::new(50.0, 50.0)));
        assert!(!c.on_scroll(1.0));
        c.toggle();
        c.on_drag_start(DragMode::Rotate);
        assert!(!c.on_drag(Vec2::new(50.0, 50.0)));
        assert!(!c.on_scroll(1.0));
    }

    #[test]
    fn resize_reaches_the_inactive_camera() {
        let mut c = mounted(DeckConfig::default());
        let ortho_before = c.camera(CameraMode::Orthographic).unwrap().projection();
        let persp_before = c.camera(CameraMode::Perspective).unwrap().projection();
        c.resize(Viewport::new(800, 800));
        let ortho = c.camera(CameraMode::Orthographic).unwrap();
        let persp = c.camera(CameraMode::Perspective).unwrap();
        assert_ne!(ortho.projection(), ortho_before);
        assert_ne!(persp.projection(), persp_before);
        assert_eq!(ortho.projection(), ortho.lens.projection());
    }

    #[test]
    fn resize_during_transition_refreshes_endpoints() {
        let mut c = mounted(DeckConfig::default());
        c.toggle();
        c.tick(0.5, Vec2::ZERO);
        c.resize(Viewport::new(640, 640));
        let ortho = c.camera(CameraMode::Orthographic).unwrap().projection();
        let (from, to) = transition(&c).endpoints();
        assert_eq!(to, ortho);
        assert_eq!(from, c.camera(CameraMode::Perspective).unwrap().lens.projection());
        c.tick(1.0, Vec2::ZERO);
        assert_eq!(c.active_camera().unwrap().projection(), ortho);
    }

    #[test]
    fn invalid_frame_time_snaps_to_target() {
        let mut c = mounted(DeckConfig::default());
        c.toggle();
        let target_pose = transition(&c).target_pose;
        c.tick(0.2, Vec2::ZERO);
        assert!(c.tick(f32::NAN, Vec2::ZERO));

        assert!(matches!(c.state(), ControllerState::IdleOrthographic));
        let cam = c.active_camera().unwrap();
        assert_eq!(cam.pose(), target_pose);
        assert_eq!(cam.projection(), cam.lens.projection());
    }

    #[test]
    fn negative_frame_time_is_a_driver_failure() {
        let mut c = mounted(DeckConfig::default());
        c.toggle();
        c.tick(-1.0, Vec2::ZERO);
        assert!(!c.is_transitioning());
        assert_eq!(c.active_camera().unwrap().mode(), CameraMode::Orthographic);
    }

    #[test]
    fn waits_for_the_slower_track() {
        let mut config = DeckConfig::default();
        config.camera.pose_duration = Some(0.5);
        config.camera.projection_duration = Some(1.0);
        let mut c = mounted(config);
        c.toggle();
        let target_pose = transition(&c).target_pose;

        c.tick(0.6, Vec2::ZERO);
        let tr = transition(&c);
        assert!(tr.pose_done());
        assert!(!tr.projection_done());
        assert!(!tr.is_done());
        assert_eq!(c.active_camera().unwrap().pose(), target_pose);

        c.tick(0.5, Vec2::ZERO);
        assert!(matches!(c.state(), ControllerState::IdleOrthographic));
    }

    #[test]
    fn zero_duration_completes_on_the_next_tick() {
        let mut config = DeckConfig::default();
        config.camera.transition_duration = 0.0;
        let mut c = mounted(config);
        c.toggle();
        c.tick(0.0, Vec2::ZERO);
        assert!(matches!(c.state(), ControllerState::IdleOrthographic));
    }

    #[test]
    fn entering_perspective_rearms_look_base() {
        let mut c = mounted(DeckConfig::default());
        c.toggle();
        run(&mut c, 1.05, Vec2::ZERO);
        c.on_drag_start(DragMode::Rotate);
        c.on_drag(Vec2::new(150.0, 0.0));
        c.on_drag_end();
        let rotated = c.active_camera().unwrap().orientation;

        c.toggle();
        run(&mut c, 1.05, Vec2::ZERO);
        let cam = c.active_camera().unwrap();
        assert_eq!(cam.mode(), CameraMode::Perspective);
        assert!(cam.orientation.abs_diff_eq(rotated, 1e-5));
        // Centered pointer keeps the new base exactly.
        run(&mut c, 0.5, Vec2::ZERO);
        assert!(c.active_camera().unwrap().orientation.abs_diff_eq(rotated, 1e-5));
        assert_ne!(rotated, Quat::IDENTITY);
    }

    #[test]
    fn snapshot_reports_progress() {
        let mut c = mounted(DeckConfig::default());
        c.toggle();
        c.tick(0.5, Vec2::ZERO);
        let snap = c.snapshot().unwrap();
        assert_eq!(snap.mode, CameraMode::Perspective);
        let (target, progress) = snap.transition.unwrap();
        assert_eq!(target, CameraMode::Orthographic);
        assert!((progress - 0.5).abs() < 1e-6);
    }

    #[test]
    fn finishing_without_a_transition_keeps_the_idle_state() {
        let mut c = mounted(DeckConfig::default());
        c.toggle();
        run(&mut c, 1.05, Vec2::ZERO);
        let pose = c.active_camera().unwrap().pose();

        c.finish_transition();
        assert!(matches!(c.state(), ControllerState::IdleOrthographic));
        assert_eq!(c.input_owner(), InputOwner::Orbit);
        assert_eq!(c.active_camera().unwrap().pose(), pose);

        let mut idle = ModeController::new(DeckConfig::default());
        idle.finish_transition();
        assert!(matches!(idle.state(), ControllerState::IdlePerspective));
    }

    #[test]
    fn zoom_drag_changes_orthographic_zoom_only_when_idle() {
        let mut c = mounted(DeckConfig::default());
        c.on_drag_start(DragMode::Zoom);
        assert!(!c.on_drag(Vec2::new(0.0, -40.0)));

        c.toggle();
        run(&mut c, 1.05, Vec2::ZERO);
        c.on_drag_start(DragMode::Zoom);
        assert!(c.on_drag(Vec2::new(0.0, -40.0)));
        c.on_drag_end();
        let cam = c.active_camera().unwrap();
        assert!(cam.lens.intrinsic() > 50.0);
        assert_eq!(cam.projection(), cam.lens.projection());
    }
}
