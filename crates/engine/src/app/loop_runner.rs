use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use pixels::Error as PixelsError;
use thiserror::Error;
use tracing::{error, info, warn};
use winit::dpi::LogicalSize;
use winit::error::{EventLoopError, OsError};
use winit::event::{DeviceEvent, ElementState, Event, KeyEvent, WindowEvent};
use winit::event_loop::{ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::WindowBuilder;

use crate::raycast::Raycaster;

use super::input::ActionStates;
use super::metrics::MetricsAccumulator;
use super::{FrameInput, InputAction, Renderer, World};

#[derive(Debug, Clone)]
pub struct LoopConfig {
    pub window_title: String,
    pub window_width: u32,
    pub window_height: u32,
    pub target_tps: u32,
    pub max_frame_delta: Duration,
    pub max_ticks_per_frame: u32,
    pub metrics_log_interval: Duration,
    pub max_render_fps: Option<u32>,
    /// Degrees turned per tick while a turn key is held.
    pub key_turn_degrees: i32,
}

impl Default for LoopConfig {
    fn default() -> Self {
        Self {
            window_title: "gridcast".to_string(),
            window_width: 640,
            window_height: 480,
            target_tps: 60,
            max_frame_delta: Duration::from_millis(250),
            max_ticks_per_frame: 5,
            metrics_log_interval: Duration::from_secs(1),
            max_render_fps: None,
            key_turn_degrees: 1,
        }
    }
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("failed to create event loop: {0}")]
    CreateEventLoop(#[source] EventLoopError),
    #[error("failed to create application window: {0}")]
    CreateWindow(#[source] OsError),
    #[error("failed to initialize renderer: {0}")]
    CreateRenderer(#[source] PixelsError),
    #[error("event loop failed: {0}")]
    EventLoopRun(#[source] EventLoopError),
}

pub fn run_app(config: LoopConfig, mut world: World, raycaster: Raycaster) -> Result<(), AppError> {
    let event_loop = EventLoop::new().map_err(AppError::CreateEventLoop)?;
    let window = Arc::new(
        WindowBuilder::new()
            .with_title(config.window_title.clone())
            .with_inner_size(LogicalSize::new(
                config.window_width as f64,
                config.window_height as f64,
            ))
            .build(&event_loop)
            .map_err(AppError::CreateWindow)?,
    );
    let mut renderer = Renderer::new(Arc::clone(&window)).map_err(AppError::CreateRenderer)?;

    event_loop.set_control_flow(ControlFlow::Poll);

    let target_tps = config.target_tps.max(1);
    let max_frame_delta =
        normalize_non_zero_duration(config.max_frame_delta, Duration::from_millis(250));
    let max_ticks_per_frame = config.max_ticks_per_frame.max(1);
    let metrics_log_interval =
        normalize_non_zero_duration(config.metrics_log_interval, Duration::from_secs(1));
    let fixed_dt = Duration::from_secs_f64(1.0 / target_tps as f64);
    let effective_render_cap = normalize_render_fps_cap(config.max_render_fps);
    let render_frame_target = target_frame_duration(effective_render_cap);
    let mut input_collector = InputCollector::new(config.key_turn_degrees);

    info!(
        target_tps,
        max_frame_delta_ms = max_frame_delta.as_millis() as u64,
        max_ticks_per_frame,
        metrics_log_interval_ms = metrics_log_interval.as_millis() as u64,
        render_fps_cap = %format_render_cap(effective_render_cap),
        ray_count = raycaster.config().ray_count,
        fov_degrees = raycaster.config().fov_degrees,
        "loop_config"
    );

    let mut accumulator = Duration::ZERO;
    let mut last_frame_instant = Instant::now();
    let mut last_present_instant = Instant::now();
    let mut metrics_accumulator = MetricsAccumulator::new(metrics_log_interval);

    event_loop
        .run(move |event, window_target| match event {
            Event::WindowEvent { window_id, event } if window_id == window.id() => match event {
                WindowEvent::CloseRequested => {
                    info!(reason = "window_close", "shutdown_requested");
                    window_target.exit();
                }
                WindowEvent::Resized(new_size) => {
                    if let Err(error) = renderer.resize(new_size.width, new_size.height) {
                        warn!(error = %error, "renderer_resize_failed");
                        window_target.exit();
                    }
                }
                WindowEvent::ScaleFactorChanged { .. } => {
                    let size = window.inner_size();
                    if let Err(error) = renderer.resize(size.width, size.height) {
                        warn!(error = %error, "renderer_resize_failed");
                        window_target.exit();
                    }
                }
                WindowEvent::KeyboardInput { event, .. } => {
                    input_collector.handle_keyboard_input(&event);
                    if input_collector.quit_requested {
                        info!(reason = "escape_key", "shutdown_requested");
                        window_target.exit();
                    }
                }
                WindowEvent::RedrawRequested => {
                    let now = Instant::now();
                    let raw_frame_dt = now.saturating_duration_since(last_frame_instant);
                    last_frame_instant = now;

                    let clamped_frame_dt = clamp_frame_delta(raw_frame_dt, max_frame_delta);
                    accumulator = accumulator.saturating_add(clamped_frame_dt);

                    let step_plan = plan_sim_steps(accumulator, fixed_dt, max_ticks_per_frame);
                    for _ in 0..step_plan.ticks_to_run {
                        let input = input_collector.snapshot_for_tick();
                        if let Err(error) = world.step(&input) {
                            error!(error = %error, "world_step_failed");
                            window_target.exit();
                            return;
                        }
                        metrics_accumulator.record_tick();
                    }
                    accumulator = step_plan.remaining_accumulator;

                    if step_plan.dropped_backlog > Duration::ZERO {
                        warn!(
                            dropped_backlog_ms = step_plan.dropped_backlog.as_millis() as u64,
                            max_ticks_per_frame, "sim_clamp_triggered"
                        );
                    }

                    // Single authoritative FPS cap sleep point for render pacing.
                    let elapsed_since_last_present =
                        Instant::now().saturating_duration_since(last_present_instant);
                    let cap_sleep =
                        compute_cap_sleep(elapsed_since_last_present, render_frame_target);
                    if cap_sleep > Duration::ZERO {
                        thread::sleep(cap_sleep);
                    }

                    let draw_start = Instant::now();
                    let frame_stats = match renderer.render_world(&world, &raycaster) {
                        Ok(stats) => stats,
                        Err(error) => {
                            warn!(error = %error, "renderer_draw_failed");
                            window_target.exit();
                            return;
                        }
                    };
                    last_present_instant = Instant::now();
                    let draw_dt = last_present_instant.saturating_duration_since(draw_start);
                    metrics_accumulator.record_frame(raw_frame_dt, draw_dt);

                    if let Some(snapshot) = metrics_accumulator.maybe_snapshot(now) {
                        let (x, y) = world.player().position();
                        info!(
                            fps = snapshot.fps,
                            tps = snapshot.tps,
                            frame_time_ms = snapshot.frame_time_ms,
                            draw_time_ms = snapshot.draw_time_ms,
                            rays = frame_stats.rays,
                            dropped_rays = frame_stats.dropped,
                            view_mode = ?world.view_mode(),
                            player_x = x,
                            player_y = y,
                            player_angle = world.player().angle_degrees(),
                            "loop_metrics"
                        );
                    }
                }
                _ => {}
            },
            Event::DeviceEvent {
                event: DeviceEvent::MouseMotion { delta },
                ..
            } => {
                input_collector.handle_mouse_motion(delta.0);
            }
            Event::AboutToWait => {
                window.request_redraw();
            }
            Event::LoopExiting => {
                info!("shutdown");
            }
            _ => {}
        })
        .map_err(AppError::EventLoopRun)
}

#[derive(Debug, Default)]
struct InputCollector {
    quit_requested: bool,
    action_states: ActionStates,
    toggle_view_is_down: bool,
    toggle_view_pressed_edge: bool,
    pending_mouse_turn: i32,
    key_turn_degrees: i32,
}

impl InputCollector {
    fn new(key_turn_degrees: i32) -> Self {
        Self {
            key_turn_degrees,
            ..Self::default()
        }
    }

    fn handle_keyboard_input(&mut self, key_event: &KeyEvent) {
        let is_pressed = key_event.state == ElementState::Pressed;
        self.update_action_state_from_physical_key(key_event.physical_key, is_pressed);
        self.handle_toggle_view_key_state(is_toggle_view_key(key_event), key_event.state);
    }

    fn update_action_state_from_physical_key(&mut self, key: PhysicalKey, is_pressed: bool) {
        match key {
            PhysicalKey::Code(KeyCode::KeyW) | PhysicalKey::Code(KeyCode::ArrowUp) => {
                self.action_states.set(InputAction::MoveForward, is_pressed);
            }
            PhysicalKey::Code(KeyCode::KeyS) | PhysicalKey::Code(KeyCode::ArrowDown) => {
                self.action_states.set(InputAction::MoveBackward, is_pressed);
            }
            PhysicalKey::Code(KeyCode::KeyA) | PhysicalKey::Code(KeyCode::ArrowLeft) => {
                self.action_states.set(InputAction::StrafeLeft, is_pressed);
            }
            PhysicalKey::Code(KeyCode::KeyD) | PhysicalKey::Code(KeyCode::ArrowRight) => {
                self.action_states.set(InputAction::StrafeRight, is_pressed);
            }
            PhysicalKey::Code(KeyCode::KeyQ) => {
                self.action_states.set(InputAction::TurnLeft, is_pressed);
            }
            PhysicalKey::Code(KeyCode::KeyE) => {
                self.action_states.set(InputAction::TurnRight, is_pressed);
            }
            PhysicalKey::Code(KeyCode::Escape) => {
                self.action_states.set(InputAction::Quit, is_pressed);
                if is_pressed {
                    self.quit_requested = true;
                }
            }
            _ => {}
        }
    }

    fn handle_toggle_view_key_state(&mut self, is_toggle_key: bool, state: ElementState) {
        if !is_toggle_key {
            return;
        }

        match state {
            ElementState::Pressed => {
                if !self.toggle_view_is_down {
                    self.toggle_view_pressed_edge = true;
                }
                self.toggle_view_is_down = true;
            }
            ElementState::Released => self.toggle_view_is_down = false,
        }
    }

    /// One degree per motion event; moving right turns right (clockwise).
    fn handle_mouse_motion(&mut self, delta_x: f64) {
        let step = if delta_x > 0.0 {
            -1
        } else if delta_x < 0.0 {
            1
        } else {
            0
        };
        self.pending_mouse_turn = self.pending_mouse_turn.saturating_add(step);
    }

    fn snapshot_for_tick(&mut self) -> FrameInput {
        let mut input = FrameInput::empty();
        for action in [
            InputAction::MoveForward,
            InputAction::MoveBackward,
            InputAction::StrafeLeft,
            InputAction::StrafeRight,
        ] {
            if let Some(direction) = action.move_direction() {
                if self.action_states.is_down(action) {
                    input = input.with_move(direction);
                }
            }
        }
        let held_turn = self
            .action_states
            .held_turn()
            .saturating_mul(self.key_turn_degrees);
        input.turn_degrees = held_turn.saturating_add(self.pending_mouse_turn);
        input.toggle_view = self.toggle_view_pressed_edge;

        self.toggle_view_pressed_edge = false;
        self.pending_mouse_turn = 0;
        input
    }
}

#[derive(Debug, Clone, Copy)]
struct StepPlan {
    ticks_to_run: u32,
    remaining_accumulator: Duration,
    dropped_backlog: Duration,
}

fn plan_sim_steps(
    mut accumulator: Duration,
    fixed_dt: Duration,
    max_ticks_per_frame: u32,
) -> StepPlan {
    let mut ticks_to_run = 0u32;
    while accumulator >= fixed_dt && ticks_to_run < max_ticks_per_frame {
        accumulator = accumulator.saturating_sub(fixed_dt);
        ticks_to_run = ticks_to_run.saturating_add(1);
    }

    if accumulator >= fixed_dt {
        StepPlan {
            ticks_to_run,
            remaining_accumulator: Duration::ZERO,
            dropped_backlog: accumulator,
        }
    } else {
        StepPlan {
            ticks_to_run,
            remaining_accumulator: accumulator,
            dropped_backlog: Duration::ZERO,
        }
    }
}

fn clamp_frame_delta(frame_dt: Duration, max_frame_delta: Duration) -> Duration {
    frame_dt.min(max_frame_delta)
}

fn normalize_non_zero_duration(value: Duration, fallback: Duration) -> Duration {
    if value.is_zero() {
        fallback
    } else {
        value
    }
}

fn normalize_render_fps_cap(cap: Option<u32>) -> Option<u32> {
    cap.filter(|value| *value > 0)
}

fn target_frame_duration(max_render_fps: Option<u32>) -> Option<Duration> {
    max_render_fps.map(|fps| Duration::from_secs_f64(1.0 / fps as f64))
}

fn compute_cap_sleep(elapsed: Duration, target: Option<Duration>) -> Duration {
    match target {
        Some(frame_target) if elapsed < frame_target => frame_target - elapsed,
        _ => Duration::ZERO,
    }
}

fn format_render_cap(cap: Option<u32>) -> String {
    match cap {
        Some(value) => value.to_string(),
        None => "off".to_string(),
    }
}

fn is_toggle_view_key(key_event: &KeyEvent) -> bool {
    matches!(key_event.physical_key, PhysicalKey::Code(KeyCode::KeyM))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actor::MoveDirection;

    #[test]
    fn clamp_frame_delta_caps_large_frame() {
        let max_frame_delta = Duration::from_millis(250);
        let raw_frame_dt = Duration::from_millis(600);
        assert_eq!(
            clamp_frame_delta(raw_frame_dt, max_frame_delta),
            max_frame_delta
        );
    }

    #[test]
    fn plan_sim_steps_runs_expected_ticks_without_drop() {
        let fixed_dt = Duration::from_millis(16);
        let result = plan_sim_steps(Duration::from_millis(48), fixed_dt, 5);
        assert_eq!(result.ticks_to_run, 3);
        assert_eq!(result.remaining_accumulator, Duration::ZERO);
        assert_eq!(result.dropped_backlog, Duration::ZERO);
    }

    #[test]
    fn plan_sim_steps_drops_backlog_when_tick_cap_hit() {
        let fixed_dt = Duration::from_millis(16);
        let result = plan_sim_steps(Duration::from_millis(120), fixed_dt, 3);
        assert_eq!(result.ticks_to_run, 3);
        assert_eq!(result.remaining_accumulator, Duration::ZERO);
        assert_eq!(result.dropped_backlog, Duration::from_millis(72));
    }

    #[test]
    fn plan_sim_steps_keeps_partial_tick() {
        let fixed_dt = Duration::from_millis(16);
        let result = plan_sim_steps(Duration::from_millis(20), fixed_dt, 5);
        assert_eq!(result.ticks_to_run, 1);
        assert_eq!(result.remaining_accumulator, Duration::from_millis(4));
    }

    #[test]
    fn wasd_and_arrow_keys_map_to_moves() {
        let mut input = InputCollector::new(1);
        input.update_action_state_from_physical_key(PhysicalKey::Code(KeyCode::KeyW), true);
        input.update_action_state_from_physical_key(PhysicalKey::Code(KeyCode::ArrowLeft), true);

        let snapshot = input.snapshot_for_tick();
        assert!(snapshot.is_moving(MoveDirection::Forward));
        assert!(snapshot.is_moving(MoveDirection::StrafeLeft));
        assert!(!snapshot.is_moving(MoveDirection::Backward));
        assert!(!snapshot.is_moving(MoveDirection::StrafeRight));
    }

    #[test]
    fn held_keys_persist_until_release() {
        let mut input = InputCollector::new(1);
        input.update_action_state_from_physical_key(PhysicalKey::Code(KeyCode::KeyD), true);
        assert!(input.snapshot_for_tick().is_moving(MoveDirection::StrafeRight));
        assert!(input.snapshot_for_tick().is_moving(MoveDirection::StrafeRight));

        input.update_action_state_from_physical_key(PhysicalKey::Code(KeyCode::KeyD), false);
        assert!(!input.snapshot_for_tick().is_moving(MoveDirection::StrafeRight));
    }

    #[test]
    fn turn_keys_scale_by_configured_step() {
        let mut input = InputCollector::new(3);
        input.update_action_state_from_physical_key(PhysicalKey::Code(KeyCode::KeyE), true);
        assert_eq!(input.snapshot_for_tick().turn_degrees, -3);

        input.update_action_state_from_physical_key(PhysicalKey::Code(KeyCode::KeyQ), true);
        assert_eq!(input.snapshot_for_tick().turn_degrees, 0);
    }

    #[test]
    fn mouse_motion_turns_one_degree_per_event_and_resets() {
        let mut input = InputCollector::new(1);
        input.handle_mouse_motion(12.5);
        input.handle_mouse_motion(3.0);
        input.handle_mouse_motion(0.0);

        assert_eq!(input.snapshot_for_tick().turn_degrees, -2);
        assert_eq!(input.snapshot_for_tick().turn_degrees, 0);

        input.handle_mouse_motion(-4.0);
        assert_eq!(input.snapshot_for_tick().turn_degrees, 1);
    }

    #[test]
    fn toggle_view_is_edge_triggered_for_single_tick() {
        let mut input = InputCollector::new(1);
        input.handle_toggle_view_key_state(true, ElementState::Pressed);
        let first = input.snapshot_for_tick();
        input.handle_toggle_view_key_state(true, ElementState::Pressed);
        let second = input.snapshot_for_tick();
        input.handle_toggle_view_key_state(true, ElementState::Released);
        input.handle_toggle_view_key_state(true, ElementState::Pressed);
        let third = input.snapshot_for_tick();

        assert!(first.toggle_view);
        assert!(!second.toggle_view);
        assert!(third.toggle_view);
    }

    #[test]
    fn other_keys_do_not_toggle_view() {
        let mut input = InputCollector::new(1);
        input.handle_toggle_view_key_state(false, ElementState::Pressed);
        assert!(!input.snapshot_for_tick().toggle_view);
    }

    #[test]
    fn escape_requests_quit() {
        let mut input = InputCollector::new(1);
        input.update_action_state_from_physical_key(PhysicalKey::Code(KeyCode::Escape), true);
        assert!(input.quit_requested);
    }

    #[test]
    fn target_frame_duration_none_when_cap_off() {
        assert_eq!(target_frame_duration(None), None);
    }

    #[test]
    fn target_frame_duration_for_60hz_is_expected() {
        let duration = target_frame_duration(Some(60)).expect("duration");
        assert!((duration.as_secs_f64() - (1.0 / 60.0)).abs() < 0.000_001);
    }

    #[test]
    fn compute_cap_sleep_zero_when_over_budget() {
        let sleep = compute_cap_sleep(Duration::from_millis(20), Some(Duration::from_millis(16)));
        assert_eq!(sleep, Duration::ZERO);
    }

    #[test]
    fn compute_cap_sleep_fills_remaining_budget() {
        let sleep = compute_cap_sleep(Duration::from_millis(10), Some(Duration::from_millis(16)));
        assert_eq!(sleep, Duration::from_millis(6));
    }

    #[test]
    fn zero_render_cap_is_treated_as_off() {
        assert_eq!(normalize_render_fps_cap(Some(0)), None);
        assert_eq!(normalize_render_fps_cap(Some(144)), Some(144));
        assert_eq!(format_render_cap(None), "off");
        assert_eq!(format_render_cap(Some(144)), "144");
    }

    #[test]
    fn zero_durations_fall_back() {
        let fallback = Duration::from_secs(1);
        assert_eq!(normalize_non_zero_duration(Duration::ZERO, fallback), fallback);
        assert_eq!(
            normalize_non_zero_duration(Duration::from_millis(5), fallback),
            Duration::from_millis(5)
        );
    }
}
