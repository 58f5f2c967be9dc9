// main.rs — window, event routing, menu and status bar

#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

mod camera;
mod config;
mod controller;
mod easing;
mod error;
mod i18n;
mod look;
mod orbit;
mod pointer;
mod pose;
mod projection;
mod renderer;
mod scene;

use camera::{CameraMode, Viewport};
use config::DeckConfig;
use controller::{ControllerSnapshot, ModeController};
use glam::Vec2;
use orbit::DragMode;
use pointer::PointerSampler;
use renderer::Renderer;

use anyhow::Context as _;
use std::sync::Arc;
use std::time::Instant;
use winit::{
    dpi::{LogicalSize, PhysicalPosition},
    event::*,
    event_loop::{ControlFlow, EventLoop},
    window::{Fullscreen, Window, WindowBuilder},
};

/// Pixel scroll deltas are converted to wheel lines at this rate.
const PIXELS_PER_LINE: f32 = 20.0;
/// Frames longer than this (window drags, breakpoints) are clamped.
const MAX_FRAME_TIME: f32 = 0.1;

#[derive(Default)]
struct UiActions {
    toggle_camera: bool,
    toggle_fullscreen: bool,
    exit: bool,
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = DeckConfig::resolve();

    let mut current_lang = i18n::resolve_lang_from_args();
    i18n::init(current_lang.clone());

    let event_loop = EventLoop::new();
    let window = Arc::new(
        WindowBuilder::new()
            .with_title(i18n::tr("app.title"))
            .with_inner_size(LogicalSize::new(config.window.width, config.window.height))
            .build(&event_loop)
            .context("creating window")?,
    );

    let mesh = scene::build_deck();
    let mut renderer = pollster::block_on(Renderer::new(window.clone(), &mesh))?;

    let mut controller = ModeController::new(config);
    controller.mount(Viewport::new(renderer.size.width, renderer.size.height));

    // Input state
    let mut pointer = PointerSampler::new();
    let mut dragging: Option<DragMode> = None;
    let mut last_mouse_pos: Option<PhysicalPosition<f64>> = None;
    let mut camera_dirty = true;

    // Frame timing
    let mut last_tick = Instant::now();
    let mut last_fps_time = Instant::now();
    let mut frame_count = 0;
    let mut fps = 0.0;
    let mut show_fps = false;
    let mut is_fullscreen = false;

    event_loop.run(move |event, _, control_flow| {
        *control_flow = ControlFlow::Poll;

        match event {
            Event::WindowEvent { event, .. } => {
                let response = renderer.egui_state.on_event(&renderer.egui_ctx, &event);
                if response.consumed {
                    return;
                }

                match event {
                    WindowEvent::CloseRequested => {
                        *control_flow = ControlFlow::Exit;
                    }

                    WindowEvent::Resized(new_size) => {
                        renderer.resize(new_size);
                        controller.resize(Viewport::new(new_size.width, new_size.height));
                        camera_dirty = true;
                    }

                    WindowEvent::ScaleFactorChanged { new_inner_size, .. } => {
                        renderer.resize(*new_inner_size);
                        controller.resize(Viewport::new(new_inner_size.width, new_inner_size.height));
                        camera_dirty = true;
                    }

                    WindowEvent::KeyboardInput { input, .. } => {
                        if input.state == ElementState::Pressed {
                            match input.virtual_keycode {
                                Some(VirtualKeyCode::Space) => {
                                    controller.toggle();
                                }
                                Some(VirtualKeyCode::F11) => {
                                    is_fullscreen = !is_fullscreen;
                                    set_fullscreen(&window, is_fullscreen);
                                }
                                Some(VirtualKeyCode::Escape) if is_fullscreen => {
                                    is_fullscreen = false;
                                    set_fullscreen(&window, false);
                                }
                                _ => {}
                            }
                        }
                    }

                    WindowEvent::MouseInput { state, button, .. } => {
                        let mode = match button {
                            MouseButton::Left => Some(DragMode::Rotate),
                            MouseButton::Right => Some(DragMode::Pan),
                            MouseButton::Middle => Some(DragMode::Zoom),
                            _ => None,
                        };
                        if let Some(mode) = mode {
                            match state {
                                ElementState::Pressed => {
                                    dragging = Some(mode);
                                    controller.on_drag_start(mode);
                                }
                                ElementState::Released if dragging == Some(mode) => {
                                    dragging = None;
                                    last_mouse_pos = None;
                                    controller.on_drag_end();
                                }
                                ElementState::Released => {}
                            }
                        }
                    }

                    WindowEvent::CursorMoved { position, .. } => {
                        pointer.on_cursor_moved(
                            position.x,
                            position.y,
                            renderer.size.width,
                            renderer.size.height,
                        );
                        if dragging.is_some() {
                            if let Some(last_pos) = last_mouse_pos {
                                let delta = Vec2::new(
                                    (position.x - last_pos.x) as f32,
                                    (position.y - last_pos.y) as f32,
                                );
                                camera_dirty |= controller.on_drag(delta);
                            }
                            last_mouse_pos = Some(position);
                        }
                    }

                    WindowEvent::CursorLeft { .. } => {
                        pointer.on_cursor_left();
                        last_mouse_pos = None;
                    }

                    WindowEvent::MouseWheel { delta, .. } => {
                        let lines = match delta {
                            MouseScrollDelta::LineDelta(_, y) => y,
                            MouseScrollDelta::PixelDelta(pos) => pos.y as f32 / PIXELS_PER_LINE,
                        };
                        camera_dirty |= controller.on_scroll(lines);
                    }

                    _ => {}
                }
            }

            Event::RedrawRequested(_) => {
                let now = Instant::now();
                let dt = now.duration_since(last_tick).as_secs_f32().min(MAX_FRAME_TIME);
                last_tick = now;

                frame_count += 1;
                if now.duration_since(last_fps_time).as_secs_f32() >= 1.0 {
                    fps = frame_count as f32 / now.duration_since(last_fps_time).as_secs_f32();
                    frame_count = 0;
                    last_fps_time = now;
                }

                let changed = controller.tick(dt, pointer.sample());
                if changed || camera_dirty {
                    if let Some(cam) = controller.active_camera() {
                        renderer.update_camera(cam.view_proj());
                    }
                    camera_dirty = false;
                }

                let snapshot = controller.snapshot();
                let can_toggle = controller.is_mounted() && !controller.is_transitioning();
                let mut actions = UiActions::default();
                let render_result = renderer.render_with_ui(&window, |ctx| {
                    draw_ui(
                        ctx,
                        snapshot.as_ref(),
                        can_toggle,
                        &mut actions,
                        &mut show_fps,
                        is_fullscreen,
                        fps,
                        &window,
                        &mut current_lang,
                    );
                });

                if actions.toggle_camera {
                    controller.toggle();
                }
                if actions.toggle_fullscreen {
                    is_fullscreen = !is_fullscreen;
                    set_fullscreen(&window, is_fullscreen);
                }
                if actions.exit {
                    *control_flow = ControlFlow::Exit;
                }

                match render_result {
                    Ok(_) => {}
                    Err(wgpu::SurfaceError::Lost) => renderer.resize(renderer.size),
                    Err(wgpu::SurfaceError::OutOfMemory) => {
                        log::error!("GPU out of memory, exiting");
                        *control_flow = ControlFlow::Exit;
                    }
                    Err(e) => log::warn!("render error: {:?}", e),
                }
            }

            Event::MainEventsCleared => {
                window.request_redraw();
            }

            _ => {}
        }
    });
}

fn set_fullscreen(window: &Window, on: bool) {
    if on {
        window.set_fullscreen(Some(Fullscreen::Borderless(None)));
    } else {
        window.set_fullscreen(None);
    }
}

fn status_line(snapshot: &ControllerSnapshot) -> Vec<String> {
    let mut parts = Vec::new();
    parts.push(format!(
        "{} {}",
        i18n::tr("status.mode_prefix"),
        i18n::tr(snapshot.mode.i18n_key())
    ));

    if let Some((target, progress)) = snapshot.transition {
        parts.push(i18n::tr_with(
            "status.transition",
            &[
                ("mode", i18n::tr(target.i18n_key())),
                ("pct", format!("{:.0}", progress * 100.0)),
            ],
        ));
    }

    match snapshot.mode {
        CameraMode::Perspective => {
            parts.push(i18n::tr_with(
                "status.fov",
                &[("value", format!("{:.1}", snapshot.intrinsic))],
            ));
            parts.push(i18n::tr_with(
                "status.look",
                &[
                    ("yaw", format!("{:.1}", snapshot.look_offset.x.to_degrees())),
                    ("pitch", format!("{:.1}", snapshot.look_offset.y.to_degrees())),
                ],
            ));
        }
        CameraMode::Orthographic => {
            parts.push(i18n::tr_with(
                "status.zoom",
                &[("value", format!("{:.1}", snapshot.intrinsic))],
            ));
        }
    }

    if snapshot.transition.is_none() {
        parts.push(match snapshot.mode {
            CameraMode::Perspective => i18n::tr("status.hint.perspective"),
            CameraMode::Orthographic => i18n::tr("status.hint.orthographic"),
        });
    }
    parts
}

#[allow(clippy::too_many_arguments)]
fn draw_ui(
    ctx: &egui::Context,
    snapshot: Option<&ControllerSnapshot>,
    can_toggle: bool,
    actions: &mut UiActions,
    show_fps: &mut bool,
    is_fullscreen: bool,
    fps: f32,
    window: &Window,
    current_lang: &mut String,
) {
    egui::TopBottomPanel::top("top_panel").show(ctx, |ui| {
        egui::menu::bar(ui, |ui| {
            ui.menu_button(i18n::tr("menu.file"), |ui| {
                if ui.button(i18n::tr("menu.exit")).clicked() {
                    actions.exit = true;
                    ui.close_menu();
                }
            });

            ui.menu_button(i18n::tr("menu.view"), |ui| {
                if ui
                    .add_enabled(can_toggle, egui::Button::new(i18n::tr("view.toggle_camera")))
                    .clicked()
                {
                    actions.toggle_camera = true;
                    ui.close_menu();
                }

                let fullscreen_label = if is_fullscreen {
                    i18n::tr("view.fullscreen.exit")
                } else {
                    i18n::tr("view.fullscreen.enter")
                };
                if ui.button(fullscreen_label).clicked() {
                    actions.toggle_fullscreen = true;
                    ui.close_menu();
                }

                ui.separator();
                if ui.checkbox(show_fps, i18n::tr("view.show_fps")).clicked() {
                    ui.close_menu();
                }
            });

            ui.menu_button(i18n::tr("menu.language"), |ui| {
                for (code, name) in i18n::LANGUAGES {
                    if ui.radio_value(current_lang, code.to_string(), name).clicked() {
                        i18n::init(current_lang.clone());
                        window.set_title(&i18n::tr("app.title"));
                        ui.close_menu();
                    }
                }
            });
        });
    });

    egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
        ui.horizontal(|ui| {
            if let Some(snapshot) = snapshot {
                for (i, part) in status_line(snapshot).into_iter().enumerate() {
                    if i > 0 {
                        ui.label("|");
                    }
                    if i == 1 && snapshot.transition.is_some() {
                        ui.label(egui::RichText::new(part).color(egui::Color32::YELLOW));
                    } else {
                        ui.label(part);
                    }
                }
            }

            if *show_fps {
                ui.label("|");
                ui.label(
                    egui::RichText::new(format!("FPS: {:.1}", fps)).color(egui::Color32::GREEN),
                );
            }
        });
    });
}
