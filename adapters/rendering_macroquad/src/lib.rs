#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Macroquad-backed rendering adapter for Rampart.
//!
//! Macroquad's optional audio stack depends on native ALSA development
//! libraries, so the adapter depends on macroquad without its default
//! `audio` feature. The game has no sound.

use std::{
    collections::VecDeque,
    time::{Duration, Instant},
};

use anyhow::Result;
use glam::Vec2;
use macroquad::{
    input::{is_key_pressed, KeyCode},
    text::{draw_text, measure_text},
};
use rampart_core::PlayerAction;
use rampart_rendering::{
    end_of_game_message, Color, FrameInput, FrameStatus, Presentation, RenderSurface,
    RenderingBackend, Scene, TextStyle,
};

/// Keys pressed during a single frame that map to player actions.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct KeyPresses {
    /// Space bar.
    pub volley: bool,
    /// The `a` key.
    pub shift_left: bool,
    /// The `d` key.
    pub shift_right: bool,
}

impl KeyPresses {
    /// Translates the pressed keys into player actions in a stable order.
    #[must_use]
    pub fn actions(self) -> Vec<PlayerAction> {
        let mut actions = Vec::new();
        if self.volley {
            actions.push(PlayerAction::FireVolley);
        }
        if self.shift_left {
            actions.push(PlayerAction::ShiftLeft);
        }
        if self.shift_right {
            actions.push(PlayerAction::ShiftRight);
        }
        actions
    }
}

#[derive(Clone, Copy, Debug, Default)]
struct KeyboardShortcuts {
    quit_requested: bool,
    dismiss_requested: bool,
    presses: KeyPresses,
}

impl KeyboardShortcuts {
    fn poll() -> Self {
        Self {
            quit_requested: is_key_pressed(KeyCode::Escape),
            dismiss_requested: is_key_pressed(KeyCode::Enter),
            presses: KeyPresses {
                volley: is_key_pressed(KeyCode::Space),
                shift_left: is_key_pressed(KeyCode::A),
                shift_right: is_key_pressed(KeyCode::D),
            },
        }
    }
}

/// Rendering backend implemented on top of macroquad.
#[derive(Debug, Default)]
pub struct MacroquadBackend {
    swap_interval: Option<i32>,
    show_fps: bool,
}

impl MacroquadBackend {
    /// Returns a backend that requests the platform's default swap interval.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Configures the backend to request a specific swap interval from the platform.
    #[must_use]
    pub fn with_swap_interval(mut self, swap_interval: Option<i32>) -> Self {
        self.swap_interval = swap_interval;
        self
    }

    /// Configures the backend to either synchronise presentation with the display refresh rate
    /// or render as fast as possible.
    #[must_use]
    pub fn with_vsync(self, enabled: bool) -> Self {
        let swap_interval = if enabled { Some(1) } else { Some(0) };
        self.with_swap_interval(swap_interval)
    }

    /// Configures whether the backend logs frame timing metrics once per second.
    #[must_use]
    pub fn with_show_fps(mut self, show: bool) -> Self {
        self.show_fps = show;
        self
    }
}

#[derive(Clone, Copy, Debug, Default)]
struct FrameBreakdown {
    frame: Duration,
    simulation: Duration,
    render: Duration,
}

/// Tracks the average frames-per-second produced by the render loop.
#[derive(Debug, Default)]
struct FpsCounter {
    elapsed: Duration,
    frames: u32,
    frame_times: VecDeque<Duration>,
    window_duration: Duration,
    simulation_accum: Duration,
    render_accum: Duration,
}

#[derive(Clone, Copy, Debug)]
struct FpsMetrics {
    per_second: f32,
    trailing_ten_seconds: f32,
    avg_simulation: Duration,
    avg_render: Duration,
}

impl FpsCounter {
    const TRAILING_WINDOW: Duration = Duration::from_secs(10);

    /// Records a rendered frame and returns the averages once one second has elapsed.
    fn record_frame(&mut self, breakdown: FrameBreakdown) -> Option<FpsMetrics> {
        self.elapsed += breakdown.frame;
        self.frames = self.frames.saturating_add(1);
        self.simulation_accum += breakdown.simulation;
        self.render_accum += breakdown.render;

        self.frame_times.push_back(breakdown.frame);
        self.window_duration += breakdown.frame;
        while self.window_duration > Self::TRAILING_WINDOW {
            let Some(removed) = self.frame_times.pop_front() else {
                break;
            };
            self.window_duration = self.window_duration.saturating_sub(removed);
        }

        if self.elapsed < Duration::from_secs(1) {
            return None;
        }

        let seconds = self.elapsed.as_secs_f32();
        let frames = self.frames;
        let window_seconds = self.window_duration.as_secs_f32();
        let per_second = frames as f32 / seconds;
        let trailing_ten_seconds = if window_seconds <= f32::EPSILON {
            per_second
        } else {
            self.frame_times.len() as f32 / window_seconds
        };
        let metrics = FpsMetrics {
            per_second,
            trailing_ten_seconds,
            avg_simulation: self.simulation_accum / frames.max(1),
            avg_render: self.render_accum / frames.max(1),
        };

        self.elapsed = Duration::ZERO;
        self.frames = 0;
        self.simulation_accum = Duration::ZERO;
        self.render_accum = Duration::ZERO;
        Some(metrics)
    }
}

/// Uniform scale and letterbox offset mapping field units onto the window.
#[derive(Clone, Copy, Debug, PartialEq)]
struct SceneMetrics {
    scale: f32,
    offset: Vec2,
}

impl SceneMetrics {
    fn from_scene(scene: &Scene, screen_width: f32, screen_height: f32) -> Self {
        let scale = (screen_width / scene.width())
            .min(screen_height / scene.height())
            .max(0.0);
        let offset = Vec2::new(
            ((screen_width - scene.width() * scale) * 0.5).max(0.0),
            ((screen_height - scene.height() * scale) * 0.5).max(0.0),
        );
        Self { scale, offset }
    }

    fn to_screen(&self, point: Vec2) -> Vec2 {
        self.offset + point * self.scale
    }
}

struct MacroquadSurface {
    metrics: SceneMetrics,
    background: Color,
}

impl RenderSurface for MacroquadSurface {
    fn clear_rect(&mut self, origin: Vec2, size: Vec2) {
        self.fill_rect(origin, size, self.background);
    }

    fn fill_rect(&mut self, origin: Vec2, size: Vec2, color: Color) {
        let screen = self.metrics.to_screen(origin);
        let size = size * self.metrics.scale;
        macroquad::shapes::draw_rectangle(
            screen.x,
            screen.y,
            size.x,
            size.y,
            to_macroquad_color(color),
        );
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Color) {
        let screen = self.metrics.to_screen(center);
        macroquad::shapes::draw_circle(
            screen.x,
            screen.y,
            radius * self.metrics.scale,
            to_macroquad_color(color),
        );
    }

    fn stroke_circle(&mut self, center: Vec2, radius: f32, thickness: f32, color: Color) {
        let screen = self.metrics.to_screen(center);
        macroquad::shapes::draw_circle_lines(
            screen.x,
            screen.y,
            radius * self.metrics.scale,
            thickness * self.metrics.scale,
            to_macroquad_color(color),
        );
    }

    fn fill_text(&mut self, text: &str, position: Vec2, style: TextStyle) {
        let screen = self.metrics.to_screen(position);
        let color = style.color.faded(style.opacity);
        let _ = draw_text(
            text,
            screen.x,
            screen.y,
            style.font_size * self.metrics.scale,
            to_macroquad_color(color),
        );
    }
}

impl RenderingBackend for MacroquadBackend {
    fn run<F>(self, presentation: Presentation, mut update_scene: F) -> Result<()>
    where
        F: FnMut(FrameInput, &mut Scene) -> FrameStatus + 'static,
    {
        let Self {
            swap_interval,
            show_fps,
        } = self;

        let Presentation {
            window_title,
            clear_color,
            scene,
        } = presentation;

        let mut config = macroquad::window::Conf {
            window_title,
            window_width: scene.width().round() as i32,
            window_height: scene.height().round() as i32,
            ..macroquad::window::Conf::default()
        };
        if let Some(swap_interval) = swap_interval {
            config.platform.swap_interval = Some(swap_interval);
        }

        macroquad::Window::from_config(config, async move {
            let mut scene = scene;
            let mut fps_counter = FpsCounter::default();
            let mut end_notice: Option<String> = None;
            let started = Instant::now();

            loop {
                let keyboard = KeyboardShortcuts::poll();
                if keyboard.quit_requested {
                    break;
                }
                if end_notice.is_some() && keyboard.dismiss_requested {
                    break;
                }

                macroquad::window::clear_background(to_macroquad_color(clear_color));
                let metrics = SceneMetrics::from_scene(
                    &scene,
                    macroquad::window::screen_width(),
                    macroquad::window::screen_height(),
                );

                let simulation_start = Instant::now();
                if end_notice.is_none() {
                    let input = FrameInput {
                        now: started.elapsed(),
                        actions: keyboard.presses.actions(),
                    };
                    if let FrameStatus::Finished(summary) = update_scene(input, &mut scene) {
                        let message = end_of_game_message(&summary);
                        log::info!("{message}");
                        end_notice = Some(message);
                    }
                }
                let simulation_duration = simulation_start.elapsed();

                let render_start = Instant::now();
                let mut surface = MacroquadSurface {
                    metrics,
                    background: clear_color,
                };
                scene.draw(&mut surface);
                if let Some(message) = &end_notice {
                    draw_end_notice(message, &scene, &metrics);
                }
                let render_duration = render_start.elapsed();

                let fps_metrics = fps_counter.record_frame(FrameBreakdown {
                    frame: Duration::from_secs_f32(
                        macroquad::time::get_frame_time().max(0.0),
                    ),
                    simulation: simulation_duration,
                    render: render_duration,
                });
                if show_fps {
                    if let Some(metrics) = fps_metrics {
                        log::info!(
                            "FPS: {:.2} (10s avg: {:.2}) | sim: {:>6.2}ms render: {:>6.2}ms",
                            metrics.per_second,
                            metrics.trailing_ten_seconds,
                            metrics.avg_simulation.as_secs_f64() * 1_000.0,
                            metrics.avg_render.as_secs_f64() * 1_000.0,
                        );
                    }
                }

                macroquad::window::next_frame().await;
            }
        });

        Ok(())
    }
}

const NOTICE_FONT_SIZE: f32 = 28.0;
const NOTICE_HINT: &str = "Press Enter to close";

fn draw_end_notice(message: &str, scene: &Scene, metrics: &SceneMetrics) {
    let center = metrics.to_screen(Vec2::new(scene.width() * 0.5, scene.height() * 0.5));
    let font_size = NOTICE_FONT_SIZE * metrics.scale;
    let panel = Vec2::new(scene.width() * 0.8, NOTICE_FONT_SIZE * 4.0) * metrics.scale;
    macroquad::shapes::draw_rectangle(
        center.x - panel.x * 0.5,
        center.y - panel.y * 0.5,
        panel.x,
        panel.y,
        to_macroquad_color(Color::BLACK.faded(0.85)),
    );

    let lines = [(message, 0.0), (NOTICE_HINT, font_size * 1.5)];
    for (text, drop) in lines {
        let dimensions = measure_text(text, None, font_size.max(1.0) as u16, 1.0);
        let _ = draw_text(
            text,
            center.x - dimensions.width * 0.5,
            center.y + drop,
            font_size,
            to_macroquad_color(Color::WHITE),
        );
    }
}

fn to_macroquad_color(color: Color) -> macroquad::color::Color {
    macroquad::color::Color::new(color.red, color.green, color.blue, color.alpha)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scene() -> Scene {
        Scene::new(800.0, 600.0, 30.0).expect("valid field")
    }

    #[test]
    fn metrics_letterbox_wide_windows() {
        let metrics = SceneMetrics::from_scene(&scene(), 1_600.0, 600.0);
        assert_eq!(metrics.scale, 1.0);
        assert_eq!(metrics.offset, Vec2::new(400.0, 0.0));
        assert_eq!(
            metrics.to_screen(Vec2::new(800.0, 600.0)),
            Vec2::new(1_200.0, 600.0)
        );
    }

    #[test]
    fn metrics_scale_down_small_windows() {
        let metrics = SceneMetrics::from_scene(&scene(), 400.0, 400.0);
        assert_eq!(metrics.scale, 0.5);
        assert_eq!(metrics.offset, Vec2::new(0.0, 50.0));
    }

    #[test]
    fn fps_counter_reports_average_frames_per_second() {
        let mut counter = FpsCounter::default();
        let frame = |millis| FrameBreakdown {
            frame: Duration::from_millis(millis),
            simulation: Duration::from_millis(2),
            ..FrameBreakdown::default()
        };
        assert!(counter.record_frame(frame(250)).is_none());
        assert!(counter.record_frame(frame(250)).is_none());
        assert!(counter.record_frame(frame(250)).is_none());

        let metrics = counter
            .record_frame(frame(250))
            .expect("should report FPS after one second of samples");
        assert!((metrics.per_second - 4.0).abs() <= 1e-3);
        assert!((metrics.trailing_ten_seconds - 4.0).abs() <= 1e-3);
        assert_eq!(metrics.avg_simulation, Duration::from_millis(2));
        assert!(counter.record_frame(frame(250)).is_none());
    }

    #[test]
    fn fps_counter_trailing_average_spans_ten_seconds() {
        let mut counter = FpsCounter::default();
        let frame = |millis| FrameBreakdown {
            frame: Duration::from_millis(millis),
            ..FrameBreakdown::default()
        };

        for _ in 0..50 {
            let _ = counter.record_frame(frame(200));
        }
        let mut last = None;
        for _ in 0..10 {
            last = counter.record_frame(frame(100));
        }

        let metrics = last.expect("should report every second");
        assert!((metrics.per_second - 10.0).abs() <= 1e-3);
        assert!((metrics.trailing_ten_seconds - 5.5).abs() <= 1e-3);
    }
}
