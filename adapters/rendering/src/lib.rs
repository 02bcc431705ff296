#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared rendering contracts for Rampart adapters.
//!
//! Scenes are plain descriptors populated from world queries. Every drawable
//! descriptor implements [`Draw`] against the minimal [`RenderSurface`]
//! capability, so backends only have to provide rectangle, circle and text
//! primitives.

use std::time::Duration;

use anyhow::Result as AnyResult;
use glam::Vec2;
use rampart_core::{format_time, rules, GameOutcome, GameSummary, LabelStyle, PlayerAction};
use thiserror::Error;

/// RGBA color used when presenting frames.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    /// Red channel intensity in the range 0.0..=1.0.
    pub red: f32,
    /// Green channel intensity in the range 0.0..=1.0.
    pub green: f32,
    /// Blue channel intensity in the range 0.0..=1.0.
    pub blue: f32,
    /// Alpha channel intensity in the range 0.0..=1.0.
    pub alpha: f32,
}

impl Color {
    /// Fill used for projectiles.
    pub const YELLOW: Self = Self::from_rgb_u8(255, 255, 0);
    /// Fill used for enemies.
    pub const RED: Self = Self::from_rgb_u8(255, 0, 0);
    /// Fill used for the barrier band.
    pub const GRAY: Self = Self::from_rgb_u8(128, 128, 128);
    /// Text color for barrier damage labels.
    pub const LIGHT_CORAL: Self = Self::from_rgb_u8(240, 128, 128);
    /// Text color for enemy damage labels.
    pub const LIGHT_GREEN: Self = Self::from_rgb_u8(144, 238, 144);
    /// Text color for the HUD and lane markers.
    pub const WHITE: Self = Self::from_rgb_u8(255, 255, 255);
    /// Background behind the field.
    pub const BLACK: Self = Self::from_rgb_u8(0, 0, 0);

    /// Creates a new color from floating point channels.
    #[must_use]
    pub const fn new(red: f32, green: f32, blue: f32, alpha: f32) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    /// Creates an opaque color from byte RGB values.
    #[must_use]
    pub const fn from_rgb_u8(red: u8, green: u8, blue: u8) -> Self {
        Self {
            red: red as f32 / 255.0,
            green: green as f32 / 255.0,
            blue: blue as f32 / 255.0,
            alpha: 1.0,
        }
    }

    /// Returns the color with its alpha scaled by `opacity`.
    #[must_use]
    pub fn faded(self, opacity: f32) -> Self {
        Self {
            alpha: self.alpha * opacity.clamp(0.0, 1.0),
            ..self
        }
    }
}

/// Font and color applied by [`RenderSurface::fill_text`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TextStyle {
    /// Font size in world units.
    pub font_size: f32,
    /// Text color.
    pub color: Color,
    /// Opacity multiplier in the range 0.0..=1.0.
    pub opacity: f32,
}

impl TextStyle {
    /// Creates a fully opaque text style.
    #[must_use]
    pub const fn new(font_size: f32, color: Color) -> Self {
        Self {
            font_size,
            color,
            opacity: 1.0,
        }
    }

    /// Returns the style with the provided opacity.
    #[must_use]
    pub const fn with_opacity(self, opacity: f32) -> Self {
        Self { opacity, ..self }
    }
}

/// Drawing primitives a backend must provide. Coordinates are field units
/// with the origin in the upper-left corner and y growing downward.
pub trait RenderSurface {
    /// Clears the rectangle at `origin` with extent `size`.
    fn clear_rect(&mut self, origin: Vec2, size: Vec2);

    /// Fills the rectangle at `origin` with extent `size`.
    fn fill_rect(&mut self, origin: Vec2, size: Vec2, color: Color);

    /// Fills a circle.
    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Color);

    /// Strokes the outline of a circle.
    fn stroke_circle(&mut self, center: Vec2, radius: f32, thickness: f32, color: Color);

    /// Draws `text` with its baseline starting at `position`.
    fn fill_text(&mut self, text: &str, position: Vec2, style: TextStyle);
}

/// Per-frame draw contract shared by every scene element.
pub trait Draw {
    /// Draws the element onto the provided surface.
    fn draw(&self, surface: &mut dyn RenderSurface);
}

/// Barrier band spanning the bottom of the field.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BarrierPresentation {
    /// Upper-left corner of the band.
    pub origin: Vec2,
    /// Extent of the band.
    pub size: Vec2,
}

impl Draw for BarrierPresentation {
    fn draw(&self, surface: &mut dyn RenderSurface) {
        surface.fill_rect(self.origin, self.size, Color::GRAY);
    }
}

/// Marker drawn at a firing lane origin.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LanePresentation {
    /// Point projectiles are launched from.
    pub origin: Vec2,
}

impl LanePresentation {
    /// Radius of the lane marker.
    pub const MARKER_RADIUS: f32 = 6.0;
}

impl Draw for LanePresentation {
    fn draw(&self, surface: &mut dyn RenderSurface) {
        surface.stroke_circle(self.origin, Self::MARKER_RADIUS, 2.0, Color::WHITE);
    }
}

/// Enemy rectangle.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EnemyPresentation {
    /// Upper-left corner of the enemy footprint.
    pub position: Vec2,
}

impl EnemyPresentation {
    /// Creates a new enemy descriptor.
    #[must_use]
    pub const fn new(position: Vec2) -> Self {
        Self { position }
    }
}

impl Draw for EnemyPresentation {
    fn draw(&self, surface: &mut dyn RenderSurface) {
        surface.fill_rect(
            self.position,
            Vec2::new(rules::ENEMY_WIDTH, rules::ENEMY_HEIGHT),
            Color::RED,
        );
    }
}

/// Projectile disc.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ProjectilePresentation {
    /// Center of the projectile.
    pub center: Vec2,
}

impl ProjectilePresentation {
    /// Creates a new projectile descriptor.
    #[must_use]
    pub const fn new(center: Vec2) -> Self {
        Self { center }
    }
}

impl Draw for ProjectilePresentation {
    fn draw(&self, surface: &mut dyn RenderSurface) {
        surface.fill_circle(self.center, rules::PROJECTILE_RADIUS, Color::YELLOW);
    }
}

/// Floating damage label.
#[derive(Clone, Debug, PartialEq)]
pub struct LabelPresentation {
    /// Baseline position of the text.
    pub position: Vec2,
    /// Damage value shown by the label.
    pub value: f32,
    /// Opacity in the range 0.0..=1.0.
    pub opacity: f32,
    /// Styling variant.
    pub style: LabelStyle,
}

impl LabelPresentation {
    /// Font size used for damage labels.
    pub const FONT_SIZE: f32 = 16.0;

    /// Text drawn for the label.
    #[must_use]
    pub fn text(&self) -> String {
        format!("{}", self.value)
    }

    /// Text style derived from the label variant and opacity.
    #[must_use]
    pub fn text_style(&self) -> TextStyle {
        let color = match self.style {
            LabelStyle::Barrier => Color::LIGHT_CORAL,
            LabelStyle::Enemy => Color::LIGHT_GREEN,
        };
        TextStyle::new(Self::FONT_SIZE, color).with_opacity(self.opacity)
    }
}

impl Draw for LabelPresentation {
    fn draw(&self, surface: &mut dyn RenderSurface) {
        surface.fill_text(&self.text(), self.position, self.text_style());
    }
}

/// Heads-up display summarising the session counters.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct HudPresentation {
    /// Cumulative score.
    pub score: u32,
    /// Remaining barrier health.
    pub barrier_health: f32,
    /// Whole seconds since the session started.
    pub elapsed_seconds: u64,
    /// Cooldown left before the area volley is available.
    pub volley_cooldown: Duration,
    /// Number of firing lanes.
    pub lanes: u32,
}

impl HudPresentation {
    /// Font size used for HUD lines.
    pub const FONT_SIZE: f32 = 20.0;
    /// Horizontal inset of the HUD.
    pub const LEFT: f32 = 10.0;
    /// Vertical distance between HUD baselines.
    pub const LINE_SPACING: f32 = 30.0;

    /// HUD text lines from top to bottom.
    #[must_use]
    pub fn lines(&self) -> [String; 5] {
        [
            format!("Score: {}", self.score),
            format!("Barrier: {}", self.barrier_health),
            format!("Time: {}", format_time(self.elapsed_seconds)),
            format!("Volley cooldown: {} s", ceil_seconds(self.volley_cooldown)),
            format!("Lanes: {}", self.lanes),
        ]
    }
}

impl Draw for HudPresentation {
    fn draw(&self, surface: &mut dyn RenderSurface) {
        let style = TextStyle::new(Self::FONT_SIZE, Color::WHITE);
        for (index, line) in self.lines().iter().enumerate() {
            let baseline = Self::LINE_SPACING * (index as f32 + 1.0);
            surface.fill_text(line, Vec2::new(Self::LEFT, baseline), style);
        }
    }
}

fn ceil_seconds(duration: Duration) -> u64 {
    duration.as_secs() + u64::from(duration.subsec_nanos() > 0)
}

/// Scene description combining the barrier, entities and HUD.
#[derive(Clone, Debug, PartialEq)]
pub struct Scene {
    width: f32,
    height: f32,
    /// Barrier band along the bottom edge.
    pub barrier: BarrierPresentation,
    /// Markers for the active firing lanes.
    pub lanes: Vec<LanePresentation>,
    /// Live enemies.
    pub enemies: Vec<EnemyPresentation>,
    /// Projectiles in flight.
    pub projectiles: Vec<ProjectilePresentation>,
    /// Visible damage labels.
    pub labels: Vec<LabelPresentation>,
    /// Session counters.
    pub hud: HudPresentation,
}

impl Scene {
    /// Creates an empty scene for a field of the provided dimensions.
    ///
    /// Returns an error when the field is degenerate or the barrier does not fit.
    pub fn new(width: f32, height: f32, barrier_thickness: f32) -> Result<Self, RenderingError> {
        if !(width > 0.0 && height > 0.0) {
            return Err(RenderingError::InvalidField { width, height });
        }
        if !(barrier_thickness >= 0.0 && barrier_thickness <= height) {
            return Err(RenderingError::InvalidBarrier {
                thickness: barrier_thickness,
                height,
            });
        }

        Ok(Self {
            width,
            height,
            barrier: BarrierPresentation {
                origin: Vec2::new(0.0, height - barrier_thickness),
                size: Vec2::new(width, barrier_thickness),
            },
            lanes: Vec::new(),
            enemies: Vec::new(),
            projectiles: Vec::new(),
            labels: Vec::new(),
            hud: HudPresentation::default(),
        })
    }

    /// Width of the field.
    #[must_use]
    pub const fn width(&self) -> f32 {
        self.width
    }

    /// Height of the field.
    #[must_use]
    pub const fn height(&self) -> f32 {
        self.height
    }

    /// Draws the whole frame, clearing the field first.
    pub fn draw(&self, surface: &mut dyn RenderSurface) {
        surface.clear_rect(Vec2::ZERO, Vec2::new(self.width, self.height));
        self.barrier.draw(surface);
        let layers: [&dyn DrawLayer; 4] = [
            &self.lanes,
            &self.enemies,
            &self.projectiles,
            &self.labels,
        ];
        for layer in layers {
            layer.draw_all(surface);
        }
        self.hud.draw(surface);
    }
}

trait DrawLayer {
    fn draw_all(&self, surface: &mut dyn RenderSurface);
}

impl<T: Draw> DrawLayer for Vec<T> {
    fn draw_all(&self, surface: &mut dyn RenderSurface) {
        for item in self {
            item.draw(surface);
        }
    }
}

/// Presentation descriptor consumed by rendering backends.
#[derive(Clone, Debug, PartialEq)]
pub struct Presentation {
    /// Title used by the created window.
    pub window_title: String,
    /// Solid color used to clear each frame.
    pub clear_color: Color,
    /// Scene content that should be displayed.
    pub scene: Scene,
}

impl Presentation {
    /// Constructs a new presentation descriptor.
    #[must_use]
    pub fn new<T>(window_title: T, clear_color: Color, scene: Scene) -> Self
    where
        T: Into<String>,
    {
        Self {
            window_title: window_title.into(),
            clear_color,
            scene,
        }
    }
}

/// Input snapshot gathered by adapters before updating the scene.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct FrameInput {
    /// Monotonic time since the backend started.
    pub now: Duration,
    /// Player actions pressed since the previous frame, in order.
    pub actions: Vec<PlayerAction>,
}

/// Result of updating the scene for one frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FrameStatus {
    /// The session is still running.
    Continue,
    /// The session ended with the provided summary.
    Finished(GameSummary),
}

/// Rendering backend capable of presenting Rampart scenes.
pub trait RenderingBackend {
    /// Runs the rendering backend until the player quits or dismisses the end notice.
    ///
    /// The provided `update_scene` closure receives the frame input and may
    /// mutate the scene before it is rendered. Once it reports
    /// [`FrameStatus::Finished`] the backend stops calling it and shows the
    /// end-of-game notice.
    fn run<F>(self, presentation: Presentation, update_scene: F) -> AnyResult<()>
    where
        F: FnMut(FrameInput, &mut Scene) -> FrameStatus + 'static;
}

/// Notice shown to the player once the session ends.
#[must_use]
pub fn end_of_game_message(summary: &GameSummary) -> String {
    let verdict = match summary.outcome {
        GameOutcome::Victory => "Victory!",
        GameOutcome::Defeat => "Defeat!",
    };
    format!(
        "{verdict} Final score: {}, time: {}",
        summary.score,
        summary.elapsed_label()
    )
}

/// Errors that can occur when constructing rendering descriptors.
#[derive(Debug, Error, PartialEq)]
pub enum RenderingError {
    /// Field dimensions must be positive.
    #[error("field dimensions must be positive (received {width}x{height})")]
    InvalidField {
        /// Provided width.
        width: f32,
        /// Provided height.
        height: f32,
    },
    /// The barrier must fit inside the field.
    #[error("barrier thickness {thickness} does not fit a field of height {height}")]
    InvalidBarrier {
        /// Provided barrier thickness.
        thickness: f32,
        /// Height of the field.
        height: f32,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    enum Call {
        Clear(Vec2, Vec2),
        Rect(Vec2, Vec2, Color),
        Circle(Vec2, f32, Color),
        Stroke(Vec2, f32),
        Text(String, Vec2, TextStyle),
    }

    #[derive(Default)]
    struct RecordingSurface {
        calls: Vec<Call>,
    }

    impl RenderSurface for RecordingSurface {
        fn clear_rect(&mut self, origin: Vec2, size: Vec2) {
            self.calls.push(Call::Clear(origin, size));
        }

        fn fill_rect(&mut self, origin: Vec2, size: Vec2, color: Color) {
            self.calls.push(Call::Rect(origin, size, color));
        }

        fn fill_circle(&mut self, center: Vec2, radius: f32, color: Color) {
            self.calls.push(Call::Circle(center, radius, color));
        }

        fn stroke_circle(&mut self, center: Vec2, radius: f32, _thickness: f32, _color: Color) {
            self.calls.push(Call::Stroke(center, radius));
        }

        fn fill_text(&mut self, text: &str, position: Vec2, style: TextStyle) {
            self.calls.push(Call::Text(text.to_owned(), position, style));
        }
    }

    #[test]
    fn scene_rejects_degenerate_fields() {
        assert_eq!(
            Scene::new(0.0, 600.0, 30.0).expect_err("zero width must be rejected"),
            RenderingError::InvalidField {
                width: 0.0,
                height: 600.0
            }
        );
        assert!(matches!(
            Scene::new(800.0, 600.0, 601.0),
            Err(RenderingError::InvalidBarrier { .. })
        ));
    }

    #[test]
    fn scene_places_barrier_along_bottom_edge() {
        let scene = Scene::new(800.0, 600.0, 30.0).expect("valid field");
        assert_eq!(scene.barrier.origin, Vec2::new(0.0, 570.0));
        assert_eq!(scene.barrier.size, Vec2::new(800.0, 30.0));
    }

    #[test]
    fn scene_draws_layers_back_to_front() {
        let mut scene = Scene::new(800.0, 600.0, 30.0).expect("valid field");
        scene.lanes.push(LanePresentation {
            origin: Vec2::new(400.0, 570.0),
        });
        scene
            .enemies
            .push(EnemyPresentation::new(Vec2::new(10.0, 20.0)));
        scene
            .projectiles
            .push(ProjectilePresentation::new(Vec2::new(400.0, 300.0)));
        scene.labels.push(LabelPresentation {
            position: Vec2::new(750.0, 589.0),
            value: -10.0,
            opacity: 0.5,
            style: LabelStyle::Barrier,
        });

        let mut surface = RecordingSurface::default();
        scene.draw(&mut surface);

        assert_eq!(
            surface.calls[..6],
            [
                Call::Clear(Vec2::ZERO, Vec2::new(800.0, 600.0)),
                Call::Rect(Vec2::new(0.0, 570.0), Vec2::new(800.0, 30.0), Color::GRAY),
                Call::Stroke(Vec2::new(400.0, 570.0), LanePresentation::MARKER_RADIUS),
                Call::Rect(Vec2::new(10.0, 20.0), Vec2::new(30.0, 50.0), Color::RED),
                Call::Circle(Vec2::new(400.0, 300.0), 3.0, Color::YELLOW),
                Call::Text(
                    "-10".to_owned(),
                    Vec2::new(750.0, 589.0),
                    TextStyle::new(16.0, Color::LIGHT_CORAL).with_opacity(0.5),
                ),
            ]
        );
        assert_eq!(surface.calls.len(), 6 + 5);
    }

    #[test]
    fn hud_lines_round_cooldown_up() {
        let hud = HudPresentation {
            score: 42,
            barrier_health: 487.0,
            elapsed_seconds: 150,
            volley_cooldown: Duration::from_millis(4_010),
            lanes: 5,
        };

        assert_eq!(
            hud.lines(),
            [
                "Score: 42".to_owned(),
                "Barrier: 487".to_owned(),
                "Time: 02:30".to_owned(),
                "Volley cooldown: 5 s".to_owned(),
                "Lanes: 5".to_owned(),
            ]
        );
    }

    #[test]
    fn hud_reports_zero_once_cooldown_expires() {
        let hud = HudPresentation::default();
        assert_eq!(hud.lines()[3], "Volley cooldown: 0 s");
    }

    #[test]
    fn enemy_labels_use_light_green() {
        let label = LabelPresentation {
            position: Vec2::ZERO,
            value: 10.0,
            opacity: 1.0,
            style: LabelStyle::Enemy,
        };
        assert_eq!(label.text(), "10");
        assert_eq!(label.text_style().color, Color::LIGHT_GREEN);
    }

    #[test]
    fn end_message_reports_outcome_score_and_time() {
        let victory = GameSummary {
            outcome: GameOutcome::Victory,
            score: 500,
            elapsed_seconds: 312,
        };
        let defeat = GameSummary {
            outcome: GameOutcome::Defeat,
            score: 17,
            elapsed_seconds: 59,
        };

        assert_eq!(
            end_of_game_message(&victory),
            "Victory! Final score: 500, time: 05:12"
        );
        assert_eq!(
            end_of_game_message(&defeat),
            "Defeat! Final score: 17, time: 00:59"
        );
    }
}
