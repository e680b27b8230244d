#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Software raycasting renderer and presentation contracts for Table Quest
//! adapters.
//!
//! Everything in this crate is backend agnostic: walls, floors and sprites
//! are rasterised into a [`FrameBuffer`] which a windowing backend uploads
//! and scales, drawing the HUD and overlays from the [`Scene`] on top.

mod floor;
mod framebuffer;
mod raycast;
mod renderer;
mod sprites;
mod textures;

pub use floor::cast_floor_and_ceiling;
pub use framebuffer::FrameBuffer;
pub use raycast::{cast_column, HitSide, RayHit};
pub use renderer::{FrameView, Renderer};
pub use sprites::{placeholder_sprite_color, project_sprites, sprite_key, SpriteProjection};
pub use textures::{placeholder_color, Texel, Texture, TextureAtlas, TextureProvider};

use anyhow::Result as AnyResult;
use std::{error::Error, f32::consts::FRAC_PI_3, fmt, time::Duration};
use tablequest_core::{ControlInput, Event, PaintColor, PlayerSnapshot, Screen, SessionStatus};

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
    /// Opaque black.
    pub const BLACK: Self = Self::new(0.0, 0.0, 0.0, 1.0);

    /// Opaque white.
    pub const WHITE: Self = Self::new(1.0, 1.0, 1.0, 1.0);

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

    /// Converts a paint colour emitted by the simulation.
    #[must_use]
    pub const fn from_paint(paint: PaintColor) -> Self {
        Self::from_rgb_u8(paint.red(), paint.green(), paint.blue())
    }

    /// Returns the same color with a replaced alpha channel.
    #[must_use]
    pub const fn with_alpha(self, alpha: f32) -> Self {
        Self::new(self.red, self.green, self.blue, alpha)
    }

    /// Returns a new color darkened towards black by the provided amount.
    #[must_use]
    pub fn darken(self, amount: f32) -> Self {
        let keep = 1.0 - amount.clamp(0.0, 1.0);

        Self {
            red: self.red * keep,
            green: self.green * keep,
            blue: self.blue * keep,
            alpha: self.alpha,
        }
    }

    /// Converts the color into an 8-bit RGBA texel.
    #[must_use]
    pub fn to_texel(self) -> Texel {
        [
            channel_to_u8(self.red),
            channel_to_u8(self.green),
            channel_to_u8(self.blue),
            channel_to_u8(self.alpha),
        ]
    }
}

fn channel_to_u8(channel: f32) -> u8 {
    (channel.clamp(0.0, 1.0) * 255.0).round() as u8
}

/// Tunables of the software renderer.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RenderConfig {
    width: u32,
    height: u32,
    fov: f32,
    max_depth: f32,
    fog_range: f32,
    floor_texture_scale: f32,
    sprite_fov_tolerance: f32,
    near_clip: f32,
    side_shade: f32,
}

impl RenderConfig {
    /// Creates the classic 320x200 configuration with a 60 degree field of view.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            width: 320,
            height: 200,
            fov: FRAC_PI_3,
            max_depth: 50.0,
            fog_range: 25.0,
            floor_texture_scale: 4.0,
            sprite_fov_tolerance: FRAC_PI_3 / 1.5,
            near_clip: 0.2,
            side_shade: 0.3,
        }
    }

    /// Returns a copy rendering into a frame of `width` x `height` pixels.
    #[must_use]
    pub const fn with_resolution(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    /// Returns a copy using `fov` radians, widening the sprite tolerance to match.
    #[must_use]
    pub fn with_fov(mut self, fov: f32) -> Self {
        self.fov = fov;
        self.sprite_fov_tolerance = fov / 1.5;
        self
    }

    /// Returns a copy treating rays longer than `max_depth` tiles as misses.
    #[must_use]
    pub const fn with_max_depth(mut self, max_depth: f32) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Returns a copy whose walls are fully fogged at `fog_range` tiles.
    #[must_use]
    pub const fn with_fog_range(mut self, fog_range: f32) -> Self {
        self.fog_range = fog_range;
        self
    }

    /// Returns a copy stretching floor and ceiling textures over `scale` tiles.
    #[must_use]
    pub const fn with_floor_texture_scale(mut self, scale: f32) -> Self {
        self.floor_texture_scale = scale;
        self
    }

    /// Returns a copy culling sprites further than `tolerance` radians off-axis.
    #[must_use]
    pub const fn with_sprite_fov_tolerance(mut self, tolerance: f32) -> Self {
        self.sprite_fov_tolerance = tolerance;
        self
    }

    /// Frame width in pixels.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Frame height in pixels.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Horizontal field of view in radians.
    #[must_use]
    pub const fn fov(&self) -> f32 {
        self.fov
    }

    /// Maximum ray length in tiles.
    #[must_use]
    pub const fn max_depth(&self) -> f32 {
        self.max_depth
    }

    /// Distance at which walls become fully fogged.
    #[must_use]
    pub const fn fog_range(&self) -> f32 {
        self.fog_range
    }

    /// Number of tiles covered by one repetition of the floor texture.
    #[must_use]
    pub const fn floor_texture_scale(&self) -> f32 {
        self.floor_texture_scale
    }

    /// Maximum off-axis angle at which sprites are still projected.
    #[must_use]
    pub const fn sprite_fov_tolerance(&self) -> f32 {
        self.sprite_fov_tolerance
    }

    /// Sprites closer than this distance are clipped.
    #[must_use]
    pub const fn near_clip(&self) -> f32 {
        self.near_clip
    }

    /// Darkening applied to walls hit on a horizontal face.
    #[must_use]
    pub const fn side_shade(&self) -> f32 {
        self.side_shade
    }

    /// Allocates a frame buffer matching the configured resolution.
    pub fn frame_buffer(&self) -> Result<FrameBuffer, RenderingError> {
        FrameBuffer::new(self.width, self.height)
    }
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Player statistics shown by the heads-up display.
#[derive(Clone, Debug, PartialEq)]
pub struct HudPresentation {
    /// Health as a percentage.
    pub health: i32,
    /// Ammunition left for ranged weapons.
    pub ammo: u32,
    /// Tables collected in the current level.
    pub tables: u32,
    /// Tables required to unlock the exit.
    pub required_tables: u32,
    /// One-based level number.
    pub level: u32,
    /// Score accumulated from money pickups.
    pub score: u32,
    /// Display name of the equipped weapon.
    pub weapon_name: &'static str,
    /// One-based inventory slot of the equipped weapon.
    pub weapon_slot: usize,
}

impl HudPresentation {
    /// Builds the HUD for `player` on the one-based `level`.
    #[must_use]
    pub fn from_player(player: &PlayerSnapshot, level: u32) -> Self {
        Self {
            health: player.health,
            ammo: player.ammo,
            tables: player.tables,
            required_tables: player.required_tables,
            level,
            score: player.score,
            weapon_name: player.weapon().definition().name,
            weapon_slot: player.current_weapon + 1,
        }
    }

    /// Reports whether enough tables were collected to leave the level.
    #[must_use]
    pub fn tables_complete(&self) -> bool {
        self.tables >= self.required_tables
    }
}

/// Scene description handed to the backend every frame.
#[derive(Clone, Debug, PartialEq)]
pub struct Scene {
    /// Software-rendered 3D view.
    pub frame: FrameBuffer,
    /// Session status the frame was rendered in.
    pub status: SessionStatus,
    /// Heads-up display, absent outside of a run.
    pub hud: Option<HudPresentation>,
    /// Overlay screen currently shown on top of the view.
    pub overlay: Option<Screen>,
    /// Opacity of the red damage flash in the range 0.0..=0.5.
    pub damage_flash: f32,
    /// Whether a door is within reach straight ahead.
    pub door_prompt: bool,
}

impl Scene {
    /// Creates a scene for the main menu around an allocated frame.
    #[must_use]
    pub fn new(frame: FrameBuffer) -> Self {
        Self {
            frame,
            status: SessionStatus::Menu,
            hud: None,
            overlay: None,
            damage_flash: 0.0,
            door_prompt: false,
        }
    }

    /// Tracks overlay screens shown and hidden by the simulation.
    pub fn observe(&mut self, events: &[Event]) {
        for event in events {
            match event {
                Event::ScreenShown { screen } => self.overlay = Some(*screen),
                Event::ScreensHidden => self.overlay = None,
                _ => {}
            }
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

/// Rendering backend capable of presenting Table Quest scenes.
pub trait RenderingBackend {
    /// Runs the rendering backend until it is requested to exit.
    ///
    /// The provided `update_scene` closure receives the wall-clock frame
    /// delta and the control input captured by the adapter, and refreshes
    /// the scene before it is presented.
    fn run<F>(self, presentation: Presentation, update_scene: F) -> AnyResult<()>
    where
        F: FnMut(Duration, ControlInput, &mut Scene) + 'static;
}

/// Errors that can occur when constructing rendering resources.
#[derive(Debug, PartialEq, Eq)]
pub enum RenderingError {
    /// Frames must contain at least one pixel.
    InvalidFrameSize {
        /// Requested width.
        width: u32,
        /// Requested height.
        height: u32,
    },
    /// Wall and floor textures wrap with a bit mask and need power-of-two sides.
    NonPowerOfTwoTexture {
        /// Name the texture was registered under.
        name: String,
        /// Texture width.
        width: u32,
        /// Texture height.
        height: u32,
    },
    /// Texel data does not match the declared dimensions.
    TexelCountMismatch {
        /// Texels implied by the dimensions.
        expected: usize,
        /// Texels supplied.
        found: usize,
    },
}

impl fmt::Display for RenderingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidFrameSize { width, height } => {
                write!(f, "frame size must be positive (received {width}x{height})")
            }
            Self::NonPowerOfTwoTexture {
                name,
                width,
                height,
            } => write!(
                f,
                "texture `{name}` must have power-of-two sides (received {width}x{height})"
            ),
            Self::TexelCountMismatch { expected, found } => {
                write!(f, "expected {expected} texels, received {found}")
            }
        }
    }
}

impl Error for RenderingError {}

#[cfg(test)]
mod tests {
    use super::*;
    use tablequest_core::{Pose, Vec2, WeaponId};

    #[test]
    fn default_config_matches_classic_resolution() {
        let config = RenderConfig::default();

        assert_eq!((config.width(), config.height()), (320, 200));
        assert!((config.sprite_fov_tolerance() - config.fov() / 1.5).abs() < 1e-6);
        assert_eq!(config.frame_buffer().map(|frame| frame.width()), Ok(320));
    }

    #[test]
    fn widening_fov_widens_sprite_tolerance() {
        let config = RenderConfig::new().with_fov(1.5);

        assert!((config.sprite_fov_tolerance() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn zero_sized_frames_are_rejected_without_panicking() {
        let error = RenderConfig::new()
            .with_resolution(0, 200)
            .frame_buffer()
            .expect_err("zero width must be rejected");

        assert_eq!(
            error,
            RenderingError::InvalidFrameSize {
                width: 0,
                height: 200,
            }
        );
        assert_eq!(
            error.to_string(),
            "frame size must be positive (received 0x200)"
        );
    }

    #[test]
    fn darken_scales_channels_and_keeps_alpha() {
        let color = Color::new(1.0, 0.5, 0.0, 0.8).darken(0.3);

        assert!((color.red - 0.7).abs() < 1e-6);
        assert!((color.green - 0.35).abs() < 1e-6);
        assert_eq!(color.alpha, 0.8);
        assert_eq!(Color::WHITE.to_texel(), [255, 255, 255, 255]);
    }

    #[test]
    fn scene_tracks_overlay_events() {
        let frame = FrameBuffer::new(2, 2).expect("valid frame");
        let mut scene = Scene::new(frame);

        scene.observe(&[
            Event::ScreenShown {
                screen: Screen::LevelComplete,
            },
            Event::ScreenShown {
                screen: Screen::Victory,
            },
        ]);
        assert_eq!(scene.overlay, Some(Screen::Victory));

        scene.observe(&[Event::ScreensHidden]);
        assert_eq!(scene.overlay, None);
    }

    #[test]
    fn hud_reports_one_based_weapon_slot() {
        let player = PlayerSnapshot {
            pose: Pose::new(Vec2::ZERO, 0.0),
            health: 75,
            ammo: 12,
            tables: 2,
            required_tables: 2,
            score: 600,
            inventory: vec![WeaponId::Paintbrush, WeaponId::TableLeg],
            current_weapon: 1,
            recoil: 0.0,
        };

        let hud = HudPresentation::from_player(&player, 3);

        assert_eq!(hud.weapon_name, "TABLE LEG");
        assert_eq!(hud.weapon_slot, 2);
        assert!(hud.tables_complete());
    }
}
