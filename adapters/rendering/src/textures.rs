//! Texture storage and lookup for walls, floors and billboards.

use std::collections::HashMap;

use crate::{Color, RenderingError};

/// 8-bit RGBA pixel.
pub type Texel = [u8; 4];

/// Immutable RGBA image sampled by the renderer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Texture {
    width: u32,
    height: u32,
    texels: Vec<Texel>,
}

impl Texture {
    /// Wraps `texels` laid out row by row.
    pub fn new(width: u32, height: u32, texels: Vec<Texel>) -> Result<Self, RenderingError> {
        let expected = width as usize * height as usize;
        if expected == 0 || texels.len() != expected {
            return Err(RenderingError::TexelCountMismatch {
                expected,
                found: texels.len(),
            });
        }

        Ok(Self {
            width,
            height,
            texels,
        })
    }

    /// Builds a texture from tightly packed RGBA bytes.
    pub fn from_rgba_bytes(width: u32, height: u32, bytes: &[u8]) -> Result<Self, RenderingError> {
        if bytes.len() % 4 != 0 {
            return Err(RenderingError::TexelCountMismatch {
                expected: width as usize * height as usize,
                found: bytes.len() / 4,
            });
        }
        let texels = bytes
            .chunks_exact(4)
            .map(|chunk| [chunk[0], chunk[1], chunk[2], chunk[3]])
            .collect();
        Self::new(width, height, texels)
    }

    /// Creates a texture filled with a single colour.
    pub fn solid(width: u32, height: u32, color: Color) -> Result<Self, RenderingError> {
        let texel = color.to_texel();
        Self::new(width, height, vec![texel; width as usize * height as usize])
    }

    /// Width in texels.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Height in texels.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Reports whether both sides are powers of two.
    #[must_use]
    pub const fn is_power_of_two(&self) -> bool {
        self.width.is_power_of_two() && self.height.is_power_of_two()
    }

    /// Returns the texel at (`x`, `y`), wrapping both coordinates.
    #[must_use]
    pub fn texel(&self, x: i64, y: i64) -> Texel {
        let column = x.rem_euclid(i64::from(self.width)) as usize;
        let row = y.rem_euclid(i64::from(self.height)) as usize;
        self.texels[row * self.width as usize + column]
    }

    /// Samples the texture with normalised coordinates, one repeat per unit.
    #[must_use]
    pub fn sample(&self, u: f32, v: f32) -> Texel {
        let x = (u * self.width as f32).floor() as i64;
        let y = (v * self.height as f32).floor() as i64;
        self.texel(x, y)
    }
}

/// Source of wall, floor and sprite images.
///
/// Lookups return `None` for unknown names; callers fall back to flat
/// placeholder colours for surfaces and skip sprites.
pub trait TextureProvider {
    /// Surface texture registered under `name` (`wall`, `floor`, ...).
    fn texture(&self, name: &str) -> Option<&Texture>;

    /// Billboard image registered under `key` (`table`, `enemy_idle_0`, ...).
    fn sprite(&self, key: &str) -> Option<&Texture>;
}

/// In-memory [`TextureProvider`].
#[derive(Clone, Debug, Default)]
pub struct TextureAtlas {
    textures: HashMap<String, Texture>,
    sprites: HashMap<String, Texture>,
}

impl TextureAtlas {
    /// Creates an empty atlas.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a surface texture, replacing any previous one with the same name.
    pub fn insert_texture(
        &mut self,
        name: impl Into<String>,
        texture: Texture,
    ) -> Result<(), RenderingError> {
        let name = name.into();
        if !texture.is_power_of_two() {
            return Err(RenderingError::NonPowerOfTwoTexture {
                name,
                width: texture.width(),
                height: texture.height(),
            });
        }
        let _ = self.textures.insert(name, texture);
        Ok(())
    }

    /// Registers a sprite, replacing any previous one with the same key.
    pub fn insert_sprite(&mut self, key: impl Into<String>, sprite: Texture) {
        let _ = self.sprites.insert(key.into(), sprite);
    }

    /// Number of registered surface textures.
    #[must_use]
    pub fn texture_count(&self) -> usize {
        self.textures.len()
    }

    /// Number of registered sprites.
    #[must_use]
    pub fn sprite_count(&self) -> usize {
        self.sprites.len()
    }
}

impl TextureProvider for TextureAtlas {
    fn texture(&self, name: &str) -> Option<&Texture> {
        self.textures.get(name)
    }

    fn sprite(&self, key: &str) -> Option<&Texture> {
        self.sprites.get(key)
    }
}

/// Flat colour drawn in place of a missing surface texture.
#[must_use]
pub fn placeholder_color(name: &str) -> Color {
    match name {
        "wood" => Color::from_rgb_u8(0x8b, 0x5a, 0x2b),
        "door" => Color::from_rgb_u8(0x5d, 0x40, 0x37),
        "gate" => Color::from_rgb_u8(0xc0, 0x30, 0x30),
        "stone" => Color::from_rgb_u8(0x6e, 0x6e, 0x78),
        "concrete" => Color::from_rgb_u8(0x9e, 0x9e, 0x9e),
        "office" => Color::from_rgb_u8(0xb8, 0xae, 0x90),
        "metal" => Color::from_rgb_u8(0x60, 0x70, 0x80),
        "floor" => Color::from_rgb_u8(0x33, 0x33, 0x33),
        "ceil" => Color::from_rgb_u8(0x11, 0x11, 0x11),
        _ => Color::from_rgb_u8(0x80, 0x80, 0x80),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn checker() -> Texture {
        let black = [0, 0, 0, 255];
        let white = [255, 255, 255, 255];
        Texture::new(2, 2, vec![black, white, white, black]).expect("valid texture")
    }

    #[test]
    fn texel_lookups_wrap_in_both_directions() {
        let texture = checker();

        assert_eq!(texture.texel(0, 0), [0, 0, 0, 255]);
        assert_eq!(texture.texel(3, 0), [255, 255, 255, 255]);
        assert_eq!(texture.texel(-1, -1), [0, 0, 0, 255]);
        assert_eq!(texture.sample(0.75, 0.25), [255, 255, 255, 255]);
        assert_eq!(texture.sample(1.25, 1.25), [0, 0, 0, 255]);
    }

    #[test]
    fn mismatched_texel_counts_are_rejected() {
        let error = Texture::from_rgba_bytes(2, 2, &[0; 12]).expect_err("three texels for four");

        assert_eq!(
            error,
            RenderingError::TexelCountMismatch {
                expected: 4,
                found: 3,
            }
        );
    }

    #[test]
    fn atlas_requires_power_of_two_surfaces_but_not_sprites() {
        let mut atlas = TextureAtlas::new();
        let odd = Texture::solid(3, 4, Color::WHITE).expect("valid texture");

        assert!(matches!(
            atlas.insert_texture("wall", odd.clone()),
            Err(RenderingError::NonPowerOfTwoTexture { width: 3, .. })
        ));
        atlas.insert_sprite("table", odd);
        atlas
            .insert_texture("floor", checker())
            .expect("power-of-two texture");

        assert!(atlas.texture("wall").is_none());
        assert!(atlas.texture("floor").is_some());
        assert!(atlas.sprite("table").is_some());
        assert_eq!((atlas.texture_count(), atlas.sprite_count()), (1, 1));
    }
}
