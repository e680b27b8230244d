use std::collections::HashSet;

use glam::Vec2;
use tablequest_core::{
    EntityVisual, PaintColor, Pose, ProjectileOwner, SceneEntity, TileView, WeaponId,
};

use crate::{
    cast_column, cast_floor_and_ceiling, placeholder_color, placeholder_sprite_color,
    project_sprites, sprite_key, Color, FrameBuffer, HitSide, RayHit, RenderConfig,
    SpriteProjection, Texel, Texture, TextureProvider,
};

/// Everything the renderer needs to know about the world for one frame.
#[derive(Clone, Copy, Debug)]
pub struct FrameView<'a> {
    /// Tile map walls are cast against.
    pub tiles: TileView<'a>,
    /// Viewer position and facing.
    pub pose: Pose,
    /// Drawable entities in any order.
    pub entities: &'a [SceneEntity],
    /// Weapon held in front of the camera.
    pub weapon: WeaponId,
    /// Remaining recoil of the last attack.
    pub recoil: f32,
}

/// Software raycasting renderer.
#[derive(Debug)]
pub struct Renderer {
    config: RenderConfig,
    depth: Vec<f32>,
    reported_missing: HashSet<String>,
}

impl Renderer {
    /// Creates a renderer for frames of the configured resolution.
    #[must_use]
    pub fn new(config: RenderConfig) -> Self {
        Self {
            config,
            depth: vec![config.max_depth(); config.width() as usize],
            reported_missing: HashSet::new(),
        }
    }

    /// Wall distance per screen column from the last rendered frame.
    #[must_use]
    pub fn depth_buffer(&self) -> &[f32] {
        &self.depth
    }

    /// Renders `view` into `frame`: floor and ceiling, walls, sprites and
    /// finally the held weapon.
    pub fn render<P>(&mut self, frame: &mut FrameBuffer, view: &FrameView<'_>, textures: &P)
    where
        P: TextureProvider + ?Sized,
    {
        debug_assert_eq!(
            (frame.width(), frame.height()),
            (self.config.width(), self.config.height())
        );

        let floor = self.lookup_texture(textures, "floor");
        let ceiling = self.lookup_texture(textures, "ceil");
        cast_floor_and_ceiling(frame, view.pose, &self.config, floor, ceiling);

        self.draw_walls(frame, view, textures);

        let sprites = project_sprites(view.entities, view.pose, &self.config, &self.depth);
        for sprite in &sprites {
            self.draw_sprite(frame, sprite, textures);
        }

        draw_weapon(frame, view.weapon, view.recoil);
    }

    fn draw_walls<P>(&mut self, frame: &mut FrameBuffer, view: &FrameView<'_>, textures: &P)
    where
        P: TextureProvider + ?Sized,
    {
        let width = frame.width();
        let fov = self.config.fov();
        let max_depth = self.config.max_depth();
        self.depth.resize(width as usize, max_depth);

        for x in 0..width {
            let angle = view.pose.facing - fov / 2.0 + (x as f32 / width as f32) * fov;
            let origin = view.pose.position;
            let Some(hit) = cast_column(&view.tiles, origin, angle, view.pose.facing, max_depth)
            else {
                self.depth[x as usize] = max_depth;
                continue;
            };
            self.depth[x as usize] = hit.distance;

            let name = hit.tile.texture_name().unwrap_or("wall");
            let texture = self.lookup_texture(textures, name);
            let brightness = self.brightness(&hit);
            draw_wall_strip(frame, x, &hit, texture, placeholder_color(name), brightness);
        }
    }

    fn draw_sprite<P>(&mut self, frame: &mut FrameBuffer, sprite: &SpriteProjection, textures: &P)
    where
        P: TextureProvider + ?Sized,
    {
        if let EntityVisual::Projectile { owner, color } = sprite.entity.visual {
            let lowered = match owner {
                ProjectileOwner::Player => sprite.size * 0.8,
                ProjectileOwner::Enemy => 0.0,
            };
            let center = Vec2::new(sprite.screen_x, sprite.top + sprite.size / 2.0 + lowered);
            let radius = sprite.size / 3.0;
            frame.fill_disc(center, radius + 1.0, Color::WHITE);
            frame.fill_disc(center, radius, Color::from_paint(color));
            return;
        }

        let Some(key) = sprite_key(&sprite.entity.visual) else {
            return;
        };
        let origin = Vec2::new(
            sprite.screen_x - sprite.size / 2.0,
            sprite.top + 20.0 / sprite.distance,
        );
        match textures.sprite(&key) {
            Some(image) => blit_scaled(frame, image, origin, sprite.size),
            None => {
                self.report_missing(&key);
                let placeholder = placeholder_sprite_color(&sprite.entity.visual);
                frame.fill_rect(
                    Vec2::new(origin.x + sprite.size / 4.0, origin.y),
                    Vec2::new(sprite.size / 2.0, sprite.size),
                    placeholder,
                );
            }
        }
    }

    fn brightness(&self, hit: &RayHit) -> f32 {
        let fog = (hit.distance / self.config.fog_range()).min(1.0);
        let shade = match hit.side {
            HitSide::Vertical => 0.0,
            HitSide::Horizontal => self.config.side_shade(),
        };
        (1.0 - shade) * (1.0 - fog)
    }

    fn lookup_texture<'t, P>(&mut self, textures: &'t P, name: &str) -> Option<&'t Texture>
    where
        P: TextureProvider + ?Sized,
    {
        let texture = textures.texture(name);
        if texture.is_none() {
            self.report_missing(name);
        }
        texture
    }

    fn report_missing(&mut self, name: &str) {
        if self.reported_missing.insert(name.to_owned()) {
            log::warn!("no image registered for `{name}`; using a fallback");
        }
    }
}

fn draw_wall_strip(
    frame: &mut FrameBuffer,
    x: u32,
    hit: &RayHit,
    texture: Option<&Texture>,
    placeholder: Color,
    brightness: f32,
) {
    let view_height = frame.height() as f32;
    let wall_height = view_height / hit.corrected.max(f32::EPSILON);
    let top = (view_height - wall_height) / 2.0;
    let first = top.max(0.0) as u32;
    let last = (top + wall_height).min(view_height).ceil() as u32;
    let flat = shade(placeholder.to_texel(), brightness);

    for y in first..last {
        let texel = match texture {
            Some(texture) => {
                let v = (y as f32 + 0.5 - top) / wall_height;
                let column = (hit.texture_u * texture.width() as f32) as i64;
                let row = (v * texture.height() as f32) as i64;
                shade(texture.texel(column, row), brightness)
            }
            None => flat,
        };
        frame.put(x, y, texel);
    }
}

fn shade(texel: Texel, brightness: f32) -> Texel {
    let scale = |channel: u8| (f32::from(channel) * brightness).round() as u8;
    [scale(texel[0]), scale(texel[1]), scale(texel[2]), texel[3]]
}

fn blit_scaled(frame: &mut FrameBuffer, image: &Texture, origin: Vec2, size: f32) {
    if size <= 0.0 {
        return;
    }
    let clip = |start: f32, limit: u32| start.max(0.0).min(limit as f32) as u32;
    let (x0, x1) = (clip(origin.x, frame.width()), clip(origin.x + size, frame.width()));
    let (y0, y1) = (clip(origin.y, frame.height()), clip(origin.y + size, frame.height()));

    for y in y0..y1 {
        let v = ((y as f32 + 0.5 - origin.y) / size).clamp(0.0, 1.0 - f32::EPSILON);
        for x in x0..x1 {
            let u = ((x as f32 + 0.5 - origin.x) / size).clamp(0.0, 1.0 - f32::EPSILON);
            frame.blend(x, y, image.sample(u, v));
        }
    }
}

/// Draws the held weapon in the lower right of the frame, displaced by recoil.
fn draw_weapon(frame: &mut FrameBuffer, weapon: WeaponId, recoil: f32) {
    let scale = Vec2::new(frame.width() as f32 / 320.0, frame.height() as f32 / 200.0);
    let rect = |frame: &mut FrameBuffer, x: f32, y: f32, w: f32, h: f32, color: Color| {
        frame.fill_rect(Vec2::new(x, y) * scale, Vec2::new(w, h) * scale, color);
    };

    match weapon {
        WeaponId::Paintbrush => {
            let x = 230.0 + recoil * 2.0;
            let y = 130.0 + recoil * 2.0;
            rect(frame, x, y + 30.0, 10.0, 50.0, Color::from_rgb_u8(0x8d, 0x6e, 0x63));
            rect(frame, x - 1.0, y + 16.0, 12.0, 14.0, Color::from_rgb_u8(0xbd, 0xbd, 0xbd));
            rect(frame, x - 2.0, y, 14.0, 16.0, Color::from_rgb_u8(0xd7, 0xcc, 0xc8));
            let tip = Color::from_paint(PaintColor::from_hue(recoil * 18.0));
            rect(frame, x - 2.0, y, 14.0, 6.0, tip);
        }
        WeaponId::TableLeg => {
            let swing = (recoil / 30.0).clamp(0.0, 1.0);
            let x = 230.0 - swing * 60.0;
            rect(frame, x, 110.0, 16.0, 90.0, Color::from_rgb_u8(0x6d, 0x4c, 0x41));
            rect(frame, x - 2.0, 104.0, 20.0, 8.0, Color::from_rgb_u8(0x4e, 0x34, 0x2e));
        }
    }
}
