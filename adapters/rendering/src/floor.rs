use glam::Vec2;
use tablequest_core::Pose;

use crate::{placeholder_color, FrameBuffer, RenderConfig, Texture};

/// Paints the floor into the lower half of `frame` and mirrors the ceiling
/// into the upper half.
///
/// Each row below the horizon is cast once: the world position under the
/// leftmost pixel is stepped linearly across the row. Without both textures
/// the halves are filled with flat placeholder colours.
pub fn cast_floor_and_ceiling(
    frame: &mut FrameBuffer,
    pose: Pose,
    config: &RenderConfig,
    floor: Option<&Texture>,
    ceiling: Option<&Texture>,
) {
    let width = frame.width();
    let height = frame.height();
    let horizon = height / 2;

    let (Some(floor), Some(ceiling)) = (floor, ceiling) else {
        let half = Vec2::new(width as f32, horizon as f32);
        frame.fill_rect(Vec2::ZERO, half, placeholder_color("ceil"));
        frame.fill_rect(
            Vec2::new(0.0, horizon as f32),
            Vec2::new(width as f32, (height - horizon) as f32),
            placeholder_color("floor"),
        );
        return;
    };

    let direction = pose.direction();
    let plane = direction.perp() * (config.fov() / 1.5);
    let leftmost = direction - plane;
    let rightmost = direction + plane;
    let eye_height = 0.5 * height as f32;
    let scale = config.floor_texture_scale();

    for y in horizon..height {
        let offset = y as f32 + 0.5 - height as f32 / 2.0;
        let row_distance = eye_height / offset;
        let step = row_distance * (rightmost - leftmost) / width as f32;
        let mut point = pose.position + row_distance * leftmost;
        let mirrored = height - y - 1;

        for x in 0..width {
            let u = point.x / scale;
            let v = point.y / scale;
            frame.put(x, y, floor.sample(u, v));
            frame.put(x, mirrored, ceiling.sample(u, v));
            point += step;
        }
    }
}
