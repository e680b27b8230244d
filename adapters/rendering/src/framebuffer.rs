use glam::Vec2;

use crate::{Color, RenderingError, Texel};

/// RGBA8 pixel grid the renderer rasterises into.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameBuffer {
    width: u32,
    height: u32,
    bytes: Vec<u8>,
}

impl FrameBuffer {
    /// Allocates a black frame of `width` x `height` pixels.
    pub fn new(width: u32, height: u32) -> Result<Self, RenderingError> {
        if width == 0 || height == 0 {
            return Err(RenderingError::InvalidFrameSize { width, height });
        }

        let mut frame = Self {
            width,
            height,
            bytes: vec![0; width as usize * height as usize * 4],
        };
        frame.fill(Color::BLACK);
        Ok(frame)
    }

    /// Width in pixels.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Tightly packed RGBA rows, top to bottom.
    #[must_use]
    pub fn as_rgba_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Pixel at (`x`, `y`), if inside the frame.
    #[must_use]
    pub fn pixel(&self, x: u32, y: u32) -> Option<Texel> {
        let offset = self.offset(x, y)?;
        let pixel = self.bytes.get(offset..offset + 4)?;
        Some([pixel[0], pixel[1], pixel[2], pixel[3]])
    }

    /// Overwrites every pixel with `color`.
    pub fn fill(&mut self, color: Color) {
        let texel = color.to_texel();
        for pixel in self.bytes.chunks_exact_mut(4) {
            pixel.copy_from_slice(&texel);
        }
    }

    /// Overwrites the pixel at (`x`, `y`); writes outside the frame are dropped.
    pub fn put(&mut self, x: u32, y: u32, texel: Texel) {
        if let Some(offset) = self.offset(x, y) {
            self.bytes[offset..offset + 4].copy_from_slice(&texel);
        }
    }

    /// Composites `texel` over the pixel at (`x`, `y`) using its alpha.
    pub fn blend(&mut self, x: u32, y: u32, texel: Texel) {
        match texel[3] {
            0 => {}
            255 => self.put(x, y, texel),
            alpha => {
                let Some(offset) = self.offset(x, y) else {
                    return;
                };
                let alpha = u16::from(alpha);
                for channel in 0..3 {
                    let under = u16::from(self.bytes[offset + channel]);
                    let over = u16::from(texel[channel]);
                    self.bytes[offset + channel] =
                        ((over * alpha + under * (255 - alpha)) / 255) as u8;
                }
                self.bytes[offset + 3] = 255;
            }
        }
    }

    /// Fills the axis-aligned rectangle at `origin` of `size` pixels, clipped to the frame.
    pub fn fill_rect(&mut self, origin: Vec2, size: Vec2, color: Color) {
        let texel = color.to_texel();
        let (x0, x1) = clip_span(origin.x, origin.x + size.x, self.width);
        let (y0, y1) = clip_span(origin.y, origin.y + size.y, self.height);
        for y in y0..y1 {
            for x in x0..x1 {
                self.blend(x, y, texel);
            }
        }
    }

    /// Fills a disc of `radius` pixels centred on `center`, clipped to the frame.
    pub fn fill_disc(&mut self, center: Vec2, radius: f32, color: Color) {
        if radius <= 0.0 {
            return;
        }
        let texel = color.to_texel();
        let (x0, x1) = clip_span(center.x - radius, center.x + radius, self.width);
        let (y0, y1) = clip_span(center.y - radius, center.y + radius, self.height);
        let radius_squared = radius * radius;
        for y in y0..y1 {
            for x in x0..x1 {
                let pixel = Vec2::new(x as f32 + 0.5, y as f32 + 0.5);
                if pixel.distance_squared(center) <= radius_squared {
                    self.blend(x, y, texel);
                }
            }
        }
    }

    fn offset(&self, x: u32, y: u32) -> Option<usize> {
        (x < self.width && y < self.height)
            .then(|| (y as usize * self.width as usize + x as usize) * 4)
    }
}

fn clip_span(start: f32, end: f32, limit: u32) -> (u32, u32) {
    let clamp = |value: f32| value.round().clamp(0.0, limit as f32) as u32;
    (clamp(start), clamp(end))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_frames_are_opaque_black() {
        let frame = FrameBuffer::new(3, 2).expect("valid frame");

        assert_eq!(frame.as_rgba_bytes().len(), 24);
        assert_eq!(frame.pixel(2, 1), Some([0, 0, 0, 255]));
        assert_eq!(frame.pixel(3, 0), None);
    }

    #[test]
    fn blend_mixes_by_alpha() {
        let mut frame = FrameBuffer::new(1, 1).expect("valid frame");
        frame.put(0, 0, [200, 100, 0, 255]);

        frame.blend(0, 0, [0, 0, 0, 0]);
        assert_eq!(frame.pixel(0, 0), Some([200, 100, 0, 255]));

        frame.blend(0, 0, [0, 0, 255, 51]);
        assert_eq!(frame.pixel(0, 0), Some([160, 80, 51, 255]));
    }

    #[test]
    fn rectangles_are_clipped_to_the_frame() {
        let mut frame = FrameBuffer::new(4, 4).expect("valid frame");

        frame.fill_rect(Vec2::new(2.0, -3.0), Vec2::new(10.0, 4.0), Color::WHITE);

        assert_eq!(frame.pixel(3, 0), Some([255, 255, 255, 255]));
        assert_eq!(frame.pixel(1, 0), Some([0, 0, 0, 255]));
        assert_eq!(frame.pixel(2, 1), Some([0, 0, 0, 255]));
    }

    #[test]
    fn discs_cover_their_centre_but_not_corners() {
        let mut frame = FrameBuffer::new(9, 9).expect("valid frame");

        frame.fill_disc(Vec2::new(4.5, 4.5), 3.0, Color::WHITE);

        assert_eq!(frame.pixel(4, 4), Some([255, 255, 255, 255]));
        assert_eq!(frame.pixel(2, 2), Some([255, 255, 255, 255]));
        assert_eq!(frame.pixel(1, 1), Some([0, 0, 0, 255]));
    }
}
