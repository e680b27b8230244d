#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Macroquad-backed presentation adapter for Table Quest.
//!
//! macroquad is pulled in without its default `audio` feature so that tests
//! build on machines lacking ALSA headers; sound cues go through the CLI's
//! audio sink instead.
//!
//! The software-rendered frame is uploaded to a nearest-filtered texture and
//! scaled into the window; HUD text, overlays and the damage flash are drawn
//! with macroquad primitives on top.

mod atlas;
mod hud;
mod input;

pub use self::atlas::{default_manifest_path, load_texture_atlas};

use self::{
    hud::{draw_scene_chrome, Viewport},
    input::FrameKeys,
};
use anyhow::Result;
use macroquad::{
    color::WHITE,
    math::Vec2 as MacroquadVec2,
    texture::{draw_texture_ex, DrawTextureParams, FilterMode, Image, Texture2D},
};
use std::{
    collections::VecDeque,
    time::{Duration, Instant},
};
use tablequest_rendering::{Presentation, RenderingBackend};

/// Presents Table Quest frames in a macroquad window.
#[derive(Clone, Copy, Debug)]
pub struct MacroquadBackend {
    swap_interval: Option<i32>,
    show_fps: bool,
    window_scale: u32,
}

impl Default for MacroquadBackend {
    fn default() -> Self {
        Self {
            swap_interval: None,
            show_fps: false,
            window_scale: 3,
        }
    }
}

impl MacroquadBackend {
    /// Creates a backend with a 3x window that leaves vsync to the platform.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests `swap_interval` from the platform; `None` keeps its default.
    #[must_use]
    pub fn with_swap_interval(mut self, swap_interval: Option<i32>) -> Self {
        self.swap_interval = swap_interval;
        self
    }

    /// Waits for the display refresh when `enabled`, otherwise presents immediately.
    #[must_use]
    pub fn with_vsync(self, enabled: bool) -> Self {
        self.with_swap_interval(Some(i32::from(enabled)))
    }

    /// Logs frame rate and update/present timings once per second when `show` is set.
    #[must_use]
    pub fn with_show_fps(mut self, show: bool) -> Self {
        self.show_fps = show;
        self
    }

    /// Sets the initial window size as a multiple of the frame resolution.
    #[must_use]
    pub fn with_window_scale(mut self, scale: u32) -> Self {
        self.window_scale = scale.max(1);
        self
    }
}

/// Time spent on one frame, split by phase.
#[derive(Clone, Copy, Debug, Default)]
struct FrameTiming {
    frame: Duration,
    update: Duration,
    present: Duration,
}

/// Frames and time accumulated over roughly one second.
#[derive(Clone, Copy, Debug, Default)]
struct Bucket {
    frames: u32,
    span: Duration,
    update: Duration,
    present: Duration,
}

/// Frame rate report produced once per bucket.
#[derive(Clone, Copy, Debug, PartialEq)]
struct FrameReport {
    fps: f32,
    fps_10s: f32,
    update: Duration,
    present: Duration,
}

/// Frame rate statistics kept in one-second buckets.
#[derive(Debug, Default)]
struct FrameStats {
    current: Bucket,
    history: VecDeque<Bucket>,
}

impl FrameStats {
    const BUCKET: Duration = Duration::from_secs(1);
    const HISTORY: usize = 10;

    /// Adds a frame; returns a report whenever a bucket fills up.
    fn record(&mut self, timing: FrameTiming) -> Option<FrameReport> {
        let bucket = &mut self.current;
        bucket.frames = bucket.frames.saturating_add(1);
        bucket.span += timing.frame;
        bucket.update += timing.update;
        bucket.present += timing.present;
        if bucket.span < Self::BUCKET {
            return None;
        }

        let full = std::mem::take(&mut self.current);
        if self.history.len() == Self::HISTORY {
            let _ = self.history.pop_front();
        }
        self.history.push_back(full);

        let (frames, span) = self
            .history
            .iter()
            .fold((0u32, Duration::ZERO), |(frames, span), bucket| {
                (frames.saturating_add(bucket.frames), span + bucket.span)
            });
        Some(FrameReport {
            fps: rate(full.frames, full.span),
            fps_10s: rate(frames, span),
            update: full.update / full.frames,
            present: full.present / full.frames,
        })
    }
}

fn rate(frames: u32, span: Duration) -> f32 {
    let seconds = span.as_secs_f32();
    if seconds <= f32::EPSILON {
        0.0
    } else {
        frames as f32 / seconds
    }
}

impl RenderingBackend for MacroquadBackend {
    fn run<F>(self, presentation: Presentation, mut update_scene: F) -> Result<()>
    where
        F: FnMut(Duration, tablequest_core::ControlInput, &mut tablequest_rendering::Scene)
            + 'static,
    {
        let Self {
            swap_interval,
            show_fps,
            window_scale,
        } = self;

        let Presentation {
            window_title,
            clear_color,
            scene,
        } = presentation;

        let frame_width = scene.frame.width();
        let frame_height = scene.frame.height();
        let mut config = macroquad::window::Conf {
            window_title,
            window_width: i32::try_from(frame_width * window_scale).unwrap_or(i32::MAX),
            window_height: i32::try_from(frame_height * window_scale).unwrap_or(i32::MAX),
            ..macroquad::window::Conf::default()
        };
        if let Some(swap_interval) = swap_interval {
            config.platform.swap_interval = Some(swap_interval);
        }

        macroquad::Window::from_config(config, async move {
            let mut scene = scene;
            let background = to_macroquad_color(clear_color);
            let mut stats = FrameStats::default();

            let mut image = Image {
                bytes: scene.frame.as_rgba_bytes().to_vec(),
                width: u16::try_from(frame_width).unwrap_or(u16::MAX),
                height: u16::try_from(frame_height).unwrap_or(u16::MAX),
            };
            let texture = Texture2D::from_image(&image);
            texture.set_filter(FilterMode::Nearest);

            loop {
                let keys = FrameKeys::poll();
                if keys.quit_requested {
                    log::info!("quit requested");
                    break;
                }

                macroquad::window::clear_background(background);

                let frame_dt =
                    Duration::from_secs_f32(macroquad::time::get_frame_time().max(0.0));
                let update_start = Instant::now();
                update_scene(frame_dt, keys.control, &mut scene);
                let update = update_start.elapsed();

                let present_start = Instant::now();
                let frame_bytes = scene.frame.as_rgba_bytes();
                if image.bytes.len() == frame_bytes.len() {
                    image.bytes.copy_from_slice(frame_bytes);
                    texture.update(&image);
                } else {
                    log::warn!("scene frame changed size; keeping the previous frame");
                }

                let viewport = Viewport::fit(
                    frame_width,
                    frame_height,
                    macroquad::window::screen_width(),
                    macroquad::window::screen_height(),
                );
                draw_texture_ex(
                    texture,
                    viewport.x,
                    viewport.y,
                    WHITE,
                    DrawTextureParams {
                        dest_size: Some(MacroquadVec2::new(viewport.width, viewport.height)),
                        ..DrawTextureParams::default()
                    },
                );
                draw_scene_chrome(&scene, viewport);
                let present = present_start.elapsed();

                let report = stats.record(FrameTiming {
                    frame: frame_dt,
                    update,
                    present,
                });
                if let Some(report) = report.filter(|_| show_fps) {
                    log::info!(
                        "{:.1} fps ({:.1} over 10s), update {:.2} ms, present {:.2} ms",
                        report.fps,
                        report.fps_10s,
                        report.update.as_secs_f64() * 1_000.0,
                        report.present.as_secs_f64() * 1_000.0,
                    );
                }

                macroquad::window::next_frame().await;
            }
        });

        Ok(())
    }
}

fn to_macroquad_color(color: tablequest_rendering::Color) -> macroquad::color::Color {
    macroquad::color::Color::new(color.red, color.green, color.blue, color.alpha)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn timing(millis: u64) -> FrameTiming {
        FrameTiming {
            frame: Duration::from_millis(millis),
            update: Duration::from_millis(2),
            present: Duration::from_millis(4),
        }
    }

    #[test]
    fn reports_once_per_filled_bucket() {
        let mut stats = FrameStats::default();

        for _ in 0..49 {
            assert!(stats.record(timing(20)).is_none());
        }
        let report = stats.record(timing(20)).expect("a full second elapsed");

        assert!((report.fps - 50.0).abs() < 1e-3);
        assert!((report.fps_10s - 50.0).abs() < 1e-3);
        assert_eq!(report.update, Duration::from_millis(2));
        assert_eq!(report.present, Duration::from_millis(4));
        assert!(stats.record(timing(20)).is_none());
    }

    #[test]
    fn ten_second_rate_forgets_old_buckets() {
        let mut stats = FrameStats::default();

        let slow = (0..3).filter_map(|_| stats.record(timing(1_000))).last();
        assert!((slow.expect("slow seconds reported").fps_10s - 1.0).abs() < 1e-3);

        let mut latest = None;
        for _ in 0..200 {
            latest = stats.record(timing(50)).or(latest);
        }

        let report = latest.expect("reports produced");
        assert!((report.fps - 20.0).abs() < 1e-3);
        assert!((report.fps_10s - 20.0).abs() < 1e-3);
    }

    #[test]
    fn window_scale_never_drops_below_one() {
        let backend = MacroquadBackend::new().with_window_scale(0).with_vsync(true);

        assert_eq!(backend.window_scale, 1);
        assert_eq!(backend.swap_interval, Some(1));
        assert_eq!(backend.with_vsync(false).swap_interval, Some(0));
    }

    #[test]
    fn colors_convert_channel_for_channel() {
        let color = to_macroquad_color(tablequest_rendering::Color::new(0.1, 0.2, 0.3, 0.4));

        assert_eq!((color.r, color.g, color.b, color.a), (0.1, 0.2, 0.3, 0.4));
    }
}
