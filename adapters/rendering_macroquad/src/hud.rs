//! Text and overlays drawn on top of the upscaled frame.

use macroquad::{
    color::{Color as MacroquadColor, BLACK, WHITE, YELLOW},
    shapes::draw_rectangle,
    text::{draw_text, measure_text},
};
use tablequest_core::{Screen, SessionStatus, GAME_TITLE};
use tablequest_rendering::{HudPresentation, Scene};

const HUD_FONT_SIZE: f32 = 24.0;
const TITLE_FONT_SIZE: f32 = 56.0;
const PROMPT_FONT_SIZE: f32 = 28.0;

/// Screen-space rectangle occupied by the 3D view.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct Viewport {
    pub(crate) x: f32,
    pub(crate) y: f32,
    pub(crate) width: f32,
    pub(crate) height: f32,
}

impl Viewport {
    /// Largest rectangle with the frame's aspect ratio centred in the window.
    pub(crate) fn fit(
        frame_width: u32,
        frame_height: u32,
        window_width: f32,
        window_height: f32,
    ) -> Self {
        let scale = (window_width / frame_width as f32).min(window_height / frame_height as f32);
        let width = frame_width as f32 * scale;
        let height = frame_height as f32 * scale;
        Self {
            x: (window_width - width) / 2.0,
            y: (window_height - height) / 2.0,
            width,
            height,
        }
    }
}

pub(crate) fn hud_lines(hud: &HudPresentation) -> [String; 2] {
    let tables = if hud.tables_complete() {
        format!("TABLES {}/{} OK", hud.tables, hud.required_tables)
    } else {
        format!("TABLES {}/{}", hud.tables, hud.required_tables)
    };
    [
        format!(
            "LEVEL {}  SCORE {}  HEALTH {}%  AMMO {}",
            hud.level, hud.score, hud.health, hud.ammo
        ),
        format!("{tables}  [{}] {}", hud.weapon_slot, hud.weapon_name),
    ]
}

pub(crate) fn overlay_text(screen: Screen) -> (&'static str, &'static str) {
    match screen {
        Screen::LevelComplete => ("LEVEL COMPLETE", "Riding the elevator up..."),
        Screen::GameOver => ("GAME OVER", "Press ENTER to try again"),
        Screen::Credits => ("THE BOSS IS DEFEATED", "Thanks for playing"),
        Screen::Victory => ("YOU WIN", "Every table is home. Press ENTER"),
        Screen::Paused => ("PAUSED", "Press ESC to resume"),
    }
}

pub(crate) fn draw_scene_chrome(scene: &Scene, viewport: Viewport) {
    if scene.damage_flash > 0.0 {
        draw_rectangle(
            viewport.x,
            viewport.y,
            viewport.width,
            viewport.height,
            MacroquadColor::new(1.0, 0.0, 0.0, scene.damage_flash),
        );
    }

    if scene.door_prompt && scene.status == SessionStatus::Playing {
        draw_centered("OPEN [E]", viewport, viewport.height * 0.6, PROMPT_FONT_SIZE, WHITE);
    }

    if let Some(hud) = &scene.hud {
        draw_hud(hud, viewport);
    }

    match scene.overlay {
        Some(screen) => draw_overlay(screen, viewport),
        None if scene.status == SessionStatus::Menu => draw_menu(viewport),
        None => {}
    }
}

fn draw_hud(hud: &HudPresentation, viewport: Viewport) {
    let band = HUD_FONT_SIZE * 2.4;
    let top = viewport.y + viewport.height - band;
    draw_rectangle(
        viewport.x,
        top,
        viewport.width,
        band,
        MacroquadColor::new(0.0, 0.0, 0.0, 0.6),
    );
    for (index, line) in hud_lines(hud).iter().enumerate() {
        let baseline = top + HUD_FONT_SIZE * (index as f32 + 1.0);
        let color = if index == 1 && hud.tables_complete() {
            YELLOW
        } else {
            WHITE
        };
        draw_text(line, viewport.x + 12.0, baseline, HUD_FONT_SIZE, color);
    }
}

fn draw_overlay(screen: Screen, viewport: Viewport) {
    draw_rectangle(
        viewport.x,
        viewport.y,
        viewport.width,
        viewport.height,
        MacroquadColor::new(0.0, 0.0, 0.0, 0.7),
    );
    let (title, subtitle) = overlay_text(screen);
    draw_centered(title, viewport, viewport.height * 0.45, TITLE_FONT_SIZE, YELLOW);
    draw_centered(subtitle, viewport, viewport.height * 0.6, PROMPT_FONT_SIZE, WHITE);
}

fn draw_menu(viewport: Viewport) {
    draw_rectangle(viewport.x, viewport.y, viewport.width, viewport.height, BLACK);
    draw_centered(GAME_TITLE, viewport, viewport.height * 0.4, TITLE_FONT_SIZE, YELLOW);
    draw_centered(
        "Press ENTER to start",
        viewport,
        viewport.height * 0.6,
        PROMPT_FONT_SIZE,
        WHITE,
    );
}

fn draw_centered(
    text: &str,
    viewport: Viewport,
    offset: f32,
    font_size: f32,
    color: MacroquadColor,
) {
    let size = measure_text(text, None, font_size as u16, 1.0);
    let x = viewport.x + (viewport.width - size.width) / 2.0;
    draw_text(text, x, viewport.y + offset, font_size, color);
}
