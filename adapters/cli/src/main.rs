#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that boots Sandy's Table Quest.

mod audio;
mod game;

use std::{fs, path::PathBuf};

use anyhow::{bail, Context, Result};
use clap::Parser;
use tablequest_core::GAME_TITLE;
use tablequest_rendering::{
    Color, Presentation, RenderConfig, Renderer, RenderingBackend, Scene, TextureAtlas,
};
use tablequest_rendering_macroquad::{
    default_manifest_path, load_texture_atlas, MacroquadBackend,
};
use tablequest_system_enemy_ai::{Config as EnemyAiConfig, EnemyAi};
use tablequest_system_player_control::{Config as PlayerControlConfig, PlayerControl};
use tablequest_world::{LevelPack, World};

use crate::{audio::LoggingAudio, game::Game};

/// Command-line arguments accepted by the Table Quest binary.
#[derive(Debug, Parser)]
#[command(name = "table-quest", version, about = "Collect the tables, paint the guards.")]
struct Args {
    /// Level pack describing the campaign.
    #[arg(long, value_name = "TOML", default_value = "assets/levels.toml")]
    levels: PathBuf,

    /// Asset manifest mapping texture and sprite names to images.
    #[arg(long, value_name = "TOML")]
    assets: Option<PathBuf>,

    /// One-based level new games start on.
    #[arg(long, value_name = "N", default_value_t = 1)]
    start_level: usize,

    /// Seed for enemy tiers, projectile colours and patrols.
    #[arg(long, default_value_t = 0x7ab1e)]
    seed: u64,

    /// Synchronise presentation with the display refresh rate.
    #[arg(long = "vsync", overrides_with = "no_vsync")]
    vsync: bool,

    /// Render as fast as possible.
    #[arg(long = "no-vsync", overrides_with = "vsync")]
    no_vsync: bool,

    /// Log frame timing once per second.
    #[arg(long)]
    show_fps: bool,
}

impl Args {
    /// Resolves the vsync flags to the requested swap behaviour, if any.
    fn vsync(&self) -> Option<bool> {
        match (self.vsync, self.no_vsync) {
            (true, _) => Some(true),
            (_, true) => Some(false),
            _ => None,
        }
    }

    /// Converts the one-based level flag to a level index within `pack`.
    fn start_index(&self, pack: &LevelPack) -> Result<usize> {
        if self.start_level == 0 || self.start_level > pack.len() {
            bail!(
                "start level {} is outside the campaign of {} levels",
                self.start_level,
                pack.len()
            );
        }
        Ok(self.start_level - 1)
    }
}

/// Entry point for the Table Quest command-line interface.
fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let source = fs::read_to_string(&args.levels)
        .with_context(|| format!("failed to read level pack at {}", args.levels.display()))?;
    let pack = LevelPack::from_toml_str(&source)
        .with_context(|| format!("invalid level pack at {}", args.levels.display()))?;
    let start_level = args.start_index(&pack)?;
    log::info!("loaded {} levels from {}", pack.len(), args.levels.display());

    let atlas = load_atlas(args.assets.clone())?;

    let render_config = RenderConfig::default();
    let scene = Scene::new(render_config.frame_buffer()?);
    let mut game = Game::new(
        World::new(pack, args.seed),
        PlayerControl::new(PlayerControlConfig::default().with_start_level(start_level)),
        EnemyAi::new(EnemyAiConfig::default().with_rng_seed(args.seed)),
        Renderer::new(render_config),
        atlas,
        LoggingAudio,
    );

    let mut backend = MacroquadBackend::new().with_show_fps(args.show_fps);
    if let Some(vsync) = args.vsync() {
        backend = backend.with_vsync(vsync);
    }

    let presentation = Presentation::new(GAME_TITLE, Color::BLACK, scene);
    backend.run(presentation, move |dt, input, scene| game.frame(dt, &input, scene))
}

/// Loads the texture atlas, falling back to flat colours when the default
/// manifest is absent. An explicitly requested manifest must load.
fn load_atlas(requested: Option<PathBuf>) -> Result<TextureAtlas> {
    match requested {
        Some(path) => load_texture_atlas(&path)
            .with_context(|| format!("failed to load assets from {}", path.display())),
        None => {
            let path = default_manifest_path();
            if path.exists() {
                load_texture_atlas(&path)
            } else {
                log::warn!(
                    "no asset manifest at {}; drawing placeholder colours",
                    path.display()
                );
                Ok(TextureAtlas::new())
            }
        }
    }
}
