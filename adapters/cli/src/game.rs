//! Per-frame wiring of the world, the systems and the software renderer.

use std::time::Duration;

use tablequest_core::{Command, ControlInput, Event, SessionStatus};
use tablequest_rendering::{Color, FrameView, HudPresentation, Renderer, Scene, TextureProvider};
use tablequest_system_enemy_ai::EnemyAi;
use tablequest_system_player_control::PlayerControl;
use tablequest_world::{self as world, query, World};

use crate::audio::{forward_audio, AudioSink};

/// Everything the frame loop owns between frames.
pub(crate) struct Game<P, A> {
    world: World,
    player_control: PlayerControl,
    enemy_ai: EnemyAi,
    renderer: Renderer,
    textures: P,
    audio: A,
    events: Vec<Event>,
    commands: Vec<Command>,
}

impl<P, A> Game<P, A>
where
    P: TextureProvider,
    A: AudioSink,
{
    pub(crate) fn new(
        world: World,
        player_control: PlayerControl,
        enemy_ai: EnemyAi,
        renderer: Renderer,
        textures: P,
        audio: A,
    ) -> Self {
        Self {
            world,
            player_control,
            enemy_ai,
            renderer,
            textures,
            audio,
            events: Vec::new(),
            commands: Vec::new(),
        }
    }

    /// Advances the session by `dt` and refreshes `scene` from the result.
    pub(crate) fn frame(&mut self, dt: Duration, input: &ControlInput, scene: &mut Scene) {
        self.events.clear();
        world::apply(&mut self.world, Command::Tick { dt }, &mut self.events);

        let facing = query::player(&self.world).pose.facing;
        self.player_control.handle(
            query::status(&self.world),
            input,
            facing,
            dt,
            &mut self.commands,
        );
        self.apply_commands();

        let world = &self.world;
        let player = query::player(world).pose.position;
        self.enemy_ai.handle(
            &self.events,
            player,
            &query::enemy_view(world),
            |from, to| query::has_line_of_sight(world, from, to),
            &mut self.commands,
        );
        self.apply_commands();

        forward_audio(&self.events, &mut self.audio);
        scene.observe(&self.events);
        self.present(scene);
    }

    fn apply_commands(&mut self) {
        for command in self.commands.drain(..) {
            world::apply(&mut self.world, command, &mut self.events);
        }
    }

    fn present(&mut self, scene: &mut Scene) {
        let status = query::status(&self.world);
        scene.status = status;
        if status == SessionStatus::Menu {
            scene.frame.fill(Color::BLACK);
            scene.hud = None;
            scene.damage_flash = 0.0;
            scene.door_prompt = false;
            return;
        }

        let player = query::player(&self.world);
        let entities = query::scene_entities(&self.world);
        let view = FrameView {
            tiles: query::tile_view(&self.world),
            pose: player.pose,
            entities: &entities,
            weapon: player.weapon(),
            recoil: player.recoil,
        };
        self.renderer.render(&mut scene.frame, &view, &self.textures);

        scene.hud = Some(HudPresentation::from_player(
            &player,
            query::level_number(&self.world),
        ));
        scene.damage_flash = query::damage_flash(&self.world);
        scene.door_prompt = status == SessionStatus::Playing && query::door_ahead(&self.world);
    }

    #[cfg(test)]
    pub(crate) fn world(&self) -> &World {
        &self.world
    }

    #[cfg(test)]
    pub(crate) fn audio(&self) -> &A {
        &self.audio
    }
}
