//! The simulation: owns every entity and runs one fixed tick at a time.
//!
//! Tick order:
//! 1. clock and bee spawner
//! 2. player (input, movement, firing)
//! 3. every other entity that existed before this tick, in draw order
//! 4. bullet/enemy hits, then player/enemy contact
//! 5. camera follow
//!
//! Entities created during a tick (bullets, muzzle flashes, bees) are first
//! updated on the next one. An entity whose own update expires it is removed
//! on the spot and takes no part in the rest of the tick.

use std::collections::HashMap;

use bramble_core::frame::SharedFrame;
use bramble_core::geometry::Rect;
use bramble_core::input::InputState;
use glam::Vec2;
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::assets::AssetSource;
use crate::audio::{SoundBank, IMPACT, MUSIC, SHOOT};
use crate::camera::Camera2D;
use crate::collision::masks_collide;
use crate::config::GameConfig;
use crate::enemy::Enemy;
use crate::entity::{
    Body, Entity, EntityArena, EntityId, EntityKind, Group, GroupSet, Lifecycle, TickContext,
};
use crate::level::{LevelMap, TilePlacement, DECORATION_LAYER, ENTITIES_LAYER, MAIN_LAYER};
use crate::player::Player;
use crate::projectile::{Bullet, FacingPair, Fire};
use crate::spawner::{roll, BeeSpawn, BeeSpawner};

/// Decoded sprites shared by every entity of a kind.
#[derive(Debug, Clone)]
pub struct Sprites {
    pub player: Vec<SharedFrame>,
    pub bee: Vec<SharedFrame>,
    pub worm: Vec<SharedFrame>,
    pub bullet: FacingPair,
    pub fire: FacingPair,
}

impl Sprites {
    pub fn load(assets: &dyn AssetSource) -> Result<Self, String> {
        Ok(Self {
            player: assets.frames("player")?,
            bee: assets.frames("bee")?,
            worm: assets.frames("worm")?,
            bullet: FacingPair::new(assets.image("bullet")?),
            fire: FacingPair::new(assets.image("fire")?),
        })
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WorldStats {
    pub ticks: u64,
    pub shots: u32,
    pub hits: u32,
    pub bees_spawned: u32,
}

pub struct World {
    config: GameConfig,
    arena: EntityArena,
    player: EntityId,
    /// Collidable rects; tiles never move, so this is built once.
    obstacles: Vec<Rect>,
    sprites: Sprites,
    spawner: BeeSpawner,
    rng: StdRng,
    camera: Camera2D,
    sounds: SoundBank,
    level_size: Vec2,
    level_bounds: Rect,
    elapsed_ms: f64,
    running: bool,
    stats: WorldStats,
}

impl World {
    /// Build the world from a map: `Main` tiles collide, `Decoration` tiles
    /// only draw, and the `Entities` layer places the player and worms.
    pub fn from_level(
        config: GameConfig,
        map: &LevelMap,
        assets: &dyn AssetSource,
        mut sounds: SoundBank,
    ) -> Result<Self, String> {
        let sprites = Sprites::load(assets)?;
        let main = map.tiles(MAIN_LAYER)?;
        let decoration = map.tiles(DECORATION_LAYER)?;
        let objects = map.objects(ENTITIES_LAYER)?;

        let player_count = objects.iter().filter(|o| o.name == "Player").count();
        if player_count != 1 {
            return Err(format!(
                "Level validation failed: '{}' needs exactly one Player object, found {}",
                map.level_id, player_count
            ));
        }

        let mut arena = EntityArena::new();
        let mut images = HashMap::new();
        let tile_size = config.tile_size as f32;
        let collidable = GroupSet::of(&[Group::Collidable]);
        place_tiles(&mut arena, &mut images, assets, main, tile_size, collidable)?;
        place_tiles(&mut arena, &mut images, assets, decoration, tile_size, GroupSet::default())?;
        let obstacles = arena
            .iter_group(Group::Collidable)
            .map(|(_, e)| e.body.rect)
            .collect();

        let (level_w, level_h) = map.pixel_size(config.tile_size);
        let window = config.window_size();
        let level_bounds = Rect::new(
            -window.x,
            -window.y,
            level_w + 2.0 * window.x,
            level_h + 2.0 * window.y,
        );
        let spawner = BeeSpawner::new(config.bee, level_w + window.x, level_h, 0);

        let mut world = Self {
            rng: StdRng::seed_from_u64(config.seed),
            camera: Camera2D::new(window),
            config,
            arena,
            player: EntityId::DANGLING,
            obstacles,
            sprites,
            spawner,
            sounds: SoundBank::new(),
            level_size: Vec2::new(level_w, level_h),
            level_bounds,
            elapsed_ms: 0.0,
            running: true,
            stats: WorldStats::default(),
        };

        for object in objects {
            match object.name.as_str() {
                "Player" => {
                    world.player = world.spawn_player(Vec2::new(object.x, object.y))?;
                }
                "Worm" => {
                    world.spawn_worm(object.rect())?;
                }
                other => log::warn!(
                    "Level '{}': ignoring unknown object '{}' at ({}, {})",
                    map.level_id,
                    other,
                    object.x,
                    object.y
                ),
            }
        }
        world.follow_player();

        log::info!(
            "Level '{}' ready: {} tiles ({} collidable), {} enemies, {}x{} px",
            map.level_id,
            main.len() + decoration.len(),
            world.obstacles.len(),
            world.arena.group(Group::Enemy).len(),
            level_w,
            level_h
        );

        sounds.play_looped(MUSIC);
        world.sounds = sounds;
        Ok(world)
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn arena(&self) -> &EntityArena {
        &self.arena
    }

    pub fn camera(&self) -> &Camera2D {
        &self.camera
    }

    pub fn stats(&self) -> WorldStats {
        self.stats
    }

    pub fn level_size(&self) -> Vec2 {
        self.level_size
    }

    pub fn player(&self) -> Option<(&Body, &Player)> {
        match self.arena.get(self.player) {
            Some(Entity {
                body,
                kind: EntityKind::Player(player),
                ..
            }) => Some((body, player)),
            _ => None,
        }
    }

    pub fn now_ms(&self) -> u64 {
        self.elapsed_ms as u64
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// External quit signal; the next tick is a no-op.
    pub fn quit(&mut self) {
        if self.running {
            log::info!("Quit requested at {} ms", self.now_ms());
        }
        self.running = false;
    }

    fn spawn_player(&mut self, pos: Vec2) -> Result<EntityId, String> {
        let (body, player) = Player::spawn(
            pos,
            self.sprites.player.clone(),
            &self.config.player,
            self.config.animation_speed,
        )?;
        Ok(self.arena.insert(Entity::new(
            body,
            GroupSet::default(),
            EntityKind::Player(player),
        )))
    }

    /// Worm patrolling `bound`, at a random speed from the configured range.
    pub fn spawn_worm(&mut self, bound: Rect) -> Result<EntityId, String> {
        let speed = roll(&mut self.rng, self.config.worm.speed);
        let (body, worm) = Enemy::worm(
            bound,
            self.sprites.worm.clone(),
            self.config.animation_speed,
            speed,
            self.config.enemy_death_ms,
        )?;
        let groups = GroupSet::of(&[Group::Enemy]);
        Ok(self
            .arena
            .insert(Entity::new(body, groups, EntityKind::Enemy(worm))))
    }

    pub fn spawn_bee(&mut self, spawn: BeeSpawn) -> Result<EntityId, String> {
        let (body, bee) = Enemy::bee(
            spawn.pos,
            self.sprites.bee.clone(),
            self.config.animation_speed,
            spawn.speed,
            spawn.amplitude,
            spawn.frequency,
            self.config.enemy_death_ms,
        )?;
        self.stats.bees_spawned += 1;
        let groups = GroupSet::of(&[Group::Enemy]);
        Ok(self
            .arena
            .insert(Entity::new(body, groups, EntityKind::Enemy(bee))))
    }

    /// Advance the simulation by `dt` seconds. Returns whether the session
    /// is still running afterwards.
    pub fn tick(&mut self, dt: f32, input: &InputState) -> bool {
        if !self.running {
            return false;
        }
        self.elapsed_ms += f64::from(dt) * 1000.0;
        self.stats.ticks += 1;
        let now_ms = self.now_ms();

        if let Some(spawn) = self.spawner.update(now_ms, &mut self.rng) {
            if let Err(e) = self.spawn_bee(spawn) {
                log::error!("Bee spawn failed: {e}");
            }
        }

        let pending: Vec<EntityId> = self
            .arena
            .iter_group(Group::All)
            .filter(|(_, e)| {
                matches!(
                    e.kind,
                    EntityKind::Enemy(_) | EntityKind::Bullet(_) | EntityKind::Fire(_)
                )
            })
            .map(|(id, _)| id)
            .collect();

        let ctx = TickContext {
            dt,
            now_ms,
            input,
            obstacles: &self.obstacles,
            level_bounds: self.level_bounds,
        };

        let (shot, player_view) = match self.arena.get_mut(self.player) {
            Some(Entity {
                body,
                kind: EntityKind::Player(player),
                ..
            }) => {
                let shot = player.update(body, &ctx);
                (shot, player.view(body))
            }
            _ => {
                debug_assert!(false, "world has no player");
                return false;
            }
        };

        if let Some(shot) = shot {
            self.sounds.play(SHOOT);
            self.stats.shots += 1;
            let (body, bullet) = Bullet::spawn(
                shot,
                &self.sprites.bullet,
                self.config.bullet.muzzle_offset,
                self.config.bullet.speed,
            );
            self.arena.insert(Entity::new(
                body,
                GroupSet::of(&[Group::Projectile]),
                EntityKind::Bullet(bullet),
            ));
            let (body, fire) = Fire::spawn(
                player_view,
                &self.sprites.fire,
                self.config.fire.duration_ms,
                self.config.fire.y_offset,
                now_ms,
            );
            self.arena
                .insert(Entity::new(body, GroupSet::default(), EntityKind::Fire(fire)));
        }

        for id in pending {
            let Some(entity) = self.arena.get_mut(id) else {
                continue;
            };
            let body = &mut entity.body;
            let lifecycle = match &mut entity.kind {
                EntityKind::Enemy(enemy) => enemy.update(body, &ctx),
                EntityKind::Bullet(bullet) => bullet.update(body, &ctx),
                EntityKind::Fire(fire) => fire.update(body, &ctx, &player_view),
                EntityKind::Tile | EntityKind::Player(_) => Lifecycle::Alive,
            };
            if lifecycle == Lifecycle::Expired {
                self.arena.remove(id);
            }
        }

        self.resolve_bullet_hits(now_ms);
        self.check_player_contact();
        self.follow_player();
        self.running
    }

    fn resolve_bullet_hits(&mut self, now_ms: u64) {
        let bullets: Vec<EntityId> = self.arena.group(Group::Projectile).to_vec();
        for bullet_id in bullets {
            let Some(bullet) = self.arena.get(bullet_id) else {
                continue;
            };
            let hits = self.live_enemies_touching(&bullet.body);
            if hits.is_empty() {
                continue;
            }

            self.sounds.play(IMPACT);
            self.arena.remove(bullet_id);
            for enemy_id in hits {
                if let Some(Entity {
                    body,
                    kind: EntityKind::Enemy(enemy),
                    ..
                }) = self.arena.get_mut(enemy_id)
                {
                    enemy.destroy(body, now_ms);
                    self.stats.hits += 1;
                    log::debug!("Enemy {:?} hit at {} ms", enemy_id, now_ms);
                }
            }
        }
    }

    fn check_player_contact(&mut self) {
        let Some((body, _)) = self.player() else {
            return;
        };
        if !self.live_enemies_touching(body).is_empty() {
            self.running = false;
            log::info!(
                "Player caught at {} ms after {} ticks",
                self.now_ms(),
                self.stats.ticks
            );
        }
    }

    /// Enemies whose mask overlaps `body`. Dying enemies are ignored.
    fn live_enemies_touching(&self, body: &Body) -> Vec<EntityId> {
        self.arena
            .iter_group(Group::Enemy)
            .filter(|(_, e)| e.as_enemy().is_some_and(|enemy| !enemy.is_dying()))
            .filter(|(_, e)| {
                masks_collide(
                    body.rect.top_left(),
                    body.visual(),
                    e.body.rect.top_left(),
                    e.body.visual(),
                )
            })
            .map(|(id, _)| id)
            .collect()
    }

    fn follow_player(&mut self) {
        if let Some((body, _)) = self.player() {
            let center = body.rect.center();
            self.camera.follow(center);
        }
    }
}

fn place_tiles(
    arena: &mut EntityArena,
    images: &mut HashMap<String, SharedFrame>,
    assets: &dyn AssetSource,
    tiles: &[TilePlacement],
    tile_size: f32,
    groups: GroupSet,
) -> Result<(), String> {
    for tile in tiles {
        let visual = match images.get(&tile.image) {
            Some(frame) => frame.clone(),
            None => {
                let frame = assets.image(&tile.image)?;
                images.insert(tile.image.clone(), frame.clone());
                frame
            }
        };
        let pos = Vec2::new(tile.x as f32, tile.y as f32) * tile_size;
        arena.insert(Entity::new(Body::new(pos, visual), groups, EntityKind::Tile));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::MemoryAssets;
    use crate::audio::tests::CountingSound;
    use crate::level::MapObject;
    use bramble_core::input::Key;

    const DT: f32 = 1.0 / 60.0;

    fn quiet_config() -> GameConfig {
        let mut config = GameConfig::default();
        config.bee.spawn_interval_ms = 1_000_000;
        config
    }

    fn object(name: &str, x: f32, y: f32, width: f32, height: f32) -> MapObject {
        MapObject {
            name: name.to_string(),
            x,
            y,
            width,
            height,
        }
    }

    fn tile(x: i32, y: i32) -> TilePlacement {
        TilePlacement {
            x,
            y,
            image: "ground".to_string(),
        }
    }

    fn map(tiles: Vec<TilePlacement>, objects: Vec<MapObject>) -> LevelMap {
        let mut map = LevelMap::new("test", 20, 10);
        map.add_tile_layer(MAIN_LAYER, tiles);
        map.add_tile_layer(DECORATION_LAYER, Vec::new());
        map.add_object_layer(ENTITIES_LAYER, objects);
        map
    }

    fn world(map: &LevelMap) -> World {
        World::from_level(
            quiet_config(),
            map,
            &MemoryAssets::placeholder(64),
            SoundBank::new(),
        )
        .expect("world")
    }

    #[test]
    fn free_fall_accumulates_gravity() {
        let mut world = world(&map(Vec::new(), vec![object("Player", 0.0, 0.0, 0.0, 0.0)]));
        let input = InputState::new();
        for _ in 0..60 {
            assert!(world.tick(DT, &input));
        }
        let (_, player) = world.player().expect("player");
        assert!((player.velocity.y - 50.0).abs() < 1e-3, "{}", player.velocity.y);
        assert!(!player.on_floor);
    }

    #[test]
    fn enemy_contact_ends_the_session_that_tick() {
        let mut world = world(&map(Vec::new(), vec![object("Player", 0.0, 0.0, 0.0, 0.0)]));
        world.spawn_worm(Rect::new(0.0, 0.0, 200.0, 64.0)).expect("worm");

        assert!(!world.tick(DT, &InputState::new()));
        assert!(!world.is_running());
        let ticks = world.stats().ticks;
        assert!(!world.tick(DT, &InputState::new()));
        assert_eq!(world.stats().ticks, ticks);
    }

    #[test]
    fn dying_enemy_does_not_end_the_session() {
        let mut world = world(&map(Vec::new(), vec![object("Player", 0.0, 0.0, 0.0, 0.0)]));
        let worm = world.spawn_worm(Rect::new(0.0, 0.0, 200.0, 64.0)).expect("worm");
        if let Some(Entity {
            body,
            kind: EntityKind::Enemy(enemy),
            ..
        }) = world.arena.get_mut(worm)
        {
            enemy.destroy(body, 0);
        }
        assert!(world.tick(DT, &InputState::new()));
    }

    #[test]
    fn quit_stops_the_world() {
        let mut world = world(&map(Vec::new(), vec![object("Player", 0.0, 0.0, 0.0, 0.0)]));
        world.quit();
        assert!(!world.tick(DT, &InputState::new()));
        assert_eq!(world.stats().ticks, 0);
    }

    #[test]
    fn player_never_ends_up_inside_tiles() {
        let mut tiles: Vec<_> = (0..20).map(|x| tile(x, 9)).collect();
        tiles.extend((4..7).map(|x| tile(x, 6)));
        tiles.extend((2..9).map(|y| tile(10, y)));
        let mut world = world(&map(tiles, vec![object("Player", 64.0, 400.0, 0.0, 0.0)]));

        let right = InputState::with_held(&[Key::Right]);
        let right_jump = InputState::with_held(&[Key::Right, Key::Space]);
        let left_jump = InputState::with_held(&[Key::Left, Key::Space]);
        for tick in 0..400 {
            let input = match tick {
                0..=99 => &right,
                100..=219 if tick % 40 == 0 => &right_jump,
                100..=219 => &right,
                _ => &left_jump,
            };
            assert!(world.tick(DT, input));
            let (body, _) = world.player().expect("player");
            assert!(
                !body.rect.overlaps_any(&world.obstacles),
                "tick {tick}: {:?}",
                body.rect
            );
            // Too tall to jump over, so the walk right ends at the wall.
            if tick == 219 {
                assert_eq!(body.rect.right(), 640.0);
            }
        }
    }

    #[test]
    fn bullet_kills_bee_which_is_removed_after_the_death_delay() {
        let sounds = CountingSound::default();
        let mut bank = SoundBank::new();
        bank.insert(SHOOT, Box::new(sounds.clone()));
        bank.insert(IMPACT, Box::new(sounds.clone()));
        let mut world = World::from_level(
            quiet_config(),
            &map(Vec::new(), vec![object("Player", 0.0, 0.0, 0.0, 0.0)]),
            &MemoryAssets::placeholder(64),
            bank,
        )
        .expect("world");
        let bee = world
            .spawn_bee(BeeSpawn {
                pos: Vec2::new(120.0, 20.0),
                speed: 0.0,
                amplitude: 0.0,
                frequency: 300.0,
            })
            .expect("bee");

        assert!(world.tick(DT, &InputState::with_held(&[Key::S])));
        assert_eq!(world.arena.group(Group::Projectile).len(), 1);

        let idle = InputState::new();
        let mut hit_at = None;
        for tick in 1..20 {
            assert!(world.tick(DT, &idle));
            if world.stats().hits > 0 {
                hit_at = Some(tick);
                break;
            }
        }
        assert!(hit_at.is_some(), "bullet never reached the bee");
        assert!(world.arena.group(Group::Projectile).is_empty());
        let dying = world.arena.get(bee).and_then(Entity::as_enemy).expect("bee");
        assert!(dying.is_dying());
        assert_eq!(sounds.plays.get(), 2);

        let hit_ms = world.now_ms();
        while world.now_ms() < hit_ms + 250 {
            assert!(world.tick(DT, &idle));
        }
        assert!(!world.arena.contains(bee));
        assert_eq!(world.stats().shots, 1);
    }

    #[test]
    fn demo_level_sets_up_tiles_worms_and_music() {
        let music = CountingSound::default();
        let mut bank = SoundBank::new();
        bank.insert(MUSIC, Box::new(music.clone()));
        let level = LevelMap::demo();
        let world = World::from_level(
            quiet_config(),
            &level,
            &MemoryAssets::placeholder(64),
            bank,
        )
        .expect("world");

        let main = level.tiles(MAIN_LAYER).expect("main").len();
        assert_eq!(world.arena().group(Group::Collidable).len(), main);
        assert_eq!(world.obstacles.len(), main);
        assert_eq!(world.arena().group(Group::Enemy).len(), 2);
        assert_eq!(music.loops.get(), 1);
        assert_eq!(world.level_size(), Vec2::new(40.0 * 64.0, 12.0 * 64.0));
    }

    #[test]
    fn camera_centres_the_player() {
        let mut world = world(&map(Vec::new(), vec![object("Player", 300.0, 100.0, 0.0, 0.0)]));
        world.tick(DT, &InputState::new());
        let (body, _) = world.player().expect("player");
        let center = body.rect.center();
        let window = world.config().window_size();
        let screen = world.camera().to_screen(center);
        assert!((screen - window * 0.5).length() < 1e-3, "{screen:?}");
    }

    #[test]
    fn worm_object_smaller_than_its_sprite_is_a_setup_error() {
        let level = map(
            Vec::new(),
            vec![
                object("Player", 0.0, 0.0, 0.0, 0.0),
                object("Worm", 300.0, 200.0, 10.0, 64.0),
            ],
        );
        let err = World::from_level(
            quiet_config(),
            &level,
            &MemoryAssets::placeholder(64),
            SoundBank::new(),
        )
        .err()
        .expect("should fail");
        assert!(err.contains("Worm bound 10x64"), "{err}");
    }

    #[test]
    fn missing_player_object_is_a_setup_error() {
        let level = map(Vec::new(), vec![object("Worm", 0.0, 0.0, 64.0, 64.0)]);
        let err = World::from_level(
            quiet_config(),
            &level,
            &MemoryAssets::placeholder(64),
            SoundBank::new(),
        )
        .err()
        .expect("should fail");
        assert!(err.contains("Player"), "{err}");
    }

    #[test]
    fn missing_layer_and_unknown_image_are_setup_errors() {
        let mut level = LevelMap::new("bare", 4, 4);
        level.add_object_layer(ENTITIES_LAYER, vec![object("Player", 0.0, 0.0, 0.0, 0.0)]);
        let assets = MemoryAssets::placeholder(64);
        assert!(World::from_level(quiet_config(), &level, &assets, SoundBank::new()).is_err());

        let level = map(
            vec![TilePlacement {
                x: 0,
                y: 0,
                image: "lava".to_string(),
            }],
            vec![object("Player", 0.0, 0.0, 0.0, 0.0)],
        );
        let err = World::from_level(quiet_config(), &level, &assets, SoundBank::new())
            .err()
            .expect("should fail");
        assert!(err.contains("lava"), "{err}");
    }
}
