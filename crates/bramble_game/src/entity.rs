//! Entity storage: a generational arena plus per-group handle lists.
//!
//! The arena is the only owner of entity data. Groups (`All`, `Collidable`,
//! `Enemy`, `Projectile`) are ordered vectors of `EntityId`, so an entity can
//! be in several groups without aliasing. `All` doubles as the draw order:
//! entities render in the order they were created.
//!
//! Removal is immediate: a removed id disappears from every group and any
//! stale copy of it fails `get` because the slot generation has moved on.

use bramble_core::frame::SharedFrame;
use bramble_core::geometry::Rect;
use bramble_core::input::InputState;
use glam::Vec2;

use crate::enemy::Enemy;
use crate::player::Player;
use crate::projectile::{Bullet, Fire};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EntityId {
    index: u32,
    generation: u32,
}

impl EntityId {
    /// Never refers to a live entity.
    pub const DANGLING: Self = Self {
        index: u32::MAX,
        generation: u32::MAX,
    };
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Group {
    /// Everything that is drawn.
    All,
    /// Static level geometry the player collides with.
    Collidable,
    Enemy,
    Projectile,
}

impl Group {
    const COUNT: usize = 4;

    fn slot(self) -> usize {
        match self {
            Self::All => 0,
            Self::Collidable => 1,
            Self::Enemy => 2,
            Self::Projectile => 3,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GroupSet(u8);

impl GroupSet {
    pub fn of(groups: &[Group]) -> Self {
        groups.iter().fold(Self::default(), |set, g| set.with(*g))
    }

    pub fn with(self, group: Group) -> Self {
        Self(self.0 | (1 << group.slot()))
    }

    pub fn contains(self, group: Group) -> bool {
        self.0 & (1 << group.slot()) != 0
    }
}

/// Position and current visual. Size always follows the visual.
#[derive(Debug, Clone)]
pub struct Body {
    pub rect: Rect,
    visual: SharedFrame,
}

impl Body {
    pub fn new(top_left: Vec2, visual: SharedFrame) -> Self {
        let rect = Rect::from_pos_size(top_left, visual.size());
        Self { rect, visual }
    }

    pub fn visual(&self) -> &SharedFrame {
        &self.visual
    }

    /// Swap the visual, keeping the top-left anchor.
    pub fn set_visual(&mut self, visual: SharedFrame) {
        self.rect.w = visual.width() as f32;
        self.rect.h = visual.height() as f32;
        self.visual = visual;
    }
}

#[derive(Debug)]
pub enum EntityKind {
    Tile,
    Player(Player),
    Enemy(Enemy),
    Bullet(Bullet),
    Fire(Fire),
}

#[derive(Debug)]
pub struct Entity {
    pub body: Body,
    pub groups: GroupSet,
    pub kind: EntityKind,
}

impl Entity {
    pub fn new(body: Body, groups: GroupSet, kind: EntityKind) -> Self {
        Self {
            body,
            groups: groups.with(Group::All),
            kind,
        }
    }

    pub fn as_enemy(&self) -> Option<&Enemy> {
        match &self.kind {
            EntityKind::Enemy(enemy) => Some(enemy),
            _ => None,
        }
    }
}

/// Read-only inputs shared by every entity update within one tick.
#[derive(Debug, Clone, Copy)]
pub struct TickContext<'a> {
    pub dt: f32,
    pub now_ms: u64,
    pub input: &'a InputState,
    /// Rects of the `Collidable` group, gathered once per tick.
    pub obstacles: &'a [Rect],
    /// Area projectiles may travel through before they are dropped.
    pub level_bounds: Rect,
}

/// Outcome of an entity's own update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifecycle {
    Alive,
    Expired,
}

#[derive(Debug)]
struct Slot {
    generation: u32,
    entity: Option<Entity>,
}

#[derive(Debug, Default)]
pub struct EntityArena {
    slots: Vec<Slot>,
    free: Vec<u32>,
    groups: [Vec<EntityId>; Group::COUNT],
}

impl EntityArena {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, entity: Entity) -> EntityId {
        let groups = entity.groups;
        let id = match self.free.pop() {
            Some(index) => {
                let slot = &mut self.slots[index as usize];
                slot.entity = Some(entity);
                EntityId {
                    index,
                    generation: slot.generation,
                }
            }
            None => {
                self.slots.push(Slot {
                    generation: 0,
                    entity: Some(entity),
                });
                EntityId {
                    index: (self.slots.len() - 1) as u32,
                    generation: 0,
                }
            }
        };

        for group in [Group::All, Group::Collidable, Group::Enemy, Group::Projectile] {
            if groups.contains(group) {
                self.groups[group.slot()].push(id);
            }
        }
        id
    }

    pub fn remove(&mut self, id: EntityId) -> Option<Entity> {
        let slot = self.slots.get_mut(id.index as usize)?;
        if slot.generation != id.generation {
            return None;
        }
        let entity = slot.entity.take()?;
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(id.index);

        for group in [Group::All, Group::Collidable, Group::Enemy, Group::Projectile] {
            if entity.groups.contains(group) {
                self.groups[group.slot()].retain(|other| *other != id);
            }
        }
        Some(entity)
    }

    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        let slot = self.slots.get(id.index as usize)?;
        if slot.generation != id.generation {
            return None;
        }
        slot.entity.as_ref()
    }

    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        let slot = self.slots.get_mut(id.index as usize)?;
        if slot.generation != id.generation {
            return None;
        }
        slot.entity.as_mut()
    }

    #[allow(dead_code)]
    pub fn contains(&self, id: EntityId) -> bool {
        self.get(id).is_some()
    }

    pub fn group(&self, group: Group) -> &[EntityId] {
        &self.groups[group.slot()]
    }

    pub fn iter_group(&self, group: Group) -> impl Iterator<Item = (EntityId, &Entity)> {
        self.group(group)
            .iter()
            .filter_map(move |id| self.get(*id).map(|e| (*id, e)))
    }

    pub fn len(&self) -> usize {
        self.group(Group::All).len()
    }

    #[allow(dead_code)]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
