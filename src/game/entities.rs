//! # Entities Module
//!
//! The player, enemies, and the items they carry.
//!
//! Both kinds of actor share [`EntityStats`] and the [`Entity`] trait, which is
//! everything the resolver and the combat rules need to treat them uniformly.
//! The [`Roster`] owns every actor of a session and answers occupancy queries.

use crate::{config, ActorId, Position};
use serde::{Deserialize, Serialize};

/// Health and base combat statistics.
///
/// Health always stays within `0..=max_health`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityStats {
    pub health: u32,
    pub max_health: u32,
    pub attack: u32,
    pub defense: u32,
}

impl EntityStats {
    /// Creates stats at full health.
    pub fn new(max_health: u32, attack: u32, defense: u32) -> Self {
        Self {
            health: max_health,
            max_health,
            attack,
            defense,
        }
    }

    /// Subtracts `amount` from health, stopping at 0. Returns the damage applied.
    pub fn take_damage(&mut self, amount: u32) -> u32 {
        let applied = amount.min(self.health);
        self.health -= applied;
        debug_assert!(self.health <= self.max_health);
        applied
    }

    /// Adds `amount` to health, stopping at max. Returns the health restored.
    pub fn heal(&mut self, amount: u32) -> u32 {
        let restored = amount.min(self.max_health - self.health);
        self.health += restored;
        restored
    }

    pub fn is_alive(&self) -> bool {
        self.health > 0
    }
}

/// Common interface of everything that occupies a cell and can fight.
pub trait Entity {
    fn position(&self) -> Position;

    fn set_position(&mut self, position: Position);

    fn stats(&self) -> &EntityStats;

    fn stats_mut(&mut self) -> &mut EntityStats;

    /// Set by water: the next move attempt is skipped.
    fn movement_delayed(&self) -> bool;

    fn set_movement_delayed(&mut self, delayed: bool);

    fn equipped_weapon(&self) -> Option<&Item> {
        None
    }

    fn equipped_armor(&self) -> Option<&Item> {
        None
    }

    fn is_alive(&self) -> bool {
        self.stats().is_alive()
    }
}

/// Equipment and consumables.
///
/// Each variant carries the bonus rolled when the item was spawned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Item {
    Weapon { attack_bonus: u32 },
    Armor { defense_bonus: u32 },
    ConsumableHeal { heal_amount: u32 },
}

impl Item {
    pub fn attack_bonus(&self) -> u32 {
        match self {
            Item::Weapon { attack_bonus } => *attack_bonus,
            _ => 0,
        }
    }

    pub fn defense_bonus(&self) -> u32 {
        match self {
            Item::Armor { defense_bonus } => *defense_bonus,
            _ => 0,
        }
    }

    pub fn heal_amount(&self) -> u32 {
        match self {
            Item::ConsumableHeal { heal_amount } => *heal_amount,
            _ => 0,
        }
    }

    /// Short name for narration.
    pub fn label(&self) -> String {
        match self {
            Item::Weapon { attack_bonus } => format!("weapon (+{} attack)", attack_bonus),
            Item::Armor { defense_bonus } => format!("armor (+{} defense)", defense_bonus),
            Item::ConsumableHeal { heal_amount } => format!("health potion ({} HP)", heal_amount),
        }
    }
}

/// An item lying on the floor, waiting to be picked up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorldItem {
    pub position: Position,
    pub item: Item,
}

/// The player character.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerCharacter {
    pub position: Position,
    pub stats: EntityStats,
    pub weapon: Option<Item>,
    pub armor: Option<Item>,
    pub consumables: Vec<Item>,
    pub experience: u32,
    pub level: u32,
    pub next_level_threshold: u32,
    pub movement_delayed: bool,
}

impl PlayerCharacter {
    /// Creates a level 1 player with default stats.
    ///
    /// # Examples
    ///
    /// ```
    /// use delve::{Entity, PlayerCharacter, Position};
    ///
    /// let player = PlayerCharacter::new(Position::new(5, 5));
    /// assert!(player.is_alive());
    /// assert_eq!(player.level, 1);
    /// assert_eq!(player.next_level_threshold, 100);
    /// ```
    pub fn new(position: Position) -> Self {
        Self {
            position,
            stats: EntityStats::new(
                config::DEFAULT_PLAYER_HEALTH,
                config::PLAYER_BASE_ATTACK,
                config::PLAYER_BASE_DEFENSE,
            ),
            weapon: None,
            armor: None,
            consumables: Vec::new(),
            experience: 0,
            level: 1,
            next_level_threshold: config::FIRST_LEVEL_THRESHOLD,
            movement_delayed: false,
        }
    }

    /// Adds experience and applies every level-up it pays for.
    ///
    /// Each level consumes the current threshold, raises max health, heals
    /// fully and grows the next threshold by half. Returns the levels reached,
    /// in order.
    pub fn gain_experience(&mut self, amount: u32) -> Vec<u32> {
        let mut reached = Vec::new();
        if !self.is_alive() {
            return reached;
        }

        self.experience += amount;
        while self.experience >= self.next_level_threshold {
            self.experience -= self.next_level_threshold;
            self.level += 1;
            self.stats.max_health += config::LEVEL_UP_HEALTH_BONUS;
            self.stats.health = self.stats.max_health;
            self.next_level_threshold =
                (self.next_level_threshold as f64 * config::LEVEL_THRESHOLD_GROWTH) as u32;
            reached.push(self.level);
        }
        reached
    }

    /// Takes an item into the right slot.
    ///
    /// Weapons and armor replace what is equipped; the replaced item is
    /// returned and discarded by the caller. Potions go to the inventory.
    pub fn pick_up(&mut self, item: Item) -> Option<Item> {
        match item {
            Item::Weapon { .. } => self.weapon.replace(item),
            Item::Armor { .. } => self.armor.replace(item),
            Item::ConsumableHeal { .. } => {
                self.consumables.push(item);
                None
            }
        }
    }

    /// Number of health potions carried.
    pub fn potion_count(&self) -> usize {
        self.consumables
            .iter()
            .filter(|item| matches!(item, Item::ConsumableHeal { .. }))
            .count()
    }

    /// Drinks the first potion if it would do anything.
    ///
    /// Returns the health restored, or None when no potion was used.
    pub fn use_health_potion(&mut self) -> Option<u32> {
        if self.stats.health >= self.stats.max_health {
            return None;
        }
        let index = self
            .consumables
            .iter()
            .position(|item| matches!(item, Item::ConsumableHeal { .. }))?;
        let potion = self.consumables.remove(index);
        Some(self.stats.heal(potion.heal_amount()))
    }
}

impl Entity for PlayerCharacter {
    fn position(&self) -> Position {
        self.position
    }

    fn set_position(&mut self, position: Position) {
        self.position = position;
    }

    fn stats(&self) -> &EntityStats {
        &self.stats
    }

    fn stats_mut(&mut self) -> &mut EntityStats {
        &mut self.stats
    }

    fn movement_delayed(&self) -> bool {
        self.movement_delayed
    }

    fn set_movement_delayed(&mut self, delayed: bool) {
        self.movement_delayed = delayed;
    }

    fn equipped_weapon(&self) -> Option<&Item> {
        self.weapon.as_ref()
    }

    fn equipped_armor(&self) -> Option<&Item> {
        self.armor.as_ref()
    }
}

/// Enemy behavior classes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Archetype {
    /// Melee chaser
    Grunt,
    /// Distance-keeping skirmisher that never attacks
    Scout,
}

/// Detection and standoff parameters of an archetype.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BehaviorProfile {
    pub detection_radius: f64,
    pub preferred_distance: Option<f64>,
}

impl Archetype {
    pub fn base_stats(self) -> EntityStats {
        match self {
            Archetype::Grunt => EntityStats::new(
                config::GRUNT_HEALTH,
                config::GRUNT_ATTACK,
                config::GRUNT_DEFENSE,
            ),
            Archetype::Scout => EntityStats::new(
                config::SCOUT_HEALTH,
                config::SCOUT_ATTACK,
                config::SCOUT_DEFENSE,
            ),
        }
    }

    /// Experience awarded to the player for a kill.
    pub fn experience_value(self) -> u32 {
        match self {
            Archetype::Grunt => config::GRUNT_EXPERIENCE,
            Archetype::Scout => config::SCOUT_EXPERIENCE,
        }
    }

    pub fn profile(self) -> BehaviorProfile {
        match self {
            Archetype::Grunt => BehaviorProfile {
                detection_radius: config::GRUNT_DETECTION_RADIUS,
                preferred_distance: None,
            },
            Archetype::Scout => BehaviorProfile {
                detection_radius: config::SCOUT_DETECTION_RADIUS,
                preferred_distance: Some(config::SCOUT_PREFERRED_DISTANCE),
            },
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Archetype::Grunt => "grunt",
            Archetype::Scout => "scout",
        }
    }
}

/// A hostile actor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Enemy {
    pub position: Position,
    pub stats: EntityStats,
    pub archetype: Archetype,
    pub profile: BehaviorProfile,
    pub movement_delayed: bool,
}

impl Enemy {
    pub fn new(archetype: Archetype, position: Position) -> Self {
        Self {
            position,
            stats: archetype.base_stats(),
            archetype,
            profile: archetype.profile(),
            movement_delayed: false,
        }
    }

    pub fn grunt(position: Position) -> Self {
        Self::new(Archetype::Grunt, position)
    }

    pub fn scout(position: Position) -> Self {
        Self::new(Archetype::Scout, position)
    }
}

impl Entity for Enemy {
    fn position(&self) -> Position {
        self.position
    }

    fn set_position(&mut self, position: Position) {
        self.position = position;
    }

    fn stats(&self) -> &EntityStats {
        &self.stats
    }

    fn stats_mut(&mut self) -> &mut EntityStats {
        &mut self.stats
    }

    fn movement_delayed(&self) -> bool {
        self.movement_delayed
    }

    fn set_movement_delayed(&mut self, delayed: bool) {
        self.movement_delayed = delayed;
    }
}

/// Every actor of a session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Roster {
    pub player: PlayerCharacter,
    pub enemies: Vec<Enemy>,
}

impl Roster {
    pub fn new(player: PlayerCharacter, enemies: Vec<Enemy>) -> Self {
        Self { player, enemies }
    }

    pub fn get(&self, id: ActorId) -> Option<&dyn Entity> {
        match id {
            ActorId::Player => Some(&self.player as &dyn Entity),
            ActorId::Enemy(index) => self.enemies.get(index).map(|enemy| enemy as &dyn Entity),
        }
    }

    pub fn get_mut(&mut self, id: ActorId) -> Option<&mut dyn Entity> {
        match id {
            ActorId::Player => Some(&mut self.player as &mut dyn Entity),
            ActorId::Enemy(index) => self
                .enemies
                .get_mut(index)
                .map(|enemy| enemy as &mut dyn Entity),
        }
    }

    /// Finds the living actor standing on `position`, ignoring `except`.
    ///
    /// Dead actors never occupy a cell.
    pub fn living_occupant_at(&self, position: Position, except: ActorId) -> Option<ActorId> {
        if except != ActorId::Player
            && self.player.is_alive()
            && self.player.position == position
        {
            return Some(ActorId::Player);
        }
        self.enemies
            .iter()
            .enumerate()
            .find(|(index, enemy)| {
                ActorId::Enemy(*index) != except && enemy.is_alive() && enemy.position == position
            })
            .map(|(index, _)| ActorId::Enemy(index))
    }

    /// Ids of living enemies, in update order.
    pub fn living_enemy_ids(&self) -> Vec<ActorId> {
        self.enemies
            .iter()
            .enumerate()
            .filter(|(_, enemy)| enemy.is_alive())
            .map(|(index, _)| ActorId::Enemy(index))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_health_is_clamped() {
        let mut stats = EntityStats::new(20, 5, 0);
        assert_eq!(stats.take_damage(7), 7);
        assert_eq!(stats.health, 13);
        assert_eq!(stats.take_damage(50), 13);
        assert_eq!(stats.health, 0);
        assert!(!stats.is_alive());

        let mut stats = EntityStats::new(20, 5, 0);
        stats.take_damage(5);
        assert_eq!(stats.heal(100), 5);
        assert_eq!(stats.health, 20);
    }

    #[test]
    fn test_multi_level_experience_grant() {
        let mut player = PlayerCharacter::new(Position::new(1, 1));
        let reached = player.gain_experience(250);

        assert_eq!(reached, vec![2, 3]);
        assert_eq!(player.level, 3);
        assert_eq!(player.experience, 0);
        assert_eq!(player.next_level_threshold, 225);
        assert_eq!(player.stats.max_health, 140);
        assert_eq!(player.stats.health, 140);
    }

    #[test]
    fn test_experience_below_threshold_accumulates() {
        let mut player = PlayerCharacter::new(Position::new(1, 1));
        assert!(player.gain_experience(60).is_empty());
        assert_eq!(player.experience, 60);
        assert_eq!(player.gain_experience(40), vec![2]);
        assert_eq!(player.experience, 0);
        assert_eq!(player.next_level_threshold, 150);
    }

    #[test]
    fn test_pick_up_replaces_equipment() {
        let mut player = PlayerCharacter::new(Position::new(1, 1));
        assert_eq!(player.pick_up(Item::Weapon { attack_bonus: 2 }), None);
        assert_eq!(
            player.pick_up(Item::Weapon { attack_bonus: 4 }),
            Some(Item::Weapon { attack_bonus: 2 })
        );
        assert_eq!(player.weapon, Some(Item::Weapon { attack_bonus: 4 }));

        player.pick_up(Item::Armor { defense_bonus: 3 });
        player.pick_up(Item::ConsumableHeal { heal_amount: 30 });
        assert_eq!(player.armor, Some(Item::Armor { defense_bonus: 3 }));
        assert_eq!(player.potion_count(), 1);
    }

    #[test]
    fn test_health_potion_use() {
        let mut player = PlayerCharacter::new(Position::new(1, 1));
        player.pick_up(Item::ConsumableHeal { heal_amount: 30 });

        // Full health keeps the potion
        assert_eq!(player.use_health_potion(), None);
        assert_eq!(player.potion_count(), 1);

        player.stats.take_damage(10);
        assert_eq!(player.use_health_potion(), Some(10));
        assert_eq!(player.stats.health, player.stats.max_health);
        assert_eq!(player.potion_count(), 0);

        player.stats.take_damage(10);
        assert_eq!(player.use_health_potion(), None);
    }

    #[test]
    fn test_archetype_stats() {
        let grunt = Enemy::grunt(Position::new(0, 0));
        assert_eq!(grunt.stats.health, 20);
        assert_eq!(grunt.archetype.experience_value(), 10);
        assert_eq!(grunt.profile.preferred_distance, None);

        let scout = Enemy::scout(Position::new(0, 0));
        assert_eq!(scout.stats.health, 15);
        assert_eq!(scout.archetype.experience_value(), 15);
        assert_eq!(scout.profile.detection_radius, 10.0);
    }

    #[test]
    fn test_occupancy_ignores_dead_and_self() {
        let player = PlayerCharacter::new(Position::new(1, 1));
        let mut dead = Enemy::grunt(Position::new(2, 1));
        dead.stats.take_damage(100);
        let alive = Enemy::scout(Position::new(3, 1));
        let roster = Roster::new(player, vec![dead, alive]);

        assert_eq!(roster.living_occupant_at(Position::new(2, 1), ActorId::Player), None);
        assert_eq!(
            roster.living_occupant_at(Position::new(3, 1), ActorId::Player),
            Some(ActorId::Enemy(1))
        );
        assert_eq!(
            roster.living_occupant_at(Position::new(3, 1), ActorId::Enemy(1)),
            None
        );
        assert_eq!(
            roster.living_occupant_at(Position::new(1, 1), ActorId::Enemy(1)),
            Some(ActorId::Player)
        );
        assert_eq!(roster.living_enemy_ids(), vec![ActorId::Enemy(1)]);
    }
}
