//! # Item Generation
//!
//! Rolls weapons, armor, and health potions and leaves them on room floors.

use crate::generation::encounters::interior_cell;
use crate::{
    config, DelveError, DelveResult, Enemy, GeneratedLevel, GenerationConfig, Generator, Item,
    WorldItem,
};
use log::debug;
use rand::{rngs::StdRng, Rng};

/// Rolls items and scatters them across rooms.
#[derive(Debug, Clone)]
pub struct ItemGenerator {
    /// Chance that a room gets an item
    pub room_item_chance: f64,
}

impl ItemGenerator {
    pub fn new() -> Self {
        Self {
            room_item_chance: config::ROOM_ITEM_CHANCE,
        }
    }

    /// Leaves at most one item per room on free floor.
    ///
    /// Items never share a cell with the player's start, an enemy, or another
    /// item.
    pub fn scatter(
        &self,
        level: &GeneratedLevel,
        enemies: &[Enemy],
        config: &GenerationConfig,
        rng: &mut StdRng,
    ) -> DelveResult<Vec<WorldItem>> {
        let mut items: Vec<WorldItem> = Vec::new();

        for room in &level.rooms {
            if !rng.gen_bool(self.room_item_chance) {
                continue;
            }

            let pos = interior_cell(room, rng);
            let item = self.generate(config, rng)?;

            let free = level.grid.tile_type_at(pos).is_plain_floor()
                && pos != level.player_start
                && !enemies.iter().any(|enemy| enemy.position == pos)
                && !items.iter().any(|existing| existing.position == pos);
            if free {
                items.push(WorldItem {
                    position: pos,
                    item,
                });
            }
        }

        debug!("Scattered {} items", items.len());
        Ok(items)
    }
}

impl Default for ItemGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl Generator<Item> for ItemGenerator {
    /// Rolls one item: weapon, armor, or potion with equal odds.
    fn generate(&self, _config: &GenerationConfig, rng: &mut StdRng) -> DelveResult<Item> {
        let item = match rng.gen_range(0..3) {
            0 => Item::Weapon {
                attack_bonus: rng.gen_range(config::WEAPON_BONUS_MIN..=config::WEAPON_BONUS_MAX),
            },
            1 => Item::Armor {
                defense_bonus: rng.gen_range(config::ARMOR_BONUS_MIN..=config::ARMOR_BONUS_MAX),
            },
            _ => Item::ConsumableHeal {
                heal_amount: rng.gen_range(config::POTION_HEAL_MIN..=config::POTION_HEAL_MAX),
            },
        };
        Ok(item)
    }

    fn validate(&self, item: &Item, _config: &GenerationConfig) -> DelveResult<()> {
        let in_range = match *item {
            Item::Weapon { attack_bonus } => {
                (config::WEAPON_BONUS_MIN..=config::WEAPON_BONUS_MAX).contains(&attack_bonus)
            }
            Item::Armor { defense_bonus } => {
                (config::ARMOR_BONUS_MIN..=config::ARMOR_BONUS_MAX).contains(&defense_bonus)
            }
            Item::ConsumableHeal { heal_amount } => {
                (config::POTION_HEAL_MIN..=config::POTION_HEAL_MAX).contains(&heal_amount)
            }
        };

        if in_range {
            Ok(())
        } else {
            Err(DelveError::GenerationFailed(format!(
                "{} is outside its roll range",
                item.label()
            )))
        }
    }

    fn generator_type(&self) -> &'static str {
        "ItemGenerator"
    }
}
