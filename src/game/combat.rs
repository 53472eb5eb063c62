//! # Combat Module
//!
//! Damage, death, experience and leveling.

use crate::{ActorId, DelveError, DelveResult, Entity, Roster};
use log::{debug, info};
use serde::{Deserialize, Serialize};

/// Base attack plus the equipped weapon's bonus.
pub fn effective_attack(entity: &dyn Entity) -> u32 {
    entity.stats().attack + entity.equipped_weapon().map_or(0, |item| item.attack_bonus())
}

/// Base defense plus the equipped armor's bonus.
pub fn effective_defense(entity: &dyn Entity) -> u32 {
    entity.stats().defense + entity.equipped_armor().map_or(0, |item| item.defense_bonus())
}

/// Damage dealt by an attack. Never negative.
///
/// # Examples
///
/// ```
/// use delve::damage;
///
/// assert_eq!(damage(10, 3), 7);
/// assert_eq!(damage(2, 5), 0);
/// ```
pub fn damage(attack: u32, defense: u32) -> u32 {
    attack.saturating_sub(defense)
}

/// What a single attack did.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttackReport {
    pub attacker: ActorId,
    pub defender: ActorId,
    pub damage: u32,
    pub killed: bool,
    /// Experience granted to the player for the kill
    pub experience_awarded: u32,
    /// Player levels reached through that experience
    pub levels_gained: Vec<u32>,
}

/// Resolves one attack between two actors of the roster.
///
/// Kills made by the player award the victim's archetype experience, which
/// may level the player up one or more times.
pub fn resolve_attack(
    roster: &mut Roster,
    attacker: ActorId,
    defender: ActorId,
) -> DelveResult<AttackReport> {
    let attack = roster
        .get(attacker)
        .map(effective_attack)
        .ok_or_else(|| DelveError::InvalidAction(format!("unknown attacker {}", attacker)))?;

    let target = roster
        .get_mut(defender)
        .ok_or_else(|| DelveError::InvalidAction(format!("unknown defender {}", defender)))?;
    if !target.is_alive() {
        return Err(DelveError::InvalidAction(format!(
            "{} is already dead",
            defender
        )));
    }

    let defense = effective_defense(&*target);
    let dealt = target.stats_mut().take_damage(damage(attack, defense));
    let killed = !target.is_alive();
    debug!("{} hits {} for {} damage", attacker, defender, dealt);

    let mut report = AttackReport {
        attacker,
        defender,
        damage: dealt,
        killed,
        experience_awarded: 0,
        levels_gained: Vec::new(),
    };

    if killed && attacker.is_player() {
        if let ActorId::Enemy(index) = defender {
            let experience = roster.enemies[index].archetype.experience_value();
            report.experience_awarded = experience;
            report.levels_gained = roster.player.gain_experience(experience);
            for level in &report.levels_gained {
                info!("Player reached level {}", level);
            }
        }
    }

    Ok(report)
}
