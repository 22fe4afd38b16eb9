use std::collections::VecDeque;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use thiserror::Error;
use tracing::{debug, info};

use crate::app::{
    Color, DrawSurface, InputSnapshot, TextAlign, World, WorldCommand, WorldContext,
    CANVAS_SIZE,
};
use crate::app::{InputAction, Key};
use crate::geometry::{Rect, Vector};

use super::combatant::{
    BattleStats, BattleView, Combatant, CombatantId, CombatantSummary, CombatantTraits, Side,
    TurnAction, TurnProgress,
};

pub const ROSTER_MIN: usize = 1;
pub const ROSTER_MAX: usize = 5;

/// Upper bound on turns resolved in a single simulation step. All-automatic
/// battles still finish within a handful of steps, and a misbehaving
/// combatant loop cannot stall the frame.
const MAX_TURNS_PER_STEP: usize = 32;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BattleOutcome {
    /// Every enemy was eliminated.
    Victory,
    /// Every non-enemy was eliminated.
    Defeat,
}

#[derive(Debug, Error)]
pub enum BattleError {
    #[error(
        "battle roster for {side:?} side has {count} combatants; \
         must be between {ROSTER_MIN} and {ROSTER_MAX}"
    )]
    RosterSize { side: Side, count: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BattlePhase {
    Running,
    Finished(BattleOutcome),
}

struct BattleSlot {
    id: CombatantId,
    side: Side,
    combatant: Box<dyn Combatant>,
    stats: BattleStats,
}

impl BattleSlot {
    fn is_alive(&self) -> bool {
        self.combatant.traits().hp > 0
    }
}

type SuccessorFactory = Box<dyn FnOnce(BattleOutcome) -> Box<dyn World>>;

/// Turn-based battle between two rosters.
///
/// Turns run one at a time from a per-round queue ordered by descending
/// speed, ties broken randomly. Only the combatant at the head of the queue
/// is polled; while it reports a pending turn nothing else in the battle
/// advances. The queue is rebuilt from current traits at every round start,
/// so speed changes take effect on the next round.
pub struct BattleWorld {
    slots: Vec<BattleSlot>,
    up_next: VecDeque<CombatantId>,
    round: u32,
    phase: BattlePhase,
    rng: StdRng,
    on_finish: Option<SuccessorFactory>,
}

impl std::fmt::Debug for BattleWorld {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BattleWorld")
            .field("round", &self.round)
            .field("phase", &self.phase)
            .finish_non_exhaustive()
    }
}

impl BattleWorld {
    pub fn new(
        left: Vec<Box<dyn Combatant>>,
        right: Vec<Box<dyn Combatant>>,
    ) -> Result<Self, BattleError> {
        Self::with_rng(left, right, StdRng::from_entropy())
    }

    /// Like [`new`](Self::new) but with a caller-supplied RNG, which makes
    /// tie-breaking reproducible.
    pub fn with_rng(
        left: Vec<Box<dyn Combatant>>,
        right: Vec<Box<dyn Combatant>>,
        rng: StdRng,
    ) -> Result<Self, BattleError> {
        validate_roster(Side::Left, left.len())?;
        validate_roster(Side::Right, right.len())?;

        let mut slots = Vec::with_capacity(left.len() + right.len());
        let mut next_id = 0u32;
        for (side, roster) in [(Side::Left, left), (Side::Right, right)] {
            for combatant in roster {
                slots.push(BattleSlot {
                    id: CombatantId(next_id),
                    side,
                    combatant,
                    stats: BattleStats::default(),
                });
                next_id += 1;
            }
        }

        Ok(Self {
            slots,
            up_next: VecDeque::new(),
            round: 0,
            phase: BattlePhase::Running,
            rng,
            on_finish: None,
        })
    }

    /// Installs the world to transition into once the battle finishes.
    pub fn on_finish(
        mut self,
        factory: impl FnOnce(BattleOutcome) -> Box<dyn World> + 'static,
    ) -> Self {
        self.on_finish = Some(Box::new(factory));
        self
    }

    pub fn round(&self) -> u32 {
        self.round
    }

    pub fn outcome(&self) -> Option<BattleOutcome> {
        match self.phase {
            BattlePhase::Running => None,
            BattlePhase::Finished(outcome) => Some(outcome),
        }
    }

    pub fn turn_queue(&self) -> Vec<CombatantId> {
        self.up_next.iter().copied().collect()
    }

    pub fn stats(&self, id: CombatantId) -> Option<&BattleStats> {
        self.slot(id).map(|slot| &slot.stats)
    }

    pub fn hp(&self, id: CombatantId) -> Option<i32> {
        self.slot(id).map(|slot| slot.combatant.traits().hp)
    }

    pub fn traits_mut(&mut self, id: CombatantId) -> Option<&mut CombatantTraits> {
        self.slots
            .iter_mut()
            .find(|slot| slot.id == id)
            .map(|slot| slot.combatant.traits_mut())
    }

    fn slot(&self, id: CombatantId) -> Option<&BattleSlot> {
        self.slots.iter().find(|slot| slot.id == id)
    }

    /// Rebuilds the turn queue for a new round: living combatants shuffled,
    /// then stably sorted by descending speed. The shuffle only decides order
    /// among equal speeds.
    fn start_round(&mut self) {
        let mut order: Vec<(CombatantId, i32)> = self
            .slots
            .iter()
            .filter(|slot| slot.is_alive())
            .map(|slot| (slot.id, slot.combatant.traits().speed))
            .collect();
        order.shuffle(&mut self.rng);
        order.sort_by(|a, b| b.1.cmp(&a.1));

        self.up_next = order.into_iter().map(|(id, _)| id).collect();
        self.round += 1;
        info!(
            round = self.round,
            combatants = self.up_next.len(),
            "battle_round_started"
        );
    }

    fn check_end(&self) -> Option<BattleOutcome> {
        let living_enemies = self
            .slots
            .iter()
            .any(|slot| slot.is_alive() && slot.combatant.is_enemy());
        if !living_enemies {
            return Some(BattleOutcome::Victory);
        }
        let living_allies = self
            .slots
            .iter()
            .any(|slot| slot.is_alive() && !slot.combatant.is_enemy());
        if !living_allies {
            return Some(BattleOutcome::Defeat);
        }
        None
    }

    fn finish(&mut self, outcome: BattleOutcome) {
        self.phase = BattlePhase::Finished(outcome);
        info!(outcome = ?outcome, round = self.round, "battle_finished");
    }

    fn living_view(&self) -> BattleView {
        let living: Vec<CombatantSummary> = self
            .slots
            .iter()
            .filter(|slot| slot.is_alive())
            .map(|slot| CombatantSummary {
                id: slot.id,
                side: slot.side,
                is_enemy: slot.combatant.is_enemy(),
                speed: slot.combatant.traits().speed,
                hp: slot.combatant.traits().hp,
            })
            .collect();
        BattleView::new(living)
    }

    fn apply_action(&mut self, actor: CombatantId, action: TurnAction) {
        match action {
            TurnAction::Pass => {
                debug!(actor = actor.0, "turn_passed");
            }
            TurnAction::Attack { target, damage } => {
                let damage = damage.max(0);
                let Some(slot) = self.slots.iter_mut().find(|slot| slot.id == target) else {
                    debug!(actor = actor.0, target = target.0, "attack_unknown_target");
                    return;
                };
                if !slot.is_alive() {
                    debug!(actor = actor.0, target = target.0, "attack_dead_target");
                    return;
                }

                let traits = slot.combatant.traits_mut();
                traits.hp = traits.hp.saturating_sub(damage).max(0);
                let killed = traits.hp == 0;
                slot.stats.damage_taken = slot.stats.damage_taken.saturating_add(damage as u32);
                let target_name = slot.combatant.name().to_string();

                if let Some(actor_slot) = self.slots.iter_mut().find(|slot| slot.id == actor) {
                    actor_slot.stats.damage_dealt =
                        actor_slot.stats.damage_dealt.saturating_add(damage as u32);
                    if killed {
                        actor_slot.stats.kills = actor_slot.stats.kills.saturating_add(1);
                        info!(
                            actor = actor_slot.combatant.name(),
                            target = target_name.as_str(),
                            "combatant_eliminated"
                        );
                    }
                }
            }
        }
    }

    /// Drives the turn queue as far as it will go this step. Stops when the
    /// head turn is pending, the battle ends, any combatant comes up for a
    /// second poll (one input edge must not feed two turns), or the per-step
    /// turn cap is reached.
    fn resolve_turns(&mut self, input: &InputSnapshot) {
        let mut polled: Vec<CombatantId> = Vec::new();
        for _ in 0..MAX_TURNS_PER_STEP {
            if matches!(self.phase, BattlePhase::Finished(_)) {
                return;
            }
            if let Some(outcome) = self.check_end() {
                self.finish(outcome);
                return;
            }
            if self.up_next.is_empty() {
                self.start_round();
            }

            let Some(&head) = self.up_next.front() else {
                return;
            };
            let head_alive = self.slot(head).is_some_and(BattleSlot::is_alive);
            if !head_alive {
                // Died earlier this round; forfeit the queued turn.
                self.up_next.pop_front();
                continue;
            }

            if polled.contains(&head) {
                return;
            }
            polled.push(head);

            let view = self.living_view();
            let Some(slot) = self.slots.iter_mut().find(|slot| slot.id == head) else {
                self.up_next.pop_front();
                continue;
            };
            match slot.combatant.take_turn(&view, input) {
                TurnProgress::Pending => return,
                TurnProgress::Complete(action) => {
                    self.up_next.pop_front();
                    self.apply_action(head, action);
                }
            }
        }
    }

    fn platform_rect(side: Side, index: usize) -> Rect {
        const PLATFORM_WIDTH: f32 = 160.0;
        const PLATFORM_HEIGHT: f32 = 60.0;
        const FIRST_Y: f32 = 140.0;
        const SPACING_Y: f32 = 165.0;

        let x = match side {
            Side::Left => 120.0,
            Side::Right => CANVAS_SIZE - 120.0 - PLATFORM_WIDTH,
        };
        Rect::new(
            Vector::new(x, FIRST_Y + index as f32 * SPACING_Y),
            PLATFORM_WIDTH,
            PLATFORM_HEIGHT,
        )
    }
}

impl World for BattleWorld {
    fn label(&self) -> &str {
        "battle"
    }

    fn enter(&mut self, ctx: &mut WorldContext<'_>) {
        ctx.input.save();
        ctx.input.clear_bindings();
        ctx.input.bind(Key::Enter, InputAction::Confirm);
        ctx.input.bind(Key::Space, InputAction::Confirm);
        ctx.input.bind(Key::Up, InputAction::MoveUp);
        ctx.input.bind(Key::Down, InputAction::MoveDown);
        self.start_round();
        info!(combatants = self.slots.len(), "battle_entered");
    }

    fn exit(&mut self, ctx: &mut WorldContext<'_>) {
        ctx.input.restore();
    }

    fn step(&mut self, ctx: &mut WorldContext<'_>, _step_count: u64) -> WorldCommand {
        let snapshot = ctx.input.snapshot();
        self.resolve_turns(&snapshot);

        if let BattlePhase::Finished(outcome) = self.phase {
            if let Some(factory) = self.on_finish.take() {
                return WorldCommand::Transition(factory(outcome));
            }
        }
        WorldCommand::None
    }

    fn draw(&mut self, surface: &mut DrawSurface) {
        let mut left_index = 0;
        let mut right_index = 0;
        for slot in &mut self.slots {
            let index = match slot.side {
                Side::Left => {
                    left_index += 1;
                    left_index - 1
                }
                Side::Right => {
                    right_index += 1;
                    right_index - 1
                }
            };
            let platform = Self::platform_rect(slot.side, index);
            surface.fill_rect(platform, Color::GRAY);
            if slot.is_alive() {
                slot.combatant.draw(surface, platform);
                let hp = slot.combatant.traits().hp;
                let hp_text = if hp == i32::MAX {
                    "hp -".to_string()
                } else {
                    format!("hp {hp}")
                };
                surface.text(
                    hp_text,
                    platform.top_left + Vector::new(0.0, -10.0),
                    18.0,
                    Color::WHITE,
                    TextAlign::Left,
                );
            }
        }

        if let BattlePhase::Finished(outcome) = self.phase {
            let banner = match outcome {
                BattleOutcome::Victory => "Victory",
                BattleOutcome::Defeat => "Defeat",
            };
            surface.text(
                banner,
                Vector::new(CANVAS_SIZE / 2.0, CANVAS_SIZE / 2.0),
                64.0,
                Color::WHITE,
                TextAlign::Center,
            );
        }
    }
}

fn validate_roster(side: Side, count: usize) -> Result<(), BattleError> {
    if !(ROSTER_MIN..=ROSTER_MAX).contains(&count) {
        return Err(BattleError::RosterSize { side, count });
    }
    Ok(())
}
