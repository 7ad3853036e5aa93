//! Enumerates and scores every action a unit could take.

use tracing::trace;

use tactics_core::{AttackCommand, Command, Position, collect_range, legal_moves_for};

use super::scoring::{attack_score, move_score};
use super::{AiAction, AiContext};

/// Produces scored candidates for a single unit.
///
/// Attacks are listed before moves so that, on equal scores, the planner
/// keeps the attack.
pub struct ActionCandidateGenerator;

impl ActionCandidateGenerator {
    pub fn generate(ctx: &AiContext<'_>) -> Vec<AiAction> {
        let mut candidates = Self::attacks(ctx);
        candidates.extend(Self::moves(ctx));
        candidates
    }

    /// One candidate per opponent that an attack from the current tile can
    /// reach. Exhaustion is ignored so the preview works off-turn.
    pub fn attacks(ctx: &AiContext<'_>) -> Vec<AiAction> {
        let unit = ctx.unit;
        ctx.opponents()
            .filter_map(|opponent| {
                let range = collect_range(ctx.map, unit.position, opponent.position)?;
                let command = AttackCommand::new(unit.id, Some(range), opponent.position)
                    .without_exhaustion_check();
                let plan = command.validate(ctx.state).ok()?;
                let score = attack_score(opponent.health, plan.damage());
                trace!(
                    target: "runtime::ai",
                    unit = %unit.id,
                    target_unit = %opponent.id,
                    damage = plan.damage(),
                    score,
                    "attack candidate"
                );
                Some(AiAction::attack(unit, opponent.position, score))
            })
            .collect()
    }

    /// One candidate per legal move destination.
    pub fn moves(ctx: &AiContext<'_>) -> Vec<AiAction> {
        let unit = ctx.unit;
        let reachable = legal_moves_for(ctx.state, ctx.map, unit);
        let standoff = ctx.config.ai_standoff_distance;

        reachable
            .moves
            .iter()
            .filter_map(|&destination| {
                let nearest = ctx.nearest_opponent_distance(destination)?;
                let score = if Self::path_obstructed(ctx, destination) {
                    f32::NEG_INFINITY
                } else {
                    move_score(ctx.elevation(destination), nearest, standoff)
                };
                Some(AiAction::movement(unit, destination, score))
            })
            .collect()
    }

    /// True when a unit stands on any tile between the mover and
    /// `destination`, or the path cannot be resolved at all.
    fn path_obstructed(ctx: &AiContext<'_>, destination: Position) -> bool {
        let origin = ctx.unit.position;
        let Some(range) = collect_range(ctx.map, origin, destination) else {
            return true;
        };
        range
            .trimmed(origin.step_distance(destination))
            .iter()
            .skip(1)
            .any(|step| ctx.state.occupant(step.position).is_some())
    }
}
