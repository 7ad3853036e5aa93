//! Battle session: the turn state machine for one battle.
//!
//! [`BattleSession`] owns the battle state and the terrain, routes manual
//! commands through the undo history, drives planner turns through
//! [`PlannerTurn`], and publishes everything that happens on the
//! [`EventBus`].

mod planner_turn;

pub use planner_turn::{AiActionOutcome, AiResolution, PlannerTurn};

use tracing::{debug, error, info, warn};

use tactics_core::{
    BattleCommand, BattleEngine, BattleEnv, BattlePhase, BattleState, Command, CommandError,
    CommandHistory, CommandKind, CommandOutcome, GridMap, Position, Reachable, Side, Strike,
    TurnError, UnitId, legal_moves_for,
};

use crate::api::{Intent, IntentProvider, Result, RuntimeError};
use crate::config::RuntimeConfig;
use crate::events::{AiEvent, BattleEvent, EventBus, TurnEvent};
use crate::providers::{AiAction, TacticalPlanner};

pub struct BattleSession {
    state: BattleState,
    map: GridMap,
    config: RuntimeConfig,
    bus: EventBus,
    history: CommandHistory,
    planner: TacticalPlanner,
    preview: Vec<AiAction>,
}

impl BattleSession {
    pub fn new(state: BattleState, map: GridMap, config: RuntimeConfig) -> Self {
        let bus = EventBus::with_capacity(config.event_buffer_size);
        let planner = TacticalPlanner::new(config.battle.clone());
        Self {
            state,
            map,
            config,
            bus,
            history: CommandHistory::new(),
            planner,
            preview: Vec::new(),
        }
    }

    pub fn state(&self) -> &BattleState {
        &self.state
    }

    pub fn map(&self) -> &GridMap {
        &self.map
    }

    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    pub fn bus(&self) -> &EventBus {
        &self.bus
    }

    pub fn planner(&self) -> &TacticalPlanner {
        &self.planner
    }

    /// Planner actions announced for the planner side's next turn.
    pub fn preview(&self) -> &[AiAction] {
        &self.preview
    }

    pub fn phase(&self) -> BattlePhase {
        BattlePhase::of(&self.state)
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    /// Announces the opening turn. Call once subscribers are attached.
    pub fn start(&mut self) {
        if let Some(loser) = self.state.defeated_side() {
            self.bus.publish(BattleEvent::BattleEnded { loser });
            return;
        }
        let side = self.state.turn.active_side;
        info!(target: "runtime::session", side = %side, "battle started");
        self.announce_turn(side);
    }

    /// Legal moves and attack targets of `unit` from where it stands.
    pub fn legal_moves_for(&self, unit: UnitId) -> Result<Reachable> {
        let state = self
            .state
            .unit(unit)
            .ok_or(TurnError::UnitNotFound { unit })?;
        Ok(legal_moves_for(&self.state, &self.map, state))
    }

    /// Builds a command from the unit's current tile toward `destination`.
    pub fn build_command(
        &mut self,
        kind: CommandKind,
        unit: UnitId,
        destination: Position,
    ) -> Result<BattleCommand> {
        let env = BattleEnv::from_map(&self.map, &self.config.battle);
        let engine = BattleEngine::new(&mut self.state);
        Ok(engine.build_command(&env, kind, unit, destination)?)
    }

    /// Executes a manual command. Moves are recorded for undo; attacks are not.
    pub fn submit(&mut self, command: BattleCommand) -> Result<CommandOutcome> {
        self.ensure_manual_turn()?;
        BattleEngine::new(&mut self.state).ensure_can_act(command.actor())?;

        let record = command.kind() == CommandKind::Move;
        let outcome = self.apply(command, record)?;
        self.finish_manual_action();
        Ok(outcome)
    }

    /// Builds and submits in one step.
    pub fn command(
        &mut self,
        kind: CommandKind,
        unit: UnitId,
        destination: Position,
    ) -> Result<CommandOutcome> {
        let command = self.build_command(kind, unit, destination)?;
        self.submit(command)
    }

    /// Ends a manual unit's turn without acting.
    pub fn skip_unit(&mut self, unit: UnitId) -> Result<()> {
        self.ensure_manual_turn()?;
        BattleEngine::new(&mut self.state).skip_unit(unit)?;
        self.bus.publish(TurnEvent::UnitSkipped { unit });
        self.bus.publish(BattleEvent::UnitExhausted { unit });
        self.finish_manual_action();
        Ok(())
    }

    /// Reverts the last recorded move. The unit stays exhausted.
    pub fn undo(&mut self) -> Result<Option<CommandKind>> {
        let kind = self.history.undo(&mut self.state)?;
        if let Some(kind) = kind {
            self.bus.publish(TurnEvent::CommandUndone { kind });
        }
        Ok(kind)
    }

    /// Re-executes the last undone move, which normally fails because the
    /// unit is still exhausted.
    pub fn redo(&mut self) -> Result<Option<CommandKind>> {
        self.ensure_manual_turn()?;
        Ok(self.history.redo(&mut self.state)?)
    }

    /// Applies one intent from a provider or front-end.
    pub fn apply_intent(&mut self, intent: Intent) -> Result<Option<CommandOutcome>> {
        match intent {
            Intent::Command {
                kind,
                unit,
                destination,
            } => self.command(kind, unit, destination).map(Some),
            Intent::Skip { unit } => self.skip_unit(unit).map(|()| None),
            Intent::Undo => self.undo().map(|_| None),
        }
    }

    /// Pulls intents from `provider` until the manual turn ends, the battle
    /// ends, or the provider yields `None`.
    ///
    /// A rejected intent forfeits the unit's action so the turn always
    /// makes progress.
    pub async fn run_manual_turn(
        &mut self,
        provider: &dyn IntentProvider,
    ) -> Result<Vec<CommandOutcome>> {
        let side = self.ensure_manual_turn()?;
        let mut outcomes = Vec::new();

        while self.state.turn.active_side == side && self.state.defeated_side().is_none() {
            let Some(intent) = provider.next_intent(side, &self.state, &self.map).await? else {
                break;
            };

            match self.apply_intent(intent) {
                Ok(Some(outcome)) => outcomes.push(outcome),
                Ok(None) => {}
                Err(err) => {
                    if err.severity().is_internal() {
                        error!(
                            target: "runtime::session",
                            code = err.error_code(),
                            error = %err,
                            ?intent,
                            "intent hit an inconsistent state"
                        );
                    } else {
                        warn!(
                            target: "runtime::session",
                            code = err.error_code(),
                            error = %err,
                            ?intent,
                            "intent rejected"
                        );
                    }
                    let forfeit = intent.unit().filter(|unit| {
                        self.state
                            .unit(*unit)
                            .is_some_and(|state| state.side == side && !state.exhausted)
                    });
                    if let Some(unit) = forfeit {
                        self.skip_unit(unit)?;
                    }
                }
            }
        }

        Ok(outcomes)
    }

    /// Starts the planner side's turn.
    ///
    /// Every idle unit of that side gets one planned action. The returned
    /// [`PlannerTurn`] executes them lazily; dropping it early leaves the
    /// turn open and a later call plans the remaining units afresh.
    pub fn run_ai_turn(&mut self) -> Result<PlannerTurn<'_>> {
        if let Some(loser) = self.state.defeated_side() {
            return Err(TurnError::BattleOver { loser }.into());
        }
        let side = self.state.turn.active_side;
        if side != self.config.ai_side {
            return Err(RuntimeError::NotPlannerControlled { side });
        }

        let plan = self.planner.plan_side(&self.state, &self.map, side);
        for unit in &plan.idle {
            self.bus.publish(AiEvent::NoLegalAction { unit: *unit });
        }
        let actions: Vec<AiAction> = plan
            .actions
            .into_iter()
            .filter(|action| !self.state.is_exhausted(action.unit))
            .collect();

        info!(
            target: "runtime::session",
            side = %side,
            actions = actions.len(),
            "planner turn started"
        );
        Ok(PlannerTurn::new(self, side, actions))
    }

    fn ensure_manual_turn(&self) -> Result<Side> {
        if let Some(loser) = self.state.defeated_side() {
            return Err(TurnError::BattleOver { loser }.into());
        }
        let side = self.state.turn.active_side;
        if side == self.config.ai_side {
            return Err(RuntimeError::PlannerControlled { side });
        }
        Ok(side)
    }

    /// Executes `command` and publishes its consequences.
    fn apply(
        &mut self,
        command: BattleCommand,
        record: bool,
    ) -> std::result::Result<CommandOutcome, CommandError> {
        let actor = command.actor();
        let origin = self.state.unit(actor).map(|unit| unit.position);
        let strike = match &command {
            BattleCommand::Attack(attack) => attack
                .validate(&self.state)
                .ok()
                .map(|plan| *plan.strike()),
            BattleCommand::Move(_) => None,
        };

        let outcome = if record {
            let (kind, destination) = (command.kind(), command.destination());
            let fallen = self.history.execute(command, &mut self.state)?;
            BattleEngine::new(&mut self.state).settle(actor, kind, destination, fallen)
        } else {
            let mut command = command;
            BattleEngine::new(&mut self.state).execute(&mut command)?
        };

        self.publish_outcome(&outcome, origin, strike);
        Ok(outcome)
    }

    fn publish_outcome(
        &mut self,
        outcome: &CommandOutcome,
        origin: Option<Position>,
        strike: Option<Strike>,
    ) {
        let actor = outcome.actor;
        if let (Some(from), Some(unit)) = (origin, self.state.unit(actor)) {
            if unit.position != from {
                self.bus.publish(BattleEvent::UnitMoved {
                    unit: actor,
                    from,
                    to: unit.position,
                });
            }
        }
        if let Some(strike) = strike {
            self.bus.publish(BattleEvent::UnitAttacked {
                attacker: strike.attacker,
                defender: strike.defender,
                target: strike.target,
                damage: strike.damage,
            });
        }
        if self.state.is_exhausted(actor) {
            self.bus.publish(BattleEvent::UnitExhausted { unit: actor });
        }
        if let Some((unit, side)) = outcome.fallen {
            self.bus.publish(BattleEvent::UnitDied { unit, side });
            if side == self.config.ai_side {
                self.withdraw_preview(unit);
            }
        }
        if let Some(loser) = outcome.loser {
            self.bus.publish(BattleEvent::BattleEnded { loser });
            self.clear_preview();
        }
    }

    /// Hands the turn over once every manual unit has acted.
    fn finish_manual_action(&mut self) {
        if self.state.defeated_side().is_some() {
            return;
        }
        let next = BattleEngine::new(&mut self.state).advance_turn();
        if let Some(next) = next {
            self.history.clear();
            self.clear_preview();
            self.announce_turn(next);
        }
    }

    fn announce_turn(&mut self, side: Side) {
        self.bus.publish(TurnEvent::TurnStarted {
            side,
            round: self.state.turn.round,
        });
        if side != self.config.ai_side {
            self.refresh_preview();
        }
    }

    fn refresh_preview(&mut self) {
        let plan = self
            .planner
            .plan_side(&self.state, &self.map, self.config.ai_side);
        self.preview = plan.actions;
        debug!(
            target: "runtime::session",
            actions = self.preview.len(),
            "preview updated"
        );
        self.bus.publish(TurnEvent::PreviewUpdated {
            actions: self.preview.clone(),
        });
    }

    fn clear_preview(&mut self) {
        if self.preview.is_empty() {
            return;
        }
        self.preview.clear();
        self.bus.publish(TurnEvent::PreviewCleared);
    }

    fn withdraw_preview(&mut self, unit: UnitId) {
        let before = self.preview.len();
        self.preview.retain(|action| action.unit != unit);
        if self.preview.len() != before {
            self.bus.publish(TurnEvent::PreviewWithdrawn { unit });
        }
    }
}
