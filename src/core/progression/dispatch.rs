//! The single entry point that turns `GameEvent`s into state changes and `Effect`s.
//! Nothing here touches the ECS world, so every transition is testable on its own.

use bevy::prelude::*;
use rand::Rng;
use std::time::Duration;

use super::events::{Effect, GameEvent, PlayerTint};
use super::level::{fire_projectile, load_level};
use super::stage::Stage;
use super::state::GameState;
use crate::core::config::{GameConfig, PhysicsConfig, ProjectileConfig, RulesConfig, SpawnConfig};

#[derive(Debug, Clone)]
pub struct Session {
    stage: Stage,
    state: GameState,
    rules: RulesConfig,
    spawn: SpawnConfig,
    physics: PhysicsConfig,
    projectile: ProjectileConfig,
}

impl Session {
    pub fn new(
        rules: RulesConfig,
        spawn: SpawnConfig,
        physics: PhysicsConfig,
        projectile: ProjectileConfig,
    ) -> Self {
        let shield = Duration::from_millis(rules.invincibility_ms);
        Self {
            stage: Stage::Loading,
            state: GameState::new(shield),
            rules,
            spawn,
            physics,
            projectile,
        }
    }

    pub fn from_config(cfg: &GameConfig) -> Self {
        Self::new(
            cfg.rules.clone(),
            cfg.spawn.clone(),
            cfg.physics.clone(),
            cfg.projectile.clone(),
        )
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Engine-side motion sync; not an event since it never changes the stage.
    pub fn state_mut(&mut self) -> &mut GameState {
        &mut self.state
    }

    /// Swaps in new tables. Spawn policy applies from the next level load,
    /// the shield duration from the next pickup.
    pub fn reconfigure(&mut self, cfg: &GameConfig) {
        self.rules = cfg.rules.clone();
        self.spawn = cfg.spawn.clone();
        self.physics = cfg.physics.clone();
        self.projectile = cfg.projectile.clone();
        self.state
            .invincibility
            .set_duration(Duration::from_millis(self.rules.invincibility_ms));
    }

    pub fn dispatch<R: Rng + ?Sized>(&mut self, event: GameEvent, rng: &mut R) -> Vec<Effect> {
        let mut fx = Vec::new();
        match (self.stage, event) {
            (Stage::Loading, GameEvent::AssetsLoaded) => {
                self.switch(Stage::Menu, &mut fx);
            }
            (Stage::Menu, GameEvent::PlayRequested) => {
                self.start_run(&mut *rng, &mut fx);
            }
            (Stage::Menu, GameEvent::ExitRequested) => {
                info!(target: "session", "exit requested from menu");
                fx.push(Effect::Exit);
            }
            (stage, GameEvent::RestartRequested) if stage.is_finished() => {
                self.start_run(&mut *rng, &mut fx);
            }
            (stage, GameEvent::MainMenuRequested) if stage.is_finished() => {
                self.reset(&mut fx);
                self.switch(Stage::Menu, &mut fx);
            }
            (Stage::Playing { level }, GameEvent::FrameAdvanced { delta }) => {
                self.advance_frame(level, delta, &mut *rng, &mut fx);
            }
            (Stage::Playing { .. }, GameEvent::FireTriggered { origin }) => {
                let req = fire_projectile(&mut self.state, origin, &self.projectile);
                fx.push(Effect::Spawn(req));
            }
            (Stage::Playing { level }, GameEvent::HostileStrikesPlayer { hostile }) => {
                if !self.state.hostiles.contains(hostile) {
                    debug!(target: "session", "strike from unknown hostile {:?}; ignored", hostile);
                } else if self.state.player_invincible() {
                    debug!(target: "session", "hostile {:?} hit a shielded player", hostile);
                    self.state.touch_hostile(hostile);
                } else {
                    self.defeat(level, &mut fx);
                }
            }
            (_, GameEvent::HostileContactEnded { hostile }) => {
                self.state.release_hostile(hostile);
            }
            (Stage::Playing { .. }, GameEvent::PlayerCollectsPickup { pickup }) => {
                if self.state.pickups.remove(pickup).is_none() {
                    debug!(target: "session", "pickup {:?} already collected; ignored", pickup);
                } else {
                    fx.push(Effect::Despawn(pickup));
                    self.add_score(self.rules.points_per_pickup, &mut fx);
                    self.state.invincibility.arm();
                    fx.push(Effect::PlayerTint(PlayerTint::Shielded));
                }
            }
            (Stage::Playing { .. }, GameEvent::ProjectileStrikesHostile { projectile, hostile }) => {
                if !self.state.projectiles.contains(projectile) || !self.state.hostiles.contains(hostile) {
                    debug!(
                        target: "session",
                        "stale hit projectile={:?} hostile={:?}; ignored",
                        projectile, hostile
                    );
                } else {
                    self.state.projectiles.remove(projectile);
                    self.state.remove_hostile(hostile);
                    fx.push(Effect::Despawn(projectile));
                    fx.push(Effect::Despawn(hostile));
                    self.add_score(self.rules.points_per_kill, &mut fx);
                }
            }
            (_, GameEvent::ProjectileLeftBounds { projectile }) => {
                if self.state.projectiles.remove(projectile).is_some() {
                    fx.push(Effect::Despawn(projectile));
                }
            }
            (stage, event) => {
                debug!(target: "session", "{:?} ignored in stage {:?}", event, stage);
            }
        }
        fx
    }

    fn switch(&mut self, next: Stage, fx: &mut Vec<Effect>) {
        info!(target: "session", "stage {:?} -> {:?}", self.stage, next);
        self.stage = next;
        fx.push(Effect::SwitchStage(next));
    }

    fn reset(&mut self, fx: &mut Vec<Effect>) {
        fx.extend(self.state.reset().into_iter().map(Effect::Despawn));
        fx.push(Effect::PlayerTint(PlayerTint::Normal));
    }

    fn defeat(&mut self, level: u32, fx: &mut Vec<Effect>) {
        info!(target: "session", "player defeated on level {level} with score {}", self.state.score);
        fx.push(Effect::PlayerTint(PlayerTint::Defeated));
        fx.push(Effect::SetPhysicsPaused(true));
        self.switch(Stage::GameOver { level }, fx);
    }

    fn start_run<R: Rng + ?Sized>(&mut self, rng: &mut R, fx: &mut Vec<Effect>) {
        self.reset(fx);
        self.load(1, &mut *rng, fx);
        fx.push(Effect::SetPhysicsPaused(false));
        self.switch(Stage::Playing { level: 1 }, fx);
    }

    fn load<R: Rng + ?Sized>(&mut self, level: u32, rng: &mut R, fx: &mut Vec<Effect>) {
        let load = load_level(
            &mut self.state,
            level,
            &self.rules,
            &self.spawn,
            &self.physics,
            &mut *rng,
        );
        info!(
            target: "session",
            "level {level} loaded: {} hostiles (boss included), {} pickups",
            self.state.hostiles.len(),
            self.state.pickups.len()
        );
        fx.extend(load.cleared.into_iter().map(Effect::Despawn));
        fx.extend(load.spawns.into_iter().map(Effect::Spawn));
        fx.push(Effect::UpdateHud(self.state.hud_text()));
    }

    fn add_score(&mut self, points: u32, fx: &mut Vec<Effect>) {
        self.state.score = self.state.score.saturating_add(points);
        fx.push(Effect::UpdateHud(self.state.hud_text()));
    }

    fn advance_frame<R: Rng + ?Sized>(
        &mut self,
        level: u32,
        delta: Duration,
        rng: &mut R,
        fx: &mut Vec<Effect>,
    ) {
        if self.state.invincibility.tick(delta) {
            debug!(target: "session", "shield expired");
            fx.push(Effect::PlayerTint(PlayerTint::Normal));
            if let Some(hostile) = self.state.touching_hostile() {
                debug!(target: "session", "hostile {:?} still touching at shield expiry", hostile);
                self.defeat(level, fx);
                return;
            }
        }
        if !self.state.level_cleared() {
            return;
        }
        match Stage::after_clear(level, self.rules.final_level) {
            Stage::Playing { level: next } => {
                self.load(next, &mut *rng, fx);
                self.switch(Stage::Playing { level: next }, fx);
            }
            done => {
                info!(target: "session", "final level cleared with score {}", self.state.score);
                fx.push(Effect::SetPhysicsPaused(true));
                self.switch(done, fx);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::progression::state::EntityKind;
    use rand::{rngs::StdRng, SeedableRng};

    fn playing() -> (Session, StdRng) {
        let mut rng = StdRng::seed_from_u64(11);
        let mut s = Session::from_config(&GameConfig::default());
        s.dispatch(GameEvent::AssetsLoaded, &mut rng);
        s.dispatch(GameEvent::PlayRequested, &mut rng);
        (s, rng)
    }

    fn first_regular(s: &Session) -> super::super::state::EntityId {
        s.state()
            .hostiles
            .iter()
            .find(|r| r.kind == EntityKind::REGULAR_HOSTILE)
            .map(|r| r.id)
            .unwrap()
    }

    #[test]
    fn loading_to_menu_to_playing() {
        let mut rng = StdRng::seed_from_u64(0);
        let mut s = Session::from_config(&GameConfig::default());
        assert_eq!(s.stage(), Stage::Loading);
        // Play is not accepted before the menu.
        assert!(s.dispatch(GameEvent::PlayRequested, &mut rng).is_empty());
        let fx = s.dispatch(GameEvent::AssetsLoaded, &mut rng);
        assert_eq!(fx, vec![Effect::SwitchStage(Stage::Menu)]);
        let fx = s.dispatch(GameEvent::PlayRequested, &mut rng);
        assert_eq!(s.stage(), Stage::Playing { level: 1 });
        assert!(fx.contains(&Effect::SwitchStage(Stage::Playing { level: 1 })));
        assert!(fx.contains(&Effect::UpdateHud("Score: 0 | Level: 1".into())));
        let spawned = fx.iter().filter(|e| matches!(e, Effect::Spawn(_))).count();
        assert_eq!(spawned, 3 + 1 + 1);
    }

    #[test]
    fn menu_exit() {
        let mut rng = StdRng::seed_from_u64(0);
        let mut s = Session::from_config(&GameConfig::default());
        s.dispatch(GameEvent::AssetsLoaded, &mut rng);
        assert_eq!(s.dispatch(GameEvent::ExitRequested, &mut rng), vec![Effect::Exit]);
    }

    #[test]
    fn kill_awards_five_and_despawns_both() {
        let (mut s, mut rng) = playing();
        let fire = s.dispatch(GameEvent::FireTriggered { origin: Vec2::ZERO }, &mut rng);
        let Some(Effect::Spawn(shot)) = fire.first().cloned() else {
            panic!("expected a projectile spawn, got {fire:?}");
        };
        let hostile = first_regular(&s);
        let fx = s.dispatch(
            GameEvent::ProjectileStrikesHostile { projectile: shot.id, hostile },
            &mut rng,
        );
        assert_eq!(s.state().score, 5);
        assert!(fx.contains(&Effect::Despawn(shot.id)));
        assert!(fx.contains(&Effect::Despawn(hostile)));
        // Repeated notification for the same pair is a no-op.
        let again = s.dispatch(
            GameEvent::ProjectileStrikesHostile { projectile: shot.id, hostile },
            &mut rng,
        );
        assert!(again.is_empty());
        assert_eq!(s.state().score, 5);
    }

    #[test]
    fn collected_pickup_cannot_be_collected_again() {
        let (mut s, mut rng) = playing();
        let pickup = s.state().pickups.iter().next().map(|r| r.id).unwrap();
        s.dispatch(GameEvent::PlayerCollectsPickup { pickup }, &mut rng);
        s.dispatch(
            GameEvent::FrameAdvanced { delta: Duration::from_millis(3000) },
            &mut rng,
        );
        let fx = s.dispatch(GameEvent::PlayerCollectsPickup { pickup }, &mut rng);
        assert!(fx.is_empty());
        assert_eq!(s.state().score, 10);
        // The shield keeps counting down from the first collection.
        assert_eq!(
            s.state().invincibility.remaining(),
            Some(Duration::from_millis(2000))
        );
    }

    #[test]
    fn unshielded_strike_is_game_over() {
        let (mut s, mut rng) = playing();
        let hostile = first_regular(&s);
        let fx = s.dispatch(GameEvent::HostileStrikesPlayer { hostile }, &mut rng);
        assert_eq!(s.stage(), Stage::GameOver { level: 1 });
        assert!(fx.contains(&Effect::SetPhysicsPaused(true)));
        assert!(fx.contains(&Effect::PlayerTint(PlayerTint::Defeated)));
        // Gameplay events are ignored once the run is over.
        assert!(s
            .dispatch(GameEvent::FireTriggered { origin: Vec2::ZERO }, &mut rng)
            .is_empty());
    }

    #[test]
    fn lingering_contact_is_lethal_when_shield_ends() {
        let (mut s, mut rng) = playing();
        let pickup = s.state().pickups.iter().next().map(|r| r.id).unwrap();
        s.dispatch(GameEvent::PlayerCollectsPickup { pickup }, &mut rng);
        let hostile = first_regular(&s);
        assert!(s
            .dispatch(GameEvent::HostileStrikesPlayer { hostile }, &mut rng)
            .is_empty());
        s.dispatch(
            GameEvent::FrameAdvanced { delta: Duration::from_millis(4999) },
            &mut rng,
        );
        assert_eq!(s.stage(), Stage::Playing { level: 1 });
        let fx = s.dispatch(
            GameEvent::FrameAdvanced { delta: Duration::from_millis(1) },
            &mut rng,
        );
        assert_eq!(s.stage(), Stage::GameOver { level: 1 });
        assert!(fx.contains(&Effect::PlayerTint(PlayerTint::Defeated)));
    }

    #[test]
    fn separated_contact_survives_shield_expiry() {
        let (mut s, mut rng) = playing();
        let pickup = s.state().pickups.iter().next().map(|r| r.id).unwrap();
        s.dispatch(GameEvent::PlayerCollectsPickup { pickup }, &mut rng);
        let hostile = first_regular(&s);
        s.dispatch(GameEvent::HostileStrikesPlayer { hostile }, &mut rng);
        s.dispatch(GameEvent::HostileContactEnded { hostile }, &mut rng);
        s.dispatch(
            GameEvent::FrameAdvanced { delta: Duration::from_millis(5000) },
            &mut rng,
        );
        assert_eq!(s.stage(), Stage::Playing { level: 1 });
        assert!(!s.state().player_invincible());
    }

    #[test]
    fn strike_from_removed_hostile_is_ignored() {
        let (mut s, mut rng) = playing();
        let fx = s.dispatch(
            GameEvent::HostileStrikesPlayer { hostile: super::super::state::EntityId(9999) },
            &mut rng,
        );
        assert!(fx.is_empty());
        assert_eq!(s.stage(), Stage::Playing { level: 1 });
    }

    #[test]
    fn restart_resets_state() {
        let (mut s, mut rng) = playing();
        let pickup = s.state().pickups.iter().next().map(|r| r.id).unwrap();
        s.dispatch(GameEvent::PlayerCollectsPickup { pickup }, &mut rng);
        s.dispatch(
            GameEvent::FrameAdvanced { delta: Duration::from_millis(6000) },
            &mut rng,
        );
        let hostile = first_regular(&s);
        s.dispatch(GameEvent::HostileStrikesPlayer { hostile }, &mut rng);
        assert!(s.stage().is_finished());
        let fx = s.dispatch(GameEvent::RestartRequested, &mut rng);
        assert_eq!(s.stage(), Stage::Playing { level: 1 });
        assert_eq!(s.state().score, 0);
        assert!(fx.contains(&Effect::SetPhysicsPaused(false)));
        assert_eq!(s.state().hostiles.len(), 4);
    }

    #[test]
    fn main_menu_from_game_over() {
        let (mut s, mut rng) = playing();
        let hostile = first_regular(&s);
        s.dispatch(GameEvent::HostileStrikesPlayer { hostile }, &mut rng);
        let fx = s.dispatch(GameEvent::MainMenuRequested, &mut rng);
        assert_eq!(s.stage(), Stage::Menu);
        assert!(s.state().hostiles.is_empty());
        let despawns = fx.iter().filter(|e| matches!(e, Effect::Despawn(_))).count();
        assert_eq!(despawns, 5);
    }

    #[test]
    fn out_of_bounds_projectile_removed_once() {
        let (mut s, mut rng) = playing();
        let fx = s.dispatch(GameEvent::FireTriggered { origin: Vec2::ZERO }, &mut rng);
        let Some(Effect::Spawn(shot)) = fx.first().cloned() else {
            panic!("expected spawn");
        };
        let fx = s.dispatch(GameEvent::ProjectileLeftBounds { projectile: shot.id }, &mut rng);
        assert_eq!(fx, vec![Effect::Despawn(shot.id)]);
        let fx = s.dispatch(GameEvent::ProjectileLeftBounds { projectile: shot.id }, &mut rng);
        assert!(fx.is_empty());
    }
}
