use bevy::prelude::*;
use rand::{rngs::StdRng, SeedableRng};

use crate::app::state::AppState;
use crate::core::config::GameConfig;
use crate::core::progression::{Effect, GameEvent, Session};
use crate::core::system::system_order::{EffectApplySet, GameInputSet, SessionDispatchSet};

/// The one owner of run state. Only `dispatch_game_events` mutates the session's stage.
#[derive(Resource)]
pub struct ActiveSession {
    pub session: Session,
    pub rng: StdRng,
}

impl FromWorld for ActiveSession {
    fn from_world(world: &mut World) -> Self {
        let cfg = world
            .get_resource::<GameConfig>()
            .cloned()
            .unwrap_or_default();
        let rng = match cfg.rng_seed {
            Some(seed) => {
                info!(target: "session", "using fixed rng seed {seed}");
                StdRng::seed_from_u64(seed)
            }
            None => StdRng::from_entropy(),
        };
        Self {
            session: Session::from_config(&cfg),
            rng,
        }
    }
}

/// Owns the stage state machine: event/effect channels, the session resource,
/// dispatch ordering, and the effects that switch stages or exit.
pub struct SessionPlugin;

impl Plugin for SessionPlugin {
    fn build(&self, app: &mut App) {
        app.init_state::<AppState>()
            .add_event::<GameEvent>()
            .add_event::<Effect>()
            .init_resource::<ActiveSession>()
            .configure_sets(
                Update,
                (
                    GameInputSet,
                    SessionDispatchSet.after(GameInputSet),
                    EffectApplySet.after(SessionDispatchSet),
                ),
            )
            .add_systems(
                Update,
                (
                    advance_frame
                        .in_set(GameInputSet)
                        .run_if(in_state(AppState::Playing)),
                    dispatch_game_events.in_set(SessionDispatchSet),
                    apply_stage_effects.in_set(EffectApplySet),
                ),
            );
    }
}

fn advance_frame(time: Res<Time>, mut events: EventWriter<GameEvent>) {
    events.write(GameEvent::FrameAdvanced {
        delta: time.delta(),
    });
}

pub fn dispatch_game_events(
    mut active: ResMut<ActiveSession>,
    mut events: EventReader<GameEvent>,
    mut effects: EventWriter<Effect>,
) {
    let ActiveSession { session, rng } = &mut *active;
    for event in events.read() {
        for effect in session.dispatch(event.clone(), &mut *rng) {
            effects.write(effect);
        }
    }
}

fn apply_stage_effects(
    mut effects: EventReader<Effect>,
    mut next_state: ResMut<NextState<AppState>>,
    mut exit: EventWriter<AppExit>,
) {
    for effect in effects.read() {
        match effect {
            Effect::SwitchStage(stage) => next_state.set(AppState::from(*stage)),
            Effect::Exit => {
                exit.write(AppExit::Success);
            }
            _ => {}
        }
    }
}
