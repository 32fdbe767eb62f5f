/// Named phase of a run. `Playing` and `GameOver` carry the level they refer to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Stage {
    #[default]
    Loading,
    Menu,
    Playing { level: u32 },
    GameOver { level: u32 },
    Victory,
}

impl Stage {
    /// Stages that accept the restart / main-menu triggers.
    pub fn is_finished(self) -> bool {
        matches!(self, Stage::GameOver { .. } | Stage::Victory)
    }

    /// Where a cleared level leads: the next level, or victory once `final_level` is cleared.
    pub fn after_clear(level: u32, final_level: u32) -> Stage {
        if level >= final_level {
            Stage::Victory
        } else {
            Stage::Playing { level: level + 1 }
        }
    }
}
