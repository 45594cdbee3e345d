//! Hit-point counter with a one-shot terminal event.

/// Result of applying damage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DamageOutcome {
    /// Still alive with `remaining` health.
    Absorbed { remaining: u32 },
    /// This hit brought health to zero. Reported exactly once.
    Defeated,
    /// Health was already zero; nothing changed.
    AlreadyDefeated,
}

/// Current and maximum health. Health never increases.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HealthTrack {
    current: u32,
    max: u32,
    defeated: bool,
}

impl HealthTrack {
    /// Full health. A zero maximum is raised to one.
    pub fn new(max: u32) -> Self {
        let max = max.max(1);
        Self {
            current: max,
            max,
            defeated: false,
        }
    }

    pub fn current(&self) -> u32 {
        self.current
    }

    pub fn max(&self) -> u32 {
        self.max
    }

    pub fn is_defeated(&self) -> bool {
        self.defeated
    }

    /// Remaining health as a fraction of maximum, in [0, 1].
    pub fn fraction(&self) -> f32 {
        self.current as f32 / self.max as f32
    }

    pub fn apply_damage(&mut self, amount: u32) -> DamageOutcome {
        if self.defeated {
            return DamageOutcome::AlreadyDefeated;
        }
        self.current = self.current.saturating_sub(amount);
        if self.current == 0 {
            self.defeated = true;
            DamageOutcome::Defeated
        } else {
            DamageOutcome::Absorbed {
                remaining: self.current,
            }
        }
    }
}
