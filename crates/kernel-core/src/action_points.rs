pub const DEFAULT_MAX_ACTION_POINTS: i32 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActionPoints {
    max: i32,
    current: i32,
}

impl ActionPoints {
    /// A pool with `max` capacity, starting empty until the first day begins.
    pub fn new(max: i32) -> Self {
        Self {
            max: max.max(0),
            current: 0,
        }
    }

    pub fn max(&self) -> i32 {
        self.max
    }

    pub fn current(&self) -> i32 {
        self.current
    }

    pub fn start_day(&mut self) {
        self.current = self.max;
    }

    pub fn try_consume(&mut self, amount: i32) -> bool {
        if amount <= 0 || self.current < amount {
            return false;
        }
        self.current -= amount;
        true
    }

    pub fn set_current(&mut self, current: i32) {
        self.current = current.clamp(0, self.max);
    }
}

impl Default for ActionPoints {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_ACTION_POINTS)
    }
}
