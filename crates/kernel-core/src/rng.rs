//! Seeded random stream for all gameplay draws.
//!
//! The generator is the subtractive lagged-Fibonacci scheme (55-word state,
//! Knuth's seed constant) that the game's saves were originally produced with,
//! so a stored seed keeps yielding the same info batches and rolls. Every draw
//! advances the state by exactly one step, except large-range integer draws
//! which take two; callers rely on that ordering for replay.

use crate::error::PreconditionViolation;

const MBIG: i32 = i32::MAX;
const MSEED: i32 = 161_803_398;
const STATE_LEN: usize = 56;
/// Largest `f32` strictly below 1.0.
const UNIT_FLOAT_CEILING: f32 = 1.0 - f32::EPSILON / 2.0;

/// Draw interface consumed by info generation and quest resolution.
pub trait RandomSource {
    /// Uniform integer in `[min, max)`.
    fn range_int(&mut self, min: i32, max: i32) -> Result<i32, PreconditionViolation>;

    /// Uniform float in `[0, 1)`.
    fn unit_float(&mut self) -> f32;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RandomStream {
    state: [i32; STATE_LEN],
    inext: usize,
    inextp: usize,
    draws: u64,
}

impl RandomStream {
    pub fn new(seed: i32) -> Self {
        let mut state = [0_i32; STATE_LEN];
        let subtraction = if seed == i32::MIN {
            i32::MAX
        } else {
            seed.abs()
        };
        let mut mj = MSEED.wrapping_sub(subtraction);
        state[55] = mj;
        let mut mk = 1_i32;
        let mut ii = 0_usize;
        for _ in 1..55 {
            ii += 21;
            if ii >= 55 {
                ii -= 55;
            }
            state[ii] = mk;
            mk = mj.wrapping_sub(mk);
            if mk < 0 {
                mk = mk.wrapping_add(MBIG);
            }
            mj = state[ii];
        }
        for _ in 1..5 {
            for i in 1..STATE_LEN {
                let mut n = i + 30;
                if n >= 55 {
                    n -= 55;
                }
                state[i] = state[i].wrapping_sub(state[1 + n]);
                if state[i] < 0 {
                    state[i] = state[i].wrapping_add(MBIG);
                }
            }
        }

        Self {
            state,
            inext: 0,
            inextp: 21,
            draws: 0,
        }
    }

    /// Number of state steps consumed so far.
    pub fn draws(&self) -> u64 {
        self.draws
    }

    fn internal_sample(&mut self) -> i32 {
        let mut inext = self.inext + 1;
        if inext >= STATE_LEN {
            inext = 1;
        }
        let mut inextp = self.inextp + 1;
        if inextp >= STATE_LEN {
            inextp = 1;
        }

        let mut value = self.state[inext].wrapping_sub(self.state[inextp]);
        if value == MBIG {
            value -= 1;
        }
        if value < 0 {
            value = value.wrapping_add(MBIG);
        }

        self.state[inext] = value;
        self.inext = inext;
        self.inextp = inextp;
        self.draws += 1;
        value
    }

    fn sample(&mut self) -> f64 {
        f64::from(self.internal_sample()) * (1.0 / f64::from(MBIG))
    }

    fn large_range_sample(&mut self) -> f64 {
        let mut result = self.internal_sample();
        if self.internal_sample() % 2 == 0 {
            result = -result;
        }
        let shifted = f64::from(result) + f64::from(i32::MAX - 1);
        shifted / (2.0 * f64::from(i32::MAX as u32) - 1.0)
    }
}

impl RandomSource for RandomStream {
    fn range_int(&mut self, min: i32, max: i32) -> Result<i32, PreconditionViolation> {
        if max <= min {
            return Err(PreconditionViolation::InvalidRange { min, max });
        }

        let span = i64::from(max) - i64::from(min);
        let offset = if span <= i64::from(i32::MAX) {
            (self.sample() * span as f64) as i64
        } else {
            (self.large_range_sample() * span as f64) as i64
        };
        Ok((i64::from(min) + offset).clamp(i64::from(min), i64::from(max) - 1) as i32)
    }

    fn unit_float(&mut self) -> f32 {
        let value = self.sample() as f32;
        if value >= 1.0 {
            UNIT_FLOAT_CEILING
        } else {
            value
        }
    }
}
