//! Deterministic day-cycle kernel: seeded streams, phase machine, info board,
//! quest ledger, crisis escalation, and the session that sequences them.

pub mod action_points;
pub mod crisis;
pub mod day;
pub mod error;
pub mod info;
pub mod ledger;
pub mod quest;
pub mod rng;
pub mod session;

pub use action_points::ActionPoints;
pub use crisis::{CrisisTracker, CrisisTransition};
pub use day::{DayCycle, SubscriptionId, PHASE_CYCLE};
pub use error::PreconditionViolation;
pub use info::InfoBoard;
pub use ledger::WorldLedger;
pub use quest::QuestLedger;
pub use rng::{RandomSource, RandomStream};
pub use session::{seed_for_day, Session};
