pub mod kind;
pub mod lifecycle;
pub mod registry;

pub use kind::{ConditionKind, DecayCurve, DriftSpec, TimingProfile};
pub use lifecycle::{Condition, Phase};
pub use registry::ConditionRegistry;
