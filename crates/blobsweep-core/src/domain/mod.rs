//! Domain model (usage, records, plans, phases, events, errors).

pub mod errors;
pub mod events;
pub mod plan;
pub mod record;
pub mod state;
pub mod usage;

pub use self::errors::{ConfigError, DeleteError, ProbeError, ScanError, SweepError};
pub use self::events::{SweepEvent, UsageStage};
pub use self::plan::{EvictionPlan, EvictionTarget, PlanSummary};
pub use self::record::FileRecord;
pub use self::state::SweepPhase;
pub use self::usage::UsageSnapshot;
