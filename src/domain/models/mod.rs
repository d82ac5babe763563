pub mod episode;
pub mod event;
pub mod profile;
pub mod trace;

pub use episode::{BoundaryTrigger, Episode, EpisodeStatus};
pub use event::{aggregate_feedback_score, FeedbackSignal, InteractionEvent};
pub use profile::{DomainProfile, SignalKind};
pub use trace::{ExecutionTrace, ToolUse};
