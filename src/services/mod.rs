pub mod domain_registry;
pub mod quality_gate;
pub mod reflection;
pub mod segmentation;
pub mod signal_extraction;

pub use domain_registry::DomainProfileRegistry;
pub use quality_gate::{GateRejection, QualityGate, BASE_QUALITY_THRESHOLD};
pub use reflection::{ExperiencePool, GroupReflectionService, ReflectionConfig, ToolPattern};
pub use segmentation::{EpisodeSegmentationService, SegmentationConfig};
pub use signal_extraction::extract_signal;
