pub mod footprint;
pub mod normalize;
pub mod param;
pub mod statistic;

pub use footprint::Footprint;
pub use normalize::{normalize, AlignmentShift, FilterShape, HaloSpec, NormalizedWindow};
pub use param::ParamValue;
pub use statistic::Statistic;
