// Pipeline processing: per-source cleaning, region filtering and merging

pub mod merge;
pub mod normalize;
pub mod region_filter;

pub use merge::{align_to_schema, merge_frames, union_columns};
pub use normalize::{normalize_frame, NormalizationStats};
pub use region_filter::RegionFilter;
