pub mod hit_or_miss;

pub use hit_or_miss::{
    estimate_max, hit_or_miss_integration, hit_or_miss_with_config, linspace, sample_hit_or_miss,
    HitOrMissConfig, HitOrMissEstimate, HitOrMissSample, DEFAULT_GRID_POINTS,
};
