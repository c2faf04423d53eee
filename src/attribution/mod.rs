// Attribution engine
//
// Consumes the per-call profiling stream and attributes GPU time to shaders
// and to the narrowest enclosing debug-group instance.

mod engine;
mod policy;
mod profile;

pub use engine::{
    shader_name, AttributionEngine, RowCounts, ShaderStat, ShaderStats, FIXED_FUNCTION_SHADER,
};
pub use policy::{AppTimerPolicy, LabelConventionPolicy};
pub use profile::{ProfileHeader, ProfileSample, ROW_TAG};
