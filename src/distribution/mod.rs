//----------------------------------------
// distribution mod
//----------------------------------------
pub mod error;
pub mod pool;
pub mod sample;
pub mod types;

pub use pool::SamplePool;
pub use sample::Sampler;
pub use types::DistributionSpec;
