pub mod smoothing;
pub mod simplification;
pub mod classification;
pub mod synthesis;

pub use smoothing::*;
pub use simplification::*;
pub use classification::*;
pub use synthesis::*;
