pub mod binarize;
pub mod flood;
pub mod morphology;
pub mod ocr;
pub mod rectify;

pub use binarize::ThresholdStep;
pub use flood::FloodCleanStep;
pub use morphology::ReconstructStep;
pub use rectify::PerspectiveStep;
