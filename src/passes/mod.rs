mod reconstructor;
mod types;

pub use reconstructor::{
    reconstruct_passes, PassReconstructor, Reconstruction, ReconstructionStats,
};
pub use types::{ElevationSample, Pass, PassEvent, PassEventKind};
