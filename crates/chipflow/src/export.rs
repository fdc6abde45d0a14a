//! Export of converged chip group layouts.

pub mod svg;
