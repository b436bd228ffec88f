//! Low-level building blocks for custom decoding pipelines.
//!
//! These expose the per-anchor scan used by [`crate::decode`] for callers
//! that run their own suppression or post-filtering. Most users should prefer
//! [`crate::decode_with`] or [`crate::Detector`].

pub use crate::detect::candidate::extract_candidates;
#[cfg(feature = "rayon")]
pub use crate::detect::candidate::extract_candidates_par;
pub use crate::detect::nms::{nms_boxes, non_maximum_suppression};
pub use crate::tensor::BOX_ATTRIBUTES;
