use crate::common::*;

/// A materialized sample.
#[derive(Debug, TensorLike)]
pub struct Sample {
    /// Pixels in (height, width, channels) layout with float kind.
    pub image: Tensor,
    /// The labels as a 1-D int tensor.
    pub labels: Tensor,
}

impl Clone for Sample {
    fn clone(&self) -> Self {
        self.shallow_clone()
    }
}
