pub use crate::error::{Error, Result};
pub use itertools::Itertools as _;
#[cfg(feature = "profiling")]
pub use lazy_static::lazy_static;
pub use log::{debug, info, warn};
pub use noisy_float::prelude::*;
pub use quad::{Point, Quad, Transform, HW, TLBR};
pub use rand::{prelude::*, rngs::StdRng};
pub use serde::{Deserialize, Serialize};
pub use std::{
    collections::HashSet,
    fmt::Debug,
    fs::File,
    io::{self, BufRead, BufReader},
    path::{Path, PathBuf},
    sync::{Arc, Mutex},
    time::{Duration, Instant},
};
pub use tch::{Kind, Tensor};
pub use tch_tensor_like::TensorLike;
