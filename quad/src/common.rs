pub use anyhow::{ensure, Result};
pub use num_traits::{Num, NumCast, ToPrimitive, Unsigned};
