use crate::common::*;

/// A 2D point in pixel space, `x` along the width and `y` along the height.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Point<T> {
    pub x: T,
    pub y: T,
}

impl<T> Point<T> {
    pub fn new(x: T, y: T) -> Self {
        Self { x, y }
    }

    pub fn try_cast<U>(self) -> Option<Point<U>>
    where
        T: ToPrimitive,
        U: NumCast,
    {
        Some(Point {
            x: U::from(self.x)?,
            y: U::from(self.y)?,
        })
    }
}
