use crate::{common::*, Point, Quad};

/// Axis-aligned rectangle in TLBR format.
///
/// For pixel rectangles the `b` and `r` edges are the coordinates of the last
/// row and column, so a rectangle covering a single pixel has `t == b`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TLBR<T> {
    pub(crate) t: T,
    pub(crate) l: T,
    pub(crate) b: T,
    pub(crate) r: T,
}

impl<T> TLBR<T>
where
    T: Copy + Num + PartialOrd,
{
    pub fn try_from_tlbr(tlbr: [T; 4]) -> Result<Self> {
        let [t, l, b, r] = tlbr;
        ensure!(b >= t && r >= l, "b >= t and r >= l must hold");
        Ok(Self { t, l, b, r })
    }

    pub fn t(&self) -> T {
        self.t
    }

    pub fn l(&self) -> T {
        self.l
    }

    pub fn b(&self) -> T {
        self.b
    }

    pub fn r(&self) -> T {
        self.r
    }

    /// The distance from the top edge to the bottom edge.
    pub fn h(&self) -> T {
        self.b - self.t
    }

    /// The distance from the left edge to the right edge.
    pub fn w(&self) -> T {
        self.r - self.l
    }

    pub fn tlbr(&self) -> [T; 4] {
        [self.t, self.l, self.b, self.r]
    }

    /// The four corners in top-left, bottom-left, top-right, bottom-right order.
    pub fn corners(&self) -> Quad<T> {
        let Self { t, l, b, r } = *self;
        Quad {
            tl: Point::new(l, t),
            bl: Point::new(l, b),
            tr: Point::new(r, t),
            br: Point::new(r, b),
        }
    }
}

impl<T> TLBR<T>
where
    T: Copy + Unsigned + PartialOrd,
{
    /// Build the pixel rectangle starting at `(top, left)` that covers
    /// `height` rows and `width` columns.
    pub fn try_from_pixel_extent(top: T, left: T, height: T, width: T) -> Result<Self> {
        ensure!(
            height > T::zero() && width > T::zero(),
            "pixel extents must be positive"
        );
        let one = T::one();
        Self::try_from_tlbr([top, left, top + height - one, left + width - one])
    }
}
