use crate::{common::*, Point, TLBR};

/// A quadrilateral given by its four corners.
///
/// The corner order is top-left, bottom-left, top-right, bottom-right. Two
/// quadrilaterals correspond corner by corner in this order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Quad<T> {
    pub tl: Point<T>,
    pub bl: Point<T>,
    pub tr: Point<T>,
    pub br: Point<T>,
}

impl<T> Quad<T> {
    pub fn from_points(points: [Point<T>; 4]) -> Self {
        let [tl, bl, tr, br] = points;
        Self { tl, bl, tr, br }
    }

    pub fn points(&self) -> [Point<T>; 4]
    where
        T: Copy,
    {
        [self.tl, self.bl, self.tr, self.br]
    }

    pub fn try_cast<U>(self) -> Option<Quad<U>>
    where
        T: ToPrimitive,
        U: NumCast,
    {
        Some(Quad {
            tl: self.tl.try_cast()?,
            bl: self.bl.try_cast()?,
            tr: self.tr.try_cast()?,
            br: self.br.try_cast()?,
        })
    }
}

impl<T> Quad<T>
where
    T: Copy + Num + PartialOrd,
{
    /// Whether the quadrilateral is a rectangle aligned to the image axes.
    ///
    /// Rectangles collapsed to a line or a point count as axis-aligned.
    pub fn is_axis_aligned(&self) -> bool {
        let Self { tl, bl, tr, br } = *self;
        tl.x == bl.x && tr.x == br.x && tl.y == tr.y && bl.y == br.y && tl.x <= tr.x && tl.y <= bl.y
    }

    /// The rectangle spanned by the corners, if the quadrilateral is axis-aligned.
    pub fn to_rect(&self) -> Option<TLBR<T>> {
        if !self.is_axis_aligned() {
            return None;
        }
        Some(TLBR {
            t: self.tl.y,
            l: self.tl.x,
            b: self.br.y,
            r: self.br.x,
        })
    }
}
