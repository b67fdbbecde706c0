use crate::{Point, Quad, TLBR};

/// Relative tolerance below which a pivot is treated as zero.
const SINGULAR_TOLERANCE: f64 = 1e-12;

/// Projective transform acting on homogeneous 2D coordinates `(x, y, 1)`.
///
/// ```text
/// [m00 m01 m02]   [x]   [wx']
/// [m10 m11 m12] × [y] = [wy']
/// [m20 m21 m22]   [1]   [w  ]
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    m: [[f64; 3]; 3],
}

impl Transform {
    pub fn matrix(&self) -> [[f64; 3]; 3] {
        self.m
    }

    /// Per-axis scaling followed by translation.
    pub fn from_scale_translate(sy: f64, sx: f64, ty: f64, tx: f64) -> Self {
        Self {
            m: [[sx, 0.0, tx], [0.0, sy, ty], [0.0, 0.0, 1.0]],
        }
    }

    /// The scale/translate transform taking `src` onto `tgt`.
    ///
    /// An axis on which `src` has zero extent is mapped onto the start edge of
    /// `tgt`.
    pub fn from_rects(src: &TLBR<f64>, tgt: &TLBR<f64>) -> Self {
        let (sy, ty) = fit_axis(src.t(), src.h(), tgt.t(), tgt.h());
        let (sx, tx) = fit_axis(src.l(), src.w(), tgt.l(), tgt.w());
        Self::from_scale_translate(sy, sx, ty, tx)
    }

    /// The projective transform taking each corner of `src` onto the
    /// corresponding corner of `tgt`.
    ///
    /// Returns `None` if the correspondence does not determine a unique
    /// transform, for example when a quadrilateral is collapsed.
    pub fn from_quads(src: &Quad<f64>, tgt: &Quad<f64>) -> Option<Self> {
        let mut a = [[0.0; 8]; 8];
        let mut b = [0.0; 8];

        for (index, (from, to)) in src.points().iter().zip(tgt.points().iter()).enumerate() {
            let Point { x, y } = *from;
            let Point { x: u, y: v } = *to;
            let row = index * 2;
            a[row] = [x, y, 1.0, 0.0, 0.0, 0.0, -x * u, -y * u];
            b[row] = u;
            a[row + 1] = [0.0, 0.0, 0.0, x, y, 1.0, -x * v, -y * v];
            b[row + 1] = v;
        }

        let [h0, h1, h2, h3, h4, h5, h6, h7] = solve(a, b)?;
        Some(Self {
            m: [[h0, h1, h2], [h3, h4, h5], [h6, h7, 1.0]],
        })
    }
}

fn fit_axis(src_start: f64, src_len: f64, tgt_start: f64, tgt_len: f64) -> (f64, f64) {
    if src_len == 0.0 {
        (0.0, tgt_start)
    } else {
        let scale = tgt_len / src_len;
        (scale, tgt_start - src_start * scale)
    }
}

/// Gaussian elimination with partial pivoting.
fn solve<const N: usize>(mut a: [[f64; N]; N], mut b: [f64; N]) -> Option<[f64; N]> {
    let max_abs = a
        .iter()
        .flatten()
        .fold(0.0f64, |max, value| max.max(value.abs()));
    let tolerance = SINGULAR_TOLERANCE * max_abs.max(1.0);

    for col in 0..N {
        let pivot =
            (col..N).max_by(|&lhs, &rhs| a[lhs][col].abs().total_cmp(&a[rhs][col].abs()))?;
        if a[pivot][col].abs() <= tolerance {
            return None;
        }
        a.swap(col, pivot);
        b.swap(col, pivot);

        for row in (col + 1)..N {
            let factor = a[row][col] / a[col][col];
            if factor == 0.0 {
                continue;
            }
            for k in col..N {
                a[row][k] -= factor * a[col][k];
            }
            b[row] -= factor * b[col];
        }
    }

    let mut x = [0.0; N];
    for row in (0..N).rev() {
        let tail: f64 = ((row + 1)..N).map(|k| a[row][k] * x[k]).sum();
        x[row] = (b[row] - tail) / a[row][row];
    }
    Some(x)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn apply(transform: &Transform, point: Point<f64>) -> Point<f64> {
        let [[m00, m01, m02], [m10, m11, m12], [m20, m21, m22]] = transform.matrix();
        let Point { x, y } = point;
        let w = m20 * x + m21 * y + m22;
        Point {
            x: (m00 * x + m01 * y + m02) / w,
            y: (m10 * x + m11 * y + m12) / w,
        }
    }

    fn assert_point_eq(lhs: Point<f64>, rhs: Point<f64>) {
        assert_abs_diff_eq!(lhs.x, rhs.x, epsilon = 1e-6);
        assert_abs_diff_eq!(lhs.y, rhs.y, epsilon = 1e-6);
    }

    #[test]
    fn quads_of_rects_give_scale_translate() {
        let src = TLBR::try_from_tlbr([0.0, 0.0, 9.0, 19.0]).unwrap();
        let tgt = TLBR::try_from_tlbr([10.0, 20.0, 28.0, 58.0]).unwrap();

        let from_quads = Transform::from_quads(&src.corners(), &tgt.corners()).unwrap();
        let from_rects = Transform::from_rects(&src, &tgt);

        assert_eq!(from_rects.matrix()[2], [0.0, 0.0, 1.0]);
        let lhs = from_quads.matrix();
        let rhs = from_rects.matrix();
        for (lhs_row, rhs_row) in lhs.iter().zip(rhs.iter()) {
            for (lhs, rhs) in lhs_row.iter().zip(rhs_row.iter()) {
                assert_abs_diff_eq!(*lhs, *rhs, epsilon = 1e-9);
            }
        }
    }

    #[test]
    fn perspective_maps_corners() {
        let src = TLBR::try_from_tlbr([0.0, 0.0, 1.0, 1.0]).unwrap().corners();
        let tgt = Quad::from_points([
            Point::new(2.0, 1.0),
            Point::new(0.0, 7.0),
            Point::new(6.0, 2.0),
            Point::new(9.0, 8.0),
        ]);
        let transform = Transform::from_quads(&src, &tgt).unwrap();

        assert!(transform.matrix()[2][..2].iter().any(|&value| value != 0.0));
        src.points()
            .iter()
            .zip(tgt.points().iter())
            .for_each(|(from, to)| assert_point_eq(apply(&transform, *from), *to));
    }

    #[test]
    fn collapsed_quad_is_singular() {
        let src = TLBR::try_from_tlbr([4.0, 0.0, 4.0, 9.0]).unwrap().corners();
        let tgt = TLBR::try_from_tlbr([0.0, 0.0, 3.0, 3.0]).unwrap().corners();
        assert!(Transform::from_quads(&src, &tgt).is_none());
    }

    #[test]
    fn collapsed_rect_maps_to_start_edge() {
        let src = TLBR::try_from_tlbr([0.0, 0.0, 0.0, 7.0]).unwrap();
        let tgt = TLBR::try_from_tlbr([5.0, 2.0, 5.0, 9.0]).unwrap();
        let transform = Transform::from_rects(&src, &tgt);

        assert_point_eq(apply(&transform, Point::new(0.0, 0.0)), Point::new(2.0, 5.0));
        assert_point_eq(apply(&transform, Point::new(7.0, 0.0)), Point::new(9.0, 5.0));
    }
}
