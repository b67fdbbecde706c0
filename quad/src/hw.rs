use crate::common::*;

/// Height and width of an image or a sampling grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HW<T> {
    h: T,
    w: T,
}

impl<T> HW<T>
where
    T: Copy,
{
    pub fn h(&self) -> T {
        self.h
    }

    pub fn w(&self) -> T {
        self.w
    }

    pub fn hw(&self) -> [T; 2] {
        [self.h, self.w]
    }
}

impl<T> HW<T>
where
    T: Unsigned + Copy,
{
    /// Build a size from `[h, w]`.
    pub fn from_hw(hw: [T; 2]) -> Self {
        let [h, w] = hw;
        Self { h, w }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn size_accessors() {
        let size = HW::from_hw([3usize, 2]);
        assert_eq!(size.h(), 3);
        assert_eq!(size.w(), 2);
        assert_eq!(size.hw(), [3, 2]);
        assert_ne!(size, HW::from_hw([2, 3]));
    }
}
