use crate::Vec3;

/// Axis-aligned box whose extents always contain the origin.
///
/// Both corners start at zero rather than at `+inf`/`-inf`, so a point set
/// lying entirely on one side of an axis still reports `0` on the other
/// side. Placement and collision code relies on this anchoring.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Bounds {
    pub min: Vec3,
    pub max: Vec3,
}

impl Bounds {
    pub const ZERO: Self = Self {
        min: Vec3::ZERO,
        max: Vec3::ZERO,
    };

    /// Batch form: scan every point once.
    pub fn from_points<I>(points: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Vec3>,
    {
        let mut bounds = Self::ZERO;
        for p in points {
            bounds.include(p.into());
        }
        bounds
    }

    /// Incremental form: grow each axis independently to cover `p`.
    ///
    /// An axis only moves on a strict comparison, so NaN components leave
    /// the box unchanged.
    pub fn include(&mut self, p: Vec3) {
        for axis in 0..3 {
            if p[axis] < self.min[axis] {
                self.min[axis] = p[axis];
            }
            if p[axis] > self.max[axis] {
                self.max[axis] = p[axis];
            }
        }
    }

    #[inline]
    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    #[inline]
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    #[inline]
    pub fn contains(&self, p: Vec3) -> bool {
        p.cmpge(self.min).all() && p.cmple(self.max).all()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vec3;

    #[test]
    fn bounds_are_anchored_at_zero() {
        let b = Bounds::from_points([vec3(1.0, 2.0, 3.0), vec3(4.0, -5.0, 6.0)]);
        assert_eq!(b.min, vec3(0.0, -5.0, 0.0));
        assert_eq!(b.max, vec3(4.0, 2.0, 6.0));
    }

    #[test]
    fn empty_set_is_zero_box() {
        let b = Bounds::from_points(Vec::<Vec3>::new());
        assert_eq!(b, Bounds::ZERO);
        assert_eq!(b.size(), Vec3::ZERO);
    }

    #[test]
    fn incremental_matches_batch() {
        let pts = [
            vec3(-1.5, 0.25, 9.0),
            vec3(3.0, -7.0, 2.0),
            vec3(0.5, 4.0, -0.125),
        ];
        let mut inc = Bounds::default();
        for p in pts {
            inc.include(p);
        }
        assert_eq!(inc, Bounds::from_points(pts));
    }

    #[test]
    fn nan_components_do_not_move_the_box() {
        let b = Bounds::from_points([vec3(f32::NAN, 2.0, -1.0), vec3(3.0, f32::NAN, 0.0)]);
        assert_eq!(b.min, vec3(0.0, 0.0, -1.0));
        assert_eq!(b.max, vec3(3.0, 2.0, 0.0));
    }

    #[test]
    fn center_and_contains() {
        let b = Bounds::from_points([vec3(2.0, 2.0, 2.0), vec3(-2.0, -4.0, -2.0)]);
        assert_eq!(b.center(), vec3(0.0, -1.0, 0.0));
        assert!(b.contains(vec3(1.0, -3.0, 0.0)));
        assert!(!b.contains(vec3(3.0, 0.0, 0.0)));
    }
}
