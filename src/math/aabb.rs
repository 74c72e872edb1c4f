use glam::DVec3;

/// Axis-aligned bounding box in model units
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Aabb {
    pub min: DVec3,
    pub max: DVec3,
}

impl Aabb {
    pub fn new(min: DVec3, max: DVec3) -> Self {
        Self { min, max }
    }

    /// Smallest box containing every point, `None` for an empty set
    pub fn from_points<'a>(points: impl IntoIterator<Item = &'a DVec3>) -> Option<Aabb> {
        let mut points = points.into_iter();
        let first = *points.next()?;
        Some(points.fold(Aabb::new(first, first), |acc, p| Aabb {
            min: acc.min.min(*p),
            max: acc.max.max(*p),
        }))
    }

    pub fn union(&self, other: &Aabb) -> Aabb {
        Aabb {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    pub fn center(&self) -> DVec3 {
        (self.min + self.max) * 0.5
    }

    /// Edge lengths along x, y and z
    pub fn extents(&self) -> DVec3 {
        self.max - self.min
    }

    pub fn max_extent(&self) -> f64 {
        self.extents().max_element()
    }
}
