//! Collision detection module
//!
//! Axis-aligned boxes used to keep the player out of buildings and to detect
//! arrival in the treasure chamber.
//!
//! # Containment rules
//!
//! - Full 3D containment is half-open: `min <= p < max` on every axis.
//! - Single-axis containment is open: `min < v < max`. The movement controller
//!   uses it to decide which axis crossed a wall.
//! - A box that is empty on any axis contains nothing.
//!
//! # Example
//!
//! ```ignore
//! use randcity_engine::physics::collision::{Aabb, RestrictedArea, RestrictedAreaIndex};
//! use glam::Vec3;
//!
//! let area = RestrictedArea::from_footprint(0, (16.0, 16.0), 48.0, 120.0, 2.0)?;
//! let index = RestrictedAreaIndex::new(vec![area]);
//!
//! if let Some(hit) = index.first_overlapping(Vec3::new(20.0, 10.0, 20.0)) {
//!     println!("inside building {}", hit.building);
//! }
//! ```

use glam::Vec3;

use crate::error::{CityError, Result};

/// One of the three world axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    pub const ALL: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];

    /// Component of `v` along this axis.
    pub fn of(self, v: Vec3) -> f32 {
        match self {
            Axis::X => v.x,
            Axis::Y => v.y,
            Axis::Z => v.z,
        }
    }

    /// Unit vector along this axis.
    pub fn unit(self) -> Vec3 {
        match self {
            Axis::X => Vec3::X,
            Axis::Y => Vec3::Y,
            Axis::Z => Vec3::Z,
        }
    }
}

/// Axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    /// Creates a box, rejecting inverted extents.
    ///
    /// Zero-size extents are accepted; such a box never contains anything.
    pub fn new(min: Vec3, max: Vec3) -> Result<Self> {
        if min.x > max.x || min.y > max.y || min.z > max.z {
            return Err(CityError::invalid(format!(
                "inverted box: min {min:?} is above max {max:?}"
            )));
        }
        Ok(Self { min, max })
    }

    /// True when the box has zero volume.
    pub fn is_empty(&self) -> bool {
        !(self.min.x < self.max.x && self.min.y < self.max.y && self.min.z < self.max.z)
    }

    /// Half-open 3D containment.
    pub fn contains(&self, p: Vec3) -> bool {
        !self.is_empty()
            && p.x >= self.min.x
            && p.x < self.max.x
            && p.y >= self.min.y
            && p.y < self.max.y
            && p.z >= self.min.z
            && p.z < self.max.z
    }

    /// Open containment on a single axis.
    pub fn contains_axis(&self, axis: Axis, value: f32) -> bool {
        axis.of(self.min) < value && axis.of(self.max) > value
    }

    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }
}

/// Exclusion volume around one building.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RestrictedArea {
    pub bounds: Aabb,
    /// Index of the building in the renderable building list
    pub building: usize,
}

impl RestrictedArea {
    /// Box covering a square footprint expanded by `margin` on X and Z, from the
    /// ground up to `height`.
    ///
    /// # Arguments
    ///
    /// * `building` - Index of the building this area belongs to
    /// * `top_left` - (x, z) corner of the footprint with the lowest coordinates
    /// * `width` - Side of the square footprint
    /// * `height` - Building height
    /// * `margin` - Extra distance kept around the walls
    pub fn from_footprint(
        building: usize,
        top_left: (f32, f32),
        width: f32,
        height: f32,
        margin: f32,
    ) -> Result<Self> {
        if width <= 0.0 || height <= 0.0 || margin < 0.0 {
            return Err(CityError::invalid(format!(
                "footprint needs positive width/height and a non-negative margin \
                 (width {width}, height {height}, margin {margin})"
            )));
        }
        let (x, z) = top_left;
        let bounds = Aabb::new(
            Vec3::new(x - margin, 0.0, z - margin),
            Vec3::new(x + width + margin, height, z + width + margin),
        )?;
        Ok(Self { bounds, building })
    }

    pub fn contains(&self, p: Vec3) -> bool {
        self.bounds.contains(p)
    }
}

/// Ordered list of restricted areas.
///
/// Lookups are a linear scan in insertion order. Cities hold a few hundred
/// buildings at most, and the scan order is the tie-break when areas overlap.
#[derive(Debug, Clone, Default)]
pub struct RestrictedAreaIndex {
    areas: Vec<RestrictedArea>,
}

impl RestrictedAreaIndex {
    pub fn new(areas: Vec<RestrictedArea>) -> Self {
        Self { areas }
    }

    /// First area (in index order) containing `point`.
    pub fn first_overlapping(&self, point: Vec3) -> Option<&RestrictedArea> {
        self.areas.iter().find(|area| area.contains(point))
    }

    /// All areas containing `point`, in index order.
    pub fn overlapping(&self, point: Vec3) -> impl Iterator<Item = &RestrictedArea> {
        self.areas.iter().filter(move |area| area.contains(point))
    }

    pub fn iter(&self) -> impl Iterator<Item = &RestrictedArea> {
        self.areas.iter()
    }

    pub fn len(&self) -> usize {
        self.areas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.areas.is_empty()
    }

    /// True when some area belongs to `building`.
    pub fn covers_building(&self, building: usize) -> bool {
        self.areas.iter().any(|area| area.building == building)
    }
}
