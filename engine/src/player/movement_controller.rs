//! Player Movement Controller
//!
//! Moves the first-person eye through the generated city by explicit deltas.
//! There is no velocity or gravity: every input is one discrete step.
//!
//! # Move Resolution
//!
//! 1. The delta is applied to the eye and the look target.
//! 2. Every restricted area containing the new eye blocks the move. Only the
//!    axes that crossed the area's wall are rolled back, so the player slides
//!    along buildings. If no axis crossed, the whole delta is rolled back.
//! 3. Outside restricted areas, the treasure volume is tested. The first entry
//!    raises the treasure-found event; later entries do not.
//! 4. On stairs or in the corridor, the eye height snaps onto the floor. The
//!    corridor only catches a player whose feet were already below ground,
//!    and a blocked move never snaps.
//! 5. An axis leaving the city bounds is rolled back.
//!
//! # Usage
//!
//! ```rust,ignore
//! use randcity_engine::game::generate_city;
//! use randcity_engine::player::{PlayerMovementController, MoveDirection};
//!
//! let city = generate_city(&Default::default(), Some(42))?;
//! let mut controller = PlayerMovementController::new(city.walk_world());
//! controller.on_treasure_found(|eye| println!("found it at {eye}"));
//!
//! // Each input:
//! let outcome = controller.step(MoveDirection::Forward);
//! backend.submit_frame(&controller.camera())?;
//! ```

use std::fmt;

use glam::Vec3;
use log::{debug, info};

use crate::error::{CityError, Result};
use crate::game::city::StairsModel;
use crate::physics::{Aabb, Axis, FloorSurface, RestrictedAreaIndex, floor_under};
use crate::world::CityRng;

/// Distance covered by one directional step
pub const MOVE_STEP: f32 = 5.0;

/// Initial eye position, on the main road crossing
pub const START_EYE: Vec3 = Vec3::new(0.0, 10.0, 7.0);

/// Distance at which `walk_to` considers a coordinate reached
const WALK_TOLERANCE: f32 = 1e-3;

// ============================================================================
// STATE
// ============================================================================

/// Eye position and the point it looks at.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlayerState {
    pub eye: Vec3,
    pub look_target: Vec3,
}

impl Default for PlayerState {
    fn default() -> Self {
        Self {
            eye: START_EYE,
            look_target: START_EYE - Vec3::Z,
        }
    }
}

impl PlayerState {
    pub fn new(eye: Vec3, look_target: Vec3) -> Self {
        Self { eye, look_target }
    }

    /// Normalised view direction, zero when eye and target coincide.
    pub fn forward(&self) -> Vec3 {
        (self.look_target - self.eye).normalize_or_zero()
    }
}

/// View handed to the rendering backend each frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraState {
    pub eye: Vec3,
    pub target: Vec3,
    pub up: Vec3,
}

/// Where the eye ended up after a move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerZone {
    Free,
    InRestrictedArea,
    AtTreasure,
}

/// Result of one [`PlayerMovementController::move_by`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveOutcome {
    /// No restricted area and no city bound got in the way
    pub free: bool,
    pub zone: PlayerZone,
    /// True only for the move that first reached the treasure
    pub treasure_found: bool,
}

/// Summary of a [`PlayerMovementController::walk_to`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct WalkReport {
    pub steps: usize,
    /// False when a building or the city edge stopped the walk
    pub arrived: bool,
    pub treasure_found: bool,
}

/// Axis-aligned steps, as given by the direction buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveDirection {
    Forward,
    Backward,
    Left,
    Right,
    Up,
    Down,
}

impl MoveDirection {
    /// Unit delta in world space. Forward is -Z.
    pub fn unit(self) -> Vec3 {
        match self {
            MoveDirection::Forward => Vec3::NEG_Z,
            MoveDirection::Backward => Vec3::Z,
            MoveDirection::Left => Vec3::NEG_X,
            MoveDirection::Right => Vec3::X,
            MoveDirection::Up => Vec3::Y,
            MoveDirection::Down => Vec3::NEG_Y,
        }
    }
}

// ============================================================================
// WORLD
// ============================================================================

/// Everything the controller needs to know about the city.
#[derive(Debug, Clone)]
pub struct WalkWorld {
    pub restricted_areas: RestrictedAreaIndex,
    pub stairs: StairsModel,
    /// Surfaces tested after the stairs, in order
    pub floors: Vec<FloorSurface>,
    pub treasure_volume: Option<Aabb>,
    /// City bounds are `[-half_grid, +half_grid]` on X and Z
    pub half_grid: f32,
    pub eye_height: f32,
    pub max_spawn_attempts: u32,
}

impl WalkWorld {
    /// Open ground with no buildings, stairs or treasure.
    pub fn open(half_grid: f32, eye_height: f32) -> Self {
        Self {
            restricted_areas: RestrictedAreaIndex::default(),
            stairs: StairsModel::empty(),
            floors: Vec::new(),
            treasure_volume: None,
            half_grid,
            eye_height,
            max_spawn_attempts: 1000,
        }
    }

    /// Floor height under the planar position of `p` for a player whose feet
    /// are at `feet_y`: stairs first, then the other surfaces.
    pub fn floor_height_at(&self, p: Vec3, feet_y: f32) -> Option<f32> {
        self.stairs
            .surface_at(p.x, p.z)
            .filter(|s| s.admits(feet_y))
            .or_else(|| floor_under(&self.floors, p, feet_y))
            .map(|s| s.height)
    }
}

// ============================================================================
// CONTROLLER
// ============================================================================

type TreasureCallback = Box<dyn FnMut(Vec3)>;

/// Discrete-step movement with sliding collision and a one-shot win event.
///
/// Single-threaded and not reentrant: callbacks must not call back into the
/// controller.
pub struct PlayerMovementController {
    state: PlayerState,
    world: WalkWorld,
    treasure_found: bool,
    callbacks: Vec<TreasureCallback>,
}

impl fmt::Debug for PlayerMovementController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PlayerMovementController")
            .field("state", &self.state)
            .field("treasure_found", &self.treasure_found)
            .field("callbacks", &self.callbacks.len())
            .finish_non_exhaustive()
    }
}

impl PlayerMovementController {
    /// Controller starting at [`START_EYE`], looking down -Z.
    pub fn new(world: WalkWorld) -> Self {
        Self::with_state(world, PlayerState::default())
    }

    pub fn with_state(world: WalkWorld, state: PlayerState) -> Self {
        Self {
            state,
            world,
            treasure_found: false,
            callbacks: Vec::new(),
        }
    }

    pub fn state(&self) -> PlayerState {
        self.state
    }

    pub fn world(&self) -> &WalkWorld {
        &self.world
    }

    pub fn camera(&self) -> CameraState {
        CameraState {
            eye: self.state.eye,
            target: self.state.look_target,
            up: Vec3::Y,
        }
    }

    /// True once the treasure has been reached.
    pub fn has_found_treasure(&self) -> bool {
        self.treasure_found
    }

    /// Register a callback fired once, with the eye position, when the
    /// treasure is first reached.
    pub fn on_treasure_found(&mut self, callback: impl FnMut(Vec3) + 'static) {
        self.callbacks.push(Box::new(callback));
    }

    /// Move one [`MOVE_STEP`] in `direction`.
    pub fn step(&mut self, direction: MoveDirection) -> MoveOutcome {
        self.move_by(direction.unit() * MOVE_STEP)
    }

    /// Apply `delta` to the eye and look target, resolving collisions.
    pub fn move_by(&mut self, delta: Vec3) -> MoveOutcome {
        let previous = self.state;
        let mut next = PlayerState {
            eye: previous.eye + delta,
            look_target: previous.look_target + delta,
        };

        // Restricted areas, tested against the unresolved position
        let blocking: Vec<Aabb> = self
            .world
            .restricted_areas
            .overlapping(next.eye)
            .map(|area| area.bounds)
            .collect();
        let in_restricted_area = !blocking.is_empty();
        for bounds in &blocking {
            let crossed: Vec<Axis> = Axis::ALL
                .into_iter()
                .filter(|&axis| !bounds.contains_axis(axis, axis.of(previous.eye)))
                .collect();
            if crossed.is_empty() {
                next = previous;
                break;
            }
            for axis in crossed {
                revert_axis(&mut next, &previous, axis);
            }
        }
        if in_restricted_area {
            debug!("move {delta} blocked at {}", previous.eye);
        }

        // Treasure
        let mut zone = if in_restricted_area {
            PlayerZone::InRestrictedArea
        } else {
            PlayerZone::Free
        };
        let mut treasure_found = false;
        if !in_restricted_area
            && self
                .world
                .treasure_volume
                .is_some_and(|volume| volume.contains(next.eye))
        {
            zone = PlayerZone::AtTreasure;
            if !self.treasure_found {
                self.treasure_found = true;
                treasure_found = true;
                info!("treasure found at {}", next.eye);
                for callback in &mut self.callbacks {
                    callback(next.eye);
                }
            }
        }

        // Floors, reached from where the feet were before the move
        let feet_y = previous.eye.y - self.world.eye_height;
        let floor = if in_restricted_area {
            None
        } else {
            self.world.floor_height_at(next.eye, feet_y)
        };
        if let Some(height) = floor {
            let eye_y = height + self.world.eye_height;
            next.eye.y = eye_y;
            next.look_target.y = eye_y;
        }

        // City bounds
        let mut out_of_bounds = false;
        for axis in [Axis::X, Axis::Z] {
            if axis.of(next.eye).abs() > self.world.half_grid {
                revert_axis(&mut next, &previous, axis);
                out_of_bounds = true;
            }
        }

        self.state = next;
        MoveOutcome {
            free: !in_restricted_area && !out_of_bounds,
            zone,
            treasure_found,
        }
    }

    /// Walk to `target` on the XZ plane, X first, in steps of at most
    /// [`MOVE_STEP`]. Stops at the first move that is not free.
    pub fn walk_to(&mut self, target: Vec3) -> WalkReport {
        let mut report = WalkReport::default();
        for axis in [Axis::X, Axis::Z] {
            loop {
                let remaining = axis.of(target) - axis.of(self.state.eye);
                if remaining.abs() <= WALK_TOLERANCE {
                    break;
                }
                let outcome = self.move_by(axis.unit() * remaining.clamp(-MOVE_STEP, MOVE_STEP));
                report.steps += 1;
                report.treasure_found |= outcome.treasure_found;
                if !outcome.free {
                    return report;
                }
            }
        }
        report.arrived = true;
        report
    }

    /// Teleport to a random free spot at road level.
    ///
    /// Draws positions uniformly over the city and keeps the first one outside
    /// every restricted area, giving up after `max_spawn_attempts` draws.
    pub fn spawn_random(&mut self, rng: &mut CityRng) -> Result<Vec3> {
        let bound = self.world.half_grid.floor() as i32;
        for _ in 0..self.world.max_spawn_attempts {
            let x = rng.int_between(-bound, bound)? as f32;
            let z = rng.int_between(-bound, bound)? as f32;
            let eye = Vec3::new(x, self.world.eye_height, z);
            if self.world.restricted_areas.first_overlapping(eye).is_none() {
                self.state = PlayerState::new(eye, eye - Vec3::Z);
                debug!("spawned at {eye}");
                return Ok(eye);
            }
        }
        Err(CityError::GenerationInvariantViolation(format!(
            "no free spawn point after {} attempts",
            self.world.max_spawn_attempts
        )))
    }
}

/// Restore one coordinate of eye and look target from `previous`.
fn revert_axis(next: &mut PlayerState, previous: &PlayerState, axis: Axis) {
    match axis {
        Axis::X => {
            next.eye.x = previous.eye.x;
            next.look_target.x = previous.look_target.x;
        }
        Axis::Y => {
            next.eye.y = previous.eye.y;
            next.look_target.y = previous.look_target.y;
        }
        Axis::Z => {
            next.eye.z = previous.eye.z;
            next.look_target.z = previous.look_target.z;
        }
    }
}
