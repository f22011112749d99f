//! Facade Texture Synthesizer
//!
//! Window bitmaps for building walls. A facade is a grid of window cells of
//! 8 x 12 pixels; each cell has a 1 pixel transparent border around a 6 x 10
//! glass rectangle painted with one level of the brightness ladder.
//!
//! Two styles exist:
//!
//! - **Fuzzy**: windows are lit at random, then a glow spreads to their
//!   neighbours over two propagation passes.
//! - **Linear**: windows are scanned row by row and lit in runs, with a
//!   gradient on both ends of each run.
//!
//! Lighting is decided on a cell grid first and rasterized at the end.

use image::{Rgba, RgbaImage};
use log::debug;

use crate::error::Result;
use crate::game::city::building::TextureClass;
use crate::game::config::CityConfig;
use crate::world::CityRng;

/// Window cell width in pixels
pub const WINDOW_WIDTH: u32 = 8;
/// Window cell height in pixels
pub const WINDOW_HEIGHT: u32 = 12;
/// Transparent border around the glass, in pixels
pub const WINDOW_BORDER: u32 = 1;
pub const GLASS_WIDTH: u32 = WINDOW_WIDTH - 2 * WINDOW_BORDER;
pub const GLASS_HEIGHT: u32 = WINDOW_HEIGHT - 2 * WINDOW_BORDER;

/// Window columns of the default city before jitter
pub const DEFAULT_WINDOWS_X: i32 = 12;
/// Window rows of the default city before jitter
pub const DEFAULT_WINDOWS_Y: i32 = 23;

/// Random spread applied to the window counts
const WINDOW_COUNT_SPREAD: i32 = 4;

/// Number of glow propagation passes on fuzzy facades
const GLOW_PASSES: usize = 2;

/// Stream id offset for per-class forks
const FACADE_STREAM: u64 = 0x2000_0000;

// ============================================================================
// BRIGHTNESS LADDER
// ============================================================================

/// Glass brightness, ordered from dark to white.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Brightness {
    Dark,
    Bright4,
    Bright3,
    Bright2,
    White,
}

impl Brightness {
    /// Grey level of the glass.
    pub fn level(self) -> u8 {
        match self {
            Brightness::Dark => 20,
            Brightness::Bright4 => 50,
            Brightness::Bright3 => 100,
            Brightness::Bright2 => 150,
            Brightness::White => 255,
        }
    }

    /// Next level down the ladder; dark has none.
    pub fn dimmer(self) -> Option<Brightness> {
        match self {
            Brightness::White => Some(Brightness::Bright2),
            Brightness::Bright2 => Some(Brightness::Bright3),
            Brightness::Bright3 => Some(Brightness::Bright4),
            Brightness::Bright4 => Some(Brightness::Dark),
            Brightness::Dark => None,
        }
    }

    pub fn rgba(self) -> Rgba<u8> {
        let l = self.level();
        Rgba([l, l, l, 255])
    }

    /// Ladder level for a grey value, if it is one.
    pub fn from_level(level: u8) -> Option<Brightness> {
        [
            Brightness::Dark,
            Brightness::Bright4,
            Brightness::Bright3,
            Brightness::Bright2,
            Brightness::White,
        ]
        .into_iter()
        .find(|b| b.level() == level)
    }
}

// ============================================================================
// WINDOW GRID
// ============================================================================

/// Brightness of every window, column-major addressing by `(x, y)`.
#[derive(Debug, Clone, PartialEq)]
pub struct WindowGrid {
    columns: usize,
    rows: usize,
    cells: Vec<Brightness>,
}

impl WindowGrid {
    pub fn new(columns: usize, rows: usize) -> Self {
        Self {
            columns,
            rows,
            cells: vec![Brightness::Dark; columns * rows],
        }
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn get(&self, x: usize, y: usize) -> Brightness {
        self.cells[y * self.columns + x]
    }

    pub fn set(&mut self, x: usize, y: usize, value: Brightness) {
        self.cells[y * self.columns + x] = value;
    }

    /// Brightest of the four axis neighbours, `None` for a 1 x 1 grid.
    fn brightest_neighbour(&self, x: usize, y: usize) -> Option<Brightness> {
        let mut best: Option<Brightness> = None;
        let mut consider = |nx: usize, ny: usize| {
            let b = self.get(nx, ny);
            if best.is_none_or(|cur| b > cur) {
                best = Some(b);
            }
        };
        if y > 0 {
            consider(x, y - 1);
        }
        if y + 1 < self.rows {
            consider(x, y + 1);
        }
        if x > 0 {
            consider(x - 1, y);
        }
        if x + 1 < self.columns {
            consider(x + 1, y);
        }
        best
    }

    /// Paint every glass rectangle. Borders stay fully transparent.
    pub fn rasterize(&self) -> RgbaImage {
        let width = self.columns as u32 * WINDOW_WIDTH;
        let height = self.rows as u32 * WINDOW_HEIGHT;
        let mut image = RgbaImage::new(width, height);

        for y in 0..self.rows {
            for x in 0..self.columns {
                let color = self.get(x, y).rgba();
                let left = x as u32 * WINDOW_WIDTH + WINDOW_BORDER;
                let top = y as u32 * WINDOW_HEIGHT + WINDOW_BORDER;
                for py in top..top + GLASS_HEIGHT {
                    for px in left..left + GLASS_WIDTH {
                        image.put_pixel(px, py, color);
                    }
                }
            }
        }
        image
    }
}

// ============================================================================
// SYNTHESIS
// ============================================================================

/// Facade bitmap for the default window counts.
pub fn synthesize_facade(class: TextureClass, low_density: bool, rng: &mut CityRng) -> Result<RgbaImage> {
    synthesize_facade_sized(class, low_density, (DEFAULT_WINDOWS_X, DEFAULT_WINDOWS_Y), rng)
}

/// Facade bitmap around `base_windows` (columns, rows), each jittered by up to
/// four windows.
pub fn synthesize_facade_sized(
    class: TextureClass,
    low_density: bool,
    base_windows: (i32, i32),
    rng: &mut CityRng,
) -> Result<RgbaImage> {
    let columns = rng.more_or_less(base_windows.0, WINDOW_COUNT_SPREAD)?.max(1) as usize;
    let rows = rng.more_or_less(base_windows.1, WINDOW_COUNT_SPREAD)?.max(1) as usize;

    let grid = match class {
        TextureClass::Fuzzy(_) => fuzzy_windows(columns, rows, low_density, rng)?,
        TextureClass::Linear(_) => linear_windows(columns, rows, low_density, rng)?,
    };
    Ok(grid.rasterize())
}

/// One bitmap per texture class, each drawn from its own fork of `rng`.
///
/// The result is indexed by [`TextureClass::index`].
pub fn synthesize_all(config: &CityConfig, rng: &CityRng) -> Result<Vec<(TextureClass, RgbaImage)>> {
    let base = (config.base_windows_x(), config.base_windows_y());
    TextureClass::all(config.classes_per_style)
        .map(|class| {
            let stream = FACADE_STREAM + class.index(config.classes_per_style) as u64;
            let mut class_rng = rng.fork(stream);
            let image = synthesize_facade_sized(class, config.low_density_facades, base, &mut class_rng)?;
            debug!("facade {class}: {}x{} px", image.width(), image.height());
            Ok((class, image))
        })
        .collect()
}

/// Random lit windows, then the glow passes of [`spread_glow`].
pub fn fuzzy_windows(columns: usize, rows: usize, low_density: bool, rng: &mut CityRng) -> Result<WindowGrid> {
    let mut chance_white = rng.more_or_less(20, 10)?;
    let mut chance_repeat = rng.more_or_less(40, 20)?;
    if low_density {
        chance_white /= 2;
        chance_repeat /= 2;
    }

    let mut grid = WindowGrid::new(columns, rows);
    for x in 0..columns {
        for y in 0..rows {
            let lit = rng.chance(chance_white);
            grid.set(x, y, if lit { Brightness::White } else { Brightness::Dark });
        }
    }

    spread_glow(&mut grid, chance_repeat, rng);
    Ok(grid)
}

/// Glow passes of the fuzzy style, in place, columns outer and rows inner.
///
/// A non-white window takes one level below its brightest neighbour with
/// `chance_repeat`, and only when that brightens it.
pub fn spread_glow(grid: &mut WindowGrid, chance_repeat: i32, rng: &mut CityRng) {
    for _ in 0..GLOW_PASSES {
        for x in 0..grid.columns() {
            for y in 0..grid.rows() {
                let current = grid.get(x, y);
                if current == Brightness::White {
                    continue;
                }
                let Some(neighbour) = grid.brightest_neighbour(x, y) else {
                    continue;
                };
                if !rng.chance(chance_repeat) {
                    continue;
                }
                match neighbour.dimmer() {
                    Some(glow) if glow > current => grid.set(x, y, glow),
                    _ => {}
                }
            }
        }
    }
}

/// Runs of lit windows scanned row by row.
pub fn linear_windows(columns: usize, rows: usize, low_density: bool, rng: &mut CityRng) -> Result<WindowGrid> {
    let space_length = rng.more_or_less(11, 3)?;
    let white_length = rng.more_or_less(14, 4)?;
    let chance_continue = rng.more_or_less(25, 5)?;
    let mut chance_start = rng.more_or_less(15, 5)?;
    if low_density {
        chance_start /= 2;
    }

    let mut grid = WindowGrid::new(columns, rows);
    let mut white_count = 0;
    // no run before the first cell, so the required gap is already there
    let mut space = 100;

    for y in 0..rows {
        for x in 0..columns {
            let cell = if white_count == 0 && space >= space_length && rng.chance(chance_start) {
                white_count = 1;
                space = 0;
                if rng.chance(50) {
                    Brightness::Bright4
                } else {
                    Brightness::Bright3
                }
            } else if white_count > 0 && white_count <= white_length {
                let b = if white_count == 1 {
                    Brightness::Bright2
                } else {
                    Brightness::White
                };
                white_count += 1;
                b
            } else if white_count > 0 && rng.chance(chance_continue) {
                white_count += 1;
                Brightness::White
            } else {
                white_count = 0;
                space += 1;
                match space {
                    1 => Brightness::Bright2,
                    2 => {
                        if rng.chance(50) {
                            Brightness::Bright3
                        } else {
                            Brightness::Bright4
                        }
                    }
                    _ => Brightness::Dark,
                }
            };
            grid.set(x, y, cell);
        }
    }
    Ok(grid)
}
