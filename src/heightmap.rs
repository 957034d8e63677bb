//! Fixed-size heightfield grid.

/// Edge length of a heightfield tile, in cells.
pub const TILE_SIZE: usize = 1024;
/// Mask that wraps a world coordinate into a tile-local one.
pub const TILE_MASK: i32 = TILE_SIZE as i32 - 1;
/// World-space origin of the primary tile on both axes.
pub const TILE_ORIGIN: i32 = TILE_SIZE as i32;

/// A 1024x1024 grid of height samples in 0..=255.
///
/// The size is fixed by construction, so any two heightmaps always share the
/// same dimensions.
#[derive(Clone, PartialEq, Eq)]
pub struct Heightmap {
    cells: Box<[u8]>,
}

impl Default for Heightmap {
    fn default() -> Self {
        Self::flat(0)
    }
}

impl std::fmt::Debug for Heightmap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Heightmap")
            .field("size", &TILE_SIZE)
            .finish_non_exhaustive()
    }
}

impl Heightmap {
    /// Creates a heightmap with every cell set to `height`.
    pub fn flat(height: u8) -> Self {
        Self {
            cells: vec![height; TILE_SIZE * TILE_SIZE].into_boxed_slice(),
        }
    }

    /// Builds a heightmap by evaluating `f(x, y)` for every cell.
    pub fn from_fn(mut f: impl FnMut(usize, usize) -> u8) -> Self {
        let mut cells = Vec::with_capacity(TILE_SIZE * TILE_SIZE);
        for y in 0..TILE_SIZE {
            for x in 0..TILE_SIZE {
                cells.push(f(x, y));
            }
        }
        Self {
            cells: cells.into_boxed_slice(),
        }
    }

    /// Returns the height at tile-local coordinates.
    ///
    /// # Panics
    /// Panics if either coordinate is outside 0..1024.
    #[inline]
    pub fn get(&self, x: usize, y: usize) -> u8 {
        debug_assert!(x < TILE_SIZE && y < TILE_SIZE);
        self.cells[(y << 10) + x]
    }

    /// Sets the height at tile-local coordinates.
    ///
    /// # Panics
    /// Panics if either coordinate is outside 0..1024.
    #[inline]
    pub fn set(&mut self, x: usize, y: usize, height: u8) {
        debug_assert!(x < TILE_SIZE && y < TILE_SIZE);
        self.cells[(y << 10) + x] = height;
    }

    /// Samples with coordinates already wrapped by [`TILE_MASK`].
    #[inline]
    pub(crate) fn sample(&self, u: i32, v: i32) -> u8 {
        self.cells[((v << 10) + u) as usize]
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.cells
    }
}

/// Returns true when world coordinates fall inside the primary tile.
#[inline]
pub fn in_primary_tile(x: i32, z: i32) -> bool {
    (TILE_ORIGIN..TILE_ORIGIN + TILE_SIZE as i32).contains(&x)
        && (TILE_ORIGIN..TILE_ORIGIN + TILE_SIZE as i32).contains(&z)
}
