//! Dense 2D cell container with affine world mapping and tolerant bounds.
//!
//! Out-of-range reads return `None` and out-of-range writes are ignored:
//! neighbor-window lookups at grid edges rely on that tolerance instead of
//! guarding every access.

use crate::types::WorldPos;

#[derive(Clone, Debug, PartialEq)]
pub struct Grid<T> {
    width: usize,
    height: usize,
    cell_size: f32,
    origin: WorldPos,
    cells: Vec<T>,
}

impl<T> Grid<T> {
    /// Eagerly builds every cell through `factory(x, y)`.
    pub fn new(
        width: usize,
        height: usize,
        cell_size: f32,
        origin: WorldPos,
        mut factory: impl FnMut(u32, u32) -> T,
    ) -> Self {
        let mut cells = Vec::with_capacity(width * height);
        for x in 0..width {
            for y in 0..height {
                cells.push(factory(x as u32, y as u32));
            }
        }
        Self { width, height, cell_size, origin, cells }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    fn index(&self, x: u32, y: u32) -> Option<usize> {
        let (x, y) = (x as usize, y as usize);
        (x < self.width && y < self.height).then(|| x * self.height + y)
    }

    pub fn get(&self, x: u32, y: u32) -> Option<&T> {
        self.index(x, y).map(|index| &self.cells[index])
    }

    pub fn get_mut(&mut self, x: u32, y: u32) -> Option<&mut T> {
        self.index(x, y).map(|index| &mut self.cells[index])
    }

    pub fn set(&mut self, x: u32, y: u32, value: T) {
        if let Some(index) = self.index(x, y) {
            self.cells[index] = value;
        }
    }

    /// Lower-left corner of cell `(x, y)`: `origin + (x, y) * cell_size`.
    pub fn world_position(&self, x: u32, y: u32) -> WorldPos {
        WorldPos {
            x: self.origin.x + x as f32 * self.cell_size,
            y: self.origin.y + y as f32 * self.cell_size,
        }
    }

    /// Floor-division inverse of [`Self::world_position`]; the result may
    /// lie outside the grid.
    pub fn cell_of(&self, world: WorldPos) -> (i32, i32) {
        (
            ((world.x - self.origin.x) / self.cell_size).floor() as i32,
            ((world.y - self.origin.y) / self.cell_size).floor() as i32,
        )
    }

    /// Cells in `(x, y)`-major order, the canonical iteration order.
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.cells.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut T> {
        self.cells.iter_mut()
    }
}
