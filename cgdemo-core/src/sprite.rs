//! Sprite-sheet animation.
//!
//! A sprite sheet is one texture split into an equally sized grid of frames. The
//! [`SpriteAnimation`] steps through the frames on a fixed timer and yields the UV
//! rectangle of the frame to display. Frames are numbered row by row starting at the
//! top-left of the image.

use std::num::NonZeroU32;

use glam::{Mat4, Quat, Vec2};

/// Largest number of rows or columns a sprite sheet may have.
pub const MAX_GRID_SIDE: u32 = 4096;

/// An animated sprite drawn from a grid of frames in a single texture.
///
/// `H` is the handle of the texture the frames live in. The animation does not own the
/// texture.
#[derive(Debug, Clone, PartialEq)]
pub struct SpriteAnimation<H> {
    pub texture: H,
    rows: NonZeroU32,
    cols: NonZeroU32,
    frame_count: NonZeroU32,
    current_frame: u32,
    /// Seconds each frame stays on screen.
    pub frame_duration: f32,
    elapsed: f32,
    /// Size of the drawn quad in world units.
    pub size: Vec2,
    /// Center of the drawn quad in world units.
    pub position: Vec2,
    /// Rotation about the view axis, in radians.
    pub rotation: f32,
}

impl<H> SpriteAnimation<H> {
    /// Creates an animation over a `rows` x `cols` grid, starting at frame 0.
    ///
    /// The sprite is placed at the origin with a size of one unit. A grid with more
    /// than `u32::MAX` cells only animates through its first `u32::MAX` frames.
    pub fn new(texture: H, rows: NonZeroU32, cols: NonZeroU32, frame_duration: f32) -> Self {
        Self {
            texture,
            rows,
            cols,
            frame_count: rows.checked_mul(cols).unwrap_or(NonZeroU32::MAX),
            current_frame: 0,
            frame_duration,
            elapsed: 0.0,
            size: Vec2::ONE,
            position: Vec2::ZERO,
            rotation: 0.0,
        }
    }

    /// Sets where the sprite is drawn and how large.
    pub fn with_placement(mut self, position: Vec2, size: Vec2) -> Self {
        self.position = position;
        self.size = size;
        self
    }

    /// Sets the rotation about the view axis, in radians.
    pub fn with_rotation(mut self, rotation: f32) -> Self {
        self.rotation = rotation;
        self
    }

    pub fn rows(&self) -> u32 {
        self.rows.get()
    }

    pub fn cols(&self) -> u32 {
        self.cols.get()
    }

    /// Total number of frames in the grid.
    pub fn frame_count(&self) -> u32 {
        self.frame_count.get()
    }

    pub fn current_frame(&self) -> u32 {
        self.current_frame
    }

    /// Seconds accumulated since the last frame change.
    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    /// Jumps to the given frame, wrapping it into range, and restarts the frame timer.
    pub fn set_frame(&mut self, index: u32) {
        self.current_frame = index % self.frame_count();
        self.elapsed = 0.0;
    }

    /// Advances the animation clock by `dt` seconds.
    ///
    /// Once the accumulated time reaches the frame duration the animation moves to the
    /// next frame and the timer restarts from zero. Any time beyond the duration is
    /// dropped, so a single call never advances more than one frame. Returns `true` if
    /// the frame changed.
    pub fn advance(&mut self, dt: f32) -> bool {
        self.elapsed += dt;
        if self.elapsed >= self.frame_duration {
            self.current_frame = (self.current_frame + 1) % self.frame_count();
            self.elapsed = 0.0;
            true
        } else {
            false
        }
    }

    /// Returns the `(row, column)` of the current frame within the grid.
    pub fn frame_cell(&self) -> (u32, u32) {
        self.cell_of(self.current_frame)
    }

    fn cell_of(&self, index: u32) -> (u32, u32) {
        (index / self.cols.get(), index % self.cols.get())
    }

    /// Size of one frame in normalized texture coordinates.
    pub fn frame_size(&self) -> Vec2 {
        Vec2::new(1.0 / self.cols.get() as f32, 1.0 / self.rows.get() as f32)
    }

    /// UV corners of the current frame; see [`SpriteAnimation::uv_for_frame`].
    pub fn current_uv(&self) -> [Vec2; 4] {
        self.uv_for_frame(self.current_frame)
    }

    /// UV corners of frame `index`, ordered bottom-left, bottom-right, top-right,
    /// top-left.
    ///
    /// Rows are counted from the top of the image while V grows upwards, so row 0 sits at
    /// the top of UV space.
    pub fn uv_for_frame(&self, index: u32) -> [Vec2; 4] {
        let (row, col) = self.cell_of(index % self.frame_count());
        let size = self.frame_size();
        let u0 = col as f32 * size.x;
        let v0 = 1.0 - (row + 1) as f32 * size.y;

        [
            Vec2::new(u0, v0),
            Vec2::new(u0 + size.x, v0),
            Vec2::new(u0 + size.x, v0 + size.y),
            Vec2::new(u0, v0 + size.y),
        ]
    }

    /// Model matrix mapping a unit quad centered on the origin to the sprite's placement.
    pub fn model_matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(
            self.size.extend(1.0),
            Quat::from_rotation_z(self.rotation),
            self.position.extend(0.0),
        )
    }
}

/// Convenience for building a grid size from plain integers. Zero is raised to one and
/// sides above [`MAX_GRID_SIDE`] are lowered to it.
pub fn grid(rows: u32, cols: u32) -> (NonZeroU32, NonZeroU32) {
    if rows > MAX_GRID_SIDE || cols > MAX_GRID_SIDE {
        log::warn!(
            "Sprite grid {}x{} is too large, clamping each side to {}",
            rows,
            cols,
            MAX_GRID_SIDE
        );
    }
    let side = |n: u32| NonZeroU32::new(n.min(MAX_GRID_SIDE)).unwrap_or(NonZeroU32::MIN);
    (side(rows), side(cols))
}

#[cfg(test)]
mod tests {
    use glam::Vec3;

    use super::*;

    fn sheet(rows: u32, cols: u32, frame_duration: f32) -> SpriteAnimation<()> {
        let (rows, cols) = grid(rows, cols);
        SpriteAnimation::new((), rows, cols, frame_duration)
    }

    #[test]
    fn frame_maps_to_row_and_column() {
        let mut sprite = sheet(3, 4, 0.1);
        for index in 0..sprite.frame_count() {
            sprite.set_frame(index);
            assert_eq!(sprite.frame_cell(), (index / 4, index % 4));
        }
    }

    #[test]
    fn v_origin_decreases_with_row() {
        let sprite = sheet(4, 3, 0.1);
        let mut previous = f32::INFINITY;
        for row in 0..4 {
            let v0 = sprite.uv_for_frame(row * 3)[0].y;
            assert!(v0 < previous, "row {row}: {v0} !< {previous}");
            previous = v0;
        }
        assert!(previous.abs() < 1e-6);
    }

    #[test]
    fn uv_corners() {
        let mut sprite = sheet(4, 4, 0.1);
        sprite.set_frame(6);
        let uv = sprite.current_uv();
        // Row 1, column 2.
        assert_eq!(uv[0], Vec2::new(0.5, 0.5));
        assert_eq!(uv[1], Vec2::new(0.75, 0.5));
        assert_eq!(uv[2], Vec2::new(0.75, 0.75));
        assert_eq!(uv[3], Vec2::new(0.5, 0.75));
    }

    #[test]
    fn first_frame_is_top_left() {
        let sprite = sheet(2, 2, 0.1);
        assert_eq!(
            sprite.current_uv(),
            [
                Vec2::new(0.0, 0.5),
                Vec2::new(0.5, 0.5),
                Vec2::new(0.5, 1.0),
                Vec2::new(0.0, 1.0)
            ]
        );
    }

    #[test]
    fn advance_by_full_duration() {
        let mut sprite = sheet(4, 4, 0.25);
        assert!(sprite.advance(0.25));
        assert_eq!(sprite.current_frame(), 1);
        assert_eq!(sprite.elapsed(), 0.0);
    }

    #[test]
    fn advance_by_two_halves() {
        let mut sprite = sheet(4, 4, 0.25);
        assert!(!sprite.advance(0.125));
        assert_eq!(sprite.current_frame(), 0);
        assert!(sprite.advance(0.125));
        assert_eq!(sprite.current_frame(), 1);
        assert_eq!(sprite.elapsed(), 0.0);
    }

    #[test]
    fn large_steps_advance_once_and_drop_overshoot() {
        let mut sprite = sheet(4, 4, 0.1);
        assert!(sprite.advance(5.0));
        assert_eq!(sprite.current_frame(), 1);
        assert_eq!(sprite.elapsed(), 0.0);
    }

    #[test]
    fn wraps_after_last_frame() {
        let mut sprite = sheet(4, 4, 0.1);
        assert_eq!(sprite.frame_count(), 16);
        sprite.set_frame(15);
        sprite.advance(0.1);
        assert_eq!(sprite.current_frame(), 0);

        sprite.set_frame(17);
        assert_eq!(sprite.current_frame(), 1);
    }

    #[test]
    fn single_frame_covers_whole_texture() {
        let mut sprite = SpriteAnimation::new(7u32, NonZeroU32::MIN, NonZeroU32::MIN, 0.1);
        assert!(sprite.advance(1000.0));
        assert_eq!(sprite.current_frame(), 0);
        assert_eq!(
            sprite.current_uv(),
            [Vec2::ZERO, Vec2::X, Vec2::ONE, Vec2::Y]
        );
        assert_eq!(sprite.texture, 7);
    }

    #[test]
    fn zero_sized_grid_is_clamped() {
        let sprite = sheet(0, 0, 0.1);
        assert_eq!((sprite.rows(), sprite.cols()), (1, 1));
    }

    #[test]
    fn oversized_grid_is_clamped() {
        let mut sprite = sheet(65536, 65536, 0.1);
        assert_eq!((sprite.rows(), sprite.cols()), (MAX_GRID_SIDE, MAX_GRID_SIDE));
        assert_eq!(sprite.frame_count(), MAX_GRID_SIDE * MAX_GRID_SIDE);
        assert!(sprite.advance(1.0));
        assert_eq!(sprite.frame_cell(), (0, 1));
    }

    #[test]
    fn frame_count_saturates_instead_of_overflowing() {
        let side = NonZeroU32::new(65536).unwrap();
        let mut sprite = SpriteAnimation::new((), side, side, 0.1);
        assert_eq!(sprite.frame_count(), u32::MAX);

        sprite.set_frame(u32::MAX - 1);
        assert!(sprite.advance(0.1));
        assert_eq!(sprite.current_frame(), 0);
        let uv = sprite.current_uv();
        assert!(uv.iter().all(|corner| corner.is_finite()));
    }

    #[test]
    fn model_matrix_places_quad() {
        let sprite = sheet(1, 1, 0.1)
            .with_placement(Vec2::new(-350.0, 0.0), Vec2::splat(100.0))
            .with_rotation(std::f32::consts::FRAC_PI_2);
        let center = sprite.model_matrix().transform_point3(Vec3::ZERO);
        assert!(center.abs_diff_eq(Vec3::new(-350.0, 0.0, 0.0), 1e-4));

        // The quad's right edge midpoint rotates to the top.
        let edge = sprite
            .model_matrix()
            .transform_point3(Vec3::new(0.5, 0.0, 0.0));
        assert!(edge.abs_diff_eq(Vec3::new(-350.0, 50.0, 0.0), 1e-3));
    }
}
