// Last known pointer position, and the pull it has on particles close to it.
// The host writes it whenever the mouse moves; the field only ever reads the
// latest value.

use vecmath::Vector2;

#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct PointerState {
    pub pos: Vector2<f64>,
}

impl PointerState {
    pub fn new(pos: Vector2<f64>) -> Self {
        PointerState { pos }
    }

    pub fn move_to(&mut self, x: f64, y: f64) {
        self.pos = [x, y];
    }

    // Vector from a point to the pointer, and its length
    pub fn offset_from(&self, point: Vector2<f64>) -> (Vector2<f64>, f64) {
        let to_pointer = vecmath::vec2_sub(self.pos, point);
        (to_pointer, vecmath::vec2_len(to_pointer))
    }

    /// Velocity change the pointer applies to a particle at `point` this frame.
    ///
    /// Falls off linearly from full `strength` at the pointer to nothing at
    /// `radius`, and is scaled by the raw offset rather than its direction,
    /// so the pull is gentle both very close and near the edge.
    pub fn attraction(&self, point: Vector2<f64>, radius: f64, strength: f64) -> Option<Vector2<f64>> {
        let (to_pointer, distance) = self.offset_from(point);
        if distance < radius {
            let force = (radius - distance) / radius;
            Some(vecmath::vec2_scale(to_pointer, force * strength))
        } else {
            None
        }
    }
}
