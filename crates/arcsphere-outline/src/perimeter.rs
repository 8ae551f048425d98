//! Positions along the border of the unit square.
//!
//! A perimeter key runs clockwise from the top-left corner (seen with `v = 1`
//! at the top): `[0, 1)` top, `[1, 2)` right, `[2, 3)` bottom, `[3, 4)` left.
//! Corners sit at integer keys.

use glam::Vec2;

use crate::error::OutlineError;

/// Length of the whole border in key units.
pub const PERIMETER: f32 = 4.0;

/// Clockwise key of a point on the border.
///
/// Classification uses exact comparisons, tried in the order top, right,
/// bottom, left, so each corner gets the key of the edge it starts.
pub fn perimeter_key(uv: Vec2) -> Result<f32, OutlineError> {
    if uv.y == 1.0 {
        Ok(uv.x)
    } else if uv.x == 1.0 {
        Ok(1.0 + (1.0 - uv.y))
    } else if uv.y == 0.0 {
        Ok(2.0 + (1.0 - uv.x))
    } else if uv.x == 0.0 {
        Ok(3.0 + uv.y)
    } else {
        Err(OutlineError::OffBorder { u: uv.x, v: uv.y })
    }
}

/// Unit direction of a clockwise walk along the border at `key`.
pub fn clockwise_direction(key: f32) -> Vec2 {
    match key.rem_euclid(PERIMETER) {
        k if k < 1.0 => Vec2::X,
        k if k < 2.0 => Vec2::NEG_Y,
        k if k < 3.0 => Vec2::NEG_X,
        _ => Vec2::Y,
    }
}

/// The square corner at an integer key.
pub fn corner_at(key: f32) -> Vec2 {
    match key.rem_euclid(PERIMETER) as u32 {
        0 => Vec2::new(0.0, 1.0),
        1 => Vec2::new(1.0, 1.0),
        2 => Vec2::new(1.0, 0.0),
        _ => Vec2::new(0.0, 0.0),
    }
}

/// Distance walked from `from` to `to` in the given direction.
pub fn walk_distance(from: f32, to: f32, clockwise: bool) -> f32 {
    if clockwise {
        (to - from).rem_euclid(PERIMETER)
    } else {
        (from - to).rem_euclid(PERIMETER)
    }
}

/// Corners passed strictly between `from` and `to`, in walking order.
pub fn corners_between(from: f32, to: f32, clockwise: bool) -> Vec<Vec2> {
    let distance = walk_distance(from, to, clockwise);
    let mut corners = Vec::new();
    if clockwise {
        let mut key = from.floor() + 1.0;
        while key - from < distance {
            corners.push(corner_at(key));
            key += 1.0;
        }
    } else {
        let mut key = from.ceil() - 1.0;
        while from - key < distance {
            corners.push(corner_at(key));
            key -= 1.0;
        }
    }
    corners
}
