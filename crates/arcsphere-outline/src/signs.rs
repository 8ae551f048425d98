//! Sign matrix: where a projected arc may jump or fold.
//!
//! A chart's seams lie on coordinate planes, so a span over which no
//! coordinate changes sign (and no coordinate changes direction) is free of
//! seams and folds.

use arcsphere_geometry::{SphericalArc, sign};

/// Signs of the position (row 0) and of its derivative along travel (row 1),
/// per axis.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SignMatrix(pub [[i8; 3]; 2]);

impl SignMatrix {
    /// Sample the ground path of `arc` at `t`, differencing towards `t + step`.
    ///
    /// The derivative row is normalised by the sign of `step`, so a backward
    /// difference at the end of an arc agrees with a forward one. Positions use
    /// the same `f32` evaluation the projection sees; the difference is taken
    /// in double precision, where a `DELTA`-sized step stays resolvable.
    pub fn sample(arc: &SphericalArc, t: f32, step: f32) -> Self {
        let position = arc.evaluate(t, 0.0);
        let here = arc.evaluate_f64(f64::from(t));
        let ahead = arc.evaluate_f64(f64::from(t) + f64::from(step));
        let difference = ahead - here;
        let direction = sign(step);

        let mut rows = [[0; 3]; 2];
        for axis in 0..3 {
            rows[0][axis] = sign(position[axis]);
            rows[1][axis] = sign_f64(difference[axis]) * direction;
        }
        Self(rows)
    }

    pub fn position(&self) -> [i8; 3] {
        self.0[0]
    }

    pub fn derivative(&self) -> [i8; 3] {
        self.0[1]
    }
}

fn sign_f64(value: f64) -> i8 {
    if value > 0.0 {
        1
    } else if value < 0.0 {
        -1
    } else {
        0
    }
}
