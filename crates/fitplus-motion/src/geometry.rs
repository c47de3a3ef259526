// ABOUTME: Landmark geometry: joint angles, vertical lean, side selection, knee travel
// ABOUTME: Pure functions over landmark slices plus a per-frame BodyGeometry measurement
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FitPlus Contributors

use fitplus_core::constants::geometry::{KNEE_ALIGNMENT_TOLERANCE, SHIN_LENGTH_EPS};
use fitplus_core::constants::landmarks::{
    LEFT_ANKLE, LEFT_ELBOW, LEFT_FOOT_INDEX, LEFT_HIP, LEFT_KNEE, LEFT_SHOULDER, LEFT_SIDE_GROUP,
    LEFT_WRIST, RIGHT_ANKLE, RIGHT_ELBOW, RIGHT_FOOT_INDEX, RIGHT_HIP, RIGHT_KNEE,
    RIGHT_SHOULDER, RIGHT_SIDE_GROUP, RIGHT_WRIST,
};
use fitplus_core::models::{Landmark, PoseFrame, Side};
use serde::{Deserialize, Serialize};

/// Angle at vertex `b` formed by `a-b-c`, in degrees `[0, 180]`
///
/// Uses the full 3D dot product. Returns `None` when any point is missing or
/// either arm has zero length.
#[must_use]
pub fn joint_angle(a: Option<&Landmark>, b: Option<&Landmark>, c: Option<&Landmark>) -> Option<f64> {
    let (a, b, c) = (a?, b?, c?);
    let ab = [a.x - b.x, a.y - b.y, a.z - b.z];
    let cb = [c.x - b.x, c.y - b.y, c.z - b.z];

    let dot = ab[2].mul_add(cb[2], ab[0].mul_add(cb[0], ab[1] * cb[1]));
    let mag_ab = ab[2].mul_add(ab[2], ab[0].mul_add(ab[0], ab[1] * ab[1])).sqrt();
    let mag_cb = cb[2].mul_add(cb[2], cb[0].mul_add(cb[0], cb[1] * cb[1])).sqrt();
    if mag_ab == 0.0 || mag_cb == 0.0 {
        return None;
    }

    let cos = (dot / (mag_ab * mag_cb)).clamp(-1.0, 1.0);
    Some(cos.acos().to_degrees())
}

/// Deviation of the segment `from -> to` from screen-up, in degrees `[0, 180]`
///
/// Image `y` grows downward, so "up" is `(0, -1)`.
#[must_use]
pub fn vertical_angle(from: Option<&Landmark>, to: Option<&Landmark>) -> Option<f64> {
    let (from, to) = (from?, to?);
    let vx = to.x - from.x;
    let vy = to.y - from.y;
    let norm = vx.hypot(vy);
    if norm == 0.0 {
        return None;
    }
    Some((-vy / norm).clamp(-1.0, 1.0).acos().to_degrees())
}

fn mean_visibility(landmarks: &[Landmark], group: &[usize]) -> f64 {
    let total: f64 = group
        .iter()
        .map(|&idx| landmarks.get(idx).map_or(0.0, |lm| lm.visibility))
        .sum();
    total / group.len() as f64
}

/// Side whose shoulder/hip/knee/ankle are more visible; ties resolve to left
#[must_use]
pub fn choose_primary_side(landmarks: &[Landmark]) -> Side {
    let left = mean_visibility(landmarks, &LEFT_SIDE_GROUP);
    let right = mean_visibility(landmarks, &RIGHT_SIDE_GROUP);
    if right > left {
        Side::Right
    } else {
        Side::Left
    }
}

/// Horizontal knee travel past the ankle, normalized by shin length
///
/// Forward is the ankle-to-toe direction, falling back to the hip-to-ankle
/// direction when the toe is missing, then to `+x`. Only forward travel
/// counts. Returns `None` for missing knee/ankle or a degenerate shin.
#[must_use]
pub fn knee_forward_ratio(
    knee: Option<&Landmark>,
    ankle: Option<&Landmark>,
    toe: Option<&Landmark>,
    hip: Option<&Landmark>,
) -> Option<f64> {
    let (knee, ankle) = (knee?, ankle?);

    let direction = toe
        .map(|toe| toe.x - ankle.x)
        .filter(|dx| *dx != 0.0)
        .or_else(|| hip.map(|hip| ankle.x - hip.x).filter(|dx| *dx != 0.0))
        .map_or(1.0, f64::signum);

    let shin = (knee.x - ankle.x).hypot(knee.y - ankle.y);
    if shin <= SHIN_LENGTH_EPS {
        return None;
    }

    let forward = (knee.x - ankle.x) * direction;
    Some(forward.max(0.0) / shin)
}

/// Which landmark set joint angles were computed from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AngleSource {
    /// World-space landmarks in meters
    World,
    /// Normalized image-space landmarks
    #[default]
    Normalized,
}

/// Landmark indices for one body side
#[derive(Debug, Clone, Copy)]
struct SideJoints {
    shoulder: usize,
    elbow: usize,
    wrist: usize,
    hip: usize,
    knee: usize,
    ankle: usize,
    toe: usize,
}

impl SideJoints {
    const fn of(side: Side) -> Self {
        match side {
            Side::Left => Self {
                shoulder: LEFT_SHOULDER,
                elbow: LEFT_ELBOW,
                wrist: LEFT_WRIST,
                hip: LEFT_HIP,
                knee: LEFT_KNEE,
                ankle: LEFT_ANKLE,
                toe: LEFT_FOOT_INDEX,
            },
            Side::Right => Self {
                shoulder: RIGHT_SHOULDER,
                elbow: RIGHT_ELBOW,
                wrist: RIGHT_WRIST,
                hip: RIGHT_HIP,
                knee: RIGHT_KNEE,
                ankle: RIGHT_ANKLE,
                toe: RIGHT_FOOT_INDEX,
            },
        }
    }
}

/// A pair of per-side measurements
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Bilateral {
    /// Left side value
    pub left: Option<f64>,
    /// Right side value
    pub right: Option<f64>,
}

impl Bilateral {
    /// Value for one side
    #[must_use]
    pub const fn side(&self, side: Side) -> Option<f64> {
        match side {
            Side::Left => self.left,
            Side::Right => self.right,
        }
    }

    /// Absolute left/right difference when both sides are present
    #[must_use]
    pub fn asymmetry(&self) -> Option<f64> {
        Some((self.left? - self.right?).abs())
    }
}

/// Every geometric measurement taken from one pose frame
///
/// Joint angles come from world landmarks when the frame carries them, and
/// from normalized landmarks otherwise. Positional measurements (lean,
/// horizontal offsets, knee travel) always use normalized coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BodyGeometry {
    /// Side chosen by landmark visibility
    pub side: Side,
    /// Landmark set used for joint angles
    pub angle_source: AngleSource,
    /// Hip-knee-ankle angles
    pub knee: Bilateral,
    /// Shoulder-hip-knee angles
    pub hip: Bilateral,
    /// Shoulder-elbow-wrist angles
    pub elbow: Bilateral,
    /// Elbow-shoulder-hip angles
    pub shoulder: Bilateral,
    /// Knee x minus ankle x
    pub knee_offset: Bilateral,
    /// Hip-midpoint to shoulder-midpoint lean from vertical
    pub spine: Option<f64>,
    /// Primary-side hip to shoulder lean from vertical
    pub torso_lean: Option<f64>,
    /// Primary-side shoulder-hip-ankle angle
    pub body_line: Option<f64>,
    /// Primary-side knee travel past the ankle over shin length
    pub knee_forward: Option<f64>,
    /// Primary-side `|wrist.x - shoulder.x|`
    pub wrist_shoulder_offset: Option<f64>,
}

fn midpoint(a: Option<&Landmark>, b: Option<&Landmark>) -> Option<Landmark> {
    let (a, b) = (a?, b?);
    Some(Landmark::new(
        (a.x + b.x) / 2.0,
        (a.y + b.y) / 2.0,
        (a.z + b.z) / 2.0,
        a.visibility.min(b.visibility),
    ))
}

impl BodyGeometry {
    /// Measure a frame; `None` when no person was detected
    #[must_use]
    pub fn measure(frame: &PoseFrame) -> Option<Self> {
        if !frame.has_person() {
            return None;
        }
        let norm = frame.landmarks.as_slice();
        let (angles, angle_source) = frame
            .world()
            .map_or((norm, AngleSource::Normalized), |world| {
                (world, AngleSource::World)
            });
        let side = choose_primary_side(norm);

        let per_side = |f: &dyn Fn(SideJoints) -> Option<f64>| Bilateral {
            left: f(SideJoints::of(Side::Left)),
            right: f(SideJoints::of(Side::Right)),
        };

        let knee = per_side(&|j| {
            joint_angle(Landmark::at(angles, j.hip), Landmark::at(angles, j.knee), Landmark::at(angles, j.ankle))
        });
        let hip = per_side(&|j| {
            joint_angle(Landmark::at(angles, j.shoulder), Landmark::at(angles, j.hip), Landmark::at(angles, j.knee))
        });
        let elbow = per_side(&|j| {
            joint_angle(Landmark::at(angles, j.shoulder), Landmark::at(angles, j.elbow), Landmark::at(angles, j.wrist))
        });
        let shoulder = per_side(&|j| {
            joint_angle(Landmark::at(angles, j.elbow), Landmark::at(angles, j.shoulder), Landmark::at(angles, j.hip))
        });
        let knee_offset = per_side(&|j| Some(Landmark::at(norm, j.knee)?.x - Landmark::at(norm, j.ankle)?.x));

        let spine = vertical_angle(
            midpoint(Landmark::at(norm, LEFT_HIP), Landmark::at(norm, RIGHT_HIP)).as_ref(),
            midpoint(Landmark::at(norm, LEFT_SHOULDER), Landmark::at(norm, RIGHT_SHOULDER)).as_ref(),
        );

        let primary = SideJoints::of(side);
        let torso_lean = vertical_angle(
            Landmark::at(norm, primary.hip),
            Landmark::at(norm, primary.shoulder),
        );
        let body_line = joint_angle(
            Landmark::at(angles, primary.shoulder),
            Landmark::at(angles, primary.hip),
            Landmark::at(angles, primary.ankle),
        );
        let knee_forward = knee_forward_ratio(
            Landmark::at(norm, primary.knee),
            Landmark::at(norm, primary.ankle),
            Landmark::at(norm, primary.toe),
            Landmark::at(norm, primary.hip),
        );
        let wrist_shoulder_offset = Landmark::at(norm, primary.wrist)
            .zip(Landmark::at(norm, primary.shoulder))
            .map(|(wrist, shoulder)| (wrist.x - shoulder.x).abs());

        Some(Self {
            side,
            angle_source,
            knee,
            hip,
            elbow,
            shoulder,
            knee_offset,
            spine,
            torso_lean,
            body_line,
            knee_forward,
            wrist_shoulder_offset,
        })
    }

    /// Whether both knees sit within tolerance of their ankles horizontally
    #[must_use]
    pub fn knees_aligned(&self) -> Option<bool> {
        let left = self.knee_offset.left?;
        let right = self.knee_offset.right?;
        Some(left.abs() < KNEE_ALIGNMENT_TOLERANCE && right.abs() < KNEE_ALIGNMENT_TOLERANCE)
    }
}
