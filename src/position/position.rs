use std::fmt;
use std::ops::{Add, Mul, Sub};

use glam::DVec3;
use serde::{Deserialize, Serialize};

/// Per-axis tolerance used when comparing two positions.
pub const POSITION_TOLERANCE: f64 = 1e-6;

/// Negative local remainders above `-LOCAL_EPSILON` are treated as zero when subtracting.
pub const LOCAL_EPSILON: f64 = 1e-9;

/// A point in the universe, split into an integral sector and a fractional
/// local offset inside that sector.
///
/// Every constructor and operator returns the canonical form: each sector
/// component is integral and each local component lies in `[0, 1)`.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
#[serde(from = "RawPosition", into = "RawPosition")]
pub struct Position {
    sector: DVec3,
    local: DVec3,
}

/// Wire shape of a position. Loading always goes back through normalization.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
struct RawPosition {
    sector: DVec3,
    #[serde(default)]
    local: DVec3,
}

impl From<RawPosition> for Position {
    fn from(raw: RawPosition) -> Self {
        Position::new(raw.sector, raw.local)
    }
}

impl From<Position> for RawPosition {
    fn from(p: Position) -> Self {
        RawPosition {
            sector: p.sector,
            local: p.local,
        }
    }
}

impl Position {
    pub const ZERO: Position = Position {
        sector: DVec3::ZERO,
        local: DVec3::ZERO,
    };

    /// Builds a position from raw sector and local parts, neither of which
    /// needs to be canonical.
    pub fn new(sector: DVec3, local: DVec3) -> Self {
        let (sx, lx) = normalize_axis(sector.x, local.x);
        let (sy, ly) = normalize_axis(sector.y, local.y);
        let (sz, lz) = normalize_axis(sector.z, local.z);
        Position {
            sector: DVec3::new(sx, sy, sz),
            local: DVec3::new(lx, ly, lz),
        }
    }

    pub fn from_sector(sector: DVec3) -> Self {
        Self::new(sector, DVec3::ZERO)
    }

    /// Splits a single absolute vector into sector and local parts.
    ///
    /// Far from the origin the fractional part of `value` is already limited by
    /// f64 precision, so prefer [`Position::new`] when the parts are known.
    pub fn from_combined(value: DVec3) -> Self {
        Self::from_sector(value)
    }

    pub fn sector(&self) -> DVec3 {
        self.sector
    }

    pub fn local(&self) -> DVec3 {
        self.local
    }

    /// Sector and local summed into one vector.
    pub fn combined(&self) -> DVec3 {
        self.sector + self.local
    }

    /// Sector components as integers. Components outside the `i64` range
    /// saturate to `i64::MIN` or `i64::MAX`; see [`Position::sector_in_index_range`].
    pub fn sector_index(&self) -> [i64; 3] {
        [
            self.sector.x as i64,
            self.sector.y as i64,
            self.sector.z as i64,
        ]
    }

    /// True when every sector component is exactly representable by
    /// [`Position::sector_index`].
    pub fn sector_in_index_range(&self) -> bool {
        // `i64::MAX as f64` rounds up to 2^63, which is itself out of range.
        let (min, max) = (i64::MIN as f64, i64::MAX as f64);
        self.sector.to_array().iter().all(|s| *s >= min && *s < max)
    }

    pub fn same_sector(&self, other: &Position) -> bool {
        self.sector == other.sector
    }

    /// Compares per axis using the exact sector difference plus the local
    /// difference, so points straddling a sector boundary still compare equal.
    pub fn approx_eq(&self, other: &Position, tolerance: f64) -> bool {
        let sector = self.sector - other.sector;
        let local = self.local - other.local;
        let delta = sector + local;
        delta.x.abs() <= tolerance && delta.y.abs() <= tolerance && delta.z.abs() <= tolerance
    }

    /// Euclidean distance in universe units.
    ///
    /// Positions sharing a sector only compare their local parts; otherwise
    /// both are collapsed to absolute vectors, which loses precision in
    /// proportion to the sector magnitude.
    pub fn distance(&self, other: &Position) -> f64 {
        if self.same_sector(other) {
            self.local.distance(other.local)
        } else {
            self.absolute_distance(other)
        }
    }

    fn absolute_distance(&self, other: &Position) -> f64 {
        self.combined().distance(other.combined())
    }

    /// Linear interpolation `self + (other - self) * t`.
    ///
    /// `t == 0` and `t == 1` return the endpoints unchanged.
    pub fn lerp(self, other: Position, t: f64) -> Position {
        if t == 0.0 {
            return self;
        }
        if t == 1.0 {
            return other;
        }
        self + (other - self) * t
    }

    /// Interpolates each axis by its own progress value. The scaled delta is
    /// applied to the local part only and then re-normalized.
    pub fn lerp_axes(self, other: Position, progress: DVec3) -> Position {
        let delta = (other - self).combined();
        Position::new(self.sector, self.local + delta * progress)
    }
}

impl Default for Position {
    fn default() -> Self {
        Position::ZERO
    }
}

impl PartialEq for Position {
    fn eq(&self, other: &Self) -> bool {
        self.approx_eq(other, POSITION_TOLERANCE)
    }
}

impl Add for Position {
    type Output = Position;

    fn add(self, rhs: Position) -> Position {
        Position::new(self.sector + rhs.sector, self.local + rhs.local)
    }
}

impl Sub for Position {
    type Output = Position;

    fn sub(self, rhs: Position) -> Position {
        let local = self.local - rhs.local;
        Position::new(
            self.sector - rhs.sector,
            DVec3::new(
                absorb_negative_noise(local.x),
                absorb_negative_noise(local.y),
                absorb_negative_noise(local.z),
            ),
        )
    }
}

impl Mul<f64> for Position {
    type Output = Position;

    fn mul(self, k: f64) -> Position {
        Position::new(self.sector * k, self.local * k)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "sector ({}, {}, {}) + local ({:.6}, {:.6}, {:.6})",
            self.sector.x, self.sector.y, self.sector.z, self.local.x, self.local.y, self.local.z
        )
    }
}

/// Ratio `delta.sector / area.sector` per axis, for proportional placement
/// inside a region. Axes where the area has no sector extent yield 0.
pub fn normalized_sector(delta: &Position, area: &Position) -> DVec3 {
    let ratio = |d: f64, a: f64| if a == 0.0 { 0.0 } else { d / a };
    DVec3::new(
        ratio(delta.sector.x, area.sector.x),
        ratio(delta.sector.y, area.sector.y),
        ratio(delta.sector.z, area.sector.z),
    )
}

/// Canonical `(floor(sector + local), fract)` for one axis, computed without
/// summing the two parts so the local fraction keeps its precision.
fn normalize_axis(sector: f64, local: f64) -> (f64, f64) {
    let sector = if sector.is_finite() { sector } else { 0.0 };
    let local = if local.is_finite() { local } else { 0.0 };

    let whole = sector.floor();
    let local = local + (sector - whole);
    let carry = local.floor();
    let mut sector = whole + carry;
    let mut local = local - carry;

    // A tiny negative remainder rounds up to exactly 1.0 above.
    if local >= 1.0 {
        local = 0.0;
        sector += 1.0;
    }
    (sector, local)
}

fn absorb_negative_noise(value: f64) -> f64 {
    if value < 0.0 && value > -LOCAL_EPSILON {
        0.0
    } else {
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_approx_eq::assert_approx_eq;
    use proptest::prelude::*;

    fn pos(sector: [f64; 3], local: [f64; 3]) -> Position {
        Position::new(DVec3::from_array(sector), DVec3::from_array(local))
    }

    #[test]
    fn negative_local_borrows_from_sector() {
        let p = pos([0.0, 0.0, 0.0], [-0.25, 0.0, 1.5]);
        assert_eq!(p.sector(), DVec3::new(-1.0, 0.0, 1.0));
        assert_eq!(p.local(), DVec3::new(0.75, 0.0, 0.5));
    }

    #[test]
    fn fractional_sector_moves_into_local() {
        let p = pos([2.5, -1.5, 0.0], [0.75, 0.0, 0.0]);
        assert_eq!(p.sector(), DVec3::new(3.0, -2.0, 0.0));
        assert_eq!(p.local(), DVec3::new(0.25, 0.5, 0.0));
    }

    #[test]
    fn negative_axis_is_adjusted_once() {
        // floor(-3 + -0.5) = -4, not -5
        let p = pos([-3.0, 0.0, 0.0], [-0.5, 0.0, 0.0]);
        assert_eq!(p.sector().x, -4.0);
        assert_eq!(p.local().x, 0.5);
    }

    #[test]
    fn tiny_negative_local_stays_canonical() {
        let p = pos([0.0, 0.0, 0.0], [-1e-18, 0.0, 0.0]);
        assert_eq!(p.sector().x, 0.0);
        assert!(p.local().x >= 0.0 && p.local().x < 1.0);
    }

    #[test]
    fn non_finite_components_collapse_to_zero() {
        let p = pos([f64::NAN, f64::INFINITY, 2.0], [0.5, f64::NEG_INFINITY, 0.5]);
        assert_eq!(p.sector(), DVec3::new(0.0, 0.0, 2.0));
        assert_eq!(p.local(), DVec3::new(0.5, 0.0, 0.5));
    }

    #[test]
    fn same_sector_distance_uses_local_vectors() {
        let a = pos([0.0, 0.0, 0.0], [0.1, 0.0, 0.1]);
        let b = pos([0.0, 0.0, 0.0], [0.9, 0.0, 0.9]);
        assert_approx_eq!(a.distance(&b), (0.8f64 * 0.8 + 0.8 * 0.8).sqrt(), 1e-12);
        assert_approx_eq!(a.distance(&b), 1.131, 1e-3);
    }

    #[test]
    fn distance_paths_agree_within_a_sector() {
        let a = pos([12.0, -4.0, 7.0], [0.2, 0.4, 0.6]);
        let b = pos([12.0, -4.0, 7.0], [0.7, 0.1, 0.3]);
        assert_approx_eq!(a.distance(&b), a.absolute_distance(&b), 1e-9);
    }

    #[test]
    fn cross_sector_distance() {
        let a = pos([0.0, 0.0, 0.0], [0.5, 0.0, 0.0]);
        let b = pos([3.0, 4.0, 0.0], [0.5, 0.0, 0.0]);
        assert_approx_eq!(a.distance(&b), 5.0, 1e-12);
        assert_approx_eq!(b.distance(&a), 5.0, 1e-12);
        assert_eq!(a.distance(&a), 0.0);
    }

    #[test]
    fn subtraction_absorbs_float_noise() {
        let a = pos([5.0, 0.0, 0.0], [0.3, 0.0, 0.0]);
        let b = pos([2.0, 0.0, 0.0], [0.3 + 1e-12, 0.0, 0.0]);
        let d = a - b;
        assert_eq!(d.sector().x, 3.0);
        assert_eq!(d.local().x, 0.0);
    }

    #[test]
    fn scaling_carries_local_overflow() {
        let p = pos([1.0, 0.0, -1.0], [0.5, 0.0, 0.5]) * 3.0;
        assert_eq!(p.sector(), DVec3::new(4.0, 0.0, -2.0));
        assert_eq!(p.local(), DVec3::new(0.5, 0.0, 0.5));
    }

    #[test]
    fn equality_tolerates_sector_boundary() {
        let a = pos([1.0, 0.0, 0.0], [0.0, 0.0, 0.0]);
        let b = pos([0.0, 0.0, 0.0], [1.0 - 1e-9, 0.0, 0.0]);
        assert_eq!(a, b);
        assert_ne!(a, pos([0.0, 0.0, 0.0], [0.5, 0.0, 0.0]));
    }

    #[test]
    fn lerp_endpoints_are_exact() {
        let a = pos([-7.0, 2.0, 100.0], [0.123, 0.456, 0.789]);
        let b = pos([40.0, -3.0, 9.0], [0.999, 0.001, 0.5]);

        let start = a.lerp(b, 0.0);
        assert_eq!(start.sector(), a.sector());
        assert_eq!(start.local(), a.local());

        let end = a.lerp(b, 1.0);
        assert_eq!(end.sector(), b.sector());
        assert_eq!(end.local(), b.local());
    }

    #[test]
    fn lerp_midpoint() {
        let a = pos([0.0, 0.0, 0.0], [0.0, 0.0, 0.0]);
        let b = pos([4.0, 0.0, -2.0], [0.0, 0.0, 0.0]);
        let mid = a.lerp(b, 0.5);
        assert_eq!(mid, pos([2.0, 0.0, -1.0], [0.0, 0.0, 0.0]));
    }

    #[test]
    fn lerp_axes_moves_each_axis_independently() {
        let a = pos([0.0, 0.0, 0.0], [0.25, 0.0, 0.25]);
        let b = pos([2.0, 0.0, 4.0], [0.0, 0.0, 0.0]);
        let p = a.lerp_axes(b, DVec3::new(0.5, 1.0, 0.0));
        assert_eq!(p.sector(), DVec3::new(1.0, 0.0, 0.0));
        assert_approx_eq!(p.local().x, 0.125, 1e-12);
        assert_approx_eq!(p.local().z, 0.25, 1e-12);
    }

    #[test]
    fn normalized_sector_ratio() {
        let delta = Position::from_sector(DVec3::new(2.0, 0.0, 3.0));
        let area = Position::from_sector(DVec3::new(4.0, 0.0, 6.0));
        assert_eq!(normalized_sector(&delta, &area), DVec3::new(0.5, 0.0, 0.5));
    }

    #[test]
    fn normalized_sector_guards_zero_axes() {
        let delta = Position::from_sector(DVec3::new(2.0, 5.0, 3.0));
        let r = normalized_sector(&delta, &Position::ZERO);
        assert_eq!(r, DVec3::ZERO);
    }

    #[test]
    fn deserializing_renormalizes() {
        let p: Position =
            serde_json::from_str(r#"{"sector":[1.0,2.0,3.0],"local":[1.5,-0.5,0.0]}"#).unwrap();
        assert_eq!(p.sector(), DVec3::new(2.0, 1.0, 3.0));
        assert_eq!(p.local(), DVec3::new(0.5, 0.5, 0.0));

        let sector_only: Position = serde_json::from_str(r#"{"sector":[-1.0,0.0,4.0]}"#).unwrap();
        assert_eq!(sector_only.local(), DVec3::ZERO);
    }

    #[test]
    fn from_combined_splits_fractional_vectors() {
        let p = Position::from_combined(DVec3::new(-2.25, 3.5, 0.0));
        assert_eq!(p.sector(), DVec3::new(-3.0, 3.0, 0.0));
        assert_eq!(p.local(), DVec3::new(0.75, 0.5, 0.0));
    }

    #[test]
    fn sector_index_range_edges() {
        assert!(Position::from_sector(DVec3::new(-9.0e18, 0.0, 9.0e18)).sector_in_index_range());
        assert!(Position::from_sector(DVec3::splat(i64::MIN as f64)).sector_in_index_range());

        let huge = Position::from_sector(DVec3::new(1.0e19, 0.0, 0.0));
        assert!(!huge.sector_in_index_range());
        assert_eq!(huge.sector_index()[0], i64::MAX);
        assert!(!Position::from_sector(DVec3::new(0.0, 2f64.powi(63), 0.0)).sector_in_index_range());
    }

    fn arb_position() -> impl Strategy<Value = Position> {
        (
            prop::array::uniform3(-1.0e6f64..1.0e6),
            prop::array::uniform3(-10.0f64..10.0),
        )
            .prop_map(|(s, l)| pos(s, l))
    }

    proptest! {
        #[test]
        fn construction_is_canonical(
            s in prop::array::uniform3(-1.0e9f64..1.0e9),
            l in prop::array::uniform3(-1.0e3f64..1.0e3),
        ) {
            let p = pos(s, l);
            for axis in 0..3 {
                let local = p.local()[axis];
                let sector = p.sector()[axis];
                prop_assert!((0.0..1.0).contains(&local));
                prop_assert_eq!(sector, sector.floor());
            }
        }

        #[test]
        fn distance_is_symmetric(a in arb_position(), b in arb_position()) {
            prop_assert!((a.distance(&b) - b.distance(&a)).abs() < 1e-9);
            prop_assert_eq!(a.distance(&a), 0.0);
        }

        #[test]
        fn addition_has_inverse(a in arb_position(), b in arb_position()) {
            prop_assert!(((a + b) - b).approx_eq(&a, POSITION_TOLERANCE));
        }

        #[test]
        fn lerp_returns_endpoints_bit_for_bit(a in arb_position(), b in arb_position()) {
            let start = a.lerp(b, 0.0);
            let end = a.lerp(b, 1.0);
            prop_assert_eq!(start.sector(), a.sector());
            prop_assert_eq!(start.local(), a.local());
            prop_assert_eq!(end.sector(), b.sector());
            prop_assert_eq!(end.local(), b.local());
        }
    }
}
