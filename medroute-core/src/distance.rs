//! Great-circle distances and drive times between depot and stops.
//!
//! Coordinates are WGS84 with `x = longitude` and `y = latitude`, matching
//! the rest of the crate.

use geo::Coord;

/// Mean Earth radius used by [`haversine_km`].
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Great-circle distance between two coordinates in kilometres.
///
/// The result is symmetric and zero for identical points.
///
/// # Examples
/// ```
/// use geo::Coord;
/// use medroute_core::distance::haversine_km;
///
/// let depot = Coord { x: 0.0, y: 0.0 };
/// let stop = Coord { x: 0.0, y: 1.0 };
/// let km = haversine_km(depot, stop);
/// assert!((km - 111.19).abs() < 0.01);
/// assert_eq!(haversine_km(depot, depot), 0.0);
/// ```
pub fn haversine_km(a: Coord<f64>, b: Coord<f64>) -> f64 {
    let lat_a = a.y.to_radians();
    let lat_b = b.y.to_radians();
    let half_dlat = (b.y - a.y).to_radians() / 2.0;
    let half_dlon = (b.x - a.x).to_radians() / 2.0;
    let h = half_dlat.sin().powi(2) + lat_a.cos() * lat_b.cos() * half_dlon.sin().powi(2);
    // Rounding can push `h` a hair past 1 for antipodal points.
    let h = h.clamp(0.0, 1.0);
    2.0 * EARTH_RADIUS_KM * h.sqrt().atan2((1.0 - h).sqrt())
}

/// Minutes needed to drive `km` at `speed_kmh`.
///
/// # Examples
/// ```
/// use medroute_core::distance::travel_minutes;
///
/// assert_eq!(travel_minutes(20.0, 40.0), 30.0);
/// ```
pub fn travel_minutes(km: f64, speed_kmh: f64) -> f64 {
    km * 60.0 / speed_kmh
}

/// Round fractional minutes to a whole count, ties to even, clamped into
/// `u32`.
///
/// Every minute figure the planner derives from a fractional value goes
/// through here, so the solver's time dimension and the projected clock agree.
///
/// # Examples
/// ```
/// use medroute_core::distance::whole_minutes;
///
/// assert_eq!(whole_minutes(2.5), 2);
/// assert_eq!(whole_minutes(3.5), 4);
/// assert_eq!(whole_minutes(-1.0), 0);
/// ```
pub fn whole_minutes(minutes: f64) -> u32 {
    let rounded = minutes.round_ties_even();
    if rounded <= 0.0 {
        0
    } else if rounded >= f64::from(u32::MAX) {
        u32::MAX
    } else {
        rounded as u32
    }
}

/// Dense, symmetric matrix of kilometres between every pair of locations.
///
/// Built once per run. Index `0` is the depot and `1..=N` are orders in input
/// order.
#[derive(Debug, Clone, PartialEq)]
pub struct DistanceMatrix {
    km: Vec<f64>,
    size: usize,
}

impl DistanceMatrix {
    /// Compute every pairwise distance for `locations`.
    ///
    /// # Examples
    /// ```
    /// use geo::Coord;
    /// use medroute_core::DistanceMatrix;
    ///
    /// let matrix = DistanceMatrix::build(&[
    ///     Coord { x: 0.0, y: 0.0 },
    ///     Coord { x: 0.0, y: 1.0 },
    /// ]);
    /// assert_eq!(matrix.len(), 2);
    /// assert_eq!(matrix.get(0, 1), matrix.get(1, 0));
    /// assert_eq!(matrix.get(1, 1), 0.0);
    /// ```
    pub fn build(locations: &[Coord<f64>]) -> Self {
        let size = locations.len();
        let mut km = vec![0.0; size * size];
        for (i, from) in locations.iter().enumerate() {
            for (j, to) in locations.iter().enumerate().skip(i + 1) {
                let d = haversine_km(*from, *to);
                km[i * size + j] = d;
                km[j * size + i] = d;
            }
        }
        Self { km, size }
    }

    /// Kilometres from location `from` to location `to`.
    ///
    /// Out-of-range indices yield `0.0`.
    pub fn get(&self, from: usize, to: usize) -> f64 {
        if from >= self.size || to >= self.size {
            log::warn!("distance lookup out of range: {from} -> {to} in {}", self.size);
            return 0.0;
        }
        self.km.get(from * self.size + to).copied().unwrap_or(0.0)
    }

    /// Number of locations.
    pub const fn len(&self) -> usize {
        self.size
    }

    /// Whether the matrix has no locations.
    pub const fn is_empty(&self) -> bool {
        self.size == 0
    }
}
