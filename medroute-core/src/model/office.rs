use geo::Coord;

/// Contact details for the dispatching office.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OfficeContact {
    /// Phone number.
    pub phone: String,
    /// Email address.
    pub email: String,
}

/// The office every route starts from and returns to.
///
/// Coordinates are WGS84 with `x = longitude` and `y = latitude`.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Office {
    /// Unique identifier.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Street address.
    pub address: String,
    /// Geocoded location of the depot.
    pub location: Coord<f64>,
    /// Contact details.
    pub contact: OfficeContact,
    /// On-site facilities.
    pub facilities: Vec<String>,
}

impl Office {
    /// Construct an office at `location` with empty descriptive fields.
    pub fn new(id: impl Into<String>, location: Coord<f64>) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            address: String::new(),
            location,
            contact: OfficeContact::default(),
            facilities: Vec::new(),
        }
    }
}
