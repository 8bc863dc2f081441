use std::fmt;

/// Latitude/longitude pair. Always resolved together, never one without the other.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct HospitalRecord {
    pub source_no: u32,
    pub municipality: String,
    pub name: String,
    pub postal_code: String,
    pub address: String,
    pub phone: String,
    pub coordinates: Option<Coordinates>,
}

impl HospitalRecord {
    pub fn latitude(&self) -> Option<f64> {
        self.coordinates.map(|c| c.latitude)
    }

    pub fn longitude(&self) -> Option<f64> {
        self.coordinates.map(|c| c.longitude)
    }

    pub fn geocoded(&self) -> bool {
        self.coordinates.is_some()
    }
}

/// EMS division, assigned to teams round-robin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Division {
    First,
    Second,
    Third,
}

impl Division {
    pub const ALL: [Division; 3] = [Division::First, Division::Second, Division::Third];

    /// `accepted_so_far` is the number of teams accepted before this one.
    pub fn round_robin(accepted_so_far: usize) -> Self {
        Self::ALL[accepted_so_far % Self::ALL.len()]
    }

    pub fn label(&self) -> &'static str {
        match self {
            Division::First => "1部",
            Division::Second => "2部",
            Division::Third => "3部",
        }
    }
}

impl fmt::Display for Division {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TeamRecord {
    pub team_code: String,
    pub team_name: String,
    pub division: Division,
}

/// A row of the fixed `cases` demonstration data.
#[derive(Debug, Clone, Copy)]
pub struct CaseSeed {
    pub case_id: &'static str,
    pub division: Division,
    pub aware_date: &'static str,
    pub aware_time: &'static str,
    pub patient_name: &'static str,
    pub age: u32,
    pub address: &'static str,
    pub symptom: &'static str,
    pub destination: Option<&'static str>,
    pub note: &'static str,
    pub team_id: u32,
}
