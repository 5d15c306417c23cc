use serde::{Deserialize};

#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct Location {
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct Address {
    pub country: Option<String>,
    pub city: Option<String>,
    pub street: Option<String>,
    pub number: Option<String>,
    #[serde(rename = "displayAddress1")]
    pub display_address_1: Option<String>,
    #[serde(rename = "displayAddress2")]
    pub display_address_2: Option<String>,
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct Sponsor {
    pub name: String,
}

/// A sensor deployed at a fixed location, as reported by `/v2/installations/*`
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct Installation {
    pub id: u64,
    pub location: Location,
    pub address: Address,
    pub elevation: Option<f64>,
    pub airly: bool,
    pub sponsor: Option<Sponsor>,
}

impl Installation {
    /// Returns a one line description of where the installation is
    pub fn display_name(&self) -> String {
        match (&self.address.display_address_1, &self.address.display_address_2) {
            (Some(a1), Some(a2)) => format!("{}, {}", a1, a2),
            (Some(a1), None) => a1.to_string(),
            _ => format!("installation {} ({:0.4}, {:0.4})",
                         self.id, self.location.latitude, self.location.longitude),
        }
    }
}
