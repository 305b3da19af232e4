//! Flight info panel shown for the selected aircraft

use crate::api::AirplanePicture;
use crate::flight::FlightDetail;

const UNKNOWN: &str = "???";
const NO_DATA: &str = "No data";
const FLYING: &str = "Flying!";
const DEFAULT_AIRLINE_LOGO: &str = "./images/default_logo.png";

/// Display-ready trip information
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlightInfoPanel {
    pub flight_icao: String,
    pub airline_code: String,
    pub airline_name: String,
    pub airline_logo_url: String,
    pub from_iata: String,
    pub to_iata: String,
    pub from_city: String,
    pub to_city: String,
    pub depart_estimated: String,
    pub depart_actual: String,
    pub arrive_estimated: String,
    pub arrive_actual: String,
    pub registration: String,
}

fn or_default(value: &Option<String>, fallback: &str) -> String {
    value.clone().unwrap_or_else(|| fallback.to_string())
}

impl FlightInfoPanel {
    pub fn from_detail(detail: &FlightDetail) -> Self {
        let airline_code = or_default(&detail.airline_iata, UNKNOWN);
        let depart_estimated = or_default(&detail.dep_estimated, NO_DATA);
        // no actual arrival yet but a known departure means the flight is airborne
        let arrive_actual = match &detail.arr_actual {
            Some(actual) => actual.clone(),
            None if depart_estimated != NO_DATA => FLYING.to_string(),
            None => String::new(),
        };

        Self {
            flight_icao: or_default(&detail.flight_icao, UNKNOWN),
            airline_logo_url: airline_logo_url(&airline_code),
            airline_code,
            airline_name: or_default(&detail.airline_name, UNKNOWN),
            from_iata: or_default(&detail.dep_iata, UNKNOWN),
            to_iata: or_default(&detail.arr_iata, UNKNOWN),
            from_city: or_default(&detail.dep_city, ""),
            to_city: or_default(&detail.arr_city, ""),
            depart_estimated,
            depart_actual: or_default(&detail.dep_actual, ""),
            arrive_estimated: or_default(&detail.arr_estimated, ""),
            arrive_actual,
            registration: or_default(&detail.reg_number, UNKNOWN),
        }
    }

    /// Registration usable for a picture lookup
    pub fn known_registration(&self) -> Option<&str> {
        if self.registration.contains(UNKNOWN) {
            None
        } else {
            Some(&self.registration)
        }
    }
}

fn airline_logo_url(code: &str) -> String {
    if code.contains(UNKNOWN) {
        DEFAULT_AIRLINE_LOGO.to_string()
    } else {
        format!("http://pics.avs.io/200/80/{}.png", code)
    }
}

/// Where the panel is displayed
pub trait InfoView {
    fn show_flight_info(&mut self, panel: &FlightInfoPanel);

    fn show_airplane_picture(&mut self, picture: &AirplanePicture);
}
