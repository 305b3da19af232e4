//! Configuration and command-line argument parsing

use std::env;

use crate::geo::{LatLng, Viewport};

pub const DEFAULT_API_URL: &str = "https://flighttrack-tlg.onrender.com/api";

#[derive(Debug, Clone)]
pub struct Config {
    // Backend
    pub api_url: String,
    /// Seconds between snapshot refreshes
    pub refresh_interval_secs: u64,

    // Map
    /// Upper bound on markers drawn at once
    pub marker_cap: usize,
    pub startup_lat: f64,
    pub startup_lng: f64,
    pub startup_zoom: u8,
    /// Viewport size in pixels, used for the visible bounds
    pub viewport_width: u32,
    pub viewport_height: u32,

    // Output
    pub interactive: bool,
    pub interactive_rows: usize,
    pub interactive_cols: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            refresh_interval_secs: 5,
            marker_cap: 1000,
            startup_lat: 36.0,
            startup_lng: -95.0,
            startup_zoom: 5,
            viewport_width: 1280,
            viewport_height: 720,
            interactive: false,
            interactive_rows: 24,
            interactive_cols: 80,
        }
    }
}

impl Config {
    pub fn from_args() -> Self {
        let args: Vec<String> = env::args().collect();
        match Self::parse(args.get(1..).unwrap_or_default()) {
            Ok(config) => config,
            Err(ParseOutcome::Help) => {
                print_help();
                std::process::exit(0);
            }
            Err(ParseOutcome::Unknown(option)) => {
                eprintln!("Unknown option: {}", option);
                print_help();
                std::process::exit(1);
            }
        }
    }

    /// Parse flags on top of the environment defaults
    pub fn parse(args: &[String]) -> Result<Self, ParseOutcome> {
        let mut config = Config::from_env();

        let mut i = 0;
        while i < args.len() {
            match args[i].as_str() {
                "--api-url" => {
                    i += 1;
                    if let Some(url) = args.get(i) {
                        config.api_url = url.trim_end_matches('/').to_string();
                    }
                }
                "--refresh" => {
                    i += 1;
                    config.refresh_interval_secs = args
                        .get(i)
                        .and_then(|s| s.parse().ok())
                        .filter(|secs| *secs > 0)
                        .unwrap_or(5);
                }
                "--max-markers" => {
                    i += 1;
                    config.marker_cap = args.get(i).and_then(|s| s.parse().ok()).unwrap_or(1000);
                }
                "--lat" => {
                    i += 1;
                    config.startup_lat = args.get(i).and_then(|s| s.parse().ok()).unwrap_or(36.0);
                }
                "--lon" => {
                    i += 1;
                    config.startup_lng = args.get(i).and_then(|s| s.parse().ok()).unwrap_or(-95.0);
                }
                "--zoom" => {
                    i += 1;
                    config.startup_zoom = args.get(i).and_then(|s| s.parse().ok()).unwrap_or(5);
                }
                "--width" => {
                    i += 1;
                    config.viewport_width = args.get(i).and_then(|s| s.parse().ok()).unwrap_or(1280);
                }
                "--height" => {
                    i += 1;
                    config.viewport_height = args.get(i).and_then(|s| s.parse().ok()).unwrap_or(720);
                }
                "--interactive" => config.interactive = true,
                "--rows" => {
                    i += 1;
                    config.interactive_rows = args
                        .get(i)
                        .and_then(|s| s.parse().ok())
                        .unwrap_or(24)
                        .max(1);
                }
                "--cols" => {
                    i += 1;
                    config.interactive_cols = args
                        .get(i)
                        .and_then(|s| s.parse().ok())
                        .unwrap_or(80)
                        .max(1);
                }
                "--help" => return Err(ParseOutcome::Help),
                other => return Err(ParseOutcome::Unknown(other.to_string())),
            }
            i += 1;
        }

        Ok(config)
    }

    /// Defaults overridden by `FLIGHTTRACK_API_URL` and `FLIGHTTRACK_REFRESH_SECS`
    pub fn from_env() -> Self {
        let defaults = Config::default();
        Self {
            api_url: env::var("FLIGHTTRACK_API_URL")
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or(defaults.api_url.clone()),
            refresh_interval_secs: env::var("FLIGHTTRACK_REFRESH_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .filter(|secs| *secs > 0)
                .unwrap_or(defaults.refresh_interval_secs),
            ..defaults
        }
    }

    pub fn startup_viewport(&self) -> Viewport {
        Viewport::new(
            LatLng::new(self.startup_lat, self.startup_lng),
            self.startup_zoom,
            self.viewport_width,
            self.viewport_height,
        )
    }
}

/// Reasons `Config::parse` stops before producing a config
#[derive(Debug, PartialEq)]
pub enum ParseOutcome {
    Help,
    Unknown(String),
}

fn print_help() {
    println!(
        r#"flighttrack-rs - live flight tracker

Usage: flighttrack-rs [OPTIONS]

Options:
  --api-url <url>        Flight API base URL (env FLIGHTTRACK_API_URL)
  --refresh <secs>       Snapshot refresh interval (default: 5, env FLIGHTTRACK_REFRESH_SECS)
  --max-markers <N>      Max aircraft drawn at once (default: 1000)
  --lat <degrees>        Startup map latitude (default: 36)
  --lon <degrees>        Startup map longitude (default: -95)
  --zoom <level>         Startup zoom level, 3-14 (default: 5)
  --width <px>           Viewport width in pixels (default: 1280)
  --height <px>          Viewport height in pixels (default: 720)
  --interactive          Draw the map in the terminal
  --rows <N>             Map rows in interactive mode (default: 24)
  --cols <N>             Map columns in interactive mode (default: 80)
  --help                 Show this help

Commands (stdin):
  <text>                 Search by hex, ICAO or IATA flight code
  click <hex>            Click the marker of an aircraft
  pan <n|s|e|w>          Pan the map
  zoom <in|out>          Zoom the map
  quit                   Exit
"#
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.marker_cap, 1000);
        assert_eq!(config.refresh_interval_secs, 5);
        assert_eq!(config.startup_zoom, 5);
    }

    #[test]
    fn test_parse_flags() {
        let config = Config::parse(&args(&[
            "--api-url",
            "http://localhost:8080/api/",
            "--refresh",
            "60",
            "--max-markers",
            "250",
            "--zoom",
            "7",
            "--interactive",
        ]))
        .unwrap();
        assert_eq!(config.api_url, "http://localhost:8080/api");
        assert_eq!(config.refresh_interval_secs, 60);
        assert_eq!(config.marker_cap, 250);
        assert_eq!(config.startup_zoom, 7);
        assert!(config.interactive);
    }

    #[test]
    fn test_zero_refresh_falls_back() {
        let config = Config::parse(&args(&["--refresh", "0"])).unwrap();
        assert_eq!(config.refresh_interval_secs, 5);
    }

    #[test]
    fn test_terminal_size_is_at_least_one_cell() {
        let config = Config::parse(&args(&["--rows", "0", "--cols", "0"])).unwrap();
        assert_eq!(config.interactive_rows, 1);
        assert_eq!(config.interactive_cols, 1);
    }

    #[test]
    fn test_unknown_and_help() {
        assert_eq!(
            Config::parse(&args(&["--bogus"])).err(),
            Some(ParseOutcome::Unknown("--bogus".to_string()))
        );
        assert_eq!(Config::parse(&args(&["--help"])).err(), Some(ParseOutcome::Help));
    }

    #[test]
    fn test_startup_viewport() {
        let vp = Config::default().startup_viewport();
        assert_eq!(vp.center, LatLng::new(36.0, -95.0));
        assert_eq!(vp.zoom, 5);
    }
}
