//!   flighttrack-rs:   live flight tracker
//!
//!  Polls the flight API, keeps the aircraft markers of the visible map in
//!  sync with each snapshot and follows the aircraft the user selects.

mod api;
mod app;
mod config;
mod detail;
mod error;
mod flight;
mod geo;
mod layer;
mod map;
mod marker;
mod terminal;

use std::io::{self, BufRead};
use std::sync::Arc;
use std::time::Duration;

use crossbeam_channel::{Receiver, Sender, bounded};
use parking_lot::RwLock;
use tokio::runtime::Runtime;
use tracing::{debug, info};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use crate::api::FlightDataSource;
use crate::app::{App, Command, Event, parse_input};
use crate::config::Config;
use crate::terminal::{Scene, TerminalLayer, TerminalView};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::from_args();

    // Initialize logging only if not in interactive mode
    if !config.interactive {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
        let subscriber = FmtSubscriber::builder().with_env_filter(filter).finish();
        tracing::subscriber::set_global_default(subscriber).ok();
        info!("flighttrack-rs starting...");
        info!("Configuration: {:?}", config);
    }

    let rt = Runtime::new()?;
    let _guard = rt.enter();

    let source = FlightDataSource::new(&config.api_url)?;
    let scene = Arc::new(RwLock::new(Scene::new(config.startup_viewport())));
    let mut app = App::new(
        &config,
        TerminalLayer::new(Arc::clone(&scene)),
        TerminalView::new(Arc::clone(&scene)),
    );

    // Every input and fetch result funnels into one event queue
    let (event_tx, event_rx): (Sender<Event>, Receiver<Event>) = bounded(1024);

    // Refresh ticker, the first tick fires immediately
    let ticker_handle = {
        let tx = event_tx.clone();
        let period = Duration::from_secs(config.refresh_interval_secs);
        rt.spawn(async move {
            let mut interval = tokio::time::interval(period);
            loop {
                interval.tick().await;
                if tx.send(Event::RefreshTick).is_err() {
                    break;
                }
            }
        })
    };

    let ctrl_c_handle = {
        let tx = event_tx.clone();
        rt.spawn(async move {
            tokio::signal::ctrl_c().await.ok();
            let _ = tx.send(Event::Shutdown);
        })
    };

    let display_handle = if config.interactive {
        let scene = Arc::clone(&scene);
        let rows = config.interactive_rows;
        let cols = config.interactive_cols;
        Some(rt.spawn(async move {
            terminal::run_display(scene, rows, cols).await;
        }))
    } else {
        None
    };

    // Blocking stdin reader for search and map commands
    {
        let tx = event_tx.clone();
        std::thread::spawn(move || {
            for line in io::stdin().lock().lines() {
                let Ok(line) = line else {
                    break;
                };
                if let Some(event) = parse_input(&line) {
                    if tx.send(event).is_err() {
                        break;
                    }
                }
            }
            debug!("Input closed");
        });
    }

    run_event_loop(&mut app, &rt, &source, &event_rx, &event_tx);

    info!("Shutting down");
    ticker_handle.abort();
    ctrl_c_handle.abort();
    if let Some(h) = display_handle {
        h.abort();
    }

    Ok(())
}

/// Single owner of the map state: events are handled one at a time
fn run_event_loop<L, V>(
    app: &mut App<L, V>,
    rt: &Runtime,
    source: &FlightDataSource,
    rx: &Receiver<Event>,
    tx: &Sender<Event>,
) where
    L: layer::MapLayer,
    V: detail::InfoView,
{
    while let Ok(event) = rx.recv() {
        if matches!(event, Event::Shutdown) {
            break;
        }
        for command in app.handle(event) {
            dispatch(rt, source, command, tx);
        }
    }
}

/// Run a fetch in the background and post its result back as an event
fn dispatch(rt: &Runtime, source: &FlightDataSource, command: Command, tx: &Sender<Event>) {
    let source = source.clone();
    let tx = tx.clone();

    match command {
        Command::FetchFlights => {
            rt.spawn(async move {
                let flights = source.get_flights().await;
                let _ = tx.send(Event::FlightsLoaded(flights));
            });
        }
        Command::FetchDetail(hex) => {
            rt.spawn(async move {
                let detail = source.get_flight_info(&hex).await;
                let _ = tx.send(Event::DetailLoaded { hex, detail });
            });
        }
        Command::FetchPicture(registration) => {
            rt.spawn(async move {
                let picture = source.get_airplane_picture(&registration).await;
                let _ = tx.send(Event::PictureLoaded(picture));
            });
        }
    }
}
