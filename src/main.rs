//! weatherdash: terminal client for the weather-companion dashboard backend
//!
//! Each subcommand maps to one dashboard action: look up a city and show its
//! weather, print the forecast summary, draw the trend chart, manage
//! favorites and alert thresholds, and run the calendar/commute/activity
//! checks.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use weatherdash::{
    Dashboard, DashboardClient, PreferenceStore, TerminalSurface, UnitPreference,
};

#[derive(Parser, Debug)]
#[command(name = "weatherdash")]
#[command(about = "Terminal client for the weather-companion dashboard")]
struct Args {
    /// Base URL of the dashboard backend
    #[arg(long, default_value = "http://127.0.0.1:5000")]
    server: String,

    /// Directory for persisted preferences (favorites, alert thresholds)
    #[arg(long, default_value = ".weatherdash")]
    data_dir: PathBuf,

    /// Display temperatures in Fahrenheit
    #[arg(long)]
    fahrenheit: bool,

    /// Cache lifetime for weather/trend/forecast replies, in seconds
    #[arg(long, default_value = "600")]
    cache_duration: i64,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show current weather, suggestions, and the trend chart for a city
    Weather {
        city: String,
    },

    /// Print the seven-day forecast summary, optionally to a file
    Forecast {
        city: String,

        /// Write the summary to this file instead of stdout
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Draw the past-week mean-temperature trend chart for a city
    Trends {
        city: String,
    },

    /// Look up a city and print its coordinates
    Search {
        city: String,
    },

    /// Save a city as a favorite
    AddFavorite {
        city: Option<String>,

        /// Save on the server instead of locally
        #[arg(long)]
        remote: bool,
    },

    /// List saved favorites
    Favorites {
        /// List server-backed favorites instead of local ones
        #[arg(long)]
        remote: bool,
    },

    /// Show weather for a locally saved favorite
    Favorite {
        city: String,
    },

    /// Save alert thresholds (temperature in the active unit, rain in mm)
    SetAlerts {
        #[arg(long)]
        max_temp: f64,

        #[arg(long)]
        max_rain: f64,
    },

    /// Print the stored alert thresholds
    Alerts,

    /// Cross-check upcoming calendar events against rain
    Calendar {
        location: String,
    },

    /// Commute advisory for a departure time (HH:MM)
    Commute {
        location: String,
        time: String,
    },

    /// Best hours for an activity on a date (YYYY-MM-DD)
    BestTimes {
        location: String,
        activity: String,
        date: String,
    },

    /// Record a mood (1-10) against the current conditions in a city
    SaveMood {
        city: String,
        mood: String,
    },

    /// Draw the saved mood history chart
    Moods,
}

fn print_chart(surface: &weatherdash::ChartSurface) {
    if let Some(handle) = surface.active() {
        for line in handle.render() {
            println!("{}", line);
        }
    } else {
        println!("(no chart data)");
    }
}

#[tokio::main]
async fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let client = DashboardClient::new(&args.server, Some(args.cache_duration));
    let prefs = PreferenceStore::new(&args.data_dir);
    let mut dash = Dashboard::new(client, prefs, TerminalSurface::new());
    if args.fahrenheit {
        dash.state_mut()
            .set_unit_preference(UnitPreference::Fahrenheit);
    }

    match args.command {
        Command::Weather { city } => {
            dash.select_city(&city).await?;
            print_chart(dash.trend_chart());
        }
        Command::Forecast { city, output } => {
            dash.select_city(&city).await?;
            if let Some(summary) = dash.forecast_summary().await? {
                match output {
                    Some(path) => {
                        std::fs::write(&path, &summary)?;
                        println!("forecast written to {}", path.display());
                    }
                    None => print!("{}", summary),
                }
            }
        }
        Command::Trends { city } => {
            dash.select_city(&city).await?;
            print_chart(dash.trend_chart());
        }
        Command::Search { city } => {
            dash.select_city(&city).await?;
            if let Some(location) = dash.state().location() {
                println!("{}", location);
            }
        }
        Command::AddFavorite { city, remote } => {
            if remote {
                let city = city.unwrap_or_default();
                dash.add_favorite_remote(&city).await?;
            } else {
                match city {
                    // resolve the city so the favorite carries coordinates
                    Some(city) => {
                        dash.select_city(&city).await?;
                        dash.save_favorite()?;
                    }
                    None => dash.save_favorite()?,
                }
            }
        }
        Command::Favorites { remote } => {
            if remote {
                dash.show_favorites_remote().await?;
            } else {
                dash.show_favorites();
            }
        }
        Command::Favorite { city } => {
            dash.select_favorite(&city).await?;
            print_chart(dash.trend_chart());
        }
        Command::SetAlerts { max_temp, max_rain } => {
            dash.set_alert_thresholds(max_temp, max_rain)?;
        }
        Command::Alerts => match dash.alert_settings() {
            Some(config) => println!(
                "max temperature: {:.1}{}, max rain: {:.1} mm",
                config.max_temp,
                config.units.label(),
                config.max_rain
            ),
            None => println!("no alert thresholds saved"),
        },
        Command::Calendar { location } => {
            dash.check_calendar(&location).await?;
        }
        Command::Commute { location, time } => {
            dash.commute_alert(&time, &location).await?;
        }
        Command::BestTimes {
            location,
            activity,
            date,
        } => {
            dash.best_times(&activity, &date, &location).await?;
        }
        Command::SaveMood { city, mood } => {
            dash.select_city(&city).await?;
            dash.save_mood(&mood).await?;
        }
        Command::Moods => {
            dash.show_mood_history().await?;
            print_chart(dash.mood_chart());
        }
    }

    Ok(())
}
