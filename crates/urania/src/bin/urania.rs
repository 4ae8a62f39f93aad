use anyhow::Context;
use chrono::{Datelike, Timelike};
use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::Serialize;
use std::fs;
use std::path::PathBuf;

use urania::aspects::AspectRules;
use urania::chart::{natal_chart, BirthData};
use urania::ephemeris::{AnalyticEphemeris, EphemerisProvider};
use urania::progressions::{
    calculate_secondary_progressions, calculate_solar_arc_directions, get_progressed_moon_phase,
    parse_target_date,
};
use urania::returns::{get_lunar_return_summary, get_solar_return_summary};
use urania::saju::{analyze_compatibility, convert_saju_daeun_to_info, Pillar, RawDaeun, SajuPillars};
use urania::sync::SyncOptions;
use urania::{BodyId, UraniaConfig};

#[derive(Parser, Debug)]
#[command(name = "urania", author, version, about = "Aspects, progressions, returns and Daeun-transit sync")]
struct Cli {
    /// Config file (default: configs/urania.toml or ./urania.toml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Swiss Ephemeris data directory; uses the built-in analytic ephemeris when absent
    #[arg(long, global = true)]
    ephe_path: Option<PathBuf>,

    /// Pretty-print JSON output
    #[arg(long, global = true)]
    pretty: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args, Debug)]
struct BirthArgs {
    /// Birth date, YYYY-MM-DD
    #[arg(long)]
    date: String,
    /// Local birth time, HH:MM
    #[arg(long, default_value = "12:00")]
    time: String,
    #[arg(long, allow_hyphen_values = true)]
    lat: f64,
    #[arg(long, allow_hyphen_values = true)]
    lon: f64,
    /// IANA time zone, e.g. Asia/Seoul
    #[arg(long, default_value = "UTC")]
    tz: String,
}

#[derive(Clone, Debug, ValueEnum)]
enum Method {
    Secondary,
    SolarArc,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Natal chart and its internal aspects
    Natal {
        #[command(flatten)]
        birth: BirthArgs,
        /// Include semisextile and quincunx
        #[arg(long)]
        minor: bool,
        #[arg(long)]
        max_results: Option<usize>,
    },
    /// Progressed chart and its aspects to the natal chart
    Progress {
        #[command(flatten)]
        birth: BirthArgs,
        /// Target date, YYYY-MM-DD or RFC 3339
        #[arg(long)]
        target: String,
        #[arg(long, value_enum, default_value_t = Method::Secondary)]
        method: Method,
    },
    /// Solar return for a year, or lunar return when a month is given
    Returns {
        #[command(flatten)]
        birth: BirthArgs,
        #[arg(long, allow_hyphen_values = true)]
        year: i32,
        #[arg(long)]
        month: Option<u32>,
    },
    /// Daeun / transit synchronization from a JSON list of Daeun entries
    Sync {
        /// JSON array of {startAge|age, stem|heavenlyStem, branch|earthlyBranch}
        #[arg(long)]
        daeun: PathBuf,
        #[arg(long)]
        birth_year: i32,
        #[arg(long, allow_hyphen_values = true)]
        current_age: i32,
        #[arg(long)]
        tier5: bool,
    },
    /// Day-pillar compatibility of two people
    Compat {
        /// Four pillars of the first person, year month day [hour], e.g. 庚午 辛巳 甲子
        #[arg(long, num_args = 3..=4, required = true)]
        first: Vec<String>,
        #[arg(long, num_args = 3..=4, required = true)]
        second: Vec<String>,
    },
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => UraniaConfig::load_from_file(path)?,
        None => UraniaConfig::load_default()?,
    };
    let provider = make_provider(cli.ephe_path.clone())?;

    match &cli.command {
        Commands::Natal {
            birth,
            minor,
            max_results,
        } => {
            let natal = natal_chart(provider.as_ref(), &birth_data(birth)?)?;
            let rules = AspectRules {
                include_minor: *minor,
                max_results: *max_results,
                ..AspectRules::default()
            };
            let aspects = config.aspect_calculator().find_natal_aspects(&natal, &rules);
            emit(&serde_json::json!({ "chart": natal, "aspects": aspects }), cli.pretty)
        }
        Commands::Progress {
            birth,
            target,
            method,
        } => {
            let natal = natal_chart(provider.as_ref(), &birth_data(birth)?)?;
            let target = parse_target_date(target)?;
            let progressed = match method {
                Method::Secondary => calculate_secondary_progressions(provider.as_ref(), &natal, target)?,
                Method::SolarArc => calculate_solar_arc_directions(provider.as_ref(), &natal, target)?,
            };
            let finder = config.progression_aspects();
            let moon_phase = match (
                progressed.chart.body(BodyId::Moon),
                progressed.chart.body(BodyId::Sun),
            ) {
                (Some(moon), Some(sun)) => Some(get_progressed_moon_phase(moon.longitude, sun.longitude)),
                _ => None,
            };
            emit(
                &serde_json::json!({
                    "progressed": progressed,
                    "moonPhase": moon_phase.map(|p| p.label()),
                    "toNatal": finder.to_natal(&progressed, &natal),
                    "internal": finder.internal(&progressed),
                    "moon": finder.moon(&progressed, &natal),
                }),
                cli.pretty,
            )
        }
        Commands::Returns { birth, year, month } => {
            let natal = natal_chart(provider.as_ref(), &birth_data(birth)?)?;
            let calculator = config.return_calculator();
            let (ret, summary) = match month {
                Some(m) => {
                    let ret = calculator.lunar_return(provider.as_ref(), &natal, *m, *year)?;
                    let summary = get_lunar_return_summary(&ret);
                    (ret, summary)
                }
                None => {
                    let ret = calculator.solar_return(provider.as_ref(), &natal, *year)?;
                    let summary = get_solar_return_summary(&ret);
                    (ret, summary)
                }
            };
            emit(&serde_json::json!({ "return": ret, "summary": summary }), cli.pretty)
        }
        Commands::Sync {
            daeun,
            birth_year,
            current_age,
            tier5,
        } => {
            let text = fs::read_to_string(daeun).with_context(|| format!("reading {}", daeun.display()))?;
            let raw: Vec<RawDaeun> =
                serde_json::from_str(&text).with_context(|| format!("parsing {}", daeun.display()))?;
            let list = convert_saju_daeun_to_info(&raw);
            let options = SyncOptions { enable_tier5: *tier5 };
            let result = config
                .synchronizer()
                .analyze(&list, *birth_year, *current_age, &options);
            emit(&result, cli.pretty)
        }
        Commands::Compat { first, second } => {
            let report = analyze_compatibility(&pillars(first)?, &pillars(second)?);
            emit(&report, cli.pretty)
        }
    }
}

fn make_provider(ephe_path: Option<PathBuf>) -> anyhow::Result<Box<dyn EphemerisProvider>> {
    match ephe_path {
        None => Ok(Box::new(AnalyticEphemeris::new())),
        #[cfg(feature = "swisseph")]
        Some(path) => Ok(Box::new(urania::ephemeris::SwissEphemerisAdapter::new(
            Some(path),
            urania::ephemeris::EphemerisSettings::default(),
        )?)),
        #[cfg(not(feature = "swisseph"))]
        Some(path) => anyhow::bail!(
            "--ephe-path {} requires urania built with the `swisseph` feature",
            path.display()
        ),
    }
}

fn birth_data(args: &BirthArgs) -> anyhow::Result<BirthData> {
    let date = chrono::NaiveDate::parse_from_str(&args.date, "%Y-%m-%d")
        .with_context(|| format!("invalid --date {}", args.date))?;
    let time = chrono::NaiveTime::parse_from_str(&args.time, "%H:%M")
        .with_context(|| format!("invalid --time {}", args.time))?;
    Ok(BirthData {
        year: date.year(),
        month: date.month(),
        day: date.day(),
        hour: time.hour(),
        minute: time.minute(),
        latitude: args.lat,
        longitude: args.lon,
        timezone: args.tz.clone(),
    })
}

fn pillars(values: &[String]) -> anyhow::Result<SajuPillars> {
    let parsed = values
        .iter()
        .map(|v| v.parse::<Pillar>())
        .collect::<Result<Vec<_>, _>>()?;
    match parsed.as_slice() {
        [year, month, day] => Ok(SajuPillars {
            year: *year,
            month: *month,
            day: *day,
            time: None,
        }),
        [year, month, day, time] => Ok(SajuPillars {
            year: *year,
            month: *month,
            day: *day,
            time: Some(*time),
        }),
        _ => anyhow::bail!("expected 3 or 4 pillars, got {}", values.len()),
    }
}

fn emit<T: Serialize>(value: &T, pretty: bool) -> anyhow::Result<()> {
    let text = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    println!("{text}");
    Ok(())
}
