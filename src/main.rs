// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

#[macro_use]
extern crate log;

use clap::{App, Arg, ArgMatches};
use itertools::Itertools;
use num::Complex;
use std::path::PathBuf;
use std::str::FromStr;

use mandelbench::escape::channels;
use mandelbench::{
    colorize, dispatch, escape_time, save, Benchmark, MandelError, Pixel, PlaneMapper, Preset,
    Raster, Summary, TrialRunner,
};

/// Given a string and a separator, returns the two values
/// separated by the separator.
fn parse_pair<T>(s: &str, separator: char) -> Option<(T, T)>
where
    T: FromStr,
{
    match s.find(separator) {
        None => None,
        Some(index) => match (T::from_str(&s[..index]), T::from_str(&s[index + 1..])) {
            (Ok(l), Ok(r)) => Some((l, r)),
            _ => None,
        },
    }
}

/// A specific implementation of parse_pair using a comma and expecting
/// finite floating point numbers.
fn parse_complex(s: &str) -> Option<Complex<f64>> {
    match parse_pair::<f64>(s, ',') {
        Some((re, im)) if re.is_finite() && im.is_finite() => Some(Complex { re, im }),
        _ => None,
    }
}

fn validate_complex(s: &str, err: &str) -> Result<(), String> {
    match parse_complex(s) {
        Some(_) => Ok(()),
        None => Err(err.to_string()),
    }
}

fn validate_pair<T: FromStr>(s: &str, separator: char, err: &str) -> Result<(), String> {
    match parse_pair::<T>(s, separator) {
        Some(_) => Ok(()),
        None => Err(err.to_string()),
    }
}

fn validate_range<T: FromStr + Ord>(
    s: &str,
    low: T,
    high: T,
    isnotanumber_err: &str,
    isnotinrange_err: &str,
) -> Result<(), String> {
    match T::from_str(s) {
        Ok(i) => {
            if i >= low && i <= high {
                Ok(())
            } else {
                Err(isnotinrange_err.to_string())
            }
        }
        Err(_) => Err(isnotanumber_err.to_string()),
    }
}

const OUTPUT: &str = "output";
const SIZE: &str = "size";
const VIEW: &str = "view";
const ITERATIONS: &str = "iterations";
const MODE: &str = "mode";
const THREADS: &str = "threads";
const TRIALS: &str = "trials";
const PROBE: &str = "probe";

fn args<'a>() -> ArgMatches<'a> {
    App::new("mandelbench")
        .version("0.1.0")
        .about("Renders the Mandelbrot set and times it across thread counts")
        .arg(
            Arg::with_name(OUTPUT)
                .long(OUTPUT)
                .short("o")
                .takes_value(true)
                .default_value("output.tga")
                .help("Output file (.tga, or .ppm/.pnm)"),
        )
        .arg(
            Arg::with_name(SIZE)
                .long(SIZE)
                .short("s")
                .takes_value(true)
                .default_value("640x640")
                .validator(|s| validate_pair::<u16>(&s, 'x', "Could not parse output image size"))
                .help("Size of output image"),
        )
        .arg(
            Arg::with_name(VIEW)
                .long(VIEW)
                .short("v")
                .takes_value(true)
                .possible_values(&["full", "zoom"])
                .default_value("zoom")
                .help("Region of the complex plane to render"),
        )
        .arg(
            Arg::with_name(ITERATIONS)
                .long(ITERATIONS)
                .short("i")
                .takes_value(true)
                .default_value("200")
                .validator(|s| {
                    validate_range(
                        &s,
                        1,
                        100_000,
                        "Could not parse iteration count",
                        "Iteration count must be between 1 and 100000",
                    )
                })
                .help("Iterations before a point is considered inside the set"),
        )
        .arg(
            Arg::with_name(MODE)
                .long(MODE)
                .short("m")
                .takes_value(true)
                .possible_values(&["sweep", "repeat"])
                .default_value("sweep")
                .help("Time every thread count up to --threads, or only --threads"),
        )
        .arg(
            Arg::with_name(THREADS)
                .long(THREADS)
                .short("t")
                .takes_value(true)
                .default_value("8")
                .validator(|s| {
                    validate_range(
                        &s,
                        1,
                        256,
                        "Could not parse thread count",
                        "Thread count must be between 1 and 256",
                    )
                })
                .help("Number of threads (the upper bound when sweeping)"),
        )
        .arg(
            Arg::with_name(TRIALS)
                .long(TRIALS)
                .short("r")
                .takes_value(true)
                .default_value("8")
                .validator(|s| {
                    validate_range(
                        &s,
                        1,
                        1000,
                        "Could not parse trial count",
                        "Trial count must be between 1 and 1000",
                    )
                })
                .help("Timed rounds per thread count"),
        )
        .arg(
            Arg::with_name(PROBE)
                .long(PROBE)
                .short("p")
                .takes_value(true)
                .allow_hyphen_values(true)
                .validator(|s| validate_complex(&s, "Could not parse probe point"))
                .help("Evaluate a single point RE,IM and exit"),
        )
        .get_matches()
}

/// Everything the command line decides, parsed once.
struct Settings {
    output: PathBuf,
    size: (usize, usize),
    preset: Preset,
    iterations: usize,
    benchmark: Benchmark,
    trials: usize,
    probe: Option<Complex<f64>>,
}

fn number(matches: &ArgMatches, name: &str) -> Result<usize, String> {
    let value = matches.value_of(name).unwrap_or_default();
    usize::from_str(value).map_err(|_| format!("Could not parse {} '{}'", name, value))
}

fn settings(matches: &ArgMatches) -> Result<Settings, String> {
    let size: (u16, u16) = matches
        .value_of(SIZE)
        .and_then(|s| parse_pair(s, 'x'))
        .ok_or_else(|| "Error parsing image dimensions".to_string())?;
    let preset = matches
        .value_of(VIEW)
        .unwrap_or_default()
        .parse::<Preset>()
        .map_err(|e| e.to_string())?;
    let benchmark = Benchmark::from_mode(matches.value_of(MODE).unwrap_or_default(), number(matches, THREADS)?)
        .map_err(|e| e.to_string())?;
    let probe = match matches.value_of(PROBE) {
        Some(s) => Some(parse_complex(s).ok_or_else(|| "Error parsing probe point".to_string())?),
        None => None,
    };
    Ok(Settings {
        output: PathBuf::from(matches.value_of(OUTPUT).unwrap_or("output.tga")),
        size: (size.0 as usize, size.1 as usize),
        preset,
        iterations: number(matches, ITERATIONS)?,
        benchmark,
        trials: number(matches, TRIALS)?,
        probe,
    })
}

fn probe(plane: &PlaneMapper, point: Complex<f64>, limit: usize) {
    let escape = escape_time(point, limit);
    let (r, g, b) = channels(colorize(escape, limit));
    match escape {
        Some(n) => println!("{},{} escaped after {} iterations", point.re, point.im, n),
        None => println!("{},{} is inside the set ({} iterations)", point.re, point.im, limit),
    }
    println!("color: #{:02x}{:02x}{:02x}", r, g, b);
    match plane.point_to_pixel(&point) {
        Some(Pixel(x, y)) => println!("pixel: ({}, {})", x, y),
        None => println!("pixel: outside the view"),
    }
}

fn report(summaries: &[Summary]) {
    let baseline = summaries.first().map(|s| s.aggregate);
    for summary in summaries {
        println!(
            "{} threads: sorted times [{}] ms",
            summary.threads,
            summary.sorted().iter().join(", ")
        );
        println!(
            "The median of all times with {} threads: {} ms",
            summary.threads, summary.aggregate
        );
        if let Some(base) = baseline {
            if summary.aggregate > 0 {
                println!("  speedup: {:.2}x", base as f64 / summary.aggregate as f64);
            }
        }
    }
}

fn run(settings: &Settings) -> Result<(), MandelError> {
    let plane = PlaneMapper::new(settings.size.0, settings.size.1, settings.preset.viewport())?;

    if let Some(point) = settings.probe {
        probe(&plane, point, settings.iterations);
        return Ok(());
    }

    println!(
        "Rendering {}x{} ({:?} view, {} iterations) on {} logical cpus. Please wait...",
        settings.size.0,
        settings.size.1,
        settings.preset,
        settings.iterations,
        num_cpus::get()
    );

    // Allocated once so that only the dispatch itself is timed.
    let mut raster = Raster::new(plane.width(), plane.height())?;
    let runner = TrialRunner::for_benchmark(settings.benchmark, settings.trials);
    let (summaries, last) = runner.run(
        |threads| dispatch(&plane, settings.iterations, threads, &mut raster),
        |threads, index, elapsed| {
            println!(
                "Round {} with {} threads took {} ms.",
                index + 1,
                threads,
                elapsed
            )
        },
    )?;
    report(&summaries);

    match last {
        Some(()) => {
            save(&settings.output, &raster)?;
            println!("Wrote {}", settings.output.display());
        }
        None => warn!("no rounds were run; nothing to write"),
    }
    Ok(())
}

pub fn main() {
    env_logger::init();
    let matches = args();
    let settings = match settings(&matches) {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("error: {}", e);
            std::process::exit(1);
        }
    };
    if let Err(e) = run(&settings) {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}
