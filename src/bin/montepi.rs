use clap::{App, Arg, ArgMatches};
use log::{error, info};
use montepi::{Assembler, ConvertAssembler, Error, GifAssembler, RenderConfig};
use std::fs;
use std::path::Path;
use std::process;
use std::str::FromStr;
use std::time::Duration;

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

const SIZE: &str = "size";
const POINTS: &str = "points";
const PRECISION: &str = "precision";
const FRAMES: &str = "frames";
const THREADS: &str = "threads";
const OUTPUT: &str = "output";
const ASSEMBLER: &str = "assembler";
const DELAY: &str = "delay";
const CLEAN: &str = "clean";

fn args<'a>() -> ArgMatches<'a> {
    let max_threads = num_cpus::get();

    App::new("montepi")
        .version("0.1.0")
        .author("Elf M. Sternberg <elf.sternberg@gmail.com>")
        .about("Renders a Monte Carlo estimation of pi as an animated GIF")
        .arg(
            Arg::with_name(SIZE)
                .required(true)
                .index(1)
                .validator(|s| {
                    validate_range(
                        &s,
                        1,
                        20_000,
                        "The image size must be an integer greater than zero",
                        "The image size must be between 1 and 20000",
                    )
                })
                .help("Width and height of the images, in pixels"),
        )
        .arg(
            Arg::with_name(POINTS)
                .required(true)
                .index(2)
                .validator(|s| {
                    validate_range(
                        &s,
                        1,
                        u64::max_value(),
                        "The number of points must be an integer greater than zero",
                        "The number of points must be greater than zero",
                    )
                })
                .help("Number of points to draw"),
        )
        .arg(
            Arg::with_name(PRECISION)
                .required(true)
                .index(3)
                .validator(|s| {
                    validate_range(
                        &s,
                        0,
                        100,
                        "The number of decimals must be a non-negative integer",
                        "The number of decimals must be between 0 and 100",
                    )
                })
                .help("Decimals of pi shown on the images"),
        )
        .arg(
            Arg::with_name(FRAMES)
                .long(FRAMES)
                .short("f")
                .takes_value(true)
                .default_value("10")
                .validator(|s| {
                    validate_range(
                        &s,
                        1,
                        10_000,
                        "Could not parse frame count",
                        "Frame count must be between 1 and 10000",
                    )
                })
                .help("Number of images in the animation"),
        )
        .arg(
            Arg::with_name(THREADS)
                .long(THREADS)
                .short("t")
                .takes_value(true)
                .default_value("1")
                .validator(move |s| {
                    validate_range(
                        &s,
                        1,
                        max_threads,
                        "Could not parse thread count",
                        &format!("Thread count must be between 1 and {}", max_threads),
                    )
                })
                .help("Number of threads writing images"),
        )
        .arg(
            Arg::with_name(OUTPUT)
                .long(OUTPUT)
                .short("o")
                .takes_value(true)
                .default_value(".")
                .help("Directory receiving the images and the animation"),
        )
        .arg(
            Arg::with_name(ASSEMBLER)
                .long(ASSEMBLER)
                .short("a")
                .takes_value(true)
                .possible_values(&["gif", "convert"])
                .default_value("gif")
                .help("Build the animation in process (gif) or with ImageMagick (convert)"),
        )
        .arg(
            Arg::with_name(DELAY)
                .long(DELAY)
                .short("d")
                .takes_value(true)
                .default_value("100")
                .validator(|s| {
                    validate_range(
                        &s,
                        1,
                        60_000,
                        "Could not parse delay",
                        "Delay must be between 1 and 60000 hundredths of a second",
                    )
                })
                .help("How long each image is shown, in hundredths of a second"),
        )
        .arg(
            Arg::with_name(CLEAN)
                .long(CLEAN)
                .help("Delete old .ppm and .gif files from the output directory first"),
        )
        .get_matches()
}

fn value<T: FromStr>(matches: &ArgMatches, name: &str) -> T {
    match matches.value_of(name).map(T::from_str) {
        Some(Ok(v)) => v,
        _ => panic!("{} was validated but did not parse", name),
    }
}

/// Removes the output of earlier runs.
fn clean(dir: &Path) -> Result<(), Error> {
    let entries = fs::read_dir(dir).map_err(|e| Error::Io {
        path: dir.to_path_buf(),
        cause: e,
    })?;
    for entry in entries.filter_map(|e| e.ok()) {
        let path = entry.path();
        let stale = match path.extension().and_then(|x| x.to_str()) {
            Some("ppm") | Some("gif") => path.is_file(),
            _ => false,
        };
        if stale {
            fs::remove_file(&path).map_err(|e| Error::Io {
                path: path.clone(),
                cause: e,
            })?;
            info!("removed {}", path.display());
        }
    }
    Ok(())
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let matches = args();
    let config = RenderConfig::new(
        value(&matches, SIZE),
        value(&matches, POINTS),
        value(&matches, PRECISION),
    )
    .with_frames(value(&matches, FRAMES))
    .with_threads(value(&matches, THREADS));
    let dir = Path::new(matches.value_of(OUTPUT).unwrap_or("."));
    let delay = Duration::from_millis(10 * value::<u64>(&matches, DELAY));
    let assembler: Box<dyn Assembler> = match matches.value_of(ASSEMBLER) {
        Some("convert") => Box::new(ConvertAssembler::default()),
        _ => Box::new(GifAssembler::default()),
    };

    if let Err(e) = config.validate() {
        eprintln!("error: {}", e);
        process::exit(1);
    }

    if let Err(e) = fs::create_dir_all(dir) {
        eprintln!("error: could not create {}: {}", dir.display(), e);
        process::exit(1);
    }

    if matches.is_present(CLEAN) {
        if let Err(e) = clean(dir) {
            eprintln!("error: {}", e);
            process::exit(1);
        }
    }

    match montepi::run(&config, dir, assembler.as_ref(), delay) {
        Ok(summary) => {
            info!("pi is approximately {}", summary.estimate.text());
            println!("{}", summary.animation.display());
        }
        Err(e @ Error::Assembler { .. }) => {
            error!("{}", e);
            eprintln!("error: {}", e);
            eprintln!("the images were kept in {}", dir.display());
            process::exit(2);
        }
        Err(e) => {
            eprintln!("error: {}", e);
            process::exit(1);
        }
    }
}
