// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use clap::{App, Arg, ArgMatches};
use failure::{format_err, Error};
use image::RgbImage;
use log::{info, warn};
use seamcarve::dump::energy_to_image;
use seamcarve::energy::DEFAULT_VARIATION_WEIGHT;
use seamcarve::{
    AxisSplit, CarveConfig, Direction, EnergyEstimator, PixelGrid, SeamBudget, SeamCarver,
};
use std::process;
use std::str::FromStr;

fn app() -> App<'static, 'static> {
    App::new("seamcarve")
        .version("0.1.0")
        .author("Elf M. Sternberg <elf.sternberg@gmail.com>")
        .about("Shrink an image by removing its least visible seams")
        .arg(
            Arg::with_name("input")
                .help("The image to carve")
                .required(true)
                .index(1),
        )
        .arg(
            Arg::with_name("output")
                .help("Where to write the result; the format follows the extension")
                .required(true)
                .index(2),
        )
        .arg(
            Arg::with_name("vertical")
                .short("x")
                .long("vertical")
                .takes_value(true)
                .help("Vertical seams to remove (narrows the image)"),
        )
        .arg(
            Arg::with_name("horizontal")
                .short("y")
                .long("horizontal")
                .takes_value(true)
                .help("Horizontal seams to remove (shortens the image)"),
        )
        .arg(
            Arg::with_name("seams")
                .short("n")
                .long("seams")
                .takes_value(true)
                .conflicts_with_all(&["vertical", "horizontal", "width", "height"])
                .help("Total seams to remove, spent according to --direction"),
        )
        .arg(
            Arg::with_name("direction")
                .long("direction")
                .takes_value(true)
                .possible_values(&["vertical", "horizontal", "both"])
                .default_value("both")
                .help("Which axes --seams is spent on"),
        )
        .arg(
            Arg::with_name("split")
                .long("split")
                .takes_value(true)
                .possible_values(&["even", "aspect"])
                .default_value("even")
                .help("How --seams is divided when --direction is both"),
        )
        .arg(
            Arg::with_name("width")
                .long("width")
                .takes_value(true)
                .conflicts_with_all(&["vertical", "horizontal"])
                .help("Carve down to this width"),
        )
        .arg(
            Arg::with_name("height")
                .long("height")
                .takes_value(true)
                .conflicts_with_all(&["vertical", "horizontal"])
                .help("Carve down to this height"),
        )
        .arg(
            Arg::with_name("min-dimension")
                .long("min-dimension")
                .takes_value(true)
                .default_value("2")
                .help("Never carve an axis below this many pixels"),
        )
        .arg(
            Arg::with_name("recompute-interval")
                .long("recompute-interval")
                .takes_value(true)
                .default_value("1")
                .help("Recompute the energy map every this many seams"),
        )
        .arg(
            Arg::with_name("blend")
                .long("blend")
                .help("Blend the neighbours of each removed pixel"),
        )
        .arg(
            Arg::with_name("enhanced")
                .long("enhanced")
                .help("Use the normalized energy map with a local-variation term"),
        )
        .arg(
            Arg::with_name("forward")
                .long("forward")
                .help("Add the forward cost of each pixel to its energy"),
        )
        .arg(
            Arg::with_name("energy")
                .long("energy")
                .help("Write the energy map of the input instead of carving"),
        )
        .arg(
            Arg::with_name("verbose")
                .short("v")
                .long("verbose")
                .help("Log each pass and energy recompute"),
        )
}

fn number<T: FromStr>(matches: &ArgMatches, name: &str) -> Result<Option<T>, Error> {
    match matches.value_of(name) {
        None => Ok(None),
        Some(v) => v
            .parse::<T>()
            .map(Some)
            .map_err(|_| format_err!("--{} expects a whole number, got '{}'", name, v)),
    }
}

fn budget(matches: &ArgMatches, width: usize, height: usize) -> Result<SeamBudget, Error> {
    if let Some(seams) = number(matches, "seams")? {
        let direction = match matches.value_of("direction") {
            Some("vertical") => Direction::Vertical,
            Some("horizontal") => Direction::Horizontal,
            _ => Direction::Both,
        };
        let split = match matches.value_of("split") {
            Some("aspect") => AxisSplit::AspectWeighted,
            _ => AxisSplit::Even,
        };
        return Ok(SeamBudget::Total {
            seams,
            direction,
            split,
        });
    }

    let (new_width, new_height) = (number(matches, "width")?, number(matches, "height")?);
    if new_width.is_some() || new_height.is_some() {
        return Ok(SeamBudget::Target {
            width: new_width.unwrap_or(width),
            height: new_height.unwrap_or(height),
        });
    }

    Ok(SeamBudget::Explicit {
        vertical: number(matches, "vertical")?.unwrap_or(0),
        horizontal: number(matches, "horizontal")?.unwrap_or(0),
    })
}

fn run(matches: &ArgMatches) -> Result<(), Error> {
    let (input, output) = match (matches.value_of("input"), matches.value_of("output")) {
        (Some(input), Some(output)) => (input, output),
        _ => return Err(format_err!("an input and an output path are required")),
    };

    let config = CarveConfig::default()
        .with_min_dimension(number(matches, "min-dimension")?.unwrap_or(2))
        .with_recompute_interval(number(matches, "recompute-interval")?.unwrap_or(1))
        .with_color_blend(matches.is_present("blend"))
        .with_variation_weight(if matches.is_present("enhanced") {
            Some(DEFAULT_VARIATION_WEIGHT)
        } else {
            None
        })
        .with_forward_cost(matches.is_present("forward"));

    let image = image::open(input)?.to_rgb();
    let grid = PixelGrid::from_image(&image)?;
    let (width, height) = grid.dimensions();
    info!("loaded {} ({}x{})", input, width, height);

    if matches.is_present("energy") {
        let energy = EnergyEstimator::with_variation(config.variation_weight)
            .with_forward_cost(config.forward_cost)
            .estimate(&grid);
        energy_to_image(&energy).save(output)?;
        info!("wrote energy map to {}", output);
        return Ok(());
    }

    let carver = SeamCarver::new(config)?;
    let carved = carver.carve_budget(grid, budget(matches, width, height)?)?;
    if let Some(shortfall) = carved.report.shortfall() {
        warn!("{}", shortfall);
    }

    let (new_width, new_height) = carved.grid.dimensions();
    let result: RgbImage = carved.grid.into_image()?;
    result.save(output)?;
    info!(
        "wrote {} ({}x{}, {} energy maps computed)",
        output, new_width, new_height, carved.report.energy_recomputes
    );
    Ok(())
}

fn main() {
    let matches = app().get_matches();

    let level = if matches.is_present("verbose") {
        "debug"
    } else {
        "info"
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    if let Err(err) = run(&matches) {
        eprintln!("seamcarve: {}", err);
        process::exit(1);
    }
}
