pub mod dataset;
pub mod report;

use anyhow::{anyhow, Error};
use clap::{App, Arg, ArgMatches};
use config::Config;
use engine::{
    cross_validate_with, evaluate_split,
    grid_search::{GridPlan, GridSearch},
    Evaluation, Options,
};
use simplelog::{Config as LogConfig, LevelFilter, SimpleLogger, TermLogger, TerminalMode};
use std::path::Path;

const VERSION: &str = env!("CARGO_PKG_VERSION");

fn app<'a, 'b>() -> App<'a, 'b> {
    App::new("recsys-eval")
        .version(VERSION)
        .about("Evaluates rating prediction algorithms with k-fold cross-validation")
        .arg(
            Arg::with_name("algo")
                .long("algo")
                .takes_value(true)
                .help("Random, BaselineOnly, KNNBasic, KNNWithMeans, KNNBaseline, Parall, Pattern, CloneBruteforce, CloneMeanDiff or CloneKNNMeanDiff"),
        )
        .arg(
            Arg::with_name("sim")
                .long("sim")
                .takes_value(true)
                .possible_values(&["cos", "pearson", "MSD", "MSDClone"])
                .case_insensitive(true)
                .help("Similarity measure"),
        )
        .arg(
            Arg::with_name("method")
                .long("method")
                .takes_value(true)
                .possible_values(&["als", "sgd"])
                .case_insensitive(true)
                .help("How baselines are computed"),
        )
        .arg(
            Arg::with_name("k")
                .short("k")
                .takes_value(true)
                .help("Number of neighbors"),
        )
        .arg(
            Arg::with_name("cv")
                .long("cv")
                .takes_value(true)
                .help("Number of folds"),
        )
        .arg(
            Arg::with_name("seed")
                .long("seed")
                .takes_value(true)
                .help("Seed of the random number generator"),
        )
        .arg(
            Arg::with_name("dataset")
                .long("dataset")
                .takes_value(true)
                .possible_values(&dataset::Dataset::NAMES)
                .case_insensitive(true)
                .help("Dataset to use"),
        )
        .arg(
            Arg::with_name("train-file")
                .long("train-file")
                .takes_value(true)
                .requires("test-file")
                .help("Ratings to train on, --cv is ignored"),
        )
        .arg(
            Arg::with_name("test-file")
                .long("test-file")
                .takes_value(true)
                .requires("train-file")
                .help("Ratings to test on, --cv is ignored"),
        )
        .arg(
            Arg::with_name("item-based")
                .long("item-based")
                .help("Compute similarities between items instead of users"),
        )
        .arg(
            Arg::with_name("with-dump")
                .long("with-dump")
                .takes_value(true)
                .value_name("DIR")
                .help("Dump predictions and infos of every fold as csv"),
        )
        .arg(
            Arg::with_name("indiv-output")
                .long("indiv-output")
                .help("Print every single prediction"),
        )
        .arg(
            Arg::with_name("config")
                .long("config")
                .takes_value(true)
                .value_name("FILE")
                .help("TOML configuration, command line flags take precedence"),
        )
        .arg(
            Arg::with_name("grid")
                .long("grid")
                .conflicts_with("train-file")
                .help("Run a grid search over the [grid] section of the configuration"),
        )
        .arg(
            Arg::with_name("verbose")
                .long("verbose")
                .short("v")
                .help("Debug logging"),
        )
}

/// Command line flags override whatever the configuration says
fn apply_flags(config: &mut Config, matches: &ArgMatches) -> Result<(), Error> {
    if let Some(algo) = matches.value_of("algo") {
        config.algorithm.name = algo.into();
    }

    if let Some(sim) = matches.value_of("sim") {
        config.algorithm.sim = sim.into();
    }

    if let Some(method) = matches.value_of("method") {
        config.baseline.method = method.into();
    }

    if let Some(k) = matches.value_of("k") {
        config.algorithm.k = k.parse()?;
    }

    if let Some(cv) = matches.value_of("cv") {
        config.evaluation.folds = cv.parse()?;
    }

    if let Some(seed) = matches.value_of("seed") {
        config.evaluation.seed = Some(seed.parse()?);
    }

    if let Some(dataset) = matches.value_of("dataset") {
        config.evaluation.dataset = dataset.into();
    }

    if matches.is_present("item-based") {
        config.algorithm.item_based = true;
    }

    Ok(())
}

fn init_logger(verbose: bool) -> Result<(), Error> {
    let level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    if TermLogger::init(level, LogConfig::default(), TerminalMode::Mixed).is_err() {
        SimpleLogger::init(level, LogConfig::default())?;
    }

    Ok(())
}

/// The measure and every candidate are checked before any rating is read
fn grid_plan(config: &Config) -> Result<GridPlan, Error> {
    let grid = config
        .grid
        .as_ref()
        .ok_or_else(|| anyhow!("--grid needs a [grid] section in the configuration"))?;

    Ok(GridSearch::plan(config, grid)?)
}

fn print_results(evaluation: &Evaluation) {
    report::print_summary(evaluation);
    println!("Mean RMSE: {:1.4}", evaluation.mean_rmse());
}

fn main() -> Result<(), Error> {
    let matches = app().get_matches();
    init_logger(matches.is_present("verbose"))?;

    let mut config = match matches.value_of("config") {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };
    apply_flags(&mut config, &matches)?;

    // Bad names or parameters must fail before any rating is read
    let options = Options::from_config(&config)?;
    let indiv_output = matches.is_present("indiv-output");
    let dump_dir = matches.value_of("with-dump").map(Path::new);

    let on_fold = |fold: &engine::FoldResult| -> Result<(), Error> {
        report::print_fold(fold);
        if let Some(dir) = dump_dir {
            report::dump_fold(dir, options.algorithm.name(), fold)?;
        }
        Ok(())
    };

    let dataset = config.evaluation.dataset.clone();
    match (matches.value_of("train-file"), matches.value_of("test-file")) {
        (Some(train_file), Some(test_file)) => {
            let (trainset, controller) =
                dataset::get_raw_ratings(&dataset, Some(Path::new(train_file)), &config)?;
            let testset = controller.raw_ratings(Path::new(test_file))?;
            let reader = controller.reader(trainset);

            let evaluation = evaluate_split(&options, &reader, &testset, indiv_output)?;
            for fold in &evaluation.folds {
                on_fold(fold)?;
            }
            print_results(&evaluation);
        }

        _ if matches.is_present("grid") => {
            let plan = grid_plan(&config)?;

            let (ratings, controller) = dataset::get_raw_ratings(&dataset, None, &config)?;
            let reader = controller.reader(ratings);

            let search = GridSearch::run(plan, &reader, indiv_output)?;
            report::grid_table(&search).printstd();

            let best = search.best()?;
            println!(
                "Best {}: {} with {}",
                search.measure.name(),
                report::score(best.get(search.measure)),
                report::describe(&best.params)
            );
        }

        _ => {
            let (ratings, controller) = dataset::get_raw_ratings(&dataset, None, &config)?;
            let reader = controller.reader(ratings);

            log::info!(
                "Evaluating {} on {} ({} ratings, {} folds)",
                options.algorithm,
                controller.name(),
                reader.ratings.len(),
                options.folds
            );

            let evaluation = cross_validate_with(&options, &reader, indiv_output, on_fold)?;
            print_results(&evaluation);
        }
    }

    Ok(())
}
