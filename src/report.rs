// Copyright (c) 2020 White Leaf
//
// This software is released under the MIT License.
// https://opensource.org/licenses/MIT

use anyhow::Error;
use controller::ToTable;
use engine::{
    grid_search::{GridSearch, Params},
    Evaluation, FoldResult,
};
use prettytable::{format::consts::FORMAT_NO_LINESEP, row, Table};
use std::path::{Path, PathBuf};

pub fn print_fold(result: &FoldResult) {
    println!("Fold {}", result.fold + 1);
    println!("{}", result.infos.to_table());
    println!("{}", result.stats.to_map().to_table());
}

/// Four decimals, or a dash when the measure couldn't be computed
pub fn score(value: Option<f64>) -> String {
    value.map(|v| format!("{:1.4}", v)).unwrap_or_else(|| "-".into())
}

/// `key=value` pairs of a grid candidate
pub fn describe(params: &Params) -> String {
    params
        .iter()
        .map(|(key, value)| format!("{}={}", key, value))
        .collect::<Vec<_>>()
        .join(", ")
}

pub fn print_summary(evaluation: &Evaluation) {
    let mut table = Table::new();
    table.set_titles(row!["fold", "RMSE", "MAE", "FCP", "predictions"]);

    for fold in &evaluation.folds {
        table.add_row(row![
            fold.fold + 1,
            format!("{:1.4}", fold.stats.rmse),
            format!("{:1.4}", fold.stats.mae),
            score(fold.stats.fcp),
            fold.stats.count
        ]);
    }

    table.add_row(row![
        "mean",
        format!("{:1.4}", evaluation.mean_rmse()),
        format!("{:1.4}", evaluation.mean_mae()),
        score(evaluation.mean_fcp()),
        ""
    ]);

    table.set_format(*FORMAT_NO_LINESEP);
    println!("{}", evaluation.algorithm);
    table.printstd();
}

pub fn grid_table(search: &GridSearch) -> Table {
    let mut table = Table::new();
    table.set_titles(row![
        "algorithm",
        "k",
        "sim",
        "minSupport",
        "itemBased",
        "method",
        "reg",
        "RMSE",
        "MAE",
        "FCP"
    ]);

    for result in &search.results {
        let param = |key: &str| {
            result
                .params
                .get(key)
                .map(ToString::to_string)
                .unwrap_or_else(|| "-".into())
        };

        table.add_row(row![
            param("algorithm"),
            param("k"),
            param("sim"),
            param("minSupport"),
            param("itemBased"),
            param("method"),
            param("reg"),
            format!("{:1.4}", result.mean_rmse),
            format!("{:1.4}", result.mean_mae),
            score(result.mean_fcp)
        ]);
    }

    table.set_format(*FORMAT_NO_LINESEP);
    table
}

fn fold_file(dir: &Path, algorithm: &str, fold: usize, what: &str) -> PathBuf {
    dir.join(format!("{}-fold{}-{}.csv", algorithm, fold + 1, what))
}

/// Writes the predictions and infos of a fold as two csv files under `dir`
pub fn dump_fold(dir: &Path, algorithm: &str, result: &FoldResult) -> Result<(PathBuf, PathBuf), Error> {
    std::fs::create_dir_all(dir)?;

    let preds_path = fold_file(dir, algorithm, result.fold, "preds");
    let mut writer = csv::Writer::from_path(&preds_path)?;
    writer.write_record(&["user", "item", "actual", "estimated", "impossible"])?;
    for pred in &result.preds {
        writer.write_record(&[
            pred.user.clone(),
            pred.item.clone(),
            pred.actual.to_string(),
            pred.estimated.to_string(),
            pred.impossible.to_string(),
        ])?;
    }
    writer.flush()?;

    let infos_path = fold_file(dir, algorithm, result.fold, "infos");
    let mut writer = csv::Writer::from_path(&infos_path)?;
    writer.write_record(&["key", "value"])?;
    for (key, value) in &result.infos {
        writer.write_record(&[key.clone(), value.to_string()])?;
    }
    writer.flush()?;

    log::info!("Dumped fold {} into {}", result.fold + 1, dir.display());
    Ok((preds_path, infos_path))
}
