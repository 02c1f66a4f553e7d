//! Rendering a `StatsResult`: console report, ASCII box plot, CSV rows and an XLSX workbook.

use std::{fmt::Write, io::Cursor};

use crate::{
    float_format::{format_fixed, format_list},
    Error, StatsResult,
};

/// Default ASCII box plot width in cells.
pub const BOX_PLOT_WIDTH: usize = 50;

/// (label, value) pairs in report order.
pub fn statistics_rows(stats: &StatsResult) -> Vec<(&'static str, f64)> {
    vec![
        ("Count", stats.count as f64),
        ("Min", stats.min),
        ("Q1", stats.q1),
        ("Median", stats.median),
        ("Q3", stats.q3),
        ("Max", stats.max),
        ("IQR", stats.iqr),
        ("Lower fence", stats.lower_fence),
        ("Upper fence", stats.upper_fence),
        ("Mean", stats.mean),
        ("Variance", stats.variance),
        ("Std dev", stats.std_dev),
        ("Outliers", stats.outlier_count() as f64),
    ]
}

/// (index, value, is outlier) for every sorted sample.
pub fn data_rows(stats: &StatsResult) -> Vec<(usize, f64, bool)> {
    stats
        .sorted
        .iter()
        .enumerate()
        .map(|(i, v)| (i + 1, *v, stats.is_outlier(*v)))
        .collect()
}

/// Counts as integers, everything else with `precision` decimals.
pub fn format_statistic(label: &str, value: f64, precision: usize) -> String {
    match label {
        "Count" | "Outliers" => format!("{}", value as usize),
        _ => format_fixed(value, precision),
    }
}

pub fn statistics_csv(stats: &StatsResult, precision: usize) -> String {
    let mut out = String::from("Statistic,Value\n");
    for (label, value) in statistics_rows(stats) {
        out.push_str(&format!("{},{}\n", label, format_statistic(label, value, precision)));
    }
    out
}

pub fn data_csv(stats: &StatsResult, precision: usize) -> String {
    let mut out = String::from("Index,Value,Outlier\n");
    for (i, v, outlier) in data_rows(stats) {
        out.push_str(&format!("{},{},{}\n", i, format_fixed(v, precision), outlier));
    }
    out
}

/// Short summary for copying elsewhere.
pub fn summary_text(stats: &StatsResult, precision: usize) -> String {
    let f = |v: f64| format_fixed(v, precision);
    format!(
        "IQR results ({}):\n\
         Count: {}\n\
         Min: {}\n\
         Q1: {}\n\
         Median: {}\n\
         Q3: {}\n\
         Max: {}\n\
         IQR: {}\n\
         Outliers: {}\n",
        stats.method,
        stats.count,
        f(stats.min),
        f(stats.q1),
        f(stats.median),
        f(stats.q3),
        f(stats.max),
        f(stats.iqr),
        stats.outlier_count()
    )
}

/// Markers for min/Q1/median/Q3/max on a `width`-cell scale, plus an outlier line.
///
/// Empty when the sample has no spread.
pub fn ascii_box_plot(stats: &StatsResult, width: usize) -> String {
    let range = stats.max - stats.min;
    if range <= 0.0 || width == 0 {
        return String::new();
    }

    let position = |v: f64| -> usize {
        let p = ((v - stats.min) / range * width as f64).floor();
        p.clamp(0.0, width as f64) as usize
    };

    let mut line = vec![' '; width + 1];
    line[position(stats.min)] = '|';
    line[position(stats.max)] = '|';
    line[position(stats.q1)] = '[';
    line[position(stats.q3)] = ']';
    line[position(stats.median)] = '|';

    let mut out = String::new();
    out.push_str("MIN  Q1   MED  Q3   MAX\n");
    out.push_str(" |   [    |    ]   |\n");
    out.push_str(&line.iter().collect::<String>());
    out.push('\n');
    out.push_str(&"─".repeat(width + 1));
    out.push('\n');

    if !stats.outliers.is_empty() {
        let mut marks = vec![' '; width + 1];
        for v in &stats.outliers {
            marks[position(*v)] = '•';
        }
        out.push_str("Outliers: ");
        out.push_str(&marks.iter().collect::<String>());
        out.push('\n');
    }

    out
}

/// Full console report of one computation.
pub fn text_report(input: &[f64], stats: &StatsResult, precision: usize, width: usize) -> String {
    let f = |v: f64| format_fixed(v, precision);
    let rule = "-".repeat(40);

    let mut out = String::new();
    // writing into a String cannot fail
    let _ = writeln!(out, "Method: {} ({})", stats.method, stats.method.description());
    let _ = writeln!(out, "Count: {}", stats.count);
    let _ = writeln!(out, "Input: {}", format_list(input, precision));
    let _ = writeln!(out, "Sorted: {}", format_list(&stats.sorted, precision));

    let _ = writeln!(out, "\n{rule}\nDescriptive statistics:\n{rule}");
    for (label, value) in statistics_rows(stats).into_iter().skip(1).take(6) {
        let _ = writeln!(out, "{:<8} {}", format!("{label}:"), f(value));
    }
    let _ = writeln!(out, "{:<8} {}", "Mean:", f(stats.mean));
    let _ = writeln!(out, "{:<8} {}", "Var:", f(stats.variance));
    let _ = writeln!(out, "{:<8} {}", "StdDev:", f(stats.std_dev));

    let _ = writeln!(out, "\n{rule}\nOutliers:\n{rule}");
    let _ = writeln!(out, "Lower fence: {}", f(stats.lower_fence));
    let _ = writeln!(out, "Upper fence: {}", f(stats.upper_fence));
    if stats.outliers.is_empty() {
        let _ = writeln!(out, "No outliers found.");
    } else {
        let _ = writeln!(out, "Found {} outlier(s):", stats.outlier_count());
        for v in &stats.outliers {
            let _ = writeln!(out, "  - {}", f(*v));
        }
    }

    let plot = ascii_box_plot(stats, width);
    if !plot.is_empty() {
        let _ = writeln!(out, "\n{rule}\nBox plot:\n{rule}");
        out.push_str(&plot);
    }

    out
}

/// Workbook with a "Statistics" sheet and a "Data" sheet.
pub fn xlsx_report(stats: &StatsResult, precision: usize) -> Result<Vec<u8>, Error> {
    let mut book = umya_spreadsheet::new_file();

    {
        let sheet = book
            .get_sheet_mut(&0)
            .ok_or_else(|| Error::Spreadsheet("new workbook has no sheet".to_owned()))?;
        sheet.set_name("Statistics");

        sheet.get_cell_value_mut("A1").set_value("Statistic");
        sheet.get_cell_value_mut("B1").set_value("Value");
        for (i, (label, value)) in statistics_rows(stats).into_iter().enumerate() {
            let row = i + 2;
            sheet
                .get_cell_value_mut(format!("A{row}"))
                .set_value(label);
            sheet
                .get_cell_value_mut(format!("B{row}"))
                .set_value(format_statistic(label, value, precision));
        }

        let row = statistics_rows(stats).len() + 3;
        sheet
            .get_cell_value_mut(format!("A{row}"))
            .set_value("Method");
        sheet
            .get_cell_value_mut(format!("B{row}"))
            .set_value(stats.method.name());

        // date
        let date = chrono::Local::now().format("%d.%m.%Y %T").to_string();
        sheet
            .get_cell_value_mut(format!("A{}", row + 1))
            .set_value("Generated");
        sheet
            .get_cell_value_mut(format!("B{}", row + 1))
            .set_value(date);
    }

    {
        let sheet = book
            .new_sheet("Data")
            .map_err(|e| Error::Spreadsheet(e.to_string()))?;
        sheet.get_cell_value_mut("A1").set_value("Index");
        sheet.get_cell_value_mut("B1").set_value("Value");
        sheet.get_cell_value_mut("C1").set_value("Outlier");
        for (i, v, outlier) in data_rows(stats) {
            let row = i + 1;
            sheet
                .get_cell_value_mut(format!("A{row}"))
                .set_value(i.to_string());
            sheet
                .get_cell_value_mut(format!("B{row}"))
                .set_value(format_fixed(v, precision));
            sheet
                .get_cell_value_mut(format!("C{row}"))
                .set_value(if outlier { "yes" } else { "no" });
        }
    }

    let mut buf = vec![];
    umya_spreadsheet::writer::xlsx::write_writer(&book, Cursor::new(&mut buf))
        .map_err(|e| Error::Spreadsheet(e.to_string()))?;
    Ok(buf)
}
