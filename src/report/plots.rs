//! SVG charts
//!
//! Each chart goes to its own file; nothing is shown interactively.

use crate::evaluation::{FeatureImportance, LearningCurve, OverfittingCurve};
use anyhow::Result;
use plotters::prelude::*;
use std::path::Path;

const CHART_SIZE: (u32, u32) = (1000, 700);

/// (min, max) over finite values, padded; falls back to (0, 1)
fn padded_range<'a>(values: impl IntoIterator<Item = &'a f64>) -> (f64, f64) {
    let (lo, hi) = values
        .into_iter()
        .filter(|v| v.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| (lo.min(v), hi.max(v)));
    if !lo.is_finite() || !hi.is_finite() {
        return (0.0, 1.0);
    }
    let pad = ((hi - lo).abs() * 0.05).max(1e-3);
    (lo - pad, hi + pad)
}

fn finite_points(points: impl IntoIterator<Item = (f64, f64)>) -> Vec<(f64, f64)> {
    points.into_iter().filter(|(x, y)| x.is_finite() && y.is_finite()).collect()
}

/// Mean train/CV R² against training size, with ±1 std bands
pub fn plot_learning_curve(curve: &LearningCurve, path: &Path) -> Result<()> {
    let points = &curve.points;
    let sizes: Vec<f64> = points.iter().map(|p| p.train_size as f64).collect();
    let bounds: Vec<f64> = points
        .iter()
        .flat_map(|p| {
            [
                p.train_mean - p.train_std,
                p.train_mean + p.train_std,
                p.test_mean - p.test_std,
                p.test_mean + p.test_std,
            ]
        })
        .collect();
    let (x_min, x_max) = padded_range(&sizes);
    let (y_min, y_max) = padded_range(&bounds);

    let root = SVGBackend::new(path, CHART_SIZE).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption("Learning Curve", ("sans-serif", 24))
        .margin(12)
        .x_label_area_size(42)
        .y_label_area_size(64)
        .build_cartesian_2d(x_min..x_max, y_min..y_max)?;

    chart
        .configure_mesh()
        .x_desc("Training examples")
        .y_desc("R^2 score")
        .draw()?;

    let series = [
        ("Training score", RED, points.iter().map(|p| (p.train_mean, p.train_std)).collect::<Vec<_>>()),
        ("Cross-validation score", GREEN, points.iter().map(|p| (p.test_mean, p.test_std)).collect::<Vec<_>>()),
    ];

    for (label, color, stats) in series {
        let upper = finite_points(sizes.iter().zip(&stats).map(|(&x, &(m, s))| (x, m + s)));
        let lower = finite_points(sizes.iter().zip(&stats).map(|(&x, &(m, s))| (x, m - s)));
        let band: Vec<(f64, f64)> = upper.iter().copied().chain(lower.into_iter().rev()).collect();
        if band.len() >= 3 {
            chart.draw_series(std::iter::once(Polygon::new(band, color.mix(0.15))))?;
        }

        let means = finite_points(sizes.iter().zip(&stats).map(|(&x, &(m, _))| (x, m)));
        chart
            .draw_series(LineSeries::new(means.clone(), &color))?
            .label(label)
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color));
        chart.draw_series(means.into_iter().map(|p| Circle::new(p, 4, color.filled())))?;
    }

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::LowerRight)
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()?;

    root.present()?;
    tracing::info!("Learning curve saved: {}", path.display());
    Ok(())
}

/// Train/test R² against number of trees
pub fn plot_overfitting_curve(curve: &OverfittingCurve, path: &Path) -> Result<()> {
    let counts: Vec<f64> = curve.points.iter().map(|p| p.n_estimators as f64).collect();
    let scores: Vec<f64> = curve.points.iter().flat_map(|p| [p.train_r2, p.test_r2]).collect();
    let (x_min, x_max) = padded_range(&counts);
    let (y_min, y_max) = padded_range(&scores);

    let root = SVGBackend::new(path, CHART_SIZE).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption("Overfitting Curve", ("sans-serif", 24))
        .margin(12)
        .x_label_area_size(42)
        .y_label_area_size(64)
        .build_cartesian_2d(x_min..x_max, y_min..y_max)?;

    chart
        .configure_mesh()
        .x_desc("Number of Trees")
        .y_desc("R^2 Score")
        .draw()?;

    let train = finite_points(curve.points.iter().map(|p| (p.n_estimators as f64, p.train_r2)));
    let test = finite_points(curve.points.iter().map(|p| (p.n_estimators as f64, p.test_r2)));

    chart
        .draw_series(LineSeries::new(train.clone(), &BLUE))?
        .label("Training R^2")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], BLUE));
    chart.draw_series(train.into_iter().map(|p| Circle::new(p, 4, BLUE.filled())))?;

    chart
        .draw_series(LineSeries::new(test.clone(), &RED))?
        .label("Testing R^2")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], RED));
    chart.draw_series(test.into_iter().map(|p| Circle::new(p, 4, RED.filled())))?;

    chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()?;

    root.present()?;
    tracing::info!("Overfitting curve saved: {}", path.display());
    Ok(())
}

/// Horizontal bars, least important at the bottom
pub fn plot_feature_importance(ranked: &[FeatureImportance], path: &Path) -> Result<()> {
    let n = ranked.len();
    if n == 0 {
        tracing::info!("No features to chart; skipping {}", path.display());
        return Ok(());
    }
    let max_importance = ranked
        .iter()
        .map(|r| r.importance)
        .filter(|v| v.is_finite())
        .fold(0.0f64, f64::max)
        .max(1e-3)
        * 1.1;
    let height = CHART_SIZE.1.max(120 + 28 * n as u32);

    let root = SVGBackend::new(path, (CHART_SIZE.0, height)).into_drawing_area();
    root.fill(&WHITE)?;

    // One segment per feature; the extra top segment stays empty
    let mut chart = ChartBuilder::on(&root)
        .caption("Feature Importance", ("sans-serif", 24))
        .margin(12)
        .x_label_area_size(42)
        .y_label_area_size(220)
        .build_cartesian_2d(0.0..max_importance, (0..n).into_segmented())?;

    chart
        .configure_mesh()
        .disable_y_mesh()
        .y_labels(n + 1)
        .y_label_formatter(&|y| match y {
            SegmentValue::CenterOf(i) | SegmentValue::Exact(i) => {
                ranked.get(*i).map(|r| r.feature.clone()).unwrap_or_default()
            }
            SegmentValue::Last => String::new(),
        })
        .x_desc("Importance")
        .draw()?;

    chart.draw_series(ranked.iter().enumerate().map(|(i, r)| {
        let mut bar = Rectangle::new(
            [(0.0, SegmentValue::Exact(i)), (r.importance.max(0.0), SegmentValue::Exact(i + 1))],
            BLUE.mix(0.7).filled(),
        );
        bar.set_margin(4, 4, 0, 0);
        bar
    }))?;

    root.present()?;
    tracing::info!("Feature importance chart saved: {}", path.display());
    Ok(())
}

/// Test-set predictions (circles) against the observed target, with the
/// observed values on the identity line (crosses)
pub fn plot_predicted_vs_actual(actual: &[f64], predicted: &[f64], path: &Path) -> Result<()> {
    let points = finite_points(actual.iter().copied().zip(predicted.iter().copied()));
    let (lo, hi) = padded_range(actual.iter().chain(predicted));

    let root = SVGBackend::new(path, (800, 800)).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption("Predicted vs Actual (test set)", ("sans-serif", 24))
        .margin(12)
        .x_label_area_size(42)
        .y_label_area_size(64)
        .build_cartesian_2d(lo..hi, lo..hi)?;

    chart
        .configure_mesh()
        .x_desc("Actual")
        .y_desc("Predicted")
        .draw()?;

    let identity = finite_points(actual.iter().map(|&a| (a, a)));
    chart
        .draw_series(points.into_iter().map(|p| Circle::new(p, 4, BLUE.filled())))?
        .label("Predicted")
        .legend(|(x, y)| Circle::new((x + 10, y), 4, BLUE.filled()));
    chart
        .draw_series(identity.into_iter().map(|p| Cross::new(p, 5, RED)))?
        .label("Actual")
        .legend(|(x, y)| Cross::new((x + 10, y), 5, RED));

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperLeft)
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()?;

    root.present()?;
    tracing::info!("Predicted vs actual chart saved: {}", path.display());
    Ok(())
}
