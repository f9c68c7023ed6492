use serde::Serialize;
use ts_rs::TS;

use gnr_core::models::snapshot::SeverityCutoff;

use crate::table::SusceptibilityRow;

const WIDTH: f64 = 480.0;
const HEIGHT: f64 = 360.0;
const MARGIN_LEFT: f64 = 48.0;
const MARGIN_RIGHT: f64 = 16.0;
const MARGIN_TOP: f64 = 24.0;
/// Room for the rotated antibiotic labels.
const MARGIN_BOTTOM: f64 = 96.0;
const BAR_FILL: f64 = 0.7;

/// Bar chart of predicted susceptibility (0–100%) with a horizontal line at
/// the severity threshold. Coordinates are SVG user units, y pointing down.
#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[ts(export)]
pub struct Chart {
    pub width: f64,
    pub height: f64,
    pub plot_left: f64,
    pub plot_right: f64,
    pub plot_top: f64,
    pub plot_bottom: f64,
    /// Vertical centre of the plot, for the y-axis title.
    pub plot_middle: f64,
    pub threshold: u8,
    pub threshold_y: f64,
    pub ticks: Vec<Tick>,
    pub bars: Vec<Bar>,
}

#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[ts(export)]
pub struct Tick {
    pub value: u8,
    pub y: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[ts(export)]
pub struct Bar {
    pub label: String,
    pub percent: u8,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    /// Anchor for the rotated axis label.
    pub label_x: f64,
    pub meets_cutoff: bool,
}

impl Chart {
    /// Lay out one bar per row, in row order.
    pub fn new(rows: &[SusceptibilityRow], cutoff: SeverityCutoff) -> Self {
        let plot_left = MARGIN_LEFT;
        let plot_right = WIDTH - MARGIN_RIGHT;
        let plot_top = MARGIN_TOP;
        let plot_bottom = HEIGHT - MARGIN_BOTTOM;

        let y_of = |value: f64| plot_bottom - (plot_bottom - plot_top) * value / 100.0;

        let slot = if rows.is_empty() {
            0.0
        } else {
            (plot_right - plot_left) / rows.len() as f64
        };
        let bar_width = slot * BAR_FILL;

        let bars = rows
            .iter()
            .enumerate()
            .map(|(i, row)| {
                let x = plot_left + slot * i as f64 + (slot - bar_width) / 2.0;
                let y = y_of(f64::from(row.percent));
                Bar {
                    label: row.antibiotic.clone(),
                    percent: row.percent,
                    x,
                    y,
                    width: bar_width,
                    height: plot_bottom - y,
                    label_x: x + bar_width / 2.0,
                    meets_cutoff: row.meets_cutoff,
                }
            })
            .collect();

        let ticks = (0u8..=100)
            .step_by(20)
            .map(|value| Tick {
                value,
                y: y_of(f64::from(value)),
            })
            .collect();

        Self {
            width: WIDTH,
            height: HEIGHT,
            plot_left,
            plot_right,
            plot_top,
            plot_bottom,
            plot_middle: (plot_top + plot_bottom) / 2.0,
            threshold: cutoff.percent(),
            threshold_y: y_of(f64::from(cutoff.percent())),
            ticks,
            bars,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gnr_core::models::antibiotic::{Antibiotic, Target};

    fn row(target: Antibiotic, percent: u8) -> SusceptibilityRow {
        SusceptibilityRow {
            target: Target::Single(target),
            antibiotic: target.id().to_string(),
            percent,
            meets_cutoff: percent >= 90,
        }
    }

    #[test]
    fn threshold_line_sits_at_cutoff() {
        let chart = Chart::new(&[], SeverityCutoff::Ninety);
        assert_eq!(chart.threshold, 90);
        let expected = chart.plot_bottom - (chart.plot_bottom - chart.plot_top) * 0.9;
        assert!((chart.threshold_y - expected).abs() < 1e-9);
        assert!(chart.bars.is_empty());
        assert_eq!(chart.ticks.len(), 6);
    }

    #[test]
    fn bar_heights_scale_with_percent() {
        let rows = [row(Antibiotic::Meropenem, 100), row(Antibiotic::Ceftriaxone, 50)];
        let chart = Chart::new(&rows, SeverityCutoff::Eighty);
        let full = chart.plot_bottom - chart.plot_top;
        assert!((chart.bars[0].height - full).abs() < 1e-9);
        assert!((chart.bars[1].height - full / 2.0).abs() < 1e-9);
        assert!(chart.bars[0].x < chart.bars[1].x);
        assert!(chart.bars[1].x + chart.bars[1].width <= chart.plot_right);
    }
}
