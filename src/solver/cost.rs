use crate::error::Result;
use crate::geometry::Rectangle;
use crate::placement::Layout;
use serde::Serialize;

/// The three terms of the cost function and their sum.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct CostBreakdown {
    /// Squared anchor displacement, summed over labels.
    pub distance: f64,
    /// Weighted squared label/label overlap.
    pub intersection: f64,
    /// Weighted squared label/keepout overlap.
    pub keepout: f64,
    pub total: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "index", rename_all = "camelCase")]
pub enum OverlapTarget {
    Label(usize),
    Keepout(usize),
}

/// One overlapping pair: label `label` against `other`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OverlapReport {
    pub label: usize,
    pub other: OverlapTarget,
    pub overlap: f64,
}

pub fn cost(layout: &Layout, verbose: bool) -> Result<f64> {
    let breakdown = cost_breakdown(layout)?;
    if verbose {
        for report in overlaps(layout)? {
            match report.other {
                OverlapTarget::Label(other) => tracing::info!(
                    first = layout.labels()[report.label].text(),
                    second = layout.labels()[other].text(),
                    overlap = report.overlap,
                    "labels overlap"
                ),
                OverlapTarget::Keepout(other) => tracing::info!(
                    label = layout.labels()[report.label].text(),
                    keepout = other,
                    overlap = report.overlap,
                    "label overlaps keepout"
                ),
            }
        }
        tracing::info!(
            total = breakdown.total,
            distance = breakdown.distance,
            intersection = breakdown.intersection,
            keepout = breakdown.keepout,
            "cost"
        );
    }
    Ok(breakdown.total)
}

pub fn cost_breakdown(layout: &Layout) -> Result<CostBreakdown> {
    let config = layout.config();
    let labels = layout.labels();
    let rects: Vec<Rectangle> = labels.iter().map(|label| label.rectangle()).collect();
    let keepouts: Vec<Rectangle> = layout.keepouts().iter().map(|k| k.rectangle()).collect();

    let distance: f64 = labels
        .iter()
        .map(|label| label.optimal().distance_squared_to(label.location()))
        .sum();

    let mut intersection = 0.0;
    for (i, one) in rects.iter().enumerate() {
        for two in &rects[i + 1..] {
            let overlap = one.overlap_with(two)?;
            intersection += config.penalty_intersection * overlap * overlap;
        }
    }

    let mut keepout = 0.0;
    for rect in &rects {
        for zone in &keepouts {
            let overlap = rect.overlap_with(zone)?;
            keepout += config.penalty_keepout * overlap * overlap;
        }
    }

    Ok(CostBreakdown {
        distance,
        intersection,
        keepout,
        total: distance + intersection + keepout,
    })
}

/// Every pair with a positive overlap distance, labels first.
pub fn overlaps(layout: &Layout) -> Result<Vec<OverlapReport>> {
    let rects: Vec<Rectangle> = layout.labels().iter().map(|l| l.rectangle()).collect();
    let mut reports = Vec::new();
    for (i, one) in rects.iter().enumerate() {
        for (j, two) in rects.iter().enumerate().skip(i + 1) {
            let overlap = one.overlap_with(two)?;
            if overlap > 0.0 {
                reports.push(OverlapReport {
                    label: i,
                    other: OverlapTarget::Label(j),
                    overlap,
                });
            }
        }
    }
    for (i, rect) in rects.iter().enumerate() {
        for (k, keepout) in layout.keepouts().iter().enumerate() {
            let overlap = rect.overlap_with(&keepout.rectangle())?;
            if overlap > 0.0 {
                reports.push(OverlapReport {
                    label: i,
                    other: OverlapTarget::Keepout(k),
                    overlap,
                });
            }
        }
    }
    Ok(reports)
}
