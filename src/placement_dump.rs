use crate::geometry::Point;
use crate::placement::{Label, Layout};
use crate::solver::{CostBreakdown, OverlapReport, SolveReport};
use serde::Serialize;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlacementDump {
    pub labels: Vec<LabelDump>,
    pub keepouts: Vec<KeepoutDump>,
    pub cost: CostBreakdown,
    pub total_overlap: f64,
    pub overlaps: Vec<OverlapReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report: Option<SolveReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hessian: Option<Vec<Vec<f64>>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LabelDump {
    pub index: usize,
    pub text: String,
    pub anchor: Point,
    pub location: Point,
    pub width: f64,
    pub height: f64,
    pub bottom_left: Point,
    pub top_right: Point,
    /// Distance from the anchor to the current centre.
    pub displacement: f64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct KeepoutDump {
    pub index: usize,
    pub anchor: Point,
    pub width: f64,
    pub height: f64,
}

impl PlacementDump {
    pub fn from_layout(
        layout: &Layout,
        report: Option<SolveReport>,
        hessian: Option<Vec<Vec<f64>>>,
    ) -> anyhow::Result<Self> {
        let labels = layout
            .labels()
            .iter()
            .enumerate()
            .map(|(index, label)| label_dump(index, label))
            .collect();
        let keepouts = layout
            .keepouts()
            .iter()
            .enumerate()
            .map(|(index, keepout)| KeepoutDump {
                index,
                anchor: keepout.optimal(),
                width: keepout.width(),
                height: keepout.height(),
            })
            .collect();

        Ok(PlacementDump {
            labels,
            keepouts,
            cost: layout.cost_breakdown()?,
            total_overlap: layout.total_overlap()?,
            overlaps: layout.overlaps()?,
            report,
            hessian,
        })
    }
}

fn label_dump(index: usize, label: &Label) -> LabelDump {
    let rect = label.rectangle();
    LabelDump {
        index,
        text: label.text().to_string(),
        anchor: label.optimal(),
        location: label.location(),
        width: label.width(),
        height: label.height(),
        bottom_left: rect.bottom_left,
        top_right: rect.top_right,
        displacement: label.optimal().distance_to(label.location()),
    }
}

/// Writes the dump as pretty JSON to `output`, or to stdout when absent.
pub fn write_placement_dump(dump: &PlacementDump, output: Option<&Path>) -> anyhow::Result<()> {
    match output {
        Some(path) => {
            let mut writer = BufWriter::new(File::create(path)?);
            serde_json::to_writer_pretty(&mut writer, dump)?;
            writer.flush()?;
        }
        None => {
            let stdout = io::stdout();
            let mut writer = stdout.lock();
            serde_json::to_writer_pretty(&mut writer, dump)?;
            writeln!(writer)?;
        }
    }
    Ok(())
}
