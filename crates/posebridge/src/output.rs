use std::io::IsTerminal;
use std::time::{SystemTime, UNIX_EPOCH};

use clap::ValueEnum;
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use glam::Mat4;
use posebridge_render::{EyeView, StereoView};
use serde::Serialize;

#[derive(Clone, Debug, Copy, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Pretty,
}

impl OutputFormat {
    pub fn default_for_stdout() -> Self {
        if std::io::stdout().is_terminal() {
            Self::Table
        } else {
            Self::Json
        }
    }
}

#[derive(Serialize)]
struct EyeOutput {
    position: [f32; 3],
    /// x, y, z, w
    orientation: [f32; 4],
    /// Row-major.
    projection: [[f32; 4]; 4],
}

impl From<&EyeView> for EyeOutput {
    fn from(eye: &EyeView) -> Self {
        Self {
            position: eye.position.to_array(),
            orientation: eye.orientation.to_array(),
            projection: rows(&eye.projection),
        }
    }
}

#[derive(Serialize)]
struct ViewOutput {
    seq: u64,
    recentred: bool,
    eye_separation: f32,
    left: EyeOutput,
    right: EyeOutput,
    timestamp: String,
}

#[derive(Serialize)]
struct MatrixOutput {
    convention: &'static str,
    near: f32,
    far: f32,
    rows: [[f32; 4]; 4],
}

#[derive(Serialize)]
struct SendSummary<'a> {
    endpoint: &'a str,
    frames_sent: u64,
}

fn rows(m: &Mat4) -> [[f32; 4]; 4] {
    m.transpose().to_cols_array_2d()
}

pub fn print_view(seq: u64, recentred: bool, view: &StereoView, format: OutputFormat) {
    match format {
        OutputFormat::Json => {
            let out = ViewOutput {
                seq,
                recentred,
                eye_separation: view.eye_separation(),
                left: EyeOutput::from(&view.left),
                right: EyeOutput::from(&view.right),
                timestamp: now_unix_seconds(),
            };
            println!(
                "{}",
                serde_json::to_string(&out).unwrap_or_else(|_| "{}".to_string())
            );
        }
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["SEQ", "EYE", "POSITION", "ORIENTATION (xyzw)"]);
            for (name, eye) in [("left", &view.left), ("right", &view.right)] {
                table.add_row(vec![
                    seq.to_string(),
                    name.to_string(),
                    format_floats(&eye.position.to_array()),
                    format_floats(&eye.orientation.to_array()),
                ]);
            }
            println!("{table}");
        }
        OutputFormat::Pretty => {
            println!(
                "seq={seq}{} left={} right={} separation={:.4}",
                if recentred { " (recentred)" } else { "" },
                format_floats(&view.left.position.to_array()),
                format_floats(&view.right.position.to_array()),
                view.eye_separation()
            );
        }
    }
}

pub fn print_matrix(m: &Mat4, convention: &'static str, near: f32, far: f32, format: OutputFormat) {
    match format {
        OutputFormat::Json => {
            let out = MatrixOutput {
                convention,
                near,
                far,
                rows: rows(m),
            };
            println!(
                "{}",
                serde_json::to_string(&out).unwrap_or_else(|_| "{}".to_string())
            );
        }
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["ROW", "X", "Y", "Z", "W"]);
            for (i, row) in rows(m).iter().enumerate() {
                let mut cells = vec![i.to_string()];
                cells.extend(row.iter().map(|v| format!("{v:.6}")));
                table.add_row(cells);
            }
            println!("{table}");
        }
        OutputFormat::Pretty => {
            println!("{convention} near={near} far={far}");
            for row in rows(m) {
                println!(
                    "[{:>12.6} {:>12.6} {:>12.6} {:>12.6}]",
                    row[0], row[1], row[2], row[3]
                );
            }
        }
    }
}

pub fn print_send_summary(endpoint: &str, frames_sent: u64, format: OutputFormat) {
    match format {
        OutputFormat::Json => {
            let out = SendSummary {
                endpoint,
                frames_sent,
            };
            println!(
                "{}",
                serde_json::to_string(&out).unwrap_or_else(|_| "{}".to_string())
            );
        }
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_header(vec!["ENDPOINT", "FRAMES SENT"])
                .add_row(vec![endpoint.to_string(), frames_sent.to_string()]);
            println!("{table}");
        }
        OutputFormat::Pretty => {
            println!("sent {frames_sent} frames to {endpoint}");
        }
    }
}

fn format_floats(values: &[f32]) -> String {
    let parts: Vec<String> = values.iter().map(|v| format!("{v:.4}")).collect();
    format!("({})", parts.join(", "))
}

fn now_unix_seconds() -> String {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs().to_string())
        .unwrap_or_else(|_| "0".to_string())
}
