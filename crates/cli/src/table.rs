//! Tabular outputs (CSV or Parquet, picked by file extension).

use anyhow::{bail, Context, Result};
use dotplot::api::{to_pixels, Figure, Ortho2, Point2, Segment, Step};
use polars::prelude::*;
use std::fs::{self, File};
use std::path::Path;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TableFormat {
    Csv,
    Parquet,
}

impl TableFormat {
    pub fn from_path(path: &Path) -> Result<Self> {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("csv") => Ok(Self::Csv),
            Some(ext) if ext.eq_ignore_ascii_case("parquet") => Ok(Self::Parquet),
            _ => bail!(
                "unsupported output {}: expected .csv or .parquet",
                path.display()
            ),
        }
    }
}

/// Columns `step, x, y, corner, px, py`; `pixels[i]` belongs to `steps[i]`.
pub fn dots_frame(steps: &[Step], pixels: &[Point2]) -> Result<DataFrame> {
    if steps.len() != pixels.len() {
        bail!("{} steps but {} pixel rows", steps.len(), pixels.len());
    }
    let step: Vec<u64> = (1..=steps.len() as u64).collect();
    let x: Vec<f64> = steps.iter().map(|s| s.point.x).collect();
    let y: Vec<f64> = steps.iter().map(|s| s.point.y).collect();
    let corner: Vec<u32> = steps.iter().map(|s| s.corner as u32).collect();
    let px: Vec<f64> = pixels.iter().map(|p| p.x).collect();
    let py: Vec<f64> = pixels.iter().map(|p| p.y).collect();
    let df = df!(
        "step" => step,
        "x" => x,
        "y" => y,
        "corner" => corner,
        "px" => px,
        "py" => py
    )?;
    Ok(df)
}

/// Columns `copy, vertex, x, y, px, py`; `pixels` mirrors `figures` vertex by vertex.
pub fn ring_frame(figures: &[Figure], pixels: &[Figure]) -> Result<DataFrame> {
    let mut copy = Vec::new();
    let mut vertex = Vec::new();
    let (mut x, mut y, mut px, mut py) = (Vec::new(), Vec::new(), Vec::new(), Vec::new());
    if figures.len() != pixels.len() {
        bail!("{} figures but {} pixel figures", figures.len(), pixels.len());
    }
    for (k, (fig, pix)) in figures.iter().zip(pixels).enumerate() {
        if fig.len() != pix.len() {
            bail!("copy {k}: {} vertices but {} pixels", fig.len(), pix.len());
        }
        for (i, (p, q)) in fig.vertices.iter().zip(&pix.vertices).enumerate() {
            copy.push(k as u32);
            vertex.push(i as u32);
            x.push(p.x);
            y.push(p.y);
            px.push(q.x);
            py.push(q.y);
        }
    }
    let df = df!(
        "copy" => copy,
        "vertex" => vertex,
        "x" => x,
        "y" => y,
        "px" => px,
        "py" => py
    )?;
    Ok(df)
}

/// Columns `kind, segment, x0, y0, x1, y1, px0, py0, px1, py1`; iso-line rows
/// (`kind = "iso"`) come before grid rows (`kind = "grid"`).
pub fn contour_frame(
    iso: &[Segment],
    grid: &[Segment],
    view: &Ortho2,
    width: u32,
    height: u32,
) -> Result<DataFrame> {
    let rows = iso
        .iter()
        .map(|s| ("iso", s))
        .chain(grid.iter().map(|s| ("grid", s)));
    let mut kind = Vec::new();
    let mut segment = Vec::new();
    let mut ends: [Vec<f64>; 8] = Default::default();
    for (i, (k, s)) in rows.enumerate() {
        let px = to_pixels(&[s.a, s.b], view, width, height)?;
        kind.push(k);
        segment.push(i as u32);
        for (col, v) in ends
            .iter_mut()
            .zip([s.a.x, s.a.y, s.b.x, s.b.y, px[0].x, px[0].y, px[1].x, px[1].y])
        {
            col.push(v);
        }
    }
    let [x0, y0, x1, y1, px0, py0, px1, py1] = ends;
    let df = df!(
        "kind" => kind,
        "segment" => segment,
        "x0" => x0,
        "y0" => y0,
        "x1" => x1,
        "y1" => y1,
        "px0" => px0,
        "py0" => py0,
        "px1" => px1,
        "py1" => py1
    )?;
    Ok(df)
}

pub fn write_table(df: &mut DataFrame, out: &Path) -> Result<()> {
    let format = TableFormat::from_path(out)?;
    if let Some(parent) = out.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating output dir {}", parent.display()))?;
        }
    }
    let mut file = File::create(out).with_context(|| format!("creating {}", out.display()))?;
    match format {
        TableFormat::Csv => {
            CsvWriter::new(&mut file)
                .include_header(true)
                .finish(df)
                .with_context(|| format!("writing csv {}", out.display()))?;
        }
        TableFormat::Parquet => {
            ParquetWriter::new(&mut file)
                .finish(df)
                .with_context(|| format!("writing parquet {}", out.display()))?;
        }
    }
    Ok(())
}
