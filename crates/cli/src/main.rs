use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use dotplot::api::{
    grid_lines, marching_squares, parse_figure, to_pixels, ChaosCfg, ChaosGenerator, ContourCfg,
    EdgePlacement, Field, Figure, Ortho2, RingAnimation, RingCfg, SeedPointMode,
    DEFAULT_MAX_CORNER_DRAWS, RING_VIEW,
};
use serde::Serialize;
use serde_json::Value;
use std::path::{Path, PathBuf};
use tracing_subscriber::fmt::SubscriberBuilder;

mod provenance;
mod table;

use provenance::Payload;

#[derive(Parser)]
#[command(name = "cli")]
#[command(about = "Chaos-game dot plots, rotating ring layouts and field contours")]
struct Cmd {
    /// Optional free-form tag; propagated to outputs and logs
    #[arg(long)]
    tag: Option<String>,

    #[command(subcommand)]
    action: Action,
}

#[derive(Subcommand)]
enum Action {
    /// Generate chaos-game points and write them as a table (.csv or .parquet)
    Dots(DotsArgs),
    /// Place a figure on the rotating ring for one frame and write the vertices
    Ring(RingArgs),
    /// Trace an iso-line of a sample field with marching squares and write the segments
    Contour(ContourArgs),
    /// Print a small provenance JSON block
    Report,
}

#[derive(Args, Clone, Debug, Serialize)]
struct DotsArgs {
    /// Number of points to generate
    #[arg(long, allow_negative_numbers = true)]
    n: i64,
    #[arg(long, default_value_t = 800)]
    width: u32,
    #[arg(long, default_value_t = 800)]
    height: u32,
    /// RNG seed; drawn from OS entropy when omitted
    #[arg(long)]
    seed: Option<u64>,
    /// Draw the seed point on (-1,1)² instead of reproducing the [0,1)² draw
    #[arg(long)]
    symmetric_seed: bool,
    /// Corner draws allowed per step before giving up
    #[arg(long, default_value_t = DEFAULT_MAX_CORNER_DRAWS)]
    max_corner_draws: u32,
    #[arg(long)]
    out: PathBuf,
}

#[derive(Args, Clone, Debug, Serialize)]
struct RingArgs {
    /// Whitespace-separated x y pairs
    #[arg(long)]
    figure: PathBuf,
    #[arg(long, default_value_t = 0)]
    frame: u64,
    #[arg(long, default_value_t = 800)]
    width: u32,
    #[arg(long, default_value_t = 800)]
    height: u32,
    #[arg(long)]
    out: PathBuf,
}

#[derive(Clone, Copy, Debug, ValueEnum, Serialize)]
#[serde(rename_all = "kebab-case")]
enum FieldArg {
    /// x² + y²
    Circle,
    /// sin(x·y)
    SinXy,
    /// sin(x)·cos(y)
    SinCos,
}

impl From<FieldArg> for Field {
    fn from(f: FieldArg) -> Self {
        match f {
            FieldArg::Circle => Field::Circle,
            FieldArg::SinXy => Field::SinXy,
            FieldArg::SinCos => Field::SinCos,
        }
    }
}

#[derive(Args, Clone, Debug, Serialize)]
struct ContourArgs {
    #[arg(long, value_enum, default_value_t = FieldArg::Circle)]
    field: FieldArg,
    #[arg(long, default_value_t = 1.0, allow_negative_numbers = true)]
    iso: f64,
    /// Grid cell size
    #[arg(long, default_value_t = 0.1)]
    step: f64,
    /// Half-width of the square domain centred on the origin
    #[arg(long, default_value_t = 5.0)]
    extent: f64,
    /// Place crossings by linear interpolation instead of at edge midpoints
    #[arg(long)]
    interpolate: bool,
    /// Also emit the background grid lines
    #[arg(long)]
    grid: bool,
    #[arg(long, default_value_t = 800)]
    width: u32,
    #[arg(long, default_value_t = 800)]
    height: u32,
    #[arg(long)]
    out: PathBuf,
}

fn main() -> Result<()> {
    SubscriberBuilder::default().with_target(false).init();
    let cmd = Cmd::parse();
    match cmd.action {
        Action::Dots(args) => {
            let summary = dots(args, cmd.tag)?;
            let line = serde_json::json!({
                "seed": summary.seed,
                "rows": summary.rows,
                "provenance": summary.provenance.to_string_lossy(),
            });
            println!("{line}");
            Ok(())
        }
        Action::Ring(args) => {
            let provenance = ring(args, cmd.tag)?;
            println!("{}", provenance.display());
            Ok(())
        }
        Action::Contour(args) => {
            let provenance = contour(args, cmd.tag)?;
            println!("{}", provenance.display());
            Ok(())
        }
        Action::Report => {
            let obj = report_document(cmd.tag);
            println!("{}", serde_json::to_string_pretty(&obj)?);
            Ok(())
        }
    }
}

/// What a `dots` run produced.
#[derive(Debug)]
struct DotsSummary {
    seed: u64,
    rows: usize,
    provenance: PathBuf,
}

fn dots(args: DotsArgs, tag: Option<String>) -> Result<DotsSummary> {
    let seed = args.seed.unwrap_or_else(rand::random::<u64>);
    let cfg = ChaosCfg {
        max_corner_draws: args.max_corner_draws,
        seed_point: if args.symmetric_seed {
            SeedPointMode::Symmetric
        } else {
            SeedPointMode::Observed
        },
    };
    tracing::info!(
        n = args.n,
        seed,
        width = args.width,
        height = args.height,
        tag = ?tag,
        "dots"
    );

    let gen = ChaosGenerator::seeded(args.n, seed, cfg)?;
    let seed_point = gen.seed_point();
    let initial_corner = gen.initial_corner();
    let steps = gen.collect_steps()?;
    let points: Vec<_> = steps.iter().map(|s| s.point).collect();
    let pixels = to_pixels(&points, &Ortho2::DOT_PLOT, args.width, args.height)?;
    let redraws: u64 = steps.iter().map(|s| u64::from(s.corner_draws - 1)).sum();

    let mut df = table::dots_frame(&steps, &pixels)?;
    table::write_table(&mut df, &args.out)?;

    let params = serde_json::json!({
        "args": serde_json::to_value(&args)?,
        "seed": seed,
        "seed_point_mode": format!("{:?}", cfg.seed_point),
        "seed_point": [seed_point.x, seed_point.y],
        "initial_corner": initial_corner,
        "redraws": redraws,
    });
    let provenance = provenance::write_sidecar(&args.out, Payload::new(params).with_tag(tag))?;
    tracing::info!(
        rows = df.height(),
        redraws,
        out = %args.out.display(),
        provenance = %provenance.display(),
        "dots written"
    );
    Ok(DotsSummary {
        seed,
        rows: df.height(),
        provenance,
    })
}

fn ring(args: RingArgs, tag: Option<String>) -> Result<PathBuf> {
    tracing::info!(figure = %args.figure.display(), frame = args.frame, tag = ?tag, "ring");
    let figure = load_figure(&args.figure)?;
    let anim = RingAnimation::at_frame(RingCfg::default(), args.frame);
    let placed = anim.place(&figure);
    let pixels = placed
        .iter()
        .map(|f| to_pixels(&f.vertices, &RING_VIEW, args.width, args.height).map(Figure::new))
        .collect::<Result<Vec<_>, _>>()?;

    let mut df = table::ring_frame(&placed, &pixels)?;
    table::write_table(&mut df, &args.out)?;

    let params = serde_json::json!({
        "args": serde_json::to_value(&args)?,
        "rotation_deg": anim.rotation_deg(),
        "copies": placed.len(),
        "figure_vertices": figure.len(),
    });
    let provenance = provenance::write_sidecar(&args.out, Payload::new(params).with_tag(tag))?;
    tracing::info!(
        rows = df.height(),
        out = %args.out.display(),
        provenance = %provenance.display(),
        "ring written"
    );
    Ok(provenance)
}

fn load_figure(path: &Path) -> Result<Figure> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading figure {}", path.display()))?;
    parse_figure(&text).with_context(|| format!("parsing figure {}", path.display()))
}

fn contour(args: ContourArgs, tag: Option<String>) -> Result<PathBuf> {
    tracing::info!(field = ?args.field, iso = args.iso, step = args.step, tag = ?tag, "contour");
    let domain = Ortho2::new(-args.extent, args.extent, -args.extent, args.extent)
        .context("contour domain")?;
    let cfg = ContourCfg {
        step: args.step,
        iso: args.iso,
        placement: if args.interpolate {
            EdgePlacement::Interpolated
        } else {
            EdgePlacement::Midpoint
        },
    };
    let field = Field::from(args.field);
    let iso = marching_squares(|x, y| field.eval(x, y), &domain, &cfg)?;
    let grid = if args.grid {
        grid_lines(&domain, args.step)?
    } else {
        Vec::new()
    };

    let mut df = table::contour_frame(&iso, &grid, &domain, args.width, args.height)?;
    table::write_table(&mut df, &args.out)?;

    let params = serde_json::json!({
        "args": serde_json::to_value(&args)?,
        "iso_segments": iso.len(),
        "grid_lines": grid.len(),
    });
    let provenance = provenance::write_sidecar(&args.out, Payload::new(params).with_tag(tag))?;
    tracing::info!(
        rows = df.height(),
        out = %args.out.display(),
        provenance = %provenance.display(),
        "contour written"
    );
    Ok(provenance)
}

/// Provenance block with the library defaults, as printed by `report`.
fn report_document(tag: Option<String>) -> Value {
    let defaults = ChaosCfg::default();
    let params = serde_json::json!({
        "max_corner_draws": defaults.max_corner_draws,
        "seed_point_mode": format!("{:?}", defaults.seed_point),
    });
    provenance::document(&Payload::new(params).with_tag(tag), &[])
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use polars::prelude::*;
    use std::path::PathBuf;
    use tempfile::tempdir;

    fn dots_args(n: i64, out: PathBuf) -> DotsArgs {
        DotsArgs {
            n,
            width: 400,
            height: 300,
            seed: Some(11),
            symmetric_seed: false,
            max_corner_draws: DEFAULT_MAX_CORNER_DRAWS,
            out,
        }
    }

    #[test]
    fn cli_parses_dots_flags() {
        let cmd = Cmd::try_parse_from([
            "cli", "--tag", "t1", "dots", "--n", "-3", "--seed", "5", "--out", "x.csv",
        ])
        .unwrap();
        assert_eq!(cmd.tag.as_deref(), Some("t1"));
        match cmd.action {
            Action::Dots(a) => {
                assert_eq!(a.n, -3);
                assert_eq!(a.seed, Some(5));
                assert_eq!(a.width, 800);
                assert_eq!(a.max_corner_draws, DEFAULT_MAX_CORNER_DRAWS);
                assert!(!a.symmetric_seed);
            }
            _ => panic!("expected dots"),
        }
    }

    #[test]
    fn dots_writes_csv_and_sidecar() {
        let dir = tempdir().unwrap();
        let out = dir.path().join("plots").join("dots.csv");
        let summary = dots(dots_args(250, out.clone()), Some("unit".into())).unwrap();
        assert_eq!(summary.seed, 11);
        assert_eq!(summary.rows, 250);

        let df = LazyCsvReader::new(&out).finish().unwrap().collect().unwrap();
        assert_eq!(df.shape(), (250, 6));

        let prov: Value =
            serde_json::from_slice(&std::fs::read(&summary.provenance).unwrap()).unwrap();
        assert_eq!(prov["params"]["seed"], 11);
        assert_eq!(prov["params"]["seed_point_mode"], "Observed");
        assert_eq!(prov["tag"], "unit");
    }

    #[test]
    fn dots_is_reproducible_for_a_seed() {
        let dir = tempdir().unwrap();
        let a = dir.path().join("a.csv");
        let b = dir.path().join("b.csv");
        dots(dots_args(100, a.clone()), None).unwrap();
        dots(dots_args(100, b.clone()), None).unwrap();
        assert_eq!(std::fs::read(a).unwrap(), std::fs::read(b).unwrap());
    }

    #[test]
    fn dots_parquet_and_empty_run() {
        let dir = tempdir().unwrap();
        let out = dir.path().join("none.parquet");
        let summary = dots(dots_args(0, out.clone()), None).unwrap();
        assert_eq!(summary.rows, 0);
        assert!(out.exists());
    }

    #[test]
    fn dots_rejects_negative_count() {
        let dir = tempdir().unwrap();
        let out = dir.path().join("neg.csv");
        let err = dots(dots_args(-1, out.clone()), None).unwrap_err();
        assert!(err.to_string().contains("invalid argument"), "{err}");
        assert!(!out.exists());
    }

    #[test]
    fn ring_places_eight_copies() {
        let dir = tempdir().unwrap();
        let fig = dir.path().join("figure.txt");
        std::fs::write(&fig, "0 0 1 0\n1 1\n").unwrap();
        let out = dir.path().join("ring.csv");
        let args = RingArgs {
            figure: fig,
            frame: 45,
            width: 600,
            height: 600,
            out: out.clone(),
        };
        let prov = ring(args, None).unwrap();
        assert!(prov.exists());
        let df = LazyCsvReader::new(&out).finish().unwrap().collect().unwrap();
        assert_eq!(df.shape(), (24, 6));
    }

    #[test]
    fn ring_reports_bad_figure_file() {
        let dir = tempdir().unwrap();
        let fig = dir.path().join("bad.txt");
        std::fs::write(&fig, "1 2 3").unwrap();
        let args = RingArgs {
            figure: fig,
            frame: 0,
            width: 600,
            height: 600,
            out: dir.path().join("ring.csv"),
        };
        let err = ring(args, None).unwrap_err();
        assert!(format!("{err:#}").contains("odd number"), "{err:#}");
    }

    #[test]
    fn report_lists_version_and_defaults() {
        let doc = report_document(Some("r1".into()));
        assert_eq!(doc["dotplot_version"], dotplot::VERSION);
        assert_eq!(doc["params"]["max_corner_draws"], DEFAULT_MAX_CORNER_DRAWS);
        assert_eq!(doc["params"]["seed_point_mode"], "Observed");
        assert_eq!(doc["tag"], "r1");
        assert!(doc["outputs"].as_array().unwrap().is_empty());
        assert!(doc["code_rev"].as_str().is_some());
    }

    #[test]
    fn cli_parses_contour_flags() {
        let cmd = Cmd::try_parse_from([
            "cli", "contour", "--field", "sin-xy", "--iso", "-0.5", "--out", "c.csv",
        ])
        .unwrap();
        match cmd.action {
            Action::Contour(a) => {
                assert!(matches!(a.field, FieldArg::SinXy));
                assert_eq!(a.iso, -0.5);
                assert_eq!(a.step, 0.1);
                assert!(!a.interpolate && !a.grid);
            }
            _ => panic!("expected contour"),
        }
    }

    fn contour_args(out: PathBuf) -> ContourArgs {
        ContourArgs {
            field: FieldArg::Circle,
            iso: 1.0,
            step: 0.1,
            extent: 2.0,
            interpolate: true,
            grid: false,
            width: 400,
            height: 400,
            out,
        }
    }

    #[test]
    fn contour_writes_circle_segments() {
        let dir = tempdir().unwrap();
        let out = dir.path().join("circle.csv");
        let prov = contour(contour_args(out.clone()), None).unwrap();
        let df = LazyCsvReader::new(&out).finish().unwrap().collect().unwrap();
        assert_eq!(df.width(), 10);
        let doc: Value = serde_json::from_slice(&std::fs::read(prov).unwrap()).unwrap();
        let iso = doc["params"]["iso_segments"].as_u64().unwrap();
        assert_eq!(df.height() as u64, iso);
        assert_eq!(doc["params"]["args"]["field"], "circle");
        assert_eq!(doc["params"]["grid_lines"], 0);
    }

    #[test]
    fn contour_grid_adds_lines_and_bad_step_fails() {
        let dir = tempdir().unwrap();
        let out = dir.path().join("grid.csv");
        let mut args = contour_args(out.clone());
        args.grid = true;
        args.step = 1.0;
        contour(args, None).unwrap();
        let df = LazyCsvReader::new(&out).finish().unwrap().collect().unwrap();
        let grid = df
            .column("kind")
            .unwrap()
            .str()
            .unwrap()
            .into_iter()
            .filter(|k| *k == Some("grid"))
            .count();
        // Ticks -2..=2 on both axes.
        assert_eq!(grid, 10);

        let mut bad = contour_args(dir.path().join("bad.csv"));
        bad.step = 0.0;
        let err = contour(bad, None).unwrap_err();
        assert!(err.to_string().contains("grid step"), "{err}");
    }
}
