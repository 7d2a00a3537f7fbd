use clap::ValueEnum;
use meshlink_core::model::MeshAssociativity;
use meshlink_core::parser::{parse_mesh_link, ParserOptions};
use meshlink_core::report::ParseReport;
use meshlink_core::writer::{write_mesh_link, WriterOptions};
use serde::Serialize;
use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;

#[derive(Clone, ValueEnum, Debug, PartialEq)]
pub enum OutputFormat {
    Text,
    Json,
}

fn open_facade(path: &PathBuf, schema: Option<PathBuf>) -> anyhow::Result<(MeshAssociativity, ParseReport)> {
    let file = File::open(path).map_err(|e| anyhow::anyhow!("failed to open {:?}: {}", path, e))?;
    let options = ParserOptions { schema_path: schema, validate: false };
    parse_mesh_link(BufReader::new(file), &options)
        .map_err(|e| anyhow::anyhow!("failed to parse {:?}: {}", path, e))
}

/// As [`open_facade`], but also asks the parser to run its own schema
/// validation pass (§12's `ParserOptions::validate`) so `check`'s
/// diagnostics come back through the same `ParseReport` channel as
/// per-node parse failures, instead of a second read of the file.
fn open_facade_with_schema_check(path: &PathBuf, schema: Option<PathBuf>) -> anyhow::Result<(MeshAssociativity, ParseReport)> {
    let file = File::open(path).map_err(|e| anyhow::anyhow!("failed to open {:?}: {}", path, e))?;
    let options = ParserOptions { schema_path: schema, validate: true };
    parse_mesh_link(BufReader::new(file), &options)
        .map_err(|e| anyhow::anyhow!("failed to parse {:?}: {}", path, e))
}

#[derive(Serialize)]
struct ElementCounts {
    models: usize,
    sheets: usize,
    strings: usize,
    faces: usize,
    edges: usize,
    points: usize,
    attributes: usize,
    geometry_groups: usize,
    linkages: usize,
    transforms: usize,
}

fn count_elements(facade: &MeshAssociativity) -> ElementCounts {
    let mut counts = ElementCounts {
        models: facade.models().len(),
        sheets: 0,
        strings: 0,
        faces: 0,
        edges: 0,
        points: 0,
        attributes: facade.attributes().len(),
        geometry_groups: facade.geometry().count(),
        linkages: facade.linkages().len(),
        transforms: facade.transforms().len(),
    };
    for model in facade.models_in_order() {
        counts.sheets += model.sheets().len();
        counts.strings += model.strings().len();
        counts.points += model.points().len();
        for sheet in model.sheets().iter_in_order() {
            counts.faces += sheet.faces().len();
        }
        for string in model.strings().iter_in_order() {
            counts.edges += string.edges().len();
        }
    }
    counts
}

#[derive(Serialize)]
struct CheckReport {
    file: String,
    schema_checked: bool,
    counts: ElementCounts,
    diagnostics: Vec<DiagnosticSummary>,
}

#[derive(Serialize)]
struct DiagnosticSummary {
    severity: String,
    context: String,
    message: String,
}

/// `meshlink check` (§6.3/§13): parses, optionally schema-validates, and
/// reports element counts plus any collected diagnostics. Returns an error
/// (mapped by `main` to exit 255) on a hard parse failure, or when
/// `strict` is set and either the parse or the schema pass produced an
/// error-severity diagnostic.
pub fn check(file: PathBuf, schema: Option<PathBuf>, strict: bool, format: OutputFormat) -> anyhow::Result<()> {
    let schema_checked = schema.is_some();
    let (facade, report) = open_facade_with_schema_check(&file, schema)?;

    let counts = count_elements(&facade);
    let diagnostics: Vec<DiagnosticSummary> = report
        .diagnostics
        .iter()
        .map(|d| DiagnosticSummary {
            severity: format!("{:?}", d.severity),
            context: d.context.clone(),
            message: d.message.clone(),
        })
        .collect();

    let out = CheckReport { file: file.display().to_string(), schema_checked, counts, diagnostics };
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&out)?),
        OutputFormat::Text => {
            println!("{}", out.file);
            println!(
                "  models={} sheets={} strings={} faces={} edges={} points={} attributes={} geometry_groups={} linkages={} transforms={}",
                out.counts.models,
                out.counts.sheets,
                out.counts.strings,
                out.counts.faces,
                out.counts.edges,
                out.counts.points,
                out.counts.attributes,
                out.counts.geometry_groups,
                out.counts.linkages,
                out.counts.transforms,
            );
            if out.diagnostics.is_empty() {
                println!("  no diagnostics");
            }
            for diag in &out.diagnostics {
                println!("  [{}] {}: {}", diag.severity, diag.context, diag.message);
            }
        }
    }

    if strict && report.has_errors() {
        anyhow::bail!("{:?}: strict validation failed", file);
    }
    Ok(())
}

/// `meshlink roundtrip` (§8 property 2/S6): parses, writes back out, then
/// re-parses and compares element counts with the original.
pub fn roundtrip(file: PathBuf, output: Option<PathBuf>) -> anyhow::Result<()> {
    let (facade, report) = open_facade(&file, None)?;
    if report.has_errors() {
        anyhow::bail!("{:?}: parse produced errors, refusing to round-trip", file);
    }
    let before = count_elements(&facade);

    let options = WriterOptions::from_doc_meta(&facade.xml_meta);
    let out_path = output.unwrap_or_else(|| std::env::temp_dir().join("meshlink-roundtrip.xml"));
    let out_file = File::create(&out_path).map_err(|e| anyhow::anyhow!("failed to create {:?}: {}", out_path, e))?;
    write_mesh_link(&facade, out_file, &options).map_err(|e| anyhow::anyhow!("failed to write {:?}: {}", out_path, e))?;

    let (facade2, report2) = open_facade(&out_path, None)?;
    let after = count_elements(&facade2);

    let matches = serde_json::to_value(&before)? == serde_json::to_value(&after)?;
    println!("wrote {:?}", out_path);
    println!("element counts match: {matches}");
    if report2.has_errors() {
        println!("re-parse produced {} diagnostic(s)", report2.diagnostics.len());
    }
    if !matches {
        anyhow::bail!("round-trip element counts diverged");
    }
    Ok(())
}

/// `meshlink dump` (§13): prints the parsed associativity graph's
/// structure, mirroring the teacher's own `dump` command.
pub fn dump(file: PathBuf, format: OutputFormat) -> anyhow::Result<()> {
    let (facade, _report) = open_facade(&file, None)?;
    match format {
        OutputFormat::Json => {
            let counts = count_elements(&facade);
            println!("{}", serde_json::to_string_pretty(&counts)?);
        }
        OutputFormat::Text => {
            for model in facade.models_in_order() {
                println!("MeshModel {:?}", model.name());
                for sheet in model.sheets().iter_in_order() {
                    println!("  MeshSheet {:?} ({} faces)", sheet.name(), sheet.faces().len());
                }
                for string in model.strings().iter_in_order() {
                    println!("  MeshString {:?} ({} edges)", string.name(), string.edges().len());
                }
            }
        }
    }
    Ok(())
}

fn parse_index_list(raw: &str) -> anyhow::Result<Vec<i64>> {
    raw.split(',')
        .map(|s| s.trim().parse::<i64>().map_err(|e| anyhow::anyhow!("invalid index '{}': {}", s, e)))
        .collect()
}

/// `meshlink find-point <file> --index <i> [--highest]`: exercises the
/// lowest/highest topology point lookup (§4.5) against every model in the
/// file, reporting the first match.
pub fn find_point(file: PathBuf, index: i64, highest: bool) -> anyhow::Result<()> {
    let (facade, _report) = open_facade(&file, None)?;
    for model in facade.models_in_order() {
        let found = if highest {
            model.find_highest_topo_point_by_ind(index)
        } else {
            model.find_lowest_topo_point_by_ind(index)
        };
        if let Some(point) = found {
            println!("found in model {:?}: {:?}", model.name(), point.common.name);
            return Ok(());
        }
    }
    anyhow::bail!("no point with index {index} found in {:?}", file);
}

/// `meshlink find-edge <file> --indices <i1,i2>`.
pub fn find_edge(file: PathBuf, indices: String) -> anyhow::Result<()> {
    let idx = parse_index_list(&indices)?;
    if idx.len() != 2 {
        anyhow::bail!("--indices must name exactly two point indices for find-edge");
    }
    let (facade, _report) = open_facade(&file, None)?;
    for model in facade.models_in_order() {
        if let Some(edge) = model.find_lowest_topo_edge_by_inds(idx[0], idx[1]) {
            println!("found in model {:?}: {:?}", model.name(), edge.common.name);
            return Ok(());
        }
    }
    anyhow::bail!("no edge with indices ({}, {}) found in {:?}", idx[0], idx[1], file);
}

/// `meshlink find-face <file> --indices <i1,i2,i3[,i4]>`.
pub fn find_face(file: PathBuf, indices: String) -> anyhow::Result<()> {
    let idx = parse_index_list(&indices)?;
    if idx.len() != 3 && idx.len() != 4 {
        anyhow::bail!("--indices must name three (triangle) or four (quad) point indices for find-face");
    }
    let i4 = idx.get(3).copied().unwrap_or(meshlink_core::ids::INDEX_UNUSED);
    let (facade, _report) = open_facade(&file, None)?;
    for model in facade.models_in_order() {
        if let Some(face) = model.find_face_by_inds(idx[0], idx[1], idx[2], i4) {
            println!("found in model {:?}: {:?}", model.name(), face.common.name);
            return Ok(());
        }
    }
    anyhow::bail!("no face with indices {:?} found in {:?}", idx, file);
}
