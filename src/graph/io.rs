//! Line-oriented text serialization for [`WeightedGraph`].
//!
//! This is the persistence contract toward external renderers and loaders:
//!
//! ```text
//! numNodes, isDirected
//! (u,v,weight)
//! (u,v,weight)
//! ...
//! ```
//!
//! One triple per present edge; undirected graphs record only one direction
//! on write, and the loader's `add_edge` mirrors it back.

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use crate::{Error, Result};
use super::WeightedGraph;

/// Write a graph in the text format to any writer.
pub fn write_graph(g: &WeightedGraph, writer: &mut dyn Write) -> Result<()> {
    writeln!(
        writer,
        "{}, {}",
        g.num_nodes(),
        if g.is_directed() { 1 } else { 0 }
    )?;
    for (u, v, w) in g.edge_list() {
        writeln!(writer, "({u},{v},{w:.6})")?;
    }
    Ok(())
}

/// Save a graph to a file at `path`.
pub fn save_graph(g: &WeightedGraph, path: impl AsRef<Path>) -> Result<()> {
    let mut file = BufWriter::new(File::create(path)?);
    write_graph(g, &mut file)?;
    file.flush()?;
    Ok(())
}

/// Parse a graph from any buffered reader.
pub fn read_graph(reader: impl BufRead) -> Result<WeightedGraph> {
    let mut lines = reader.lines();

    let header = lines
        .next()
        .ok_or_else(|| Error::Parse("empty graph file".into()))??;
    let mut parts = header.split(',').map(str::trim);
    let n: usize = parse_field(parts.next(), &header, "node count")?;
    let directed_flag: u8 = parse_field(parts.next(), &header, "directedness")?;
    let mut g = WeightedGraph::new(n, directed_flag != 0)?;

    for (lineno, line) in lines.enumerate() {
        let line = line?;
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        let (u, v, w) = parse_edge(trimmed)
            .ok_or_else(|| Error::Parse(format!("bad edge at line {}: {trimmed:?}", lineno + 2)))?;
        g.add_edge(u, v, w)?;
    }

    Ok(g)
}

/// Load a graph from a file at `path`.
pub fn load_graph(path: impl AsRef<Path>) -> Result<WeightedGraph> {
    read_graph(BufReader::new(File::open(path)?))
}

fn parse_field<T: std::str::FromStr>(
    field: Option<&str>,
    line: &str,
    what: &str,
) -> Result<T> {
    field
        .and_then(|s| s.parse().ok())
        .ok_or_else(|| Error::Parse(format!("bad {what} in header {line:?}")))
}

/// Parse one `(u,v,weight)` triple.
fn parse_edge(line: &str) -> Option<(usize, usize, f32)> {
    let inner = line.strip_prefix('(')?.strip_suffix(')')?;
    let mut parts = inner.split(',').map(str::trim);
    let u = parts.next()?.parse().ok()?;
    let v = parts.next()?.parse().ok()?;
    let w = parts.next()?.parse().ok()?;
    if parts.next().is_some() {
        return None;
    }
    Some((u, v, w))
}

// ============================================================================
// Tests
// ============================================================================
