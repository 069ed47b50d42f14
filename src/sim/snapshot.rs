//! Per-step snapshot persistence.
//!
//! Directory layout, per persisted step:
//!
//! ```text
//! <run dir>/
//!   0.graph      0.opinions
//!   1.graph      1.opinions
//!   ...
//!   config.json            (optional, written by the caller)
//!   images/                (populated by an external renderer, not here)
//! ```
//!
//! Opinions files carry one `index value` line per agent. Graph files use
//! the [`crate::graph::io`] text format. Both sides of a step are written
//! from the same in-memory state, so a loader always sees a consistent
//! `(graph, opinions)` pair.

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::graph::{io as graph_io, WeightedGraph};
use crate::opinion::{Opinion, OpinionSpace};
use crate::{Error, Result};

/// Write `{step}.opinions` and `{step}.graph` into `dir`.
pub fn write_state<T: Opinion>(
    dir: &Path,
    step: usize,
    network: &WeightedGraph,
    opinions: &OpinionSpace<T>,
) -> Result<()> {
    let mut file = BufWriter::new(File::create(dir.join(format!("{step}.opinions")))?);
    for (i, opinion) in opinions.as_slice().iter().enumerate() {
        writeln!(file, "{i} {:.6}", opinion.scalar())?;
    }
    file.flush()?;

    graph_io::save_graph(network, dir.join(format!("{step}.graph")))?;
    Ok(())
}

/// Load the `(graph, opinions)` pair persisted for `step`.
pub fn load_step(dir: &Path, step: usize) -> Result<(WeightedGraph, OpinionSpace<f32>)> {
    let network = graph_io::load_graph(dir.join(format!("{step}.graph")))?;
    let opinions = load_opinions(dir.join(format!("{step}.opinions")), network.num_nodes())?;
    Ok((network, opinions))
}

/// Parse an opinions file: one `index value` line per agent, whitespace or
/// comma separated.
pub fn load_opinions(path: impl AsRef<Path>, num_agents: usize) -> Result<OpinionSpace<f32>> {
    let reader = BufReader::new(File::open(path)?);
    let mut opinions = OpinionSpace::new(num_agents);

    for (lineno, line) in reader.lines().enumerate() {
        let line = line?;
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        let mut parts = trimmed.split(|c: char| c.is_whitespace() || c == ',').filter(|s| !s.is_empty());
        let parsed = parts
            .next()
            .and_then(|s| s.parse::<usize>().ok())
            .zip(parts.next().and_then(|s| s.parse::<f32>().ok()));
        let Some((index, value)) = parsed else {
            return Err(Error::Parse(format!(
                "bad opinion line {}: {trimmed:?}",
                lineno + 1
            )));
        };
        opinions.set(index, value)?;
    }

    Ok(opinions)
}

/// Create `<base>/<YYYYMMDD-HHMMSS>` for a fresh simulation run and return
/// its path.
pub fn create_run_dir(base: impl AsRef<Path>) -> Result<PathBuf> {
    let stamp = chrono::Local::now().format("%Y%m%d-%H%M%S").to_string();
    let dir = base.as_ref().join(stamp);
    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}

/// Record a serializable configuration as `config.json` next to the
/// snapshots, for replaying the experiment later.
pub fn write_run_config<C: Serialize>(dir: &Path, config: &C) -> Result<()> {
    let json = serde_json::to_string_pretty(config)?;
    std::fs::write(dir.join("config.json"), json)?;
    Ok(())
}

// ============================================================================
// Tests
// ============================================================================
