//! Reader for the SteinLib-style plain-text instance format.
//!
//! The format is line-oriented. `section <name>` and `end` bracket the
//! `comment`, `graph`, `terminals` and `coordinates` sections; the graph
//! section declares `nodes <n>` and `edges <m>` followed by `e <u> <v> <w>`
//! lines, the terminals section declares `terminals <k>` followed by
//! `t <u>` lines. Vertex ids are 1-based in the file and 0-based in memory.
//! An optional `cost <c>` line declares the expected optimum. Coordinate
//! data (`dd` lines), `eof` and unrecognised lines are ignored.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::str::FromStr;

use log::info;

use crate::graph::SteinerInstance;
use crate::{Error, Result};

fn parse_err(line: usize, msg: impl Into<String>) -> Error {
    Error::Parse {
        line,
        msg: msg.into(),
    }
}

fn parse_num<T: FromStr>(token: Option<&str>, line: usize, msg: &str) -> Result<T> {
    token
        .and_then(|t| t.parse().ok())
        .ok_or_else(|| parse_err(line, msg))
}

/// Converts a 1-based vertex id from the file to a 0-based id.
fn vertex_id(token: Option<&str>, line: usize, msg: &str) -> Result<usize> {
    let id: usize = parse_num(token, line, msg)?;
    if id == 0 {
        return Err(parse_err(line, "vertex ids are 1-based"));
    }
    Ok(id - 1)
}

/// Parses an instance from any buffered reader.
pub fn parse_steinlib<R: BufRead>(input: R) -> Result<SteinerInstance> {
    let mut instance = SteinerInstance::default();
    let mut declared_edges: Option<usize> = None;
    let mut declared_terminals: Option<usize> = None;
    let mut seen_graph = false;
    let mut seen_terminals = false;
    let mut in_section = false;
    let mut last_line = 0;

    for (idx, line) in input.lines().enumerate() {
        let lineno = idx + 1;
        last_line = lineno;
        let line = line?;
        let mut tokens = line.split_whitespace();
        let Some(head) = tokens.next() else {
            continue;
        };
        match head {
            "section" => {
                if in_section {
                    return Err(parse_err(lineno, "nested sections"));
                }
                in_section = true;
                let name = tokens
                    .next()
                    .ok_or_else(|| parse_err(lineno, "invalid section line"))?;
                match name {
                    "comment" | "coordinates" => {}
                    "graph" => seen_graph = true,
                    "terminals" => seen_terminals = true,
                    _ => return Err(parse_err(lineno, format!("invalid section '{name}'"))),
                }
            }
            "end" => {
                if !in_section {
                    return Err(parse_err(lineno, "no section to end"));
                }
                in_section = false;
            }
            "nodes" => {
                let n = parse_num(tokens.next(), lineno, "invalid nodes line")?;
                instance.set_num_vertices(n);
            }
            "edges" => {
                declared_edges = Some(parse_num(tokens.next(), lineno, "invalid edges line")?);
            }
            "terminals" => {
                declared_terminals =
                    Some(parse_num(tokens.next(), lineno, "invalid terminals line")?);
            }
            "e" => {
                let u = vertex_id(tokens.next(), lineno, "invalid edge line")?;
                let v = vertex_id(tokens.next(), lineno, "invalid edge line")?;
                let w = parse_num(tokens.next(), lineno, "invalid edge line")?;
                instance
                    .add_edge(u, v, w)
                    .map_err(|e| parse_err(lineno, e.to_string()))?;
            }
            "t" => {
                if declared_terminals.is_none() {
                    return Err(parse_err(lineno, "section terminals not initialised"));
                }
                let u = vertex_id(tokens.next(), lineno, "invalid terminal line")?;
                instance
                    .add_terminal(u)
                    .map_err(|e| parse_err(lineno, e.to_string()))?;
            }
            "cost" => {
                let c = parse_num(tokens.next(), lineno, "invalid cost line")?;
                instance.set_declared_cost(c);
            }
            // Coordinate data is advisory and ignored, as are markers and
            // anything unrecognised.
            _ => {}
        }
    }

    if instance.num_vertices() == 0 {
        return Err(parse_err(last_line, "no vertices declared"));
    }
    if !seen_graph || !seen_terminals {
        return Err(parse_err(last_line, "graph or terminals section missing"));
    }
    if declared_edges != Some(instance.num_edges()) || instance.num_edges() == 0 {
        return Err(parse_err(
            last_line,
            format!(
                "edge count mismatch: declared {declared_edges:?}, read {}",
                instance.num_edges()
            ),
        ));
    }
    if declared_terminals != Some(instance.num_terminals()) || instance.num_terminals() == 0 {
        return Err(parse_err(
            last_line,
            format!(
                "terminal count mismatch: declared {declared_terminals:?}, read {}",
                instance.num_terminals()
            ),
        ));
    }

    info!(
        "input: n = {}, m = {}, k = {}, cost = {:?}",
        instance.num_vertices(),
        instance.num_edges(),
        instance.num_terminals(),
        instance.declared_cost()
    );

    Ok(instance)
}

/// Loads an instance from a file on disk.
pub fn load_file<P: AsRef<Path>>(path: P) -> Result<SteinerInstance> {
    let file = File::open(path)?;
    parse_steinlib(BufReader::new(file))
}
