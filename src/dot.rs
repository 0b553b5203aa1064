//! Dot (Graphviz) export -- the only graph-serialization format in scope
//! (spec.md §6); the teacher's TGF/gcmd command-file formats are explicitly
//! out of scope here.
use crate::network::Network;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

/// Renders the network as a directed-graph dot description, edges labeled
/// with their current capacity. Mirrors the teacher's `format::tgf::save`
/// writer shape (`BufWriter` + `writeln!`), just targeting dot instead of
/// TGF.
pub fn to_dot_string(network: &Network) -> String {
    let mut out = String::new();
    out.push_str("digraph network {\n");
    for vertex in network.vertices() {
        out.push_str(&format!("  {};\n", vertex.0));
    }
    let mut edges: Vec<_> = network.edges().collect();
    edges.sort_by_key(|e| (e.src().0, e.dst().0));
    for edge in edges {
        let capacity = network.capacity_of(edge).unwrap_or(0.0);
        out.push_str(&format!(
            "  {} -> {} [label=\"{:.6}\"];\n",
            edge.src().0,
            edge.dst().0,
            capacity
        ));
    }
    out.push_str("}\n");
    out
}

/// Writes the dot description to `path`, truncating any existing file.
pub fn to_dot_file(network: &Network, path: impl AsRef<Path>) -> io::Result<()> {
    let file = File::create(path)?;
    let mut buffered = BufWriter::new(file);
    buffered.write_all(to_dot_string(network).as_bytes())
}
