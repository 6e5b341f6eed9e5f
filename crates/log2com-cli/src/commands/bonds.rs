use crate::cli::BondsArgs;
use crate::error::{CliError, Result};
use log2com::core::bonding::graph::BondGraph;
use log2com::core::bonding::perception::PerceptionConfig;
use log2com::core::bonding::search::SearchStrategy;
use log2com::core::io::registry::SourceRegistry;
use log2com::workflows::convert::load_molecule;
use std::fmt::Write;
use tracing::info;

pub fn run(args: BondsArgs) -> Result<()> {
    let mut perception = PerceptionConfig::default();
    if let Some(tolerance) = args.tolerance {
        perception = perception.with_tolerance(tolerance);
    }
    if args.strict {
        perception = perception.strict();
    }
    if args.grid {
        perception = perception.with_search(SearchStrategy::CellGrid);
    }

    let registry = SourceRegistry::with_defaults(args.allow_unconverged);
    let mut molecule = load_molecule(&args.input, &registry)?.with_perception(perception);
    let graph = molecule.compute_bonds()?;
    info!(
        "Perceived {} bond(s) among {} atom(s).",
        graph.edge_count(),
        graph.node_count()
    );

    print!("{}", render_connectivity(graph).map_err(|e| CliError::Other(e.into()))?);
    Ok(())
}

/// One line per atom: 1-based atom number, symbol, then the 1-based numbers
/// of its bonded neighbors.
pub fn render_connectivity(graph: &BondGraph) -> std::result::Result<String, std::fmt::Error> {
    let mut out = String::new();
    for (index, atom) in graph.atoms().iter().enumerate() {
        write!(out, "{:>4}  {:<2}", index + 1, atom.name())?;
        for neighbor in graph.neighbors_of(index).into_iter().flatten() {
            write!(out, " {}", neighbor + 1)?;
        }
        writeln!(out)?;
    }
    writeln!(out, "{} bond(s)", graph.edge_count())?;
    Ok(out)
}
