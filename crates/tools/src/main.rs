use anyhow::{Context, Result};
use clap::Parser;
use sector_core::{GenerationConfig, GridPos, MapGenerator, NodeType, SectorMap};
use std::fs;

#[derive(Parser)]
#[command(author, version, about = "Generate and inspect sector maps", long_about = None)]
struct Args {
    /// Path to a GenerationConfig JSON file; built-in defaults when omitted
    #[arg(short, long)]
    config: Option<String>,
    /// Generation seed
    #[arg(short, long, default_value_t = 0)]
    seed: u64,
    /// Print the full node table
    #[arg(long)]
    nodes: bool,
    /// Print an ASCII rendering of the map
    #[arg(long)]
    ascii: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => {
            let data = fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file: {path}"))?;
            serde_json::from_str(&data).with_context(|| "Failed to deserialize config JSON")?
        }
        None => GenerationConfig::default(),
    };

    let generator = MapGenerator::new(config)?;
    let map = generator.generate(args.seed)?;

    println!("Seed: {}", args.seed);
    println!(
        "Floors: {} (+ boss column), slots per floor: {}",
        map.floors(),
        map.slots_per_floor()
    );
    let starts: Vec<u32> = map.start_points().iter().map(|pos| pos.slot).collect();
    println!("Start slots: {starts:?}");
    println!(
        "Activated nodes: {} of {}",
        map.nodes().filter(|node| node.activated).count(),
        map.nodes().count()
    );
    println!("Fingerprint: {:016x}", map.fingerprint());

    if args.nodes {
        print_nodes(&map);
    }
    if args.ascii {
        print_ascii(&map);
    }

    Ok(())
}

fn print_nodes(map: &SectorMap) {
    println!("floor slot type            active encounter");
    for node in map.nodes() {
        let type_label = format!("{:?}", node.node_type);
        println!(
            "{:>5} {:>4} {type_label:<15} {:<6} {}",
            node.pos.floor,
            node.pos.slot,
            node.activated,
            node.encounter.as_deref().unwrap_or("-"),
        );
    }
}

/// One row per slot, floors left to right; deactivated cells render dark.
fn print_ascii(map: &SectorMap) {
    for slot in 0..map.slots_per_floor() {
        let mut line = String::new();
        for floor in 0..=map.floors() {
            let pos = GridPos { floor, slot };
            let glyph = map
                .node(pos)
                .map_or(' ', |node| glyph_for(node.node_type, node.activated));
            line.push(glyph);
            line.push(' ');
        }
        println!("{line}");
    }
}

fn glyph_for(node_type: NodeType, activated: bool) -> char {
    if !activated {
        return '.';
    }
    match node_type {
        NodeType::None => '.',
        NodeType::NormalEncounter => 'n',
        NodeType::EliteEncounter => 'e',
        NodeType::Chest => 'c',
        NodeType::RestSpot => 'r',
        NodeType::Event => 'v',
        NodeType::Merchant => 'm',
        NodeType::Boss => 'B',
    }
}
