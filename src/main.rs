use std::env;

use xzzpcb_reader::{PcbFile, TopLevelBlock};

fn main() {
    env_logger::init();
    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        eprintln!("Usage: {} <path-to-pcb-file> [--json]", args[0]);
        std::process::exit(1);
    }

    let pcb_path = &args[1];
    let as_json = args.iter().any(|arg| arg == "--json");

    println!("Reading .pcb file: {}", pcb_path);
    println!("{}", "=".repeat(60));

    match PcbFile::open(pcb_path) {
        Ok(pcb) => {
            if as_json {
                match serde_json::to_string_pretty(&pcb) {
                    Ok(json) => println!("{}", json),
                    Err(e) => {
                        eprintln!("ERROR: Failed to serialize output: {}", e);
                        std::process::exit(1);
                    }
                }
                return;
            }

            let mut arcs = 0usize;
            let mut vias = 0usize;
            let mut segments = 0usize;
            let mut texts = 0usize;
            let mut parts = 0usize;
            let mut degraded = 0usize;
            let mut pins = 0usize;

            for block in &pcb.main_data_block {
                match block {
                    TopLevelBlock::Arc(_) => arcs += 1,
                    TopLevelBlock::Via(_) => vias += 1,
                    TopLevelBlock::Segment(_) => segments += 1,
                    TopLevelBlock::Text(_) => texts += 1,
                    TopLevelBlock::Data(data) => {
                        parts += 1;
                        match &data.parsed_data {
                            Some(part) => {
                                pins += part
                                    .sub_blocks
                                    .iter()
                                    .map(|sub| match sub {
                                        xzzpcb_reader::SubBlock::PinArray(array) => {
                                            array.pins.len()
                                        }
                                        _ => 0,
                                    })
                                    .sum::<usize>();
                            }
                            None => degraded += 1,
                        }
                    }
                }
            }

            println!("SUCCESS! Parsing completed.");
            println!("{}", "=".repeat(60));
            println!("\nFile Information:");
            if let Some(len) = pcb.deobfuscated_len {
                println!("  De-obfuscated: {} bytes", len);
            } else {
                println!("  De-obfuscated: not obfuscated");
            }
            println!(
                "  Main data blocks size: {} bytes",
                pcb.header.main_data_blocks_size
            );

            println!("\nStatistics:");
            println!("  Arcs: {}", arcs);
            println!("  Vias: {}", vias);
            println!("  Segments: {}", segments);
            println!("  Texts: {}", texts);
            println!("  Parts: {} ({} degraded)", parts, degraded);
            println!("  Pins: {}", pins);
        }
        Err(e) => {
            eprintln!("\nERROR: Failed to read .pcb file");
            eprintln!("  {}", e);
            std::process::exit(1);
        }
    }
}
