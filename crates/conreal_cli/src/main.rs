//! CLI smoke entry point.
//!
//! # Responsibility
//! - Verify `conreal_core` linkage with deterministic output.
//! - Score entries passed as arguments: `conreal_cli [--json] <entry>...`.

use conreal_core::{compute_fragmentation, FragmentationResult, RealityBadge};
use std::process::ExitCode;

fn main() -> ExitCode {
    let mut json = false;
    let mut entries = Vec::new();
    for arg in std::env::args().skip(1) {
        if arg == "--json" {
            json = true;
        } else {
            entries.push(arg);
        }
    }

    if entries.is_empty() {
        println!("conreal_core ping={}", conreal_core::ping());
        println!("conreal_core version={}", conreal_core::core_version());
        return ExitCode::SUCCESS;
    }

    let result = match compute_fragmentation(&entries) {
        Ok(result) => result,
        Err(err) => {
            eprintln!("fragmentation failed: {err}");
            return ExitCode::FAILURE;
        }
    };

    if json {
        match serde_json::to_string_pretty(&result) {
            Ok(body) => println!("{body}"),
            Err(err) => {
                eprintln!("encode failed: {err}");
                return ExitCode::FAILURE;
            }
        }
    } else {
        print_summary(&result);
    }
    ExitCode::SUCCESS
}

fn print_summary(result: &FragmentationResult) {
    let badge = RealityBadge::for_fragmentation(result.fragmentation);
    println!("fragmentation={:.4}", result.fragmentation);
    println!("consensus={}", result.consensus_text);
    println!("samples={}", result.fragmented_samples.join(" | "));
    println!("valid_entries={}", result.sample_count);
    println!("badge={} band={} color={}", badge.text, badge.band.label(), badge.background_color);
}
