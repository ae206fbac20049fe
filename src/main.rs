use clap::Parser;
use std::process;
use swath_retriever::cli::{args::Args, commands};

fn main() {
    let args = Args::parse();

    // If no subcommand was provided, show help and available commands
    if args.command.is_none() {
        show_help_and_commands();
        process::exit(0);
    }

    let runtime = tokio::runtime::Runtime::new().unwrap_or_else(|e| {
        eprintln!("Failed to create async runtime: {e}");
        process::exit(1);
    });

    // No graceful-shutdown machinery on purpose: every stage persists its
    // unit of work before moving on, so a killed run resumes where it
    // stopped on the next invocation.
    match runtime.block_on(commands::run(args)) {
        Ok(_stats) => process::exit(0),
        Err(error) => {
            eprintln!("Error: {error:#}");
            process::exit(1);
        }
    }
}

/// Show help information and available commands when no subcommand is provided
fn show_help_and_commands() {
    println!("Swath Retriever - Polar Satellite Swath Listing and Gridding");
    println!("=============================================================");
    println!();
    println!("Compiles listings of polar-orbiting satellite swaths overlapping");
    println!("selected Areas of Interest, downloads the matching files from the");
    println!("archive, and resamples them onto fixed AOI grids.");
    println!();
    println!("USAGE:");
    println!("    swath-retriever <COMMAND> [OPTIONS]");
    println!();
    println!("COMMANDS:");
    println!("    run     Compile the listing and retrieve matching swaths (main command)");
    println!("    aois    List the built-in AOI grids");
    println!("    help    Show this help message or help for specific commands");
    println!();
    println!("OPTIONS:");
    println!("    -h, --help       Show help information");
    println!("    -V, --version    Show version information");
    println!();
    println!("EXAMPLES:");
    println!("    # List one Antarctic summer week of Terra MODIS over the Ronne polynya:");
    println!("    swath-retriever run --sensor modis --carrier terra \\");
    println!("                        --start 2023-01-01 --stop 2023-01-07 \\");
    println!("                        --aois ronne --listing-only");
    println!();
    println!("    # Full retrieval over two AOIs, resuming any interrupted run:");
    println!("    swath-retriever run --sensor modis --carrier aqua \\");
    println!("                        --start 2023-01-01 --stop 2023-01-31 \\");
    println!("                        --aois berkner,ronne --output ./swaths");
    println!();
    println!("    # Show the AOI catalog:");
    println!("    swath-retriever aois");
    println!();
    println!("For detailed help on any command, use:");
    println!("    swath-retriever <COMMAND> --help");
}
