//! Aois command: print the built-in AOI catalog

use colored::Colorize;

use crate::app::services::aoi::builtin_grids;
use crate::cli::args::AoisArgs;

/// Print one table row per built-in AOI grid
pub fn run_aois(args: &AoisArgs) {
    println!();
    println!("{}", "Built-in AOI grids".bold());
    println!(
        "{:<18} {:<6} {:>9} {:>9} {:>7} {:>7}",
        "id".dimmed(),
        "hemi".dimmed(),
        "lon".dimmed(),
        "lat".dimmed(),
        "rows".dimmed(),
        "cols".dimmed()
    );

    for grid in builtin_grids() {
        if let Some(hemisphere) = args.hemisphere {
            if grid.hemisphere != hemisphere {
                continue;
            }
        }
        let [lon_min, lat_min, lon_max, lat_max] = grid.extent;
        println!(
            "{:<18} {:<6} {:>9} {:>9} {:>7} {:>7}",
            grid.id.cyan(),
            grid.hemisphere,
            format!("{lon_min}..{lon_max}"),
            format!("{lat_min}..{lat_max}"),
            grid.rows,
            grid.cols
        );
    }
    println!();
}
