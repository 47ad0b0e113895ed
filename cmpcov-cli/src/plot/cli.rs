use std::path::PathBuf;

use clap::{Arg, ArgAction, Command, value_parser};

pub const PLOT_CMD: &str = "plot";

pub fn create_plot_cli() -> Command {
    Command::new(PLOT_CMD)
        .author("Databio")
        .about("Plot the per-base depth of every pair of samples against each other.")
        .arg_required_else_help(true)
        .arg(
            Arg::new("inputs")
                .help("Coordinate-sorted BAM files, or .list files with one BAM path per line")
                .value_parser(value_parser!(PathBuf))
                .num_args(1..)
                .required(true),
        )
        .arg(
            Arg::new("output")
                .long("output")
                .short('o')
                .help("Output image: PNG for a .png extension, JPEG otherwise")
                .value_parser(value_parser!(PathBuf))
                .required(true),
        )
        .arg(
            Arg::new("width")
                .long("width")
                .short('w')
                .help("Side of the square image in pixels [default: 2000]")
                .value_parser(value_parser!(u32)),
        )
        .arg(
            Arg::new("min-depth")
                .long("min-depth")
                .short('m')
                .help("Lowest depth plotted [default: 0]")
                .value_parser(value_parser!(u32)),
        )
        .arg(
            Arg::new("max-depth")
                .long("max-depth")
                .short('M')
                .help("Depths at or above this value are not plotted [default: 1000]")
                .value_parser(value_parser!(u32)),
        )
        .arg(
            Arg::new("bed")
                .long("bed")
                .short('b')
                .help("Only count positions inside these BED intervals")
                .value_parser(value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("region")
                .long("region")
                .short('r')
                .help("Only use reads overlapping chrom or chrom:start-end"),
        )
        .arg(
            Arg::new("min-mapq")
                .long("min-mapq")
                .short('q')
                .help("Minimum mapping quality, MAPQ 0 is always rejected [default: 1]")
                .value_parser(value_parser!(u8)),
        )
        .arg(
            Arg::new("no-progress")
                .long("no-progress")
                .help("Hide the progress spinner")
                .action(ArgAction::SetTrue),
        )
}
