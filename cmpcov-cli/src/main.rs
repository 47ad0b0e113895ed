mod plot;

use anyhow::Result;
use clap::{Arg, ArgAction, Command};
use env_logger::Env;
use log::error;

pub mod consts {
    pub const VERSION: &str = env!("CARGO_PKG_VERSION");
    pub const PKG_NAME: &str = "cmpcov";
    pub const BIN_NAME: &str = "cmpcov";
}

fn build_parser() -> Command {
    Command::new(consts::BIN_NAME)
        .bin_name(consts::BIN_NAME)
        .version(consts::VERSION)
        .author("Databio")
        .about("Compare the per-base sequencing depth of BAM samples as a matrix of scatter plots.")
        .subcommand_required(true)
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .help("Log debug messages")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .subcommand(plot::cli::create_plot_cli())
}

fn main() -> Result<()> {
    let app = build_parser();
    let matches = app.get_matches();

    let default_filter = if matches.get_flag("verbose") {
        "debug"
    } else {
        "info"
    };
    env_logger::Builder::from_env(Env::default().default_filter_or(default_filter)).init();

    let result = match matches.subcommand() {
        //
        // PLOT
        //
        Some((plot::cli::PLOT_CMD, matches)) => plot::handlers::run_plot(matches),

        _ => unreachable!("Subcommand not found"),
    };

    if let Err(err) = result {
        error!("{} {}: {:#}", consts::PKG_NAME, plot::cli::PLOT_CMD, err);
        std::process::exit(1);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    use rstest::rstest;

    #[rstest]
    fn test_parser_is_valid() {
        build_parser().debug_assert();
    }

    #[rstest]
    fn test_verbose_is_global() {
        let matches = build_parser()
            .try_get_matches_from(["cmpcov", "plot", "-o", "x.png", "a.bam", "--verbose"])
            .unwrap();
        assert!(matches.get_flag("verbose"));
    }
}
