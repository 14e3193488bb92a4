use std::io;

use clap::Parser;
use tracing::debug;

mod args;
mod catalog;
mod config;
mod error;
mod frontend;
mod logger;
mod materialize;
mod plan;
mod selection;
mod session;
mod tree;
mod utils;

// re-export
pub use args::*;
pub use catalog::*;
pub use config::*;
pub use error::*;
pub use frontend::*;
pub use logger::*;
pub use materialize::*;
pub use plan::*;
pub use selection::*;
pub use session::*;
pub use tree::*;
pub use utils::*;

pub fn run() -> anyhow::Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);
    run_with_args(args)
}

pub fn run_with_args(args: Args) -> anyhow::Result<()> {
    // create a Config from Args
    let config = Config::create(&args)?;
    debug!(?config, "loaded config");

    // catch missing roots before asking the user anything
    ensure_roots_exist(&config.roots())?;

    let stdin = io::stdin().lock();
    let stdout = io::stdout().lock();

    let mut session = Session::new(&config)?;
    let outcome = if args.is_interactive() {
        session.run(&mut InteractiveFrontend::new(stdin, stdout))?
    } else {
        let mut frontend = FlagFrontend::new(
            args.models.as_deref(),
            args.categories.as_deref(),
            args.yes,
            stdin,
            stdout,
        );
        session.run(&mut frontend)?
    };
    debug!(?outcome, "session finished");

    Ok(())
}
