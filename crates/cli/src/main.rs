use clap::Parser;

mod args;
mod inspect;
mod view;

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let args = args::Args::parse();
    match args.command {
        args::Commands::Inspect(inspect_args) => {
            inspect::inspect_command(inspect_args, &mut std::io::stdout().lock())
        }
        args::Commands::View(view_args) => view::view_command(view_args),
    }
}
