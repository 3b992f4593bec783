use clap::{Parser, Subcommand, ValueEnum};

#[derive(clap::Args, Debug)]
pub struct InspectArgs {
    pub obj_path: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Preset {
    /// Pixelated, smoothed pointer, scroll parallax.
    Landing,
    /// Full resolution, direct pointer.
    Canvas,
}

#[derive(clap::Args, Debug)]
pub struct ViewArgs {
    #[arg(long, value_enum, default_value_t = Preset::Landing)]
    pub preset: Preset,

    /// OBJ file to show instead of the preset's model.
    #[arg(short, long)]
    pub model: Option<String>,

    /// Overrides the preset's pixel scale.
    #[arg(long)]
    pub pixel_scale: Option<u32>,
}

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Print the triangle count and extents of a mesh.
    Inspect(InspectArgs),
    /// Open the mesh in a window.
    View(ViewArgs),
}
