use dither_viewer::ViewerConfig;

use crate::args::{Preset, ViewArgs};

/// Builds the viewer configuration from a preset and the overrides given.
pub fn view_config(args: &ViewArgs) -> ViewerConfig {
    let mut config = match args.preset {
        Preset::Landing => ViewerConfig::landing(),
        Preset::Canvas => ViewerConfig::canvas(),
    };
    if let Some(model) = &args.model {
        config.model = model.clone();
    }
    if let Some(pixel_scale) = args.pixel_scale {
        config.pixel_scale = pixel_scale;
    }
    config
}

pub fn view_command(args: ViewArgs) -> anyhow::Result<()> {
    let config = view_config(&args);
    log::info!("opening {} with {:?} preset", config.model, args.preset);
    dither_viewer::run_with(config)
}
