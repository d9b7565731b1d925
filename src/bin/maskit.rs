// maskit: command-line front-end for the mask studio.
//
// Subcommands:
//   css           print the stylesheet for a saved state
//   export        rasterize a saved state to PNG, JPEG or WebP
//   set-image     embed an image file into a saved state
//   presets       list the built-in presets
//   apply-preset  apply a preset to a saved state and print the result

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand, ValueEnum};
use log::info;

use maskit::{
    CssOutputTab, ExportFormat, ExportScale, ExportSettings, Exporter, StudioState, StudioStore,
    find_preset, image_from_path, presets,
};

#[derive(Parser)]
#[command(name = "maskit", about = "CSS mask, filter and clip-path studio")]
struct Cli {
    #[command(subcommand)]
    command: Cmd,
}

#[derive(Subcommand)]
enum Cmd {
    /// Print the generated CSS for a state file
    Css {
        state: PathBuf,
        #[arg(long, value_enum, default_value_t = View::Full)]
        view: View,
    },
    /// Render a state file's image with all effects applied
    Export {
        state: PathBuf,
        #[arg(long, value_enum, default_value_t = Format::Png)]
        format: Format,
        /// Resolution multiplier: 1, 2 or 4
        #[arg(long, default_value_t = 1)]
        scale: u8,
        /// JPEG quality, 0.1 to 1.0
        #[arg(long, default_value_t = maskit::DEFAULT_QUALITY)]
        quality: f32,
        #[arg(long, default_value = ".")]
        out_dir: PathBuf,
    },
    /// Load an image file into a state file (written in place)
    SetImage { state: PathBuf, image: PathBuf },
    /// List the built-in presets
    Presets,
    /// Apply a preset to a state file and print the resulting state
    ApplyPreset { id: String, state: PathBuf },
}

#[derive(Debug, Clone, Copy, Eq, PartialEq, ValueEnum)]
enum View {
    Full,
    Mask,
    Filter,
    Clip,
}

impl From<View> for CssOutputTab {
    fn from(view: View) -> Self {
        match view {
            View::Full => CssOutputTab::Full,
            View::Mask => CssOutputTab::Mask,
            View::Filter => CssOutputTab::Filter,
            View::Clip => CssOutputTab::Clip,
        }
    }
}

#[derive(Debug, Clone, Copy, Eq, PartialEq, ValueEnum)]
enum Format {
    Png,
    Jpeg,
    Webp,
}

impl From<Format> for ExportFormat {
    fn from(format: Format) -> Self {
        match format {
            Format::Png => ExportFormat::Png,
            Format::Jpeg => ExportFormat::Jpeg,
            Format::Webp => ExportFormat::Webp,
        }
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let result = match cli.command {
        Cmd::Css { state, view } => cmd_css(&state, view.into()),
        Cmd::Export {
            state,
            format,
            scale,
            quality,
            out_dir,
        } => cmd_export(&state, format.into(), scale, quality, &out_dir),
        Cmd::SetImage { state, image } => cmd_set_image(&state, &image),
        Cmd::Presets => {
            cmd_presets();
            Ok(())
        }
        Cmd::ApplyPreset { id, state } => cmd_apply_preset(&id, &state),
    };
    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn load_state(path: &Path) -> Result<StudioState, String> {
    let json = std::fs::read_to_string(path)
        .map_err(|e| format!("cannot read {}: {e}", path.display()))?;
    StudioState::from_json(&json).map_err(|e| format!("invalid state in {}: {e}", path.display()))
}

fn to_json(state: &StudioState) -> Result<String, String> {
    state
        .to_json_pretty()
        .map_err(|e| format!("state serialization failed: {e}"))
}

fn cmd_css(path: &Path, tab: CssOutputTab) -> Result<(), String> {
    let store = StudioStore::with_state(load_state(path)?);
    println!("{}", store.css(tab));
    Ok(())
}

fn cmd_export(
    path: &Path,
    format: ExportFormat,
    scale: u8,
    quality: f32,
    out_dir: &Path,
) -> Result<(), String> {
    let scale = ExportScale::try_from(scale)?;
    let settings = ExportSettings::new(format, scale).with_quality(quality);
    let mut store = StudioStore::with_state(load_state(path)?);
    store.open_export_dialog();
    let written = Exporter::new()
        .export_to_dir(&mut store, &settings, out_dir)
        .map_err(|e| e.to_string())?;
    println!("{}", written.display());
    Ok(())
}

fn cmd_set_image(path: &Path, image: &Path) -> Result<(), String> {
    let data = image_from_path(image).map_err(|e| e.to_string())?;
    info!(
        "loaded {} ({}x{})",
        data.file_name, data.natural_width, data.natural_height
    );
    let mut store = StudioStore::with_state(load_state(path)?);
    store.set_image(data);
    let json = to_json(store.state())?;
    std::fs::write(path, json).map_err(|e| format!("cannot write {}: {e}", path.display()))
}

fn cmd_presets() {
    for preset in presets() {
        println!(
            "{:<20} {:<9} {}",
            preset.id,
            preset.category.as_str(),
            preset.description
        );
    }
}

fn cmd_apply_preset(id: &str, path: &Path) -> Result<(), String> {
    let preset = find_preset(id).ok_or_else(|| format!("unknown preset: {id}"))?;
    let mut store = StudioStore::with_state(load_state(path)?);
    store.apply_preset(&preset.patch());
    println!("{}", to_json(store.state())?);
    Ok(())
}
