//! Validate a session config file.

use std::path::PathBuf;

use stagemix_session::SessionConfig;

pub fn run(path: PathBuf) -> anyhow::Result<()> {
    println!("Validating session config at: {}", path.display());

    let config = SessionConfig::from_path(&path)
        .map_err(|e| anyhow::anyhow!("Invalid session config: {e}"))?;

    println!(
        "  Canvas: {}x{} @ {} fps",
        config.canvas.width, config.canvas.height, config.canvas.fps
    );
    println!("  Layout: {}", config.layout_mode);
    if let Some(featured) = &config.featured_participant {
        println!("  Featured: {featured}");
    }
    println!("  Mixed: {}", config.mix);
    println!("  Stream type: {:?}", config.subscription.stream_type);
    if !config.rotations.is_empty() {
        let mut rotations: Vec<_> = config.rotations.iter().collect();
        rotations.sort_by(|a, b| a.0.cmp(b.0));
        for (id, rotation) in rotations {
            println!("  Rotation: {id} -> {} deg", rotation.degrees());
        }
    }
    println!("  Recorder output: {}", config.recorder.path.display());
    if !config.watermarks.is_empty() {
        println!("  Watermarks: {}", config.watermarks.len());
    }

    println!("\nSession config is valid.");
    Ok(())
}
