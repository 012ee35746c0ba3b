use card_bounds::detect;
use card_bounds::detector::{CardDetectConfig, CardDetectReport};
use std::path::PathBuf;

#[cfg(feature = "tracing")]
use card_bounds::core::init_tracing;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    #[cfg(feature = "tracing")]
    init_tracing(false);
    #[cfg(not(feature = "tracing"))]
    card_bounds::core::init_with_level(log::LevelFilter::Info)?;

    let Some(config_path) = std::env::args().nth(1).map(PathBuf::from) else {
        eprintln!("Usage: detect_card <config.json>");
        return Ok(());
    };

    let cfg = CardDetectConfig::load_json(&config_path)?;
    let img = image::ImageReader::open(&cfg.image_path)?
        .decode()?
        .to_rgba8();
    let mut report = CardDetectReport::new(
        &cfg,
        &config_path,
        img.width() as usize,
        img.height() as usize,
    );

    match detect::detect_card(&img, cfg.build_params()) {
        Ok(det) => {
            println!(
                "{} border ({:.2}), edges l={:.2} r={:.2} t={:.2} b={:.2}, confidence {:.2}, {}",
                det.border_color,
                det.border_confidence,
                det.edges.left,
                det.edges.right,
                det.edges.top,
                det.edges.bottom,
                det.confidence,
                det.method
            );
            if let Some(advice) = det.background_recommendation.as_deref() {
                println!("background: {advice}");
            }
            let mut written = None;
            if let Some(path) = cfg.rectified_path.as_ref() {
                if detect::save_rectified(&det, path)? {
                    written = Some(path.clone());
                }
            }
            report.set_detection(det, written);
        }
        Err(detect::CardBoundsError::Detect(err)) => {
            eprintln!("detection failed: {err}");
            report.set_error(err);
        }
        Err(err) => return Err(err.into()),
    }

    let out = cfg.output_path();
    report.write_json(&out)?;
    println!("report written to {}", out.display());
    Ok(())
}
