use card_bounds::detect::{self, CardBoundsError};
use card_bounds::{BorderColor, CardDetectorParams, DetectionMethod};
use std::io::Cursor;

const GREEN: [u8; 4] = [40, 160, 60, 255];
const BLACK: [u8; 4] = [5, 5, 5, 255];

fn synthetic_card() -> image::RgbaImage {
    image::RgbaImage::from_fn(500, 700, |x, y| {
        let inside = (50..450).contains(&x) && (70..630).contains(&y);
        image::Rgba(if inside { BLACK } else { GREEN })
    })
}

fn png_bytes(img: &image::RgbaImage) -> Vec<u8> {
    let mut buf = Cursor::new(Vec::new());
    img.write_to(&mut buf, image::ImageFormat::Png)
        .expect("encode png");
    buf.into_inner()
}

#[test]
fn png_round_trip_detects_card() {
    let bytes = png_bytes(&synthetic_card());
    let det = detect::detect_card_bytes(&bytes, CardDetectorParams::default()).expect("detect");
    assert_eq!(det.border_color, BorderColor::Black);
    assert_eq!(det.method, DetectionMethod::GradientSubpixel);
    for (got, want) in [
        (det.edges.left, 50.0),
        (det.edges.right, 450.0),
        (det.edges.top, 70.0),
        (det.edges.bottom, 630.0),
    ] {
        assert!((got - want).abs() <= 3.0, "got {got}, want {want}");
    }
}

#[test]
fn undecodable_bytes_are_an_image_error() {
    let err = detect::detect_card_bytes(b"not an image", CardDetectorParams::default())
        .expect_err("garbage");
    assert!(matches!(err, CardBoundsError::Image(_)), "{err:?}");
}

#[test]
fn detection_from_file_matches_in_memory() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("card.png");
    let img = synthetic_card();
    img.save(&path).expect("save png");

    let from_file = detect::detect_card_path(&path, CardDetectorParams::default()).expect("file");
    let in_memory = detect::detect_card_default(&img).expect("memory");
    assert_eq!(from_file.edges, in_memory.edges);
    assert_eq!(from_file.confidence, in_memory.confidence);

    let missing = detect::detect_card_path(dir.path().join("nope.png"), CardDetectorParams::default());
    assert!(matches!(missing, Err(CardBoundsError::Io(_))));
}

#[test]
fn rectified_raster_is_written_only_when_present() {
    let dir = tempfile::tempdir().expect("tempdir");
    let img = synthetic_card();

    let det = detect::detect_card_default(&img).expect("detect");
    assert!(!detect::save_rectified(&det, dir.path().join("a.png")).expect("no-op"));
    assert!(!dir.path().join("a.png").exists());

    let mut params = CardDetectorParams::default();
    params.rectify.max_skew_rad = -1.0;
    let det = detect::detect_card(&img, params).expect("detect");
    assert!(det.perspective_corrected);
    let out = dir.path().join("b.png");
    assert!(detect::save_rectified(&det, &out).expect("write"));
    let written = image::open(&out).expect("reopen").to_rgba8();
    assert_eq!(
        Some((written.width() as usize, written.height() as usize)),
        det.rectified_size()
    );
}

#[test]
fn report_serializes_detection() {
    let det = detect::detect_card_default(&synthetic_card()).expect("detect");
    let json = serde_json::to_value(&det).expect("json");
    assert_eq!(json["method"], "gradient-subpixel");
    assert_eq!(json["border_color"], "black");
    assert!(json.get("rectified").is_none());
}

#[cfg(feature = "tokio")]
#[tokio::test]
async fn async_detection_runs_on_blocking_pool() {
    let bytes = png_bytes(&synthetic_card());
    let det = detect::detect_card_async(bytes, CardDetectorParams::default())
        .await
        .expect("detect");
    assert_eq!(det.border_color, BorderColor::Black);
    assert!((0.0..=1.0).contains(&det.confidence));
}
