// src/pipeline/tests.rs

use super::*;
use crate::layout::{LayoutEntry, LayoutRule};
use crate::region::CropRect;
use image::{Rgb, RgbImage, Rgba, RgbaImage};
use tempfile::TempDir;
use test_log::test;

struct Workspace {
    _root: TempDir,
    src: PathBuf,
    out: PathBuf,
}

impl Workspace {
    fn new() -> Self {
        let root = tempfile::tempdir().unwrap();
        let src = root.path().join("src");
        let out = root.path().join("out");
        fs::create_dir_all(&src).unwrap();
        Workspace {
            _root: root,
            src,
            out,
        }
    }

    fn config(&self, layout: Vec<LayoutRule>) -> Config {
        let mut config = Config::default();
        config.paths.source_dirs = vec![self.src.clone()];
        config.paths.output_dir = self.out.clone();
        config.layout = layout;
        config
    }

    fn solid(&self, name: &str, w: u32, h: u32, px: [u8; 3]) -> PathBuf {
        let path = self.src.join(name);
        RgbImage::from_pixel(w, h, Rgb(px)).save(&path).unwrap();
        path
    }

    fn read_out(&self, name: &str) -> Vec<u8> {
        fs::read(self.out.join(name)).unwrap()
    }
}

fn rule(source: &str, output: &str, size: u32) -> LayoutRule {
    LayoutRule::new(source, vec![LayoutEntry::new(output).sized(size)])
}

#[test]
fn find_source_honours_search_order() {
    let ws = Workspace::new();
    let fallback = ws.src.join("fallback");
    fs::create_dir_all(&fallback).unwrap();
    fs::write(fallback.join("a.png"), b"x").unwrap();
    fs::write(fallback.join("b.png"), b"x").unwrap();
    fs::write(ws.src.join("b.png"), b"x").unwrap();

    let dirs = vec![ws.src.clone(), fallback.clone()];
    assert_eq!(find_source("a.png", &dirs), Some(fallback.join("a.png")));
    assert_eq!(find_source("b.png", &dirs), Some(ws.src.join("b.png")));
    assert_eq!(find_source("c.png", &dirs), None);
}

#[test]
fn later_rule_overrides_earlier_output() {
    let ws = Workspace::new();
    ws.solid("A.jpg", 16, 16, [250, 20, 20]);
    let b_path = ws.solid("B.jpg", 16, 16, [20, 20, 250]);

    let config = ws.config(vec![
        rule("A.jpg", "btn_close.bin", 4),
        rule("B.jpg", "btn_close.bin", 4),
    ]);
    let report = run_layout(&config).unwrap();
    assert_eq!(report.converted, 2);
    assert_eq!(report.written.len(), 1);

    let expected = convert(&load_image(&b_path).unwrap(), (4, 4), &ColorKey::default())
        .unwrap()
        .pixels;
    assert_eq!(ws.read_out("btn_close.bin"), expected);
}

#[test]
fn missing_override_keeps_the_fallback() {
    let ws = Workspace::new();
    ws.solid("sheet.png", 30, 10, [200, 200, 200]);

    let config = ws.config(vec![
        LayoutRule::new(
            "sheet.png",
            vec![LayoutEntry::new("btn_close.bin")
                .cropped(CropRect::new(0, 0, 10, 10))
                .sized(2)],
        ),
        rule("btn_close.png", "btn_close.bin", 2),
    ]);
    let report = run_layout(&config).unwrap();
    assert_eq!(report.converted, 1);
    assert_eq!(report.skipped, 1);
    assert_eq!(ws.read_out("btn_close.bin"), vec![200u8; 2 * 2 * 3]);
}

#[test]
fn bad_crop_abandons_only_that_rules_remaining_entries() {
    let ws = Workspace::new();
    ws.solid("sheet.png", 30, 10, [100, 100, 100]);
    ws.solid("icon.png", 8, 8, [50, 60, 70]);

    let config = ws.config(vec![
        LayoutRule::new(
            "sheet.png",
            vec![
                LayoutEntry::new("first.bin")
                    .cropped(CropRect::new(0, 0, 10, 10))
                    .sized(2),
                LayoutEntry::new("second.bin")
                    .cropped(CropRect::new(25, 0, 10, 10))
                    .sized(2),
                LayoutEntry::new("third.bin")
                    .cropped(CropRect::new(20, 0, 10, 10))
                    .sized(2),
            ],
        ),
        rule("icon.png", "icon.bin", 3),
    ]);
    let report = run_layout(&config).unwrap();
    assert_eq!(report.converted, 2);
    assert_eq!(report.failed, 2);
    assert!(ws.out.join("first.bin").exists());
    assert!(!ws.out.join("second.bin").exists());
    assert!(!ws.out.join("third.bin").exists());
    assert_eq!(ws.read_out("icon.bin"), [50u8, 60, 70].repeat(9));
}

#[test]
fn undecodable_source_fails_without_aborting_batch() {
    let ws = Workspace::new();
    fs::write(ws.src.join("broken.png"), b"definitely not an image").unwrap();
    ws.solid("ok.png", 4, 4, [90, 90, 90]);

    let config = ws.config(vec![rule("broken.png", "broken.bin", 4), rule("ok.png", "ok.bin", 4)]);
    let report = run_layout(&config).unwrap();
    assert_eq!(report.failed, 1);
    assert_eq!(report.converted, 1);
    assert_eq!(ws.read_out("ok.bin").len(), 4 * 4 * 3);
}

#[test]
fn entries_without_size_use_default_icon_size() {
    let ws = Workspace::new();
    ws.solid("plain.png", 128, 128, [40, 80, 120]);

    let config = ws.config(vec![LayoutRule::new("plain.png", vec![LayoutEntry::new("plain.bin")])]);
    run_layout(&config).unwrap();
    assert_eq!(ws.read_out("plain.bin").len(), 64 * 64 * 3);
}

#[test]
fn transparent_regions_key_to_black() {
    let ws = Workspace::new();
    let path = ws.src.join("cursor.png");
    RgbaImage::from_pixel(4, 4, Rgba([255, 255, 255, 0]))
        .save(&path)
        .unwrap();

    let config = ws.config(vec![rule("cursor.png", "cursor.bin", 4)]);
    run_layout(&config).unwrap();
    assert!(ws.read_out("cursor.bin").iter().all(|&b| b == 0));
}

#[test]
fn default_layout_bakes_cursor_at_pointer_size() {
    let ws = Workspace::new();
    ws.solid("cursor.png", 256, 256, [240, 240, 240]);
    ws.solid("system.png", 256, 256, [240, 240, 240]);

    let config = ws.config(crate::layout::default_layout());
    let report = run_layout(&config).unwrap();
    assert_eq!(report.converted, 2);
    assert_eq!(ws.read_out("cursor.bin").len(), 24 * 24 * 3);
    assert_eq!(ws.read_out("system.bin").len(), 64 * 64 * 3);
}

#[test]
fn fonts_are_generated_for_every_size() {
    let ws = Workspace::new();
    let hex_text: String = hex::encode(vec![0x3Cu8; 864])
        .as_bytes()
        .chunks(64)
        .map(|line| format!("{}\n", String::from_utf8_lossy(line)))
        .collect();
    fs::write(ws.src.join("font_terminus_12.hex"), hex_text).unwrap();

    let config = ws.config(Vec::new());
    let report = run_fonts(&config).unwrap();
    assert_eq!(report.converted, 6);
    // One atlas and one MonoFont module per size.
    assert_eq!(report.written.len(), 12);

    for (size, len) in [(12, 864), (14, 1344), (16, 1536), (18, 2160), (20, 2400), (24, 3456)] {
        let data = ws.read_out(&format!("font_terminus_{}.bin", size));
        assert_eq!(data.len(), len, "size {}", size);
    }
    assert_eq!(ws.read_out("font_terminus_12.bin"), vec![0x3C; 864]);

    for size in [12, 14, 16, 18, 20, 24] {
        let module = String::from_utf8(ws.read_out(&format!("font_terminus_{}.rs", size))).unwrap();
        assert!(module.contains(&format!("pub const FONT_TERMINUS_{}: MonoFont", size)));
        assert!(module.contains(&format!("include_bytes!(\"font_terminus_{}.bin\")", size)));
    }
    assert!(!ws.out.join("fonts.rs").exists());
}

#[test]
fn font_subset_limits_outputs() {
    let ws = Workspace::new();
    fs::write(ws.src.join("font_terminus_12.hex"), "ff").unwrap();

    let mut config = ws.config(Vec::new());
    config.fonts.sizes = vec![16];
    let report = run_fonts(&config).unwrap();
    assert_eq!(report.converted, 1);
    assert!(ws.out.join("font_terminus_16.bin").exists());
    assert!(!ws.out.join("font_terminus_12.bin").exists());

    assert_eq!(report.written.len(), 2);

    let module = String::from_utf8(ws.read_out("font_terminus_16.rs")).unwrap();
    assert!(module.contains("FONT_TERMINUS_16"));
    assert!(!ws.out.join("font_terminus_12.rs").exists());
}

#[test]
fn missing_font_source_is_skipped() {
    let ws = Workspace::new();
    let report = run_fonts(&ws.config(Vec::new())).unwrap();
    assert_eq!(report.skipped, 1);
    assert!(report.written.is_empty());
    assert!(!ws.out.exists());
}

#[test]
fn invalid_font_hex_fails_the_font_asset() {
    let ws = Workspace::new();
    fs::write(ws.src.join("font_terminus_12.hex"), "not hex at all").unwrap();
    let report = run_fonts(&ws.config(Vec::new())).unwrap();
    assert_eq!(report.failed, 6);
    assert!(report.written.is_empty());
}

#[test]
fn batch_with_no_sources_succeeds_and_skips_everything() {
    let ws = Workspace::new();
    let config = ws.config(crate::layout::default_layout());
    let report = run_batch(&config).unwrap();
    assert_eq!(report.converted, 0);
    assert_eq!(report.skipped, 13);
    assert!(report.written.is_empty());
}

#[test]
fn convert_file_writes_raw_rgb() {
    let ws = Workspace::new();
    let input = ws.solid("in.png", 10, 10, [10, 10, 10]);
    let output = ws.out.join("nested").join("out.bin");

    convert_file(&input, &output, (64, 64), &ColorKey::default()).unwrap();
    let data = fs::read(&output).unwrap();
    assert_eq!(data.len(), 64 * 64 * 3);
    assert!(data.iter().all(|&b| b == 0));
}

#[test]
fn convert_file_reports_missing_input() {
    let ws = Workspace::new();
    let err = convert_file(
        &ws.src.join("nope.png"),
        &ws.out.join("nope.bin"),
        (64, 64),
        &ColorKey::default(),
    )
    .unwrap_err();
    assert!(format!("{:#}", err).contains("nope.png"));
}

#[test]
fn report_summary_is_readable() {
    let report = BatchReport {
        converted: 3,
        skipped: 1,
        failed: 0,
        written: vec![PathBuf::from("a"), PathBuf::from("b")],
    };
    assert_eq!(
        report.to_string(),
        "3 converted, 1 skipped, 0 failed, 2 files written"
    );
}
