//! Integration tests for FreeCAD script export.
//!
//! The script is pasted verbatim into FreeCAD, so its text is pinned exactly.

use package_model_mcp::export::freecad::{config_to_freecad_script, solids_to_freecad_script};
use package_model_mcp::export::{write_script, ExportColors};
use package_model_mcp::geometry::{Solid, Vec3};
use package_model_mcp::packages::qfn::{PadCount, QfnConfig, QfnPad};
use package_model_mcp::packages::{
    default_config, BodyDimensions, ExposedPad, PackageConfig, PackageKind,
};

fn count_lines(script: &str, needle: &str) -> usize {
    script.lines().filter(|l| l.contains(needle)).count()
}

#[test]
fn test_single_body_and_pad_script_is_exact() {
    let solids = [
        Solid::body(Vec3::new(0.0, 0.0, 0.5), Vec3::new(1.0, 2.0, 1.0)),
        Solid::pad(Vec3::new(0.25, 0.0, 0.05), Vec3::new(0.5, 0.5, 0.1)),
    ];

    let script = solids_to_freecad_script("demo", &solids, &ExportColors::default());

    let expected = r#"# Auto-generated FreeCAD script
# Paste into FreeCAD Python console, then export via File > Export

import FreeCAD
import Part

doc = FreeCAD.newDocument("demo")

# body 0: size=(1, 2, 1) center=(0, 0, 0.5)
body_0 = doc.addObject("Part::Box", "body_0")
body_0.Length = 1
body_0.Width = 2
body_0.Height = 1
body_0.Placement = FreeCAD.Placement(FreeCAD.Vector(-0.5, -1, 0), FreeCAD.Rotation())

# pad 1: size=(0.5, 0.5, 0.1) center=(0.25, 0, 0.05)
pad_1 = doc.addObject("Part::Box", "pad_1")
pad_1.Length = 0.5
pad_1.Width = 0.5
pad_1.Height = 0.1
pad_1.Placement = FreeCAD.Placement(FreeCAD.Vector(0, -0.25, 0), FreeCAD.Rotation())

doc.recompute()

doc.getObject("body_0").Label = "Body"
doc.getObject("body_0").ViewObject.ShapeColor = (0.149, 0.145, 0.145)

doc.getObject("pad_1").Label = "Pads"
doc.getObject("pad_1").ViewObject.ShapeColor = (0.824, 0.820, 0.780)

doc.recompute()
FreeCADGui.ActiveDocument.ActiveView.fitAll()"#;

    assert_eq!(script, expected);
}

#[test]
fn test_default_qfn_script_is_exact() {
    let script =
        config_to_freecad_script(&default_config(PackageKind::Qfn), &ExportColors::default());

    assert_eq!(script, include_str!("fixtures/qfn_nrf52832.py"));
}

#[test]
fn test_tiny_coordinates_use_exponent_notation() {
    // Pad rows along Y leave a float residue of 2.78e-17 in the corner
    let config = PackageConfig::Qfn(QfnConfig {
        body: BodyDimensions::new(3.0, 3.3, 0.9),
        pad_count: PadCount { x: 3, y: 4 },
        pad: QfnPad {
            pitch: 0.1,
            width: 0.3,
            length: 0.1,
            standoff: 0.0,
            thickness: 0.1,
        },
        epad: ExposedPad::Disabled,
    });

    let script = config_to_freecad_script(&config, &ExportColors::default());

    assert!(script.contains(
        "pad_13.Placement = FreeCAD.Placement(FreeCAD.Vector(-1.65, 2.7755575615628914e-17, 0), FreeCAD.Rotation())"
    ));
    assert_eq!(script, include_str!("fixtures/qfn_3x3.3_no_epad.py"));
}

#[test]
fn test_multiple_buckets_are_fused() {
    let solids = [
        Solid::body(Vec3::new(0.0, 0.0, 0.5), Vec3::new(1.0, 1.0, 1.0)),
        Solid::body(Vec3::new(0.0, 0.0, 1.5), Vec3::new(1.0, 1.0, 1.0)),
        Solid::pad(Vec3::new(-1.0, 0.0, 0.05), Vec3::new(0.5, 0.5, 0.1)),
        Solid::pad(Vec3::new(0.0, 0.0, 0.05), Vec3::new(0.5, 0.5, 0.1)),
        Solid::pad(Vec3::new(1.0, 0.0, 0.05), Vec3::new(0.5, 0.5, 0.1)),
    ];

    let script = solids_to_freecad_script("stack", &solids, &ExportColors::default());

    assert!(script.contains(r#"Body_fuse = doc.addObject("Part::MultiFuse", "Body")"#));
    assert!(script.contains(
        r#"Body_fuse.Shapes = [doc.getObject("body_0"), doc.getObject("body_1")]"#
    ));
    assert!(script.contains(r#"Pads_fuse = doc.addObject("Part::MultiFuse", "Pads")"#));
    assert!(script.contains(
        r#"Pads_fuse.Shapes = [doc.getObject("pad_2"), doc.getObject("pad_3"), doc.getObject("pad_4")]"#
    ));
    assert_eq!(count_lines(&script, "ViewObject.Visibility = False"), 5);
}

#[test]
fn test_custom_colors_are_applied() {
    let colors = ExportColors {
        body: 0x00ff_0000,
        pad: 0x0000_00ff,
    };
    let script = config_to_freecad_script(&default_config(PackageKind::Wson), &colors);

    assert!(script.contains("ShapeColor = (1.000, 0.000, 0.000)"));
    assert!(script.contains("Pads_fuse.ViewObject.ShapeColor = (0.000, 0.000, 1.000)"));
}

#[test]
fn test_default_wson_document_named_after_package() {
    let script =
        config_to_freecad_script(&default_config(PackageKind::Wson), &ExportColors::default());

    assert!(script.contains(r#"doc = FreeCAD.newDocument("WSON-8-1EP_5x6mm_P1.27mm_EP3.4x4mm")"#));
    // body, 8 pads, exposed pad
    assert_eq!(count_lines(&script, r#"doc.addObject("Part::Box""#), 10);
    assert_eq!(count_lines(&script, "ViewObject.Visibility = False"), 9);
}

#[test]
fn test_empty_solids_emit_no_features() {
    let script = solids_to_freecad_script("empty", &[], &ExportColors::default());

    assert!(!script.contains("Part::Box"));
    assert!(!script.contains("MultiFuse"));
    assert!(script.ends_with("FreeCADGui.ActiveDocument.ActiveView.fitAll()"));
}

#[test]
fn test_write_script_to_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("qfn.py");
    let script =
        config_to_freecad_script(&default_config(PackageKind::Qfn), &ExportColors::default());

    write_script(&path, &script).unwrap();

    assert_eq!(std::fs::read_to_string(&path).unwrap(), script);
}

#[test]
fn test_write_script_missing_directory_fails() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing").join("qfn.py");

    let err = write_script(&path, "import FreeCAD").unwrap_err();
    assert!(err.to_string().contains("missing"));
}
