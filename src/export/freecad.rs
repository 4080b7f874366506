//! FreeCAD Python console script export.
//!
//! The generated script is meant to be pasted verbatim into FreeCAD's Python
//! console. It:
//!
//! 1. Creates a new document named after the package
//! 2. Adds a `Part::Box` per solid, placed by its minimum corner
//! 3. Fuses all body boxes into a "Body" feature and all pad boxes into a
//!    "Pads" feature, coloured and labelled
//! 4. Hides the individual source boxes that were fused
//!
//! The user then exports manually via File > Export.
//!
//! The statement grammar below is what FreeCAD accepts; any change to it
//! breaks pasting, so tests pin it byte for byte.

use crate::export::ExportColors;
use crate::geometry::{Solid, SolidKind};
use crate::naming::decimal;
use crate::packages::{self, PackageConfig};

/// Label of the fused body feature.
const BODY_LABEL: &str = "Body";

/// Label of the fused pads feature.
const PAD_LABEL: &str = "Pads";

/// Converts a packed `0xRRGGBB` colour to a FreeCAD `(r, g, b)` tuple.
///
/// Channels are normalised to 0..1 with three decimals.
///
/// # Examples
///
/// ```
/// use package_model_mcp::export::freecad::color_tuple;
///
/// assert_eq!(color_tuple(0xff8000), "(1.000, 0.502, 0.000)");
/// ```
#[must_use]
pub fn color_tuple(hex: u32) -> String {
    let channel = |shift: u32| f64::from((hex >> shift) & 0xff) / 255.0;
    format!("({:.3}, {:.3}, {:.3})", channel(16), channel(8), channel(0))
}

/// Line-oriented script builder.
#[derive(Default)]
struct Script {
    lines: Vec<String>,
}

impl Script {
    fn emit(&mut self, line: impl Into<String>) {
        self.lines.push(line.into());
    }

    fn blank(&mut self) {
        self.lines.push(String::new());
    }

    /// Labels and colours a bucket of boxes, fusing it first if it has more
    /// than one member. Empty buckets emit nothing.
    fn fuse_and_color(&mut self, label: &str, names: &[String], color: &str) {
        match names {
            [] => {}
            [single] => {
                self.emit(format!(r#"doc.getObject("{single}").Label = "{label}""#));
                self.emit(format!(
                    r#"doc.getObject("{single}").ViewObject.ShapeColor = {color}"#
                ));
                self.blank();
            }
            _ => {
                let fuse_var = format!("{label}_fuse");
                let shapes = names
                    .iter()
                    .map(|n| format!(r#"doc.getObject("{n}")"#))
                    .collect::<Vec<_>>()
                    .join(", ");

                self.emit(format!(
                    r#"{fuse_var} = doc.addObject("Part::MultiFuse", "{label}")"#
                ));
                self.emit(format!("{fuse_var}.Shapes = [{shapes}]"));
                self.emit(format!(r#"{fuse_var}.Label = "{label}""#));
                self.emit("doc.recompute()");
                self.emit(format!("{fuse_var}.ViewObject.ShapeColor = {color}"));
                self.blank();

                for name in names {
                    self.emit(format!(
                        r#"doc.getObject("{name}").ViewObject.Visibility = False"#
                    ));
                }
                self.blank();
            }
        }
    }

    fn finish(self) -> String {
        self.lines.join("\n")
    }
}

/// Generates a FreeCAD script building `solids` in a document called `name`.
///
/// Solids are emitted in input order; box identifiers are `{kind}_{index}`.
#[must_use]
pub fn solids_to_freecad_script(name: &str, solids: &[Solid], colors: &ExportColors) -> String {
    let mut script = Script::default();

    script.emit("# Auto-generated FreeCAD script");
    script.emit("# Paste into FreeCAD Python console, then export via File > Export");
    script.blank();
    script.emit("import FreeCAD");
    script.emit("import Part");
    script.blank();
    script.emit(format!(r#"doc = FreeCAD.newDocument("{name}")"#));
    script.blank();

    let mut body_names = Vec::new();
    let mut pad_names = Vec::new();

    for (index, solid) in solids.iter().enumerate() {
        let kind = solid.kind;
        let id = format!("{kind}_{index}");
        let (cx, cy, cz) = (
            decimal(solid.position.x),
            decimal(solid.position.y),
            decimal(solid.position.z),
        );
        let (sx, sy, sz) = (
            decimal(solid.size.x),
            decimal(solid.size.y),
            decimal(solid.size.z),
        );

        // Part::Box is placed by its corner, not its centre
        let corner = solid.min_corner();
        let (ox, oy, oz) = (decimal(corner.x), decimal(corner.y), decimal(corner.z));

        script.emit(format!(
            "# {kind} {index}: size=({sx}, {sy}, {sz}) center=({cx}, {cy}, {cz})"
        ));
        script.emit(format!(r#"{id} = doc.addObject("Part::Box", "{id}")"#));
        script.emit(format!("{id}.Length = {sx}"));
        script.emit(format!("{id}.Width = {sy}"));
        script.emit(format!("{id}.Height = {sz}"));
        script.emit(format!(
            "{id}.Placement = FreeCAD.Placement(FreeCAD.Vector({ox}, {oy}, {oz}), FreeCAD.Rotation())"
        ));
        script.blank();

        match kind {
            SolidKind::Body => body_names.push(id),
            SolidKind::Pad => pad_names.push(id),
        }
    }

    script.emit("doc.recompute()");
    script.blank();

    script.fuse_and_color(BODY_LABEL, &body_names, &color_tuple(colors.body));
    script.fuse_and_color(PAD_LABEL, &pad_names, &color_tuple(colors.pad));

    script.emit("doc.recompute()");
    script.emit("FreeCADGui.ActiveDocument.ActiveView.fitAll()");

    tracing::debug!(
        document = name,
        bodies = body_names.len(),
        pads = pad_names.len(),
        "Generated FreeCAD script"
    );

    script.finish()
}

/// Generates the FreeCAD script for a package, named after the package.
#[must_use]
pub fn config_to_freecad_script(config: &PackageConfig, colors: &ExportColors) -> String {
    solids_to_freecad_script(&packages::to_name(config), &packages::to_solids(config), colors)
}
