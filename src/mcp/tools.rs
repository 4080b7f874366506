//! Package tools exposed over MCP.
//!
//! Every tool takes a JSON arguments object and answers with a
//! [`ToolCallResult`]. Engine failures (unknown family, invalid dimensions,
//! rejected paths) are tool errors, not protocol errors, so the client sees
//! the message.

use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::{json, Value};

use crate::export::{self, freecad, ExportColors};
use crate::packages::{self, PackageConfig, PackageKind};

/// One item of tool output.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ToolContent {
    Text { text: String },
}

/// The `result` of a `tools/call` request.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolCallResult {
    pub content: Vec<ToolContent>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub is_error: bool,
}

impl ToolCallResult {
    /// Pretty-printed JSON output.
    #[must_use]
    pub fn json(value: &Value) -> Self {
        match serde_json::to_string_pretty(value) {
            Ok(text) => Self::text(text, false),
            Err(e) => Self::failure(format!("Failed to serialise result: {e}")),
        }
    }

    /// An error message for the client.
    #[must_use]
    pub fn failure(message: impl Into<String>) -> Self {
        Self::text(message.into(), true)
    }

    fn text(text: String, is_error: bool) -> Self {
        Self {
            content: vec![ToolContent::Text { text }],
            is_error,
        }
    }

    /// Text of the first content item.
    #[must_use]
    pub fn first_text(&self) -> Option<&str> {
        self.content.first().map(|item| match item {
            ToolContent::Text { text } => text.as_str(),
        })
    }
}

/// The tools this server offers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tool {
    ListPackageKinds,
    DefaultConfig,
    GenerateSolids,
    PackageName,
    ExportFreecadScript,
}

impl Tool {
    /// All tools, in `tools/list` order.
    pub const ALL: [Self; 5] = [
        Self::ListPackageKinds,
        Self::DefaultConfig,
        Self::GenerateSolids,
        Self::PackageName,
        Self::ExportFreecadScript,
    ];

    /// Wire name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::ListPackageKinds => "list_package_kinds",
            Self::DefaultConfig => "default_config",
            Self::GenerateSolids => "generate_solids",
            Self::PackageName => "package_name",
            Self::ExportFreecadScript => "export_freecad_script",
        }
    }

    /// Looks a tool up by wire name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|tool| tool.name() == name)
    }

    const fn description(self) -> &'static str {
        match self {
            Self::ListPackageKinds => {
                "List the supported package families and the part name of each \
                 family's default configuration."
            }
            Self::DefaultConfig => {
                "Return the default configuration of a package family (QFN: nRF52832 \
                 QFN48; WSON: Microchip 8L WSON 5x6). Edit the returned object and pass \
                 it as `config` to the other tools."
            }
            Self::GenerateSolids => {
                "Generate the boxes of a package. Each solid has a type ('body' or \
                 'pad'), a centre position [x, y, z] and a size [x, y, z] in mm, Z up."
            }
            Self::PackageName => {
                "Return the canonical part name of a package, e.g. \
                 'QFN-48-1EP_6x6mm_P0.4mm_EP4.6x4.6mm'."
            }
            Self::ExportFreecadScript => {
                "Generate a FreeCAD Python console script that builds the package as a \
                 fused 'Body' and a fused 'Pads' feature. Optionally write it to a .py \
                 file inside the allowed directories."
            }
        }
    }

    fn input_schema(self) -> Value {
        let config = json!({
            "type": "object",
            "description": "Package configuration tagged with \"type\" (\"qfn\" or \"wson\"). \
                            All dimensions in mm. Use default_config for a template.",
            "properties": { "type": { "type": "string", "enum": ["qfn", "wson"] } },
            "required": ["type"]
        });

        match self {
            Self::ListPackageKinds => json!({ "type": "object", "properties": {} }),
            Self::DefaultConfig => json!({
                "type": "object",
                "properties": {
                    "kind": {
                        "type": "string",
                        "description": "'qfn' or 'wson' (default: server setting)"
                    }
                }
            }),
            Self::GenerateSolids | Self::PackageName => json!({
                "type": "object",
                "properties": { "config": config },
                "required": ["config"]
            }),
            Self::ExportFreecadScript => json!({
                "type": "object",
                "properties": {
                    "config": config,
                    "document_name": {
                        "type": "string",
                        "description": "FreeCAD document name (default: package name)"
                    },
                    "filepath": {
                        "type": "string",
                        "description": "Write the script to this path"
                    }
                },
                "required": ["config"]
            }),
        }
    }

    /// Entry for the `tools/list` result.
    #[must_use]
    pub fn definition(self) -> Value {
        json!({
            "name": self.name(),
            "description": self.description(),
            "inputSchema": self.input_schema(),
        })
    }
}

/// Runs tools against the package engine with session settings.
#[derive(Debug, Clone)]
pub struct PackageTools {
    /// Directories export scripts may be written into. Empty allows any.
    allowed_paths: Vec<PathBuf>,
    colors: ExportColors,
    /// Family `default_config` returns when no kind is given.
    default_kind: PackageKind,
}

impl PackageTools {
    #[must_use]
    pub fn new(allowed_paths: Vec<PathBuf>) -> Self {
        Self {
            allowed_paths,
            colors: ExportColors::default(),
            default_kind: PackageKind::Qfn,
        }
    }

    #[must_use]
    pub const fn with_export_colors(mut self, colors: ExportColors) -> Self {
        self.colors = colors;
        self
    }

    #[must_use]
    pub const fn with_default_kind(mut self, kind: PackageKind) -> Self {
        self.default_kind = kind;
        self
    }

    /// Runs the tool `name` with `arguments`.
    #[must_use]
    pub fn call(&self, name: &str, arguments: &Value) -> ToolCallResult {
        let Some(tool) = Tool::from_name(name) else {
            return ToolCallResult::failure(format!("Unknown tool: {name}"));
        };

        tracing::info!(tool = name, "Tool call");

        let outcome = match tool {
            Tool::ListPackageKinds => Ok(list_package_kinds()),
            Tool::DefaultConfig => self.default_config(arguments),
            Tool::GenerateSolids => generate_solids(arguments),
            Tool::PackageName => package_name(arguments),
            Tool::ExportFreecadScript => self.export_freecad_script(arguments),
        };

        match outcome {
            Ok(value) => ToolCallResult::json(&value),
            Err(message) => {
                tracing::warn!(tool = name, error = %message, "Tool call failed");
                ToolCallResult::failure(message)
            }
        }
    }

    fn default_config(&self, arguments: &Value) -> Result<Value, String> {
        let config = match arguments.get("kind").and_then(Value::as_str) {
            Some(tag) => packages::default_config_for(tag).map_err(|e| e.to_string())?,
            None => packages::default_config(self.default_kind),
        };
        serde_json::to_value(config).map_err(|e| format!("Failed to serialise config: {e}"))
    }

    fn export_freecad_script(&self, arguments: &Value) -> Result<Value, String> {
        let config = PackageConfig::from_value(config_arg(arguments)?).map_err(|e| e.to_string())?;
        let name = packages::to_name(&config);
        let document = arguments
            .get("document_name")
            .and_then(Value::as_str)
            .unwrap_or(&name);
        let script =
            freecad::solids_to_freecad_script(document, &packages::to_solids(&config), &self.colors);

        let filepath = arguments.get("filepath").and_then(Value::as_str);
        if let Some(filepath) = filepath {
            let path = Path::new(filepath);
            self.check_export_path(path)?;
            export::write_script(path, &script).map_err(|e| e.to_string())?;
            tracing::info!(path = filepath, package = %name, "Exported FreeCAD script");
        }

        Ok(json!({
            "name": name,
            "filepath": filepath,
            "script": script,
        }))
    }

    /// Rejects paths outside every allowed directory.
    fn check_export_path(&self, path: &Path) -> Result<(), String> {
        if self.allowed_paths.is_empty() {
            return Ok(());
        }

        let target = resolve_target(path)?;
        let inside = self
            .allowed_paths
            .iter()
            .filter_map(|root| root.canonicalize().ok())
            .any(|root| target.starts_with(root));

        if inside {
            Ok(())
        } else {
            Err(format!(
                "Access denied: '{}' is outside the allowed directories",
                path.display()
            ))
        }
    }
}

/// Canonical form of a file path that may not exist yet.
fn resolve_target(path: &Path) -> Result<PathBuf, String> {
    if path.exists() {
        return path
            .canonicalize()
            .map_err(|e| format!("Failed to resolve '{}': {e}", path.display()));
    }

    let file_name = path
        .file_name()
        .ok_or_else(|| format!("'{}' does not name a file", path.display()))?;
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let dir = dir
        .canonicalize()
        .map_err(|e| format!("Directory '{}' is not accessible: {e}", dir.display()))?;

    Ok(dir.join(file_name))
}

fn config_arg(arguments: &Value) -> Result<&Value, String> {
    arguments
        .get("config")
        .ok_or_else(|| "Missing required parameter: config".to_string())
}

fn list_package_kinds() -> Value {
    let kinds: Vec<Value> = PackageKind::ALL
        .into_iter()
        .map(|kind| {
            json!({
                "kind": kind,
                "default_name": packages::to_name(&packages::default_config(kind)),
            })
        })
        .collect();
    json!({ "kinds": kinds })
}

fn generate_solids(arguments: &Value) -> Result<Value, String> {
    let config = config_arg(arguments)?;
    let solids = packages::solids_from_value(config).map_err(|e| e.to_string())?;
    // null for a family with no generator
    let name = packages::name_from_value(config).ok();

    Ok(json!({
        "name": name,
        "solid_count": solids.len(),
        "solids": solids,
    }))
}

fn package_name(arguments: &Value) -> Result<Value, String> {
    let name = packages::name_from_value(config_arg(arguments)?).map_err(|e| e.to_string())?;
    Ok(json!({ "name": name }))
}
