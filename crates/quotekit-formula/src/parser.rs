//! Parse formula files (TOML and JSON) and resolve formula paths.

use std::path::{Path, PathBuf};

use crate::types::{Formula, FormulaError};

/// Parse a formula from a TOML string.
pub fn parse_toml(content: &str) -> Result<Formula, FormulaError> {
    toml::from_str(content).map_err(|e| FormulaError::Parse(e.to_string()))
}

/// Parse a formula from a JSON string.
pub fn parse_json(content: &str) -> Result<Formula, FormulaError> {
    serde_json::from_str(content).map_err(|e| FormulaError::Parse(e.to_string()))
}

/// Load a formula from a file path (auto-detect TOML vs JSON by extension).
pub fn load_formula(path: &Path) -> Result<Formula, FormulaError> {
    let content = std::fs::read_to_string(path)?;
    let mut formula = match path.extension().and_then(|e| e.to_str()) {
        Some("toml") => parse_toml(&content)?,
        Some("json") => parse_json(&content)?,
        _ => {
            // Try JSON first, then TOML
            parse_json(&content).or_else(|_| parse_toml(&content))?
        }
    };
    formula.source = path.display().to_string();
    Ok(formula)
}

/// Standard filename suffixes tried when resolving a formula by name.
const SUFFIXES: [&str; 4] = [".quote.toml", ".quote.json", ".toml", ".json"];

/// Search for a formula by name in standard locations.
///
/// Search order:
/// 1. Exact path (if it exists as-is)
/// 2. Current directory with standard extensions
/// 3. Configured extra formula directories, in order
/// 4. `.quotekit/formulas/` under cwd
/// 5. `~/.quotekit/formulas/`
pub fn find_formula(
    name: &str,
    cwd: &Path,
    extra_dirs: &[PathBuf],
) -> Result<PathBuf, FormulaError> {
    // 1. Exact path
    let exact = Path::new(name);
    if exact.is_absolute() && exact.exists() {
        return Ok(exact.to_path_buf());
    }
    let relative = cwd.join(name);
    if relative.exists() {
        return Ok(relative);
    }

    // 2. Current directory
    if let Some(found) = probe_dir(cwd, name) {
        return Ok(found);
    }

    // 3. Configured directories
    for dir in extra_dirs {
        let dir = if dir.is_absolute() {
            dir.clone()
        } else {
            cwd.join(dir)
        };
        if let Some(found) = probe_dir(&dir, name) {
            return Ok(found);
        }
    }

    // 4. .quotekit/formulas/ under cwd
    if let Some(found) = probe_dir(&cwd.join(".quotekit").join("formulas"), name) {
        return Ok(found);
    }

    // 5. ~/.quotekit/formulas/
    if let Some(home) = home_dir() {
        if let Some(found) = probe_dir(&home.join(".quotekit").join("formulas"), name) {
            return Ok(found);
        }
    }

    Err(FormulaError::Parse(format!(
        "formula '{}' not found (searched cwd, configured dirs, .quotekit/formulas/, ~/.quotekit/formulas/)",
        name
    )))
}

/// Try `dir/{name}{suffix}` for each standard suffix.
fn probe_dir(dir: &Path, name: &str) -> Option<PathBuf> {
    if !dir.is_dir() {
        return None;
    }
    for suffix in &SUFFIXES {
        let candidate = dir.join(format!("{}{}", name, suffix));
        if candidate.exists() {
            return Some(candidate);
        }
    }
    None
}

/// Get the user's home directory.
fn home_dir() -> Option<PathBuf> {
    #[cfg(target_os = "windows")]
    {
        std::env::var("USERPROFILE").ok().map(PathBuf::from)
    }
    #[cfg(not(target_os = "windows"))]
    {
        std::env::var("HOME").ok().map(PathBuf::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quotekit_core::enums::VariableKind;
    use quotekit_core::value::RawValue;

    #[test]
    fn parse_json_minimal() {
        let json = r#"{
            "id": "deck",
            "expression": "sqft * 3",
            "variables": [{"id": "sqft", "name": "Square footage", "kind": "number"}]
        }"#;
        let f = parse_json(json).unwrap();
        assert_eq!(f.id, "deck");
        assert_eq!(f.variables.len(), 1);
        assert_eq!(f.variables[0].kind, VariableKind::Number);
        assert_eq!(f.variables[0].checked_value, "1"); // default
        assert!(f.min_price.is_none());
    }

    #[test]
    fn parse_toml_with_options_and_clamp() {
        let toml_str = r#"
id = "fence"
name = "Fence quote"
expression = "100 * tier"
min_price = 5000

[[variables]]
id = "tier"
name = "Material tier"
kind = "dropdown"

[[variables.options]]
id = "wood"
value = "wood"
numeric_value = 1.0

[[variables.options]]
id = "vinyl"
value = "vinyl"
numeric_value = 2.5
"#;
        let f = parse_toml(toml_str).unwrap();
        assert_eq!(f.id, "fence");
        assert_eq!(f.min_price, Some(5000));
        assert_eq!(f.variables[0].options.len(), 2);
        assert_eq!(f.variables[0].options[1].numeric_value, 2.5);
    }

    #[test]
    fn parse_json_with_conditional_logic() {
        let json = r#"{
            "id": "garage",
            "expression": "base + garage_size * 250",
            "variables": [
                {"id": "has_garage", "name": "Garage?", "kind": "checkbox",
                 "checked_value": "500", "unchecked_value": "0"},
                {"id": "garage_size", "name": "Garage size", "kind": "number",
                 "conditional_logic": {
                    "enabled": true,
                    "operator": "and",
                    "conditions": [
                        {"depends_on": "has_garage", "kind": "equals", "expected": true}
                    ],
                    "default_value": 0
                 }}
            ]
        }"#;
        let f = parse_json(json).unwrap();
        let logic = f.variables[1].conditional_logic.as_ref().unwrap();
        assert!(logic.enabled);
        assert_eq!(logic.conditions[0].depends_on, "has_garage");
        assert_eq!(logic.conditions[0].expected, Some(RawValue::Bool(true)));
        assert_eq!(logic.default_value, Some(RawValue::Number(0.0)));
        assert_eq!(f.variables[0].checked_value, "500");
    }

    #[test]
    fn unknown_kind_rejected() {
        let json = r#"{
            "id": "bad",
            "expression": "x",
            "variables": [{"id": "x", "name": "X", "kind": "telepathy"}]
        }"#;
        assert!(matches!(parse_json(json), Err(FormulaError::Parse(_))));
    }
}
