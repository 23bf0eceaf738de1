use lexentity_core::{ConversionDiagnostics, ConvertOptions, Converter, EntityStyle, TagPolicy};
use serde::Serialize;
use wasm_bindgen::JsValue;
use wasm_bindgen::prelude::*;

// ============================================================================
// Converter Config
// ============================================================================

/// Configuration accepted by the WASM convert functions.
#[derive(Debug, Clone, Default, serde::Deserialize)]
pub struct WasmConvertConfig {
    #[serde(default, alias = "verbatimTags")]
    pub verbatim_tags: Option<Vec<String>>,
    #[serde(default, alias = "tagPolicy")]
    pub tag_policy: Option<TagPolicy>,
    #[serde(default, alias = "entityStyle")]
    pub entity_style: Option<EntityStyle>,
}

fn parse_config(config: JsValue) -> Result<WasmConvertConfig, JsError> {
    if config.is_undefined() || config.is_null() {
        return Ok(WasmConvertConfig::default());
    }
    serde_wasm_bindgen::from_value(config)
        .map_err(|e| JsError::new(&format!("Invalid options: {}", e)))
}

fn build_converter(cfg: WasmConvertConfig) -> Converter {
    let mut options = ConvertOptions::default();
    if let Some(tags) = cfg.verbatim_tags {
        options = options.with_verbatim_tags(tags);
    }
    if let Some(policy) = cfg.tag_policy {
        options = options.with_tag_policy(policy);
    }
    if let Some(style) = cfg.entity_style {
        options = options.with_entity_style(style);
    }
    Converter::new(options)
}

// ============================================================================
// Convert API
// ============================================================================

/// Result of a conversion with its warnings rendered as strings.
#[derive(Debug, Clone, Serialize)]
pub struct ConvertResult {
    /// Converted HTML fragment.
    pub output: String,
    /// Human readable warnings.
    pub warnings: Vec<String>,
}

fn warning_strings(diagnostics: &ConversionDiagnostics) -> Vec<String> {
    diagnostics.warnings.iter().map(|w| w.to_string()).collect()
}

/// Converts straight punctuation in an HTML fragment to typographic entities.
///
/// # Arguments
///
/// * `input` - The HTML fragment
/// * `config` - Optional configuration object:
///   - `verbatimTags`: string[] (default: `["code", "pre"]`)
///   - `tagPolicy`: `"strict" | "lenient" | "unravel"` (default: `"strict"`)
///   - `entityStyle`: `"named" | "numeric"` (default: `"named"`)
///
/// Throws when a close tag does not match under the strict policy.
#[wasm_bindgen]
pub fn convert(input: &str, config: JsValue) -> Result<String, JsError> {
    let converter = build_converter(parse_config(config)?);
    converter
        .convert(input)
        .map(|conversion| conversion.output)
        .map_err(|e| JsError::new(&e.to_string()))
}

/// Like [`convert`], but returns `{ output, warnings }`.
///
/// # Example (JavaScript)
///
/// ```javascript
/// import { convert_with_diagnostics } from './lexentity_wasm';
///
/// const { output, warnings } = convert_with_diagnostics('<p>"hi"', {});
/// // output   = "<p>&#8220;hi&#8221;"
/// // warnings = ["<p> is never closed"]
/// ```
#[wasm_bindgen(js_name = convert_with_diagnostics)]
pub fn convert_with_diagnostics(input: &str, config: JsValue) -> Result<JsValue, JsError> {
    let converter = build_converter(parse_config(config)?);
    let conversion = converter
        .convert(input)
        .map_err(|e| JsError::new(&e.to_string()))?;

    let result = ConvertResult {
        warnings: warning_strings(&conversion.diagnostics),
        output: conversion.output,
    };
    serde_wasm_bindgen::to_value(&result)
        .map_err(|e| JsError::new(&format!("Serialization error: {}", e)))
}
