use serde::Deserialize;
use tikzcd_rs::{TexConfig, from_base64, from_code, from_json, to_base64, to_json, to_tex_with_config};
use wasm_bindgen::prelude::*;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TikzcdTexOptions {
    environment_options: Option<String>,
    indent: Option<String>,
}

fn build_tex_config(options: TikzcdTexOptions) -> TexConfig {
    let mut config = TexConfig::default();
    if let Some(environment_options) = options.environment_options {
        config.environment_options = Some(environment_options);
    }
    if let Some(indent) = options.indent {
        config.indent = indent;
    }
    config
}

fn code_to_json(code: &str) -> tikzcd_rs::Result<String> {
    to_json(&from_code(code)?)
}

fn json_to_tex(json: &str, config: &TexConfig) -> tikzcd_rs::Result<String> {
    to_tex_with_config(&from_json(json)?, config)
}

fn json_to_base64(json: &str) -> tikzcd_rs::Result<String> {
    to_base64(&from_json(json)?)
}

fn base64_to_json(base64: &str) -> tikzcd_rs::Result<String> {
    to_json(&from_base64(base64)?)
}

fn to_js_error(error: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&error.to_string())
}

/// Parses tikzcd markup, e.g. the full contents of the editor after a change.
#[wasm_bindgen]
pub fn tikzcd_from_code(code: &str) -> Result<String, JsValue> {
    code_to_json(code).map_err(to_js_error)
}

#[wasm_bindgen]
pub fn tikzcd_to_tex(json: &str, options_json: Option<String>) -> Result<String, JsValue> {
    let options = if let Some(raw_options) = options_json {
        serde_json::from_str::<TikzcdTexOptions>(&raw_options).map_err(to_js_error)?
    } else {
        TikzcdTexOptions::default()
    };

    json_to_tex(json, &build_tex_config(options)).map_err(to_js_error)
}

#[wasm_bindgen]
pub fn tikzcd_to_base64(json: &str) -> Result<String, JsValue> {
    json_to_base64(json).map_err(to_js_error)
}

#[wasm_bindgen]
pub fn tikzcd_from_base64(base64: &str) -> Result<String, JsValue> {
    base64_to_json(base64).map_err(to_js_error)
}

#[cfg(test)]
mod tests {
    use crate::{TikzcdTexOptions, base64_to_json, build_tex_config, code_to_json, json_to_base64, json_to_tex};

    #[test]
    fn converts_editor_code_through_every_form() {
        let code = r#"\begin{tikzcd}
    A \arrow[r, "f"] \arrow[d, "g"'] & B \arrow[d, two heads] \\
    C \arrow[r, dashed, bend right] & D
\end{tikzcd}"#;

        let json = code_to_json(code).expect("markup should parse");
        let base64 = json_to_base64(&json).expect("json should encode");
        let restored = base64_to_json(&base64).expect("base64 should decode");
        assert_eq!(json, restored);

        let options: TikzcdTexOptions =
            serde_json::from_str(r#"{"environmentOptions": "column sep=large"}"#).unwrap();
        let tex = json_to_tex(&restored, &build_tex_config(options)).expect("json should render");
        assert!(tex.starts_with("\\begin{tikzcd}[column sep=large]\n"));
        assert!(tex.contains("\\arrow[r, dashed, bend right]"));
        assert!(tex.contains("\\arrow[d, \"g\"']"));
    }

    #[test]
    fn parse_errors_are_reported() {
        let err = code_to_json("A \\arrow[rr] & B\n").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Cannot resolve target of edge 0: no node at position (2, 0)"
        );
    }
}
