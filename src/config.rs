use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TexConfig {
    /// Written as `\begin{tikzcd}[...]`, e.g. `column sep=large`.
    pub environment_options: Option<String>,
    /// Prefix for every row line inside the environment.
    pub indent: String,
}

#[derive(Debug, Clone, Default)]
pub struct Config {
    pub tex: TexConfig,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TexConfigFile {
    environment_options: Option<String>,
    indent: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ConfigFile {
    tex: Option<TexConfigFile>,
}

pub fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    let mut config = Config::default();
    let Some(path) = path else {
        return Ok(config);
    };

    let contents = std::fs::read_to_string(path)?;
    let parsed = parse_config_file(&contents)?;

    if let Some(tex) = parsed.tex {
        if let Some(v) = tex.environment_options {
            let trimmed = v.trim();
            config.tex.environment_options = (!trimmed.is_empty()).then(|| trimmed.to_string());
        }
        if let Some(v) = tex.indent {
            config.tex.indent = v;
        }
    }

    Ok(config)
}

fn parse_config_file(contents: &str) -> anyhow::Result<ConfigFile> {
    match serde_json::from_str::<ConfigFile>(contents) {
        Ok(parsed) => Ok(parsed),
        Err(json_err) => json5::from_str::<ConfigFile>(contents)
            .map_err(|_| anyhow::anyhow!("Invalid config file: {json_err}")),
    }
}
