//! Bundler JSON stats parsing.

use super::Diagnostic;
use crate::dist::error::Result;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct Stats {
    #[serde(default)]
    errors: Vec<StatsError>,
}

/// webpack 4 reports errors as strings, webpack 5 as objects.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum StatsError {
    Text(String),
    Detailed {
        message: String,
        #[serde(default, rename = "moduleName")]
        module_name: Option<String>,
    },
}

/// Extracts compilation errors from `webpack --json` output.
///
/// Anything printed before the opening brace (progress lines from some
/// webpack-cli versions) is skipped.
pub fn parse_stats(stdout: &str) -> Result<Vec<Diagnostic>> {
    let start = stdout.find('{').unwrap_or(0);
    let stats: Stats = serde_json::from_str(&stdout[start..])?;

    Ok(stats
        .errors
        .into_iter()
        .map(|e| match e {
            StatsError::Text(message) => Diagnostic::new(message),
            StatsError::Detailed {
                message,
                module_name,
            } => Diagnostic {
                message,
                module: module_name,
            },
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_webpack5_errors() {
        let json = r#"{"hash":"abc","errors":[
            {"message":"Module not found: Error: Can't resolve 'brace'","moduleName":"./src/js/ace/index.js"},
            {"message":"Unexpected token (3:4)"}
        ],"warnings":[]}"#;

        let diagnostics = parse_stats(json).unwrap();
        assert_eq!(diagnostics.len(), 2);
        assert_eq!(diagnostics[0].module.as_deref(), Some("./src/js/ace/index.js"));
        assert_eq!(diagnostics[1].to_string(), "Unexpected token (3:4)");
    }

    #[test]
    fn parses_webpack4_string_errors() {
        let diagnostics = parse_stats(r#"{"errors":["./src/index.js\nboom"]}"#).unwrap();
        assert_eq!(diagnostics, vec![Diagnostic::new("./src/index.js\nboom")]);
    }

    #[test]
    fn skips_leading_noise_and_tolerates_missing_errors() {
        assert!(parse_stats("[webpack-cli] compiling\n{\"hash\":\"x\"}").unwrap().is_empty());
    }

    #[test]
    fn non_json_is_an_error() {
        assert!(parse_stats("command not found").is_err());
    }
}
