//! Module transform rules.

use crate::dist::error::Result;
use regex::Regex;
use serde::Serialize;

/// How modules matched by a rule are processed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "loaders", rename_all = "snake_case")]
pub enum RuleUse {
    /// Run through a loader chain, applied first to last as listed.
    Loaders(Vec<String>),
    /// Parse as a JSON data module.
    Json,
}

/// One `(file pattern, exclude pattern, transform chain)` entry.
#[derive(Debug, Clone, Serialize)]
pub struct TransformRule {
    test: String,
    exclude: Option<String>,
    #[serde(rename = "use")]
    rule_use: RuleUse,
}

impl TransformRule {
    /// Creates a rule after checking both patterns compile.
    pub fn new(test: &str, exclude: Option<&str>, rule_use: RuleUse) -> Result<Self> {
        Regex::new(test)?;
        if let Some(exclude) = exclude {
            Regex::new(exclude)?;
        }
        Ok(Self {
            test: test.to_string(),
            exclude: exclude.map(str::to_string),
            rule_use,
        })
    }

    /// Pattern source for matched file paths.
    pub fn test(&self) -> &str {
        &self.test
    }

    /// Pattern source for excluded file paths.
    pub fn exclude(&self) -> Option<&str> {
        self.exclude.as_deref()
    }

    /// Transform chain.
    pub fn rule_use(&self) -> &RuleUse {
        &self.rule_use
    }

    /// Whether a module path is handled by this rule.
    pub fn applies_to(&self, path: &str) -> bool {
        let matched = Regex::new(&self.test).is_ok_and(|re| re.is_match(path));
        let excluded = self
            .exclude
            .as_deref()
            .and_then(|ex| Regex::new(ex).ok())
            .is_some_and(|re| re.is_match(path));
        matched && !excluded
    }
}

/// Rules shared by both bundle variants.
///
/// Scripts go through babel (except vendored dependencies), JSON is loaded as
/// data, LESS stylesheets go through the style/css/less chain and SVG icons
/// are inlined as URLs.
pub fn standard_rules() -> Result<Vec<TransformRule>> {
    Ok(vec![
        TransformRule::new(
            r"\.js$",
            Some("node_modules"),
            RuleUse::Loaders(vec!["babel-loader".into()]),
        )?,
        TransformRule::new(r"\.json$", None, RuleUse::Json)?,
        TransformRule::new(
            r"\.less$",
            None,
            RuleUse::Loaders(vec![
                "style-loader".into(),
                "css-loader".into(),
                "less-loader".into(),
            ]),
        )?,
        TransformRule::new(
            r"\.svg$",
            None,
            RuleUse::Loaders(vec!["svg-url-loader".into()]),
        )?,
    ])
}
