//! webpack configuration rendering.
//!
//! Every value is JSON-encoded in Rust before it reaches the template, so the
//! template only places already-valid JavaScript expressions.

use crate::dist::{
    descriptor::{BuildDescriptor, Plugin, RuleUse},
    error::{Context, Result},
};
use handlebars::Handlebars;
use serde_json::json;
use std::path::Path;

const CONFIG_TEMPLATE: &str = r#"// Generated by kodegen_bundler_dist. Do not edit.
const webpack = require('webpack');
{{#if minify}}
const TerserPlugin = require('terser-webpack-plugin');
{{/if}}

module.exports = {
  mode: 'production',
  entry: {{entry}},
  devtool: {{devtool}},
  bail: {{bail}},
  output: {
    library: { name: {{library}}, type: {{target}} },
    path: {{output_dir}},
    filename: {{filename}}
  },
  cache: {{cache}},
  module: {
    rules: [
{{#each rules}}
      { {{this}} },
{{/each}}
    ]
  },
  plugins: [
{{#each plugins}}
    {{this}},
{{/each}}
  ],
  optimization: {
{{#if minify}}
    minimize: true,
    minimizer: [new TerserPlugin({ extractComments: false })]
{{else}}
    minimize: false
{{/if}}
  }
};
"#;

fn js(value: impl serde::Serialize) -> Result<String> {
    serde_json::to_string(&value).context("failed to encode config value")
}

fn path_js(path: &Path) -> Result<String> {
    js(path.to_string_lossy())
}

fn rule_js(rule: &crate::dist::descriptor::TransformRule) -> Result<String> {
    let mut parts = vec![format!("test: new RegExp({})", js(rule.test())?)];
    if let Some(exclude) = rule.exclude() {
        parts.push(format!("exclude: new RegExp({})", js(exclude)?));
    }
    match rule.rule_use() {
        RuleUse::Loaders(loaders) => parts.push(format!("use: {}", js(loaders)?)),
        RuleUse::Json => parts.push("type: 'json'".to_string()),
    }
    Ok(parts.join(", "))
}

fn plugin_js(plugin: &Plugin) -> Result<Option<String>> {
    Ok(match plugin {
        Plugin::Banner {
            text,
            raw,
            entry_only,
        } => Some(format!(
            "new webpack.BannerPlugin({{ banner: {}, raw: {}, entryOnly: {} }})",
            js(text)?,
            raw,
            entry_only
        )),
        Plugin::ModuleReplacement {
            pattern,
            replacement,
        } => Some(format!(
            "new webpack.NormalModuleReplacementPlugin(new RegExp({}), {})",
            js(pattern)?,
            path_js(replacement)?
        )),
        // Handled through `optimization.minimizer`.
        Plugin::Minify => None,
    })
}

/// Renders `descriptor` as a webpack configuration module.
///
/// `cache_dir` receives webpack's persistent cache, named per variant so the
/// full and minimalist builds never evict each other.
pub fn render_config(descriptor: &BuildDescriptor, cache_dir: &Path) -> Result<String> {
    let mut handlebars = Handlebars::new();
    handlebars.register_escape_fn(handlebars::no_escape);
    handlebars.set_strict_mode(true);
    handlebars
        .register_template_string("webpack.config.js", CONFIG_TEMPLATE)
        .context("failed to register webpack config template")?;

    let rules = descriptor
        .rules()
        .iter()
        .map(rule_js)
        .collect::<Result<Vec<_>>>()?;

    let mut plugins = Vec::new();
    for plugin in descriptor.plugins() {
        if let Some(rendered) = plugin_js(plugin)? {
            plugins.push(rendered);
        }
    }

    let minify = descriptor.plugins().contains(&Plugin::Minify);

    let cache = if descriptor.cache() {
        format!(
            "{{ type: 'filesystem', name: {}, cacheDirectory: {} }}",
            js(descriptor.variant().label())?,
            path_js(cache_dir)?
        )
    } else {
        "false".to_string()
    };

    let data = json!({
        "entry": path_js(descriptor.entry())?,
        "devtool": js(descriptor.devtool())?,
        "bail": descriptor.bail(),
        "library": js(descriptor.library_name())?,
        "target": js(descriptor.library_target())?,
        "output_dir": path_js(descriptor.output_dir())?,
        "filename": js(descriptor.output_filename())?,
        "cache": cache,
        "rules": rules,
        "plugins": plugins,
        "minify": minify,
    });

    Ok(handlebars.render("webpack.config.js", &data)?)
}
