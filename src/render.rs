use minijinja::{context, AutoEscape, Environment};

use crate::{
    cli::{Format, Profile},
    config::SiteConfig,
};

const MODULE_TEMPLATE: &str = "config.mjs";

const MODULE_SOURCE: &str = r#"// Generated by docsite from the {{ profile }} profile.
import { defineConfig } from '{{ generator }}';

export default defineConfig({{ config }});
"#;

/// Serializes a site configuration into the formats the site generator can load.
pub struct Renderer {
    t: Environment<'static>,
}

impl Renderer {
    pub fn build() -> anyhow::Result<Renderer> {
        let mut t = Environment::new();
        // The configuration is embedded as JSON, which is valid JavaScript as is.
        t.set_auto_escape_callback(|_| AutoEscape::None);
        t.set_undefined_behavior(minijinja::UndefinedBehavior::Strict);
        t.add_template(MODULE_TEMPLATE, MODULE_SOURCE)?;

        Ok(Renderer { t })
    }

    pub fn render(
        &self,
        site_config: &SiteConfig,
        profile: Profile,
        format: Format,
    ) -> anyhow::Result<String> {
        let mut rendered = match format {
            Format::Json => serde_json::to_string_pretty(site_config)?,
            Format::Toml => return Ok(toml::to_string_pretty(site_config)?),
            Format::Module => {
                let config = serde_json::to_string_pretty(site_config)?;
                self.t.get_template(MODULE_TEMPLATE)?.render(context! {
                    profile => profile.name(),
                    generator => "vitepress",
                    config => config,
                })?
            }
        };

        if !rendered.ends_with('\n') {
            rendered.push('\n');
        }
        Ok(rendered)
    }
}
