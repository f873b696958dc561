use std::path::{Path, PathBuf};

use crate::{check, cli::Profile, utils};

/// Names tried, in order, when a directory is given instead of a descriptor file.
pub const FILE_NAMES: [&str; 3] = ["site.toml", "site.yaml", "site.yml"];

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("Could not read {0:?}")]
    Io(PathBuf, #[source] std::io::Error),
    #[error("Could not parse TOML site descriptor")]
    Toml(#[from] toml::de::Error),
    #[error("Could not parse YAML site descriptor")]
    Yaml(#[from] serde_yaml::Error),
    #[error("Expected site descriptor extension to be .toml, .yaml or .yml, at: {0:?}")]
    Extension(PathBuf),
    #[error("No site.toml, site.yaml or site.yml found in {0:?}")]
    NotFound(PathBuf),
}

/// A navigation entry: a label and the link it points to.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NavItem {
    #[serde(rename(serialize = "text"), alias = "text")]
    pub label: String,
    #[serde(rename = "link")]
    pub target_link: String,
}

impl NavItem {
    pub fn new(label: impl Into<String>, target_link: impl Into<String>) -> Self {
        NavItem {
            label: label.into(),
            target_link: target_link.into(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SidebarGroup {
    #[serde(rename(serialize = "text"), alias = "text")]
    pub label: String,
    #[serde(default)]
    pub items: Vec<NavItem>,
}

/// Heading levels shown in the generated page outline, as an inclusive `[min, max]` range.
/// Serializes as a two-element array.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Outline(u8, u8);

impl Outline {
    pub fn new(min: u8, max: u8) -> Self {
        Outline(min, max)
    }

    pub fn min(self) -> u8 {
        self.0
    }

    pub fn max(self) -> u8 {
        self.1
    }
}

impl Default for Outline {
    fn default() -> Self {
        Outline(2, 3)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
pub struct ThemeConfig {
    pub nav: Vec<NavItem>,
    pub sidebar: Vec<SidebarGroup>,
    pub outline: Outline,
}

impl ThemeConfig {
    /// All navigation entries in display order, nav bar first, each with the field path it was
    /// found at (e.g. `sidebar[0].items[2]`).
    pub fn items(&self) -> impl Iterator<Item = (String, &NavItem)> {
        let nav = self
            .nav
            .iter()
            .enumerate()
            .map(|(idx, item)| (format!("nav[{idx}]"), item));
        let sidebar = self.sidebar.iter().enumerate().flat_map(|(group_idx, group)| {
            group
                .items
                .iter()
                .enumerate()
                .map(move |(idx, item)| (format!("sidebar[{group_idx}].items[{idx}]"), item))
        });
        nav.chain(sidebar)
    }
}

/// Deployment options that differ between profiles.
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct Deploy {
    pub base_path: Option<String>,
    pub ignore_dead_links: Option<bool>,
    pub clean_urls: Option<bool>,
}

impl Deploy {
    /// Built-in options of a profile.
    pub fn for_profile(profile: Profile) -> Self {
        match profile {
            Profile::FilesystemDirect => Deploy {
                base_path: Some("./".to_owned()),
                ignore_dead_links: Some(true),
                clean_urls: Some(false),
            },
            Profile::ServerRoot => Deploy::default(),
        }
    }

    /// Options set in `other` take precedence over the ones in `self`.
    fn overridden_by(self, other: &Deploy) -> Self {
        Deploy {
            base_path: other.base_path.clone().or(self.base_path),
            ignore_dead_links: other.ignore_dead_links.or(self.ignore_dead_links),
            clean_urls: other.clean_urls.or(self.clean_urls),
        }
    }
}

#[derive(Debug, Default, PartialEq, Eq, serde::Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct Profiles {
    pub filesystem_direct: Option<Deploy>,
    pub server_root: Option<Deploy>,
}

impl Profiles {
    fn get(&self, profile: Profile) -> Option<&Deploy> {
        match profile {
            Profile::FilesystemDirect => self.filesystem_direct.as_ref(),
            Profile::ServerRoot => self.server_root.as_ref(),
        }
    }
}

/// The site descriptor as authored: content shared by every profile, plus per-profile
/// deployment overrides.
#[derive(Debug, PartialEq, Eq, serde::Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct SiteSource {
    pub language: String,
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub nav: Vec<NavItem>,
    #[serde(default)]
    pub sidebar: Vec<SidebarGroup>,
    #[serde(default)]
    pub outline: Outline,
    #[serde(default)]
    pub profiles: Profiles,
}

impl SiteSource {
    /// The tutorial site. Links are site-relative and get their style from the base path.
    pub fn tutorial() -> Self {
        SiteSource {
            language: "zh-CN".to_owned(),
            title: "手搓 mini p6spy 教程".to_owned(),
            description: "从 0 构建一个精简版 p6spy 的完整实践".to_owned(),
            nav: vec![NavItem::new("首页", "")],
            sidebar: vec![SidebarGroup {
                label: "教程".to_owned(),
                items: vec![NavItem::new("从 0 开始", "")],
            }],
            outline: Outline::new(2, 3),
            profiles: Profiles::default(),
        }
    }

    pub fn from_toml_str(s: &str) -> Result<Self, Error> {
        Ok(toml::from_str(s)?)
    }

    pub fn from_yaml_str(s: &str) -> Result<Self, Error> {
        Ok(serde_yaml::from_str(s)?)
    }

    /// Load a descriptor from `path`. If `path` is a directory, the first of [`FILE_NAMES`]
    /// present in it is loaded.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, Error> {
        let path = Self::locate(path)?;
        let content =
            std::fs::read_to_string(&path).map_err(|err| Error::Io(path.clone(), err))?;

        match path.extension().map(std::ffi::OsStr::as_encoded_bytes) {
            Some(b"toml") => Self::from_toml_str(&content),
            Some(b"yaml" | b"yml") => Self::from_yaml_str(&content),
            _ => Err(Error::Extension(path)),
        }
    }

    /// Resolve `path` to the descriptor file it names.
    pub fn locate(path: impl AsRef<Path>) -> Result<PathBuf, Error> {
        let path = path.as_ref();
        if !path.is_dir() {
            return Ok(path.to_owned());
        }

        FILE_NAMES
            .iter()
            .map(|name| path.join(name))
            .find(|candidate| candidate.is_file())
            .ok_or_else(|| Error::NotFound(path.to_owned()))
    }

    /// Produce the configuration handed to the site generator for `profile`.
    pub fn resolve(&self, profile: Profile) -> SiteConfig {
        let deploy = match self.profiles.get(profile) {
            Some(overrides) => Deploy::for_profile(profile).overridden_by(overrides),
            None => Deploy::for_profile(profile),
        };

        let base_path = deploy.base_path.as_deref();
        let link = |item: &NavItem| NavItem {
            label: item.label.clone(),
            target_link: utils::styled_link(base_path, &item.target_link),
        };

        SiteConfig {
            language: self.language.clone(),
            title: self.title.clone(),
            description: self.description.clone(),
            base_path: deploy.base_path.clone(),
            ignore_dead_links: deploy.ignore_dead_links,
            clean_urls: deploy.clean_urls,
            theme_config: ThemeConfig {
                nav: self.nav.iter().map(link).collect(),
                sidebar: self
                    .sidebar
                    .iter()
                    .map(|group| SidebarGroup {
                        label: group.label.clone(),
                        items: group.items.iter().map(link).collect(),
                    })
                    .collect(),
                outline: self.outline,
            },
        }
    }
}

/// Site configuration as consumed by the site generator. Once constructed it is only read.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteConfig {
    #[serde(rename = "lang")]
    language: String,
    title: String,
    description: String,
    #[serde(rename = "base", skip_serializing_if = "Option::is_none")]
    base_path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    ignore_dead_links: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    clean_urls: Option<bool>,
    theme_config: ThemeConfig,
}

impl SiteConfig {
    /// The tutorial site deployed with `profile`.
    pub fn tutorial(profile: Profile) -> Self {
        SiteSource::tutorial().resolve(profile)
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn base_path(&self) -> Option<&str> {
        self.base_path.as_deref()
    }

    /// Whether generated asset links are relative, i.e. the pages can be opened straight from
    /// the filesystem.
    pub fn has_relative_base(&self) -> bool {
        self.base_path().is_some_and(utils::is_relative)
    }

    pub fn ignore_dead_links(&self) -> bool {
        self.ignore_dead_links.unwrap_or(false)
    }

    pub fn clean_urls(&self) -> bool {
        self.clean_urls.unwrap_or(true)
    }

    pub fn theme(&self) -> &ThemeConfig {
        &self.theme_config
    }

    pub fn check(&self) -> Result<(), check::Failed> {
        let problems = check::check(self);
        if problems.is_empty() {
            Ok(())
        } else {
            Err(check::Failed(problems))
        }
    }
}

#[cfg(test)]
mod test {
    use super::{Deploy, NavItem, Outline, SiteConfig, SiteSource};
    use crate::cli::Profile;

    const SITE: &str = r#"
        language = "en"
        title = "A site"
        description = "Describing things"
        outline = [2, 4]

        nav = [
            { label = "Home", link = "" },
            { text = "Guide", link = "guide/intro" },
        ]

        [[sidebar]]
        label = "Guide"
        items = [{ label = "Intro", link = "guide/intro" }]

        [profiles.server-root]
        base-path = "/docs/"
    "#;

    #[test]
    fn parse_toml() {
        let source = SiteSource::from_toml_str(SITE).unwrap();

        assert_eq!(source.language, "en");
        assert_eq!(source.outline, Outline::new(2, 4));
        assert_eq!(
            source.nav,
            vec![NavItem::new("Home", ""), NavItem::new("Guide", "guide/intro")]
        );
        assert_eq!(source.sidebar[0].items, vec![NavItem::new("Intro", "guide/intro")]);
        assert_eq!(source.profiles.filesystem_direct, None);
        assert_eq!(
            source.profiles.server_root,
            Some(Deploy {
                base_path: Some("/docs/".to_owned()),
                ..Deploy::default()
            })
        );
    }

    #[test]
    fn parse_yaml() {
        let source = SiteSource::from_yaml_str(
            r#"
language: en
title: A site
description: Describing things
sidebar:
  - label: Guide
    items:
      - { label: Intro, link: /guide/intro }
profiles:
  filesystem-direct:
    clean-urls: true
"#,
        )
        .unwrap();

        assert!(source.nav.is_empty());
        assert_eq!(source.outline, Outline::default());
        assert_eq!(source.sidebar[0].items[0].target_link, "/guide/intro");
        assert_eq!(
            source.profiles.filesystem_direct.unwrap().clean_urls,
            Some(true)
        );
    }

    #[test]
    fn reject_unknown_keys() {
        assert!(SiteSource::from_toml_str(
            r#"
                language = "en"
                title = "A site"
                description = "Describing things"
                clean_urls = false
            "#
        )
        .is_err());
    }

    #[test]
    fn resolve_profiles() {
        let source = SiteSource::from_toml_str(SITE).unwrap();

        let fs = source.resolve(Profile::FilesystemDirect);
        assert_eq!(fs.base_path(), Some("./"));
        assert!(fs.has_relative_base());
        assert!(fs.ignore_dead_links());
        assert!(!fs.clean_urls());
        assert_eq!(fs.theme().nav[0].target_link, "./");
        assert_eq!(fs.theme().nav[1].target_link, "./guide/intro");

        let server = source.resolve(Profile::ServerRoot);
        assert_eq!(server.base_path(), Some("/docs/"));
        assert!(!server.has_relative_base());
        assert!(!server.ignore_dead_links());
        assert!(server.clean_urls());
        assert_eq!(server.theme().nav[0].target_link, "/");
        assert_eq!(server.theme().sidebar[0].items[0].target_link, "/guide/intro");
    }

    #[test]
    fn relative_base_override_on_server_root() {
        let source = SiteSource::from_toml_str(&SITE.replace(
            r#"base-path = "/docs/""#,
            r#"base-path = "./""#,
        ))
        .unwrap();
        let config = source.resolve(Profile::ServerRoot);

        assert_eq!(config.base_path(), Some("./"));
        assert_eq!(config.theme().nav[0].target_link, "./");
        assert_eq!(config.theme().sidebar[0].items[0].target_link, "./guide/intro");
        assert!(config.check().is_ok());
    }

    #[test]
    fn root_base_override_on_filesystem_direct() {
        let source = SiteSource::from_toml_str(&format!(
            "{SITE}\n[profiles.filesystem-direct]\nbase-path = \"/docs/\"\n"
        ))
        .unwrap();
        let config = source.resolve(Profile::FilesystemDirect);

        assert_eq!(config.base_path(), Some("/docs/"));
        assert!(!config.clean_urls());
        assert_eq!(config.theme().nav[0].target_link, "/");
        assert_eq!(config.theme().sidebar[0].items[0].target_link, "/guide/intro");
        assert!(config.check().is_ok());
    }

    #[test]
    fn tutorial() {
        let config = SiteConfig::tutorial(Profile::FilesystemDirect);

        assert_eq!(config.language(), "zh-CN");
        assert_eq!(config.title(), "手搓 mini p6spy 教程");
        assert_eq!(config.description(), "从 0 构建一个精简版 p6spy 的完整实践");
        assert_eq!(config.theme().nav, vec![NavItem::new("首页", "./")]);
        assert_eq!(config.theme().sidebar[0].label, "教程");
        assert_eq!(
            config.theme().sidebar[0].items,
            vec![NavItem::new("从 0 开始", "./")]
        );
        assert_eq!(config.theme().outline, Outline::new(2, 3));

        // constructing again gives the same value
        assert_eq!(config, SiteConfig::tutorial(Profile::FilesystemDirect));
    }

    #[test]
    fn items_in_display_order() {
        let config = SiteSource::from_toml_str(SITE)
            .unwrap()
            .resolve(Profile::ServerRoot);
        let fields: Vec<_> = config.theme().items().map(|(field, _)| field).collect();

        assert_eq!(fields, vec!["nav[0]", "nav[1]", "sidebar[0].items[0]"]);
    }
}
