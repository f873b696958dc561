//! Structural checks of a resolved site configuration. The site generator does its own link
//! validation on the rendered pages; these checks catch what is wrong with the descriptor itself.

use crate::{
    config::{NavItem, SiteConfig},
    utils,
};

/// The deepest heading level there is.
pub const MAX_HEADING_LEVEL: u8 = 6;

#[derive(thiserror::Error, Clone, Debug, PartialEq, Eq)]
pub enum Problem {
    #[error("`{0}` is empty")]
    Empty(String),
    #[error("outline range [{min}, {max}] is invalid, expected 1 <= min <= max <= 6")]
    Outline { min: u8, max: u8 },
    #[error("`{field}` links to `{link}` from the site root, but the base path `{base}` is relative")]
    RootLinkUnderRelativeBase {
        field: String,
        link: String,
        base: String,
    },
    #[error("`{field}` links to `{link}` relative to the page, but the site is served from its root")]
    RelativeLinkUnderRootBase { field: String, link: String },
}

#[derive(thiserror::Error, Debug)]
#[error("Site configuration has {} problem(s)", .0.len())]
pub struct Failed(pub Vec<Problem>);

/// Collect every problem with `config`, in display order: site metadata, the nav bar, then each
/// sidebar group followed by its items, then the outline.
///
/// Links are never empty: resolving a descriptor writes an empty link as the site root.
pub fn check(config: &SiteConfig) -> Vec<Problem> {
    let mut problems = Vec::new();

    for (field, value) in [
        ("language", config.language()),
        ("title", config.title()),
        ("description", config.description()),
    ] {
        if value.trim().is_empty() {
            problems.push(Problem::Empty(field.to_owned()));
        }
    }

    let theme = config.theme();
    for (idx, item) in theme.nav.iter().enumerate() {
        check_item(config, format!("nav[{idx}]"), item, &mut problems);
    }
    for (group_idx, group) in theme.sidebar.iter().enumerate() {
        if group.label.trim().is_empty() {
            problems.push(Problem::Empty(format!("sidebar[{group_idx}].label")));
        }
        for (idx, item) in group.items.iter().enumerate() {
            let field = format!("sidebar[{group_idx}].items[{idx}]");
            check_item(config, field, item, &mut problems);
        }
    }

    let outline = theme.outline;
    if outline.min() < 1 || outline.min() > outline.max() || outline.max() > MAX_HEADING_LEVEL {
        problems.push(Problem::Outline {
            min: outline.min(),
            max: outline.max(),
        });
    }

    problems
}

fn check_item(config: &SiteConfig, field: String, item: &NavItem, problems: &mut Vec<Problem>) {
    if item.label.trim().is_empty() {
        problems.push(Problem::Empty(format!("{field}.label")));
    }
    if let Some(problem) = link_style(config, field, &item.target_link) {
        problems.push(problem);
    }
}

/// Links must be written in the style the base path implies: relative links when pages are
/// opened from the filesystem, root-relative links when served from a server root.
fn link_style(config: &SiteConfig, field: String, link: &str) -> Option<Problem> {
    if utils::is_external(link) || link.starts_with('#') {
        return None;
    }

    match config.base_path() {
        Some(base) if utils::is_relative(base) => {
            link.starts_with('/')
                .then(|| Problem::RootLinkUnderRelativeBase {
                    field,
                    link: link.to_owned(),
                    base: base.to_owned(),
                })
        }
        _ => (!link.starts_with('/')).then(|| Problem::RelativeLinkUnderRootBase {
            field,
            link: link.to_owned(),
        }),
    }
}
