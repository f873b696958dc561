use std::sync::Arc;

use crate::{config::SiteConfig, utils};

struct InnerCtx {
    base_path: String,
    relative: bool,
    clean_urls: bool,
}

/// Link resolution context of a site configuration. The context is cheap to clone.
#[derive(Clone)]
pub struct Ctx {
    inner: Arc<InnerCtx>,
}

impl Ctx {
    pub fn from_site_config(site_config: &SiteConfig) -> Self {
        Ctx {
            inner: Arc::new(InnerCtx {
                base_path: site_config.base_path().unwrap_or("/").to_owned(),
                relative: site_config.has_relative_base(),
                clean_urls: site_config.clean_urls(),
            }),
        }
    }

    pub fn base_path(&self) -> &str {
        &self.inner.base_path
    }

    /// Turn a navigation link into the href the generated pages point to.
    ///
    /// Without clean URLs, page links get an explicit `.html` suffix and directory links point
    /// at their `index.html`. Under a root base path other than `/`, root-relative links are
    /// prefixed with the base path. External links and pure anchors are returned as is.
    pub fn href(&self, link: &str) -> String {
        if utils::is_external(link) || link.starts_with('#') {
            return link.to_owned();
        }

        let (path, suffix) = utils::split_suffix(link);
        let mut href = String::with_capacity(self.base_path().len() + link.len() + 10);

        if !self.inner.relative && path.starts_with('/') {
            href.push_str(self.base_path().trim_end_matches('/'));
        }
        href.push_str(path);

        if !self.inner.clean_urls && !utils::has_extension(path) {
            if path.ends_with('/') {
                href.push_str("index.html");
            } else if path == "." || path.ends_with("/.") || path.ends_with("..") {
                href.push_str("/index.html");
            } else {
                href.push_str(".html");
            }
        }

        href.push_str(suffix);
        href
    }
}

#[cfg(test)]
mod test {
    use crate::{cli::Profile, config::SiteSource};

    use super::Ctx;

    fn ctx(profile: Profile, overrides: &str) -> Ctx {
        let source = SiteSource::from_toml_str(&format!(
            r#"
                language = "en"
                title = "A site"
                description = "Describing things"
                {overrides}
            "#
        ))
        .unwrap();
        Ctx::from_site_config(&source.resolve(profile))
    }

    #[test]
    fn filesystem_direct() {
        let ctx = ctx(Profile::FilesystemDirect, "");

        assert_eq!(ctx.base_path(), "./");
        assert_eq!(ctx.href("./"), "./index.html");
        assert_eq!(ctx.href("."), "./index.html");
        assert_eq!(ctx.href("./guide/intro"), "./guide/intro.html");
        assert_eq!(ctx.href("./guide/intro#setup"), "./guide/intro.html#setup");
        assert_eq!(ctx.href("./guide/"), "./guide/index.html");
        assert_eq!(ctx.href("../up"), "../up.html");
        assert_eq!(ctx.href("./file.pdf"), "./file.pdf");
        assert_eq!(ctx.href("#anchor"), "#anchor");
        assert_eq!(ctx.href("https://example.com"), "https://example.com");
    }

    #[test]
    fn server_root() {
        let ctx = ctx(Profile::ServerRoot, "");

        assert_eq!(ctx.base_path(), "/");
        assert_eq!(ctx.href("/"), "/");
        assert_eq!(ctx.href("/guide/intro"), "/guide/intro");
        assert_eq!(ctx.href("/guide/intro?x=1"), "/guide/intro?x=1");
    }

    #[test]
    fn server_root_with_prefix() {
        let ctx = ctx(
            Profile::ServerRoot,
            r#"
                [profiles.server-root]
                base-path = "/docs/"
                clean-urls = false
            "#,
        );

        assert_eq!(ctx.href("/"), "/docs/index.html");
        assert_eq!(ctx.href("/guide/intro"), "/docs/guide/intro.html");
        assert_eq!(ctx.href("/guide/intro.html"), "/docs/guide/intro.html");
    }
}
