// Copyright 2023-2024 the docver developers
// Licensed under the MIT License.

//! Injecting the version-selector widget into rendered HTML pages.
//!
//! The rendered docs tree is walked recursively and every `.html` page gets
//! the template fragment spliced in immediately after the first `div`
//! carrying the anchor class. Pages without an anchor element are left
//! byte-for-byte untouched. Note that this operation is *not* idempotent:
//! re-running it over an already-injected tree inserts a second copy of the
//! fragment, so it should run exactly once per fresh build.

use anyhow::anyhow;
use lol_html::{element, html_content::ContentType, HtmlRewriter, Settings};
use std::{cell::Cell, fs, io::Write, path::Path};
use walkdir::WalkDir;

use crate::{atry, config::SidebarConfiguration, errors::Result};

#[derive(Debug)]
pub struct SidebarInjector {
    template: String,
    anchor_class: String,
}

impl SidebarInjector {
    pub fn new(template: String, anchor_class: String) -> Self {
        SidebarInjector {
            template,
            anchor_class,
        }
    }

    /// Create an injector by reading the template file named in the
    /// configuration. The template is read once and shared across every page
    /// rewrite in the run.
    pub fn load(cfg: &SidebarConfiguration) -> Result<Self> {
        let template = atry!(
            fs::read_to_string(&cfg.template_path);
            ["failed to read template file `{}`", cfg.template_path.display()]
        );

        Ok(SidebarInjector::new(template, cfg.anchor_class.clone()))
    }

    /// Rewrite one document, returning the new content if an anchor element
    /// was found and `None` if the page should be left alone.
    ///
    /// Only the first matching element receives an insertion. Everything
    /// outside the insertion point streams through unmodified, so we make no
    /// reformatting or pretty-printing promises beyond that.
    pub fn inject_document(&self, html: &[u8]) -> Result<Option<Vec<u8>>> {
        let selector = format!("div.{}", self.anchor_class);
        let template = self.template.as_str();
        let matched = Cell::new(false);
        let mut output = Vec::with_capacity(html.len() + template.len());

        let mut rewriter = HtmlRewriter::new(
            Settings {
                element_content_handlers: vec![element!(selector, |el| {
                    if !matched.get() {
                        el.after(template, ContentType::Html);
                        matched.set(true);
                    }
                    Ok(())
                })],
                ..Settings::default()
            },
            |c: &[u8]| output.extend_from_slice(c),
        );

        rewriter
            .write(html)
            .map_err(|e| anyhow!("HTML rewriting failed: {}", e))?;
        rewriter
            .end()
            .map_err(|e| anyhow!("HTML rewriting failed: {}", e))?;

        if matched.get() {
            Ok(Some(output))
        } else {
            Ok(None)
        }
    }

    /// Walk the tree rooted at `root` and inject the fragment into every
    /// HTML page containing an anchor element, printing the path of each
    /// modified page to standard output.
    ///
    /// Returns the number of pages modified. The first I/O failure aborts
    /// the whole run; there is no per-file recovery, so rerun from a fresh
    /// build after fixing the problem.
    pub fn inject_tree(&self, root: &Path) -> Result<usize> {
        let mut n_modified = 0;

        for entry in WalkDir::new(root) {
            let entry = atry!(
                entry;
                ["failed to walk the directory tree rooted at `{}`", root.display()]
            );

            if !entry.file_type().is_file() {
                continue;
            }

            if !entry
                .file_name()
                .to_str()
                .map_or(false, |n| n.ends_with(".html"))
            {
                continue;
            }

            let path = entry.path();
            let input = atry!(
                fs::read(path);
                ["failed to read `{}`", path.display()]
            );

            let output = atry!(
                self.inject_document(&input);
                ["failed to rewrite `{}`", path.display()]
            );

            if let Some(output) = output {
                atry!(
                    rewrite_page(path, &output);
                    ["failed to rewrite `{}`", path.display()]
                );
                println!("{}", path.display());
                n_modified += 1;
            }
        }

        Ok(n_modified)
    }
}

/// Replace a page's content through a write-to-temporary-and-rename, so that
/// external termination mid-run cannot leave a torn page behind.
fn rewrite_page(path: &Path, content: &[u8]) -> Result<()> {
    let new_af =
        atomicwrites::AtomicFile::new(path, atomicwrites::OverwriteBehavior::AllowOverwrite);

    let r = new_af.write(|new_f| new_f.write_all(content));

    match r {
        Err(atomicwrites::Error::Internal(e)) => Err(e.into()),
        Err(atomicwrites::Error::User(e)) => Err(e.into()),
        Ok(()) => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = "<html><body>\
        <div class=\"wy-grid-for-nav\"><p>nav content</p></div>\
        <p>tail content</p></body></html>";

    const WIDGET: &str = "<div class=\"version-switcher\">versions here</div>";

    fn injector() -> SidebarInjector {
        SidebarInjector::new(WIDGET.to_owned(), "wy-grid-for-nav".to_owned())
    }

    #[test]
    fn inserts_fragment_after_anchor() {
        let out = injector().inject_document(PAGE.as_bytes()).unwrap().unwrap();
        let out = String::from_utf8(out).unwrap();
        let expected = PAGE.replace("</div>", &format!("</div>{}", WIDGET));
        assert_eq!(out, expected);
    }

    #[test]
    fn matches_anchor_class_among_others() {
        let page = PAGE.replace("wy-grid-for-nav", "shift wy-grid-for-nav");
        let out = injector().inject_document(page.as_bytes()).unwrap();
        assert!(out.is_some());
    }

    #[test]
    fn page_without_anchor_is_untouched() {
        let page = "<html><body><div class=\"other\">hi</div></body></html>";
        let out = injector().inject_document(page.as_bytes()).unwrap();
        assert!(out.is_none());
    }

    #[test]
    fn only_first_anchor_receives_insertion() {
        let page = "<html><body>\
            <div class=\"wy-grid-for-nav\">first</div>\
            <div class=\"wy-grid-for-nav\">second</div>\
            </body></html>";
        let out = injector().inject_document(page.as_bytes()).unwrap().unwrap();
        let out = String::from_utf8(out).unwrap();
        assert_eq!(out.matches(WIDGET).count(), 1);
        assert!(out.find(WIDGET).unwrap() < out.find("second").unwrap());
    }

    #[test]
    fn rerunning_duplicates_the_fragment() {
        // Pins the (documented) non-idempotent behavior.
        let once = injector().inject_document(PAGE.as_bytes()).unwrap().unwrap();
        let twice = injector().inject_document(&once).unwrap().unwrap();
        let twice = String::from_utf8(twice).unwrap();
        assert_eq!(twice.matches(WIDGET).count(), 2);
    }

    #[test]
    fn tree_walk_modifies_only_matching_html_files() {
        let dir = tempfile::tempdir().unwrap();
        let sub = dir.path().join("en").join("1.0.x");
        fs::create_dir_all(&sub).unwrap();

        let with_anchor = sub.join("index.html");
        let without_anchor = dir.path().join("plain.html");
        let wrong_extension = dir.path().join("notes.txt");

        fs::write(&with_anchor, PAGE).unwrap();
        fs::write(&without_anchor, "<html><body><p>no nav</p></body></html>").unwrap();
        fs::write(&wrong_extension, PAGE).unwrap();

        let n = injector().inject_tree(dir.path()).unwrap();
        assert_eq!(n, 1);

        let modified = fs::read_to_string(&with_anchor).unwrap();
        assert!(modified.contains(WIDGET));

        // Non-matching pages and non-HTML files keep their exact bytes.
        let untouched = fs::read_to_string(&without_anchor).unwrap();
        assert_eq!(untouched, "<html><body><p>no nav</p></body></html>");
        assert_eq!(fs::read_to_string(&wrong_extension).unwrap(), PAGE);
    }

    #[test]
    fn missing_template_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = SidebarConfiguration {
            template_path: dir.path().join("no_such_template.html"),
            anchor_class: "wy-grid-for-nav".to_owned(),
        };
        assert!(SidebarInjector::load(&cfg).is_err());
    }
}
