//! HTML rewriting
//!
//! The document is parsed once into a `kuchiki` tree; four passes mutate
//! that tree in place and the caller serializes it once at the end. No pass
//! searches or re-parses the serialized text.
//!
//! Each pass collects its targets first, prefetches the distinct URLs
//! concurrently through the [`ResourceCache`], then mutates the matching
//! nodes in document order.

use kuchiki::traits::TendrilSink;
use kuchiki::{ElementData, NodeDataRef, NodeRef};
use url::Url;

use super::cache::ResourceCache;
use super::css::rewrite_css;
use super::data_uri::encode_all;
use super::types::{Diagnostics, InlineError, ResourceKind};
use crate::error::{ArchiveError, ArchiveResult};
use crate::fetch::Fetch;
use crate::utils::{OUTPUT_CHARSET, is_data_url, resolve_url};

/// Only scripts carrying exactly this `type` are inlined
const JAVASCRIPT_TYPE: &str = "text/javascript";

/// Collect every element matching `selector`
///
/// Must collect before mutating: detaching nodes invalidates a live iterator.
fn select_all(
    document: &NodeRef,
    selector: &'static str,
) -> ArchiveResult<Vec<NodeDataRef<ElementData>>> {
    Ok(document
        .select(selector)
        .map_err(|()| ArchiveError::Selector(selector))?
        .collect())
}

/// Build a detached element from a markup snippet
fn build_element(markup: &str, selector: &'static str) -> ArchiveResult<NodeRef> {
    let fragment = kuchiki::parse_html().one(markup);
    let element = fragment
        .select_first(selector)
        .map_err(|()| ArchiveError::Selector(selector))?;
    let node = element.as_node().clone();
    node.detach();
    Ok(node)
}

fn set_text(node: &NodeRef, text: String) {
    for child in node.children().collect::<Vec<_>>() {
        child.detach();
    }
    node.append(NodeRef::new_text(text));
}

fn replace_node(old: &NodeRef, new: NodeRef) {
    old.insert_before(new);
    old.detach();
}

fn attribute(element: &NodeDataRef<ElementData>, name: &str) -> Option<String> {
    element.attributes.borrow().get(name).map(str::to_string)
}

fn invalid_reference(reference: &str, error: url::ParseError) -> InlineError {
    InlineError::InvalidUrl {
        reference: reference.to_string(),
        reason: error.to_string(),
    }
}

fn is_stylesheet_link(element: &NodeDataRef<ElementData>) -> bool {
    element.attributes.borrow().get("rel").is_some_and(|rel| {
        rel.split_ascii_whitespace()
            .any(|token| token.eq_ignore_ascii_case("stylesheet"))
    })
}

/// Make sure the document declares its charset
///
/// When no `<meta charset>` exists, `<meta charset="utf-8">` becomes the
/// first child of `<head>`; an existing declaration is left as it is.
/// Returns whether a declaration was inserted.
pub fn ensure_charset_declaration(document: &NodeRef) -> ArchiveResult<bool> {
    let has_declaration = select_all(document, "meta")?
        .iter()
        .any(|meta| meta.attributes.borrow().contains("charset"));
    if has_declaration {
        return Ok(false);
    }

    // The HTML parser always creates a <head>, even for fragments
    let head = document
        .select_first("head")
        .map_err(|()| ArchiveError::Selector("head"))?;
    let meta = build_element(&format!("<meta charset=\"{OUTPUT_CHARSET}\">"), "meta")?;
    head.as_node().prepend(meta);

    log::debug!("Inserted <meta charset=\"{OUTPUT_CHARSET}\">");
    Ok(true)
}

/// Applies the four inlining passes to a parsed document
pub struct HtmlRewriter<'a, F> {
    cache: &'a ResourceCache<F>,
    concurrency: usize,
}

impl<'a, F: Fetch> HtmlRewriter<'a, F> {
    pub fn new(cache: &'a ResourceCache<F>, concurrency: usize) -> Self {
        Self { cache, concurrency }
    }

    /// Run scripts, styles, links and images passes, in that order
    ///
    /// # Errors
    ///
    /// Only structural failures of the tree API; resource failures are
    /// recorded in `diagnostics`.
    pub async fn rewrite(
        &self,
        document: &NodeRef,
        base: &Url,
        diagnostics: &mut Diagnostics,
    ) -> ArchiveResult<()> {
        self.inline_scripts(document, base, diagnostics).await?;
        self.inline_styles(document, base, diagnostics).await?;
        self.inline_stylesheet_links(document, base, diagnostics).await?;
        self.inline_images(document, base, diagnostics).await?;
        Ok(())
    }

    /// Rewrite the `url()` references of a CSS block against `base`
    pub async fn rewrite_css(&self, css: &str, base: &Url, diagnostics: &mut Diagnostics) -> String {
        rewrite_css(self.cache, css, base, self.concurrency, diagnostics).await
    }

    /// Replace `<script type="text/javascript" src=...>` with the script body
    ///
    /// Scripts without that exact type (module scripts, type-less scripts)
    /// are left alone.
    pub async fn inline_scripts(
        &self,
        document: &NodeRef,
        base: &Url,
        diagnostics: &mut Diagnostics,
    ) -> ArchiveResult<()> {
        let mut targets = Vec::new();
        for script in select_all(document, "script[src]")? {
            if attribute(&script, "type").as_deref() != Some(JAVASCRIPT_TYPE) {
                continue;
            }
            let Some(src) = attribute(&script, "src") else {
                continue;
            };
            if src.trim().is_empty() || is_data_url(&src) {
                continue;
            }
            match resolve_url(base, &src) {
                Ok(url) => targets.push((script, url)),
                Err(e) => diagnostics.record_warning(ResourceKind::Script, invalid_reference(&src, e)),
            }
        }
        if targets.is_empty() {
            return Ok(());
        }

        let fetched = self
            .cache
            .fetch_all(targets.iter().map(|(_, url)| url), self.concurrency)
            .await;

        for (script, url) in targets {
            match fetched.get(url.as_str()) {
                Some(Ok(resource)) => {
                    let inline = build_element("<script type=\"text/javascript\"></script>", "script")?;
                    set_text(&inline, format!("\n{}\n", resource.text().trim()));
                    replace_node(script.as_node(), inline);
                    diagnostics.record_inlined();
                    log::debug!("Inlined script {url}");
                }
                Some(Err(failure)) => {
                    diagnostics.record_warning(ResourceKind::Script, failure.clone().into());
                }
                None => {}
            }
        }
        Ok(())
    }

    /// Rewrite `<style>` element bodies and `style` attributes
    ///
    /// Attributes whose value does not change are not touched.
    pub async fn inline_styles(
        &self,
        document: &NodeRef,
        base: &Url,
        diagnostics: &mut Diagnostics,
    ) -> ArchiveResult<()> {
        for style in select_all(document, "style")? {
            let node = style.as_node();
            let css = node.text_contents();
            let rewritten = self.rewrite_css(&css, base, diagnostics).await;
            if rewritten != css {
                set_text(node, rewritten);
            }
        }

        for element in select_all(document, "[style]")? {
            let Some(css) = attribute(&element, "style") else {
                continue;
            };
            let rewritten = self.rewrite_css(&css, base, diagnostics).await;
            if rewritten != css {
                element.attributes.borrow_mut().insert("style", rewritten);
            }
        }
        Ok(())
    }

    /// Replace `<link rel="stylesheet" href="*.css">` with an inline `<style>`
    ///
    /// `url()` references inside the stylesheet resolve against the
    /// stylesheet's own location, not the page.
    pub async fn inline_stylesheet_links(
        &self,
        document: &NodeRef,
        base: &Url,
        diagnostics: &mut Diagnostics,
    ) -> ArchiveResult<()> {
        let mut targets = Vec::new();
        for link in select_all(document, "link[href]")? {
            if !is_stylesheet_link(&link) {
                continue;
            }
            let Some(href) = attribute(&link, "href") else {
                continue;
            };
            if !href.ends_with(".css") {
                continue;
            }
            match resolve_url(base, &href) {
                Ok(url) => targets.push((link, url)),
                Err(e) => {
                    diagnostics.record_warning(ResourceKind::Stylesheet, invalid_reference(&href, e));
                }
            }
        }
        if targets.is_empty() {
            return Ok(());
        }

        let fetched = self
            .cache
            .fetch_all(targets.iter().map(|(_, url)| url), self.concurrency)
            .await;

        for (link, url) in targets {
            match fetched.get(url.as_str()) {
                Some(Ok(resource)) => {
                    let css = resource.text();
                    let rewritten = self.rewrite_css(css.trim(), &url, diagnostics).await;

                    let style = build_element("<style></style>", "style")?;
                    set_text(&style, format!("\n{rewritten}\n"));
                    replace_node(link.as_node(), style);
                    diagnostics.record_inlined();
                    log::debug!("Inlined stylesheet {url}");
                }
                Some(Err(failure)) => {
                    diagnostics.record_warning(ResourceKind::Stylesheet, failure.clone().into());
                }
                None => {}
            }
        }
        Ok(())
    }

    /// Replace `<img src>` with a data URI
    ///
    /// When a source cannot be inlined its original `src` is kept.
    pub async fn inline_images(
        &self,
        document: &NodeRef,
        base: &Url,
        diagnostics: &mut Diagnostics,
    ) -> ArchiveResult<()> {
        let mut targets = Vec::new();
        for image in select_all(document, "img[src]")? {
            let Some(src) = attribute(&image, "src") else {
                continue;
            };
            if src.trim().is_empty() || is_data_url(&src) {
                continue;
            }
            match resolve_url(base, &src) {
                Ok(url) => targets.push((image, url)),
                Err(e) => diagnostics.record_warning(ResourceKind::Image, invalid_reference(&src, e)),
            }
        }
        if targets.is_empty() {
            return Ok(());
        }

        let encoded = encode_all(self.cache, targets.iter().map(|(_, url)| url), self.concurrency).await;

        for (image, url) in targets {
            match encoded.get(url.as_str()) {
                Some(Ok(data_uri)) => {
                    image.attributes.borrow_mut().insert("src", data_uri.clone());
                    diagnostics.record_inlined();
                    log::debug!("Inlined image {url}");
                }
                Some(Err(e)) => diagnostics.record_warning(ResourceKind::Image, e.clone()),
                None => {}
            }
        }
        Ok(())
    }
}
