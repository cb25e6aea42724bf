// Shared render context
//
// Built once per guide. Every page render starts from a clone of the
// shared context, so nothing one page inserts can leak into another.

use crate::ngdb::{markup, Entry, Guide, GuideKind, Menu};
use crate::output::links::{offset_of, LinkResolver, Reference};
use crate::output::naming::Naming;
use serde::Serialize;
use std::collections::HashMap;
use tera::{Context, Filter, Tera, Value};

/// The sixteen DOS text colours, indexed by attribute nibble
pub const DOS_PALETTE: [&str; 16] = [
    "#000000", "#0000AA", "#00AA00", "#00AAAA", "#AA0000", "#AA00AA", "#AA5500", "#AAAAAA",
    "#555555", "#5555FF", "#55FF55", "#55FFFF", "#FF5555", "#FF55FF", "#FFFF55", "#FFFFFF",
];

/// Banner naming the tool that generated a page
pub fn generator_banner() -> String {
    format!("ng2web v{}", env!("CARGO_PKG_VERSION"))
}

/// Guide-level data exposed to templates as `guide`
#[derive(Debug, Serialize)]
pub struct GuideSummary<'a> {
    pub title: &'a str,
    pub kind: GuideKind,
    pub credits: &'a [String],
    pub file_name: String,
    pub namespace: &'a str,
    pub menus: &'a [Menu],
    pub menu_count: usize,
    pub entry_count: usize,
}

impl<'a> GuideSummary<'a> {
    pub fn new(guide: &'a Guide, naming: &'a Naming) -> Self {
        Self {
            title: guide.title(),
            kind: guide.kind(),
            credits: guide.credits(),
            file_name: guide
                .path()
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_default(),
            namespace: naming.namespace(),
            menus: guide.menus(),
            menu_count: guide.menus().len(),
            entry_count: guide.len(),
        }
    }
}

/// Values and filters shared by every render in one run
#[derive(Debug, Clone)]
pub struct RenderContext {
    context: Context,
    links: LinkResolver,
}

impl RenderContext {
    pub fn build(guide: &Guide, naming: &Naming) -> Self {
        let links = LinkResolver::new(naming.clone());

        let mut context = Context::new();
        context.insert("generator", &generator_banner());
        context.insert("guide", &GuideSummary::new(guide, naming));
        context.insert("about_url", &naming.about());
        context.insert("stylesheet_url", &naming.stylesheet());
        context.insert(
            "first_entry_url",
            &guide.first_entry().map(|entry| links.urlify(entry)),
        );
        context.insert("palette", &DOS_PALETTE);

        Self { context, links }
    }

    /// The shared values
    pub fn context(&self) -> &Context {
        &self.context
    }

    pub fn links(&self) -> &LinkResolver {
        &self.links
    }

    /// A fresh context for one entry page
    pub fn for_entry(&self, entry: &Entry) -> Context {
        let mut context = self.context.clone();
        context.insert("entry", entry);
        context
    }

    /// Install the `prompt`, `offset`, `urlify` and `markup` filters
    pub fn register_filters(&self, tera: &mut Tera) {
        tera.register_filter("prompt", PromptFilter);
        tera.register_filter("offset", OffsetFilter);
        tera.register_filter(
            "urlify",
            UrlifyFilter {
                links: self.links.clone(),
            },
        );
        tera.register_filter("markup", MarkupFilter);
    }
}

/// Human readable label of a choice, markup stripped
pub struct PromptFilter;

impl Filter for PromptFilter {
    fn filter(&self, value: &Value, _args: &HashMap<String, Value>) -> tera::Result<Value> {
        let raw = match value {
            Value::String(s) => Some(s.as_str()),
            Value::Object(map) => map
                .get("prompt")
                .or_else(|| map.get("text"))
                .and_then(Value::as_str),
            _ => None,
        };
        raw.map(|s| Value::String(markup::to_plain(s)))
            .ok_or_else(|| tera::Error::msg(format!("prompt: no label in {}", value)))
    }
}

/// Raw target offset of a choice
pub struct OffsetFilter;

impl Filter for OffsetFilter {
    fn filter(&self, value: &Value, _args: &HashMap<String, Value>) -> tera::Result<Value> {
        offset_of(value)
            .map(Value::from)
            .ok_or_else(|| tera::Error::msg(format!("offset: no offset in {}", value)))
    }
}

/// File name of the page a choice points at
pub struct UrlifyFilter {
    links: LinkResolver,
}

impl Filter for UrlifyFilter {
    fn filter(&self, value: &Value, _args: &HashMap<String, Value>) -> tera::Result<Value> {
        offset_of(value)
            .map(|offset| Value::String(self.links.urlify(Reference::RawOffset(offset))))
            .ok_or_else(|| tera::Error::msg(format!("urlify: no offset in {}", value)))
    }
}

/// Guide text rendered as HTML
pub struct MarkupFilter;

impl Filter for MarkupFilter {
    fn filter(&self, value: &Value, _args: &HashMap<String, Value>) -> tera::Result<Value> {
        value
            .as_str()
            .map(|s| Value::String(markup::to_html(s)))
            .ok_or_else(|| tera::Error::msg(format!("markup: expected text, got {}", value)))
    }

    fn is_safe(&self) -> bool {
        true
    }
}
