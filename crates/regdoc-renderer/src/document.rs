//! Stardoc document rendering.
//!
//! Produces the HTML body for one [`DocumentInfo`]: a file header carrying
//! the file anchor, then one section per non-empty entity list. Every entity
//! is wrapped in an element whose `id` is its resolved anchor and carries a
//! copy-link button that the page script wires to the clipboard.

use std::fmt::Write;

use regdoc_stardoc::{
    AspectInfo, AttributeInfo, AttributeType, DocumentAnchors, DocumentInfo, FunctionInfo,
    ProviderInfo, RuleInfo,
};

use crate::html::is_external_link;
use crate::renderer::render_markdown;
use crate::state::escape_html;

/// Error returned when a document cannot be rendered faithfully.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    /// An attribute carries a type outside the known set.
    #[error("attribute `{attribute}` has unknown type {attr_type:?}")]
    UnknownAttributeType {
        attribute: String,
        attr_type: AttributeType,
    },
}

/// Reference documentation linked from attribute types.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReferenceLinks {
    /// Target for label-valued types.
    pub labels: String,
    /// Target for the `name` type.
    pub name: String,
    /// Target for dictionary types.
    pub dict: String,
}

impl Default for ReferenceLinks {
    fn default() -> Self {
        Self {
            labels: "https://bazel.build/concepts/labels".to_owned(),
            name: "https://bazel.build/concepts/labels#target-names".to_owned(),
            dict: "https://bazel.build/rules/lib/dict".to_owned(),
        }
    }
}

/// Human-readable description of an attribute type.
///
/// Returns `None` for `Unknown` and unrecognized wire values.
pub fn attribute_type_description(attr_type: AttributeType) -> Option<&'static str> {
    let description = match attr_type {
        AttributeType::Name => "name",
        AttributeType::Int => "integer",
        AttributeType::Label | AttributeType::Output => "label",
        AttributeType::String => "string",
        AttributeType::StringList => "list of strings",
        AttributeType::IntList => "list of integers",
        AttributeType::LabelList | AttributeType::OutputList => "list of labels",
        AttributeType::Boolean => "boolean",
        AttributeType::LabelStringDict => "dictionary: Label → String",
        AttributeType::StringDict => "dictionary: String → String",
        AttributeType::StringListDict => "dictionary: String → List of strings",
        AttributeType::Unknown | AttributeType::Unrecognized(_) => return None,
    };
    Some(description)
}

/// Reference documentation for an attribute type, if it has any.
pub fn attribute_type_link(attr_type: AttributeType, links: &ReferenceLinks) -> Option<&str> {
    match attr_type {
        AttributeType::Label | AttributeType::LabelList | AttributeType::Output => {
            Some(links.labels.as_str())
        }
        AttributeType::Name => Some(links.name.as_str()),
        AttributeType::StringDict
        | AttributeType::StringListDict
        | AttributeType::LabelStringDict => Some(links.dict.as_str()),
        _ => None,
    }
}

/// Render one document to HTML.
///
/// `anchors` must be the anchors resolved for this document, either from an
/// [`AnchorIndex`](regdoc_stardoc::AnchorIndex) over the whole collection or
/// from [`DocumentAnchors::for_document`].
///
/// # Errors
///
/// Returns [`RenderError::UnknownAttributeType`] if any rule or aspect
/// attribute has an unknown type. Nothing is rendered in that case.
pub fn render_document(
    doc: &DocumentInfo,
    anchors: &DocumentAnchors,
    links: &ReferenceLinks,
) -> Result<String, RenderError> {
    let mut out = String::with_capacity(4096);
    out.push_str(r#"<article class="stardoc-document">"#);

    let label = if doc.file.is_empty() {
        "Module"
    } else {
        doc.file.as_str()
    };
    write!(
        out,
        r#"<div class="stardoc-file" id="{id}"><div class="entity-header"><h3 class="file-name"><code>{label}</code></h3>"#,
        id = escape_html(&anchors.file),
        label = escape_html(label),
    )
    .unwrap();
    copy_link_button(&anchors.file, &mut out);
    out.push_str("</div>");
    if let Some(docstring) = &doc.module_docstring {
        docstring_block(docstring, &mut out);
    }
    out.push_str("</div>");

    if !doc.functions.is_empty() {
        section_start("functions", "Functions &amp; Macros", &mut out);
        for (func, id) in doc.functions.iter().zip(&anchors.functions) {
            render_function(func, id, &mut out);
        }
        out.push_str("</div></section>");
    }

    if !doc.rules.is_empty() {
        section_start("rules", "Rules", &mut out);
        for (rule, id) in doc.rules.iter().zip(&anchors.rules) {
            render_rule(rule, id, links, &mut out)?;
        }
        out.push_str("</div></section>");
    }

    if !doc.providers.is_empty() {
        section_start("providers", "Providers", &mut out);
        for (provider, id) in doc.providers.iter().zip(&anchors.providers) {
            render_provider(provider, id, &mut out);
        }
        out.push_str("</div></section>");
    }

    if !doc.aspects.is_empty() {
        section_start("aspects", "Aspects", &mut out);
        for (aspect, id) in doc.aspects.iter().zip(&anchors.aspects) {
            render_aspect(aspect, id, links, &mut out)?;
        }
        out.push_str("</div></section>");
    }

    out.push_str("</article>");
    Ok(out)
}

fn section_start(kind: &str, title: &str, out: &mut String) {
    write!(
        out,
        r#"<section class="stardoc-section stardoc-{kind}"><h4 class="section-title">{title}</h4><div class="section-entries">"#
    )
    .unwrap();
}

fn entity_start(kind: &str, id: &str, name: &str, out: &mut String) {
    write!(
        out,
        r#"<div class="stardoc-entity entity-{kind}" id="{id}"><div class="entity-header"><code class="entity-name">{name}</code>"#,
        id = escape_html(id),
        name = escape_html(name),
    )
    .unwrap();
    copy_link_button(id, out);
    out.push_str("</div>");
}

fn copy_link_button(id: &str, out: &mut String) {
    write!(
        out,
        r#"<button type="button" class="copy-link" data-anchor="{}" title="Copy link to this section" aria-label="Copy link to this section"></button>"#,
        escape_html(id)
    )
    .unwrap();
}

fn docstring_block(markdown: &str, out: &mut String) {
    out.push_str(r#"<div class="docstring">"#);
    out.push_str(&render_markdown(markdown));
    out.push_str("</div>");
}

fn render_function(func: &FunctionInfo, id: &str, out: &mut String) {
    entity_start("function", id, &func.name, out);

    if let Some(deprecated) = &func.deprecated {
        out.push_str(r#"<div class="deprecated"><span class="deprecated-label">Deprecated</span>"#);
        out.push_str(&render_markdown(deprecated));
        out.push_str("</div>");
    }
    if let Some(docstring) = &func.doc_string {
        docstring_block(docstring, out);
    }

    if !func.parameters.is_empty() {
        table_start("Parameters", out);
        for param in &func.parameters {
            row_start(&param.name, param.mandatory, out);
            if let Some(docstring) = &param.doc_string {
                out.push_str(&render_markdown(docstring));
            }
            default_value(param.default_value.as_deref(), out);
            out.push_str("</td></tr>");
        }
        out.push_str("</tbody></table></div>");
    }

    if let Some(returns) = &func.returns {
        out.push_str(r#"<div class="entity-returns"><h5>Returns</h5>"#);
        out.push_str(&render_markdown(returns));
        out.push_str("</div>");
    }

    out.push_str("</div>");
}

fn render_rule(
    rule: &RuleInfo,
    id: &str,
    links: &ReferenceLinks,
    out: &mut String,
) -> Result<(), RenderError> {
    entity_start("rule", id, &rule.name, out);
    if let Some(docstring) = &rule.doc_string {
        docstring_block(docstring, out);
    }
    attribute_table(&rule.attributes, links, out)?;
    out.push_str("</div>");
    Ok(())
}

fn render_provider(provider: &ProviderInfo, id: &str, out: &mut String) {
    entity_start("provider", id, &provider.name, out);
    if let Some(docstring) = &provider.doc_string {
        docstring_block(docstring, out);
    }

    if !provider.fields.is_empty() {
        table_start("Fields", out);
        for field in &provider.fields {
            row_start(&field.name, false, out);
            if let Some(docstring) = &field.doc_string {
                out.push_str(&render_markdown(docstring));
            }
            out.push_str("</td></tr>");
        }
        out.push_str("</tbody></table></div>");
    }

    out.push_str("</div>");
}

fn render_aspect(
    aspect: &AspectInfo,
    id: &str,
    links: &ReferenceLinks,
    out: &mut String,
) -> Result<(), RenderError> {
    entity_start("aspect", id, &aspect.name, out);
    if let Some(docstring) = &aspect.doc_string {
        docstring_block(docstring, out);
    }

    if !aspect.aspect_attributes.is_empty() {
        out.push_str(r#"<div class="aspect-propagation"><h5>Propagates along</h5><ul>"#);
        for attr in &aspect.aspect_attributes {
            write!(out, "<li><code>{}</code></li>", escape_html(attr)).unwrap();
        }
        out.push_str("</ul></div>");
    }

    attribute_table(&aspect.attributes, links, out)?;
    out.push_str("</div>");
    Ok(())
}

fn attribute_table(
    attributes: &[AttributeInfo],
    links: &ReferenceLinks,
    out: &mut String,
) -> Result<(), RenderError> {
    if attributes.is_empty() {
        return Ok(());
    }

    table_start("Attributes", out);
    for attr in attributes {
        let description = attribute_type_description(attr.attr_type).ok_or_else(|| {
            RenderError::UnknownAttributeType {
                attribute: attr.name.clone(),
                attr_type: attr.attr_type,
            }
        })?;

        row_start(&attr.name, attr.mandatory, out);
        if let Some(docstring) = &attr.doc_string {
            out.push_str(&render_markdown(docstring));
        }

        out.push_str(r#"<div class="entry-type">Type: "#);
        match attribute_type_link(attr.attr_type, links) {
            Some(href) => {
                write!(out, r#"<a href="{}""#, escape_html(href)).unwrap();
                if is_external_link(href) {
                    out.push_str(r#" target="_blank" rel="noopener noreferrer""#);
                }
                write!(out, ">{}</a>", escape_html(description)).unwrap();
            }
            None => out.push_str(&escape_html(description)),
        }
        out.push_str("</div>");

        default_value(attr.default_value.as_deref(), out);
        out.push_str("</td></tr>");
    }
    out.push_str("</tbody></table></div>");
    Ok(())
}

fn table_start(title: &str, out: &mut String) {
    write!(
        out,
        r#"<div class="entity-table"><h5>{title}</h5><table><tbody>"#
    )
    .unwrap();
}

fn row_start(name: &str, mandatory: bool, out: &mut String) {
    write!(
        out,
        r#"<tr><td class="entry-name"><code>{}</code>"#,
        escape_html(name)
    )
    .unwrap();
    if mandatory {
        out.push_str(r#"<span class="required">required</span>"#);
    }
    out.push_str(r#"</td><td class="entry-doc">"#);
}

fn default_value(value: Option<&str>, out: &mut String) {
    if let Some(value) = value {
        write!(
            out,
            r#"<div class="entry-default">Default: <code>{}</code></div>"#,
            escape_html(value)
        )
        .unwrap();
    }
}
