//! CLI command implementations.

pub(crate) mod build;
pub(crate) mod inspect;

pub(crate) use build::BuildArgs;
pub(crate) use inspect::InspectArgs;

use regdoc_config::LinksConfig;
use regdoc_renderer::ReferenceLinks;

/// Attribute type links as configured.
pub(crate) fn reference_links(links: &LinksConfig) -> ReferenceLinks {
    ReferenceLinks {
        labels: links.labels_url.clone(),
        name: links.name_url.clone(),
        dict: links.dict_url.clone(),
    }
}
