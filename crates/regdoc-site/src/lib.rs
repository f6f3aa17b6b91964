//! Static docs site generation for regdoc.
//!
//! - [`StaticSiteBuilder`]: renders one page per module version from the
//!   registry metadata and the published docs archives
//! - [`ScrollSync`] and [`CopyLink`]: reference models of the navigation and
//!   copy-link behavior that `assets/docs.js` implements in the browser

mod builder;
mod copy_link;
mod registry;
mod scroll_sync;
mod template;

pub use builder::{
    BuildError, BuildFailure, BuildReport, DOCS_CSS, DOCS_JS, ModuleReport, StaticSiteBuilder,
    VersionReport,
};
pub use copy_link::{COPIED_INDICATOR_MS, Clipboard, ClipboardError, CopyLink, section_url};
pub use registry::{
    LocalRegistry, ModuleRegistry, ModuleVersion, RegistryError, select_version, sort_versions,
};
pub use scroll_sync::{
    HASH_DELAY_MS, HEADER_OFFSET_PX, SETTLE_MS, ScrollBehavior, ScrollHost, ScrollSync,
};
pub use template::{PageData, STARDOC_GUIDE_URL, VersionLink, render_page};
