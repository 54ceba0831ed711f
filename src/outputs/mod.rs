//! Output generation for the routes manifest.
//!
//! # Submodules
//!
//! - [`manifest`]: Renders the manifest to YAML behind the auto-generation
//!   disclaimer, writes it atomically, and compares it with an existing file
//!
//! # Output Structure
//!
//! ```text
//! docs/_data/
//! ├── _routes.yml   # hand-maintained input
//! └── routes.yml    # generated: disclaimer line + populated manifest
//! ```

pub mod manifest;
