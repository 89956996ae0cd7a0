//! testmeta - Build host metadata for test-result analytics
//!
//! testmeta describes the machine and configuration a build or test run
//! happened on: host name, target and host distro, the git revision of every
//! layer and of bitbake itself, and a handful of build variables. The result
//! is written as an XML document next to the test results.
//!
//! # Architecture
//!
//! - [`cli`] - Command-line interface layer (parses args, wires collaborators)
//! - [`collect`] - Metadata aggregation over command, variable, and git sources
//! - [`xml`] - Mapping-to-element serialization, pretty printing, and reading
//! - [`git`] - Single interface for all Git operations
//! - [`core`] - Domain types, key-value parsing, and configuration
//! - [`ui`] - Output and logging
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//! use testmeta::collect::{BitbakeEnv, Collector, ShellRunner};
//! use testmeta::xml::write_metadata_file;
//!
//! let runner = ShellRunner;
//! let vars = BitbakeEnv::new(&runner).in_dir("/srv/poky/build");
//! let metadata = Collector::new(&runner, &vars).metadata_from_bb().unwrap();
//! write_metadata_file(Path::new("metadata.xml"), &metadata).unwrap();
//! ```

pub mod cli;
pub mod collect;
pub mod core;
pub mod git;
pub mod ui;
pub mod xml;
