//! Converts KiCad placement lists into TVM802 pick-and-place machine files.
//!
//! The pipeline has three stages: enumerate the component keys of a board
//! ([`component_keys`], used to bootstrap a feeder template), load the
//! hand-edited [`FeederTable`], and join the placement list against it into
//! a [`MachineFile`].

pub mod components;
pub mod error;
pub mod feeders;
pub mod machine;
pub mod placement;
pub mod profile;
pub mod template;

pub use components::component_keys;
pub use error::{Error, Result};
pub use feeders::{FeederSlot, FeederTable};
pub use machine::{
    generate_machine_file, Layout, MachineFile, MachineRow, MarkPoint, Marks, MARK_BLOCK_ROWS,
    TRAILER_ROWS,
};
pub use placement::{read_placements, ComponentKey, Fiducial, PlacementReader, PlacementRecord};
pub use profile::{MachineProfile, TemplateDefaults};
pub use template::{generate_template, write_template};
