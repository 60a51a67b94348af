#![forbid(unsafe_code)]

//! Terminal I/O bridge for an emulator front-end.
//!
//! # Role
//! The emulator runs elsewhere and speaks bytes; the rendering surface draws
//! whatever bytes it is given. `emuterm-core` sits between them:
//!
//! - **Output relay** ([`relay`]): holds emulator output until the surface is
//!   ready, then forwards it as it arrives.
//! - **Sticky modifiers** ([`modifiers`]): Control/Alternate toggled from the
//!   toolbar, consumed by the next keystroke.
//! - **Key toolbar** ([`toolbar`]): picks which keys fit the available width
//!   and lays them out.
//! - **Encoder** ([`encoder`]): turns keys and text into VT byte sequences.
//! - **Bridge** ([`bridge`]): wires the above to the emulator and surface.
//!
//! Everything runs on the host's UI thread. Output produced elsewhere goes
//! through [`relay::OutputHandle`] and is applied by
//! [`bridge::TerminalBridge::pump_output`].

pub mod bridge;
pub mod config;
pub mod encoder;
pub mod geometry;
pub mod input;
pub mod logging;
pub mod modifiers;
pub mod recording;
pub mod relay;
pub mod toolbar;
pub mod viewport;

pub use bridge::{BridgeState, Emulator, TapOutcome, TerminalBridge};
pub use config::{BridgeConfig, ConfigError};
pub use encoder::{MetaPrefix, SequenceEncoder, encode};
pub use geometry::{Insets, Rect};
pub use input::{InputEvent, LogicalKey};
pub use modifiers::{Modifier, ModifierSet, ModifierState};
pub use relay::{OutputHandle, OutputRelay, RenderSurface};
pub use toolbar::{KeyDescriptor, KeyToolbar, ToolbarGeometry, ToolbarLayout};
