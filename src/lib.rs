#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod document;
pub mod export;
pub mod graph;
pub mod layout;
pub mod pipeline;
pub mod propagate;
pub mod subnet;
pub mod view;

#[cfg(feature = "cli")]
pub use cli::run;
pub use config::{Config, LayoutConfig, load_config};
pub use graph::{DeviceKind, Edge, GraphStore, Node, Position, RouterMode, TerminalKind};
pub use pipeline::{EditError, FieldEdit, Workspace};
pub use propagate::recompute;
pub use subnet::Subnet;
pub use view::{ProjectedNode, ViewMode, Viewport};
