#[cfg(feature = "cli")]
pub mod cli;
pub mod codec;
pub mod config;
pub mod error;
pub mod id;
pub mod ir;
pub mod parser;
pub mod render;

#[cfg(feature = "cli")]
pub use cli::run;
pub use codec::{from_base64, from_base64_with, from_json, from_json_with, to_base64, to_json};
pub use config::{Config, TexConfig, load_config};
pub use error::{Error, Result};
pub use id::IdGenerator;
pub use ir::{Diagram, Edge, Head, LabelPosition, LineStyle, Node, NodeId, Position, Tail};
pub use parser::{from_code, from_code_with};
pub use render::{to_tex, to_tex_with_config};
