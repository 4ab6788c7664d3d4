pub mod config;
pub mod parser;

pub use config::{MixinFile, SliSpecsByProduct};
pub use parser::{parse_mixin_from_file, parse_mixin_from_str};
