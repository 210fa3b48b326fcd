pub mod builder;
pub mod source_map;
pub mod transpiler;

pub mod prelude {
    pub use super::{
        builder::*,
        source_map::*,
        transpiler::*
    };
}

#[cfg(test)]
mod tests;
