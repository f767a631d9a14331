pub mod deploy;
pub mod destroy;
pub mod synth;
pub mod validate;
