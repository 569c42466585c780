mod serve;
mod synthesize;
mod voices;

pub use serve::{ServeArgs, handle_serve};
pub use synthesize::{SynthesizeArgs, handle_synthesize};
pub use voices::handle_voices;
