pub mod cors;
pub mod error;
pub mod health;
pub mod main;
pub mod root;
pub mod state;
pub mod text_to_speech;
pub mod voices;
pub use cors::{Cors, handle_preflight};
pub use error::{ApiError, ErrorBody};
pub use health::handle_health;
pub use main::{build_rocket, run_server};
pub use root::handle_root;
pub use state::{ServiceState, build_synthesizer, load_codec, vllm_client};
pub use text_to_speech::{PcmAudio, handle_text_to_speech};
pub use voices::handle_voices;
