use std::path::PathBuf;

use clap::{CommandFactory, Parser, Subcommand};
use cli::handlers::{ServeArgs, SynthesizeArgs, handle_serve, handle_synthesize, handle_voices};
use svara::synthesis::SynthesisRequest;

#[derive(Parser)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the text-to-speech HTTP server
    Serve {
        #[command(flatten)]
        args: ServeArgs,
    },
    /// Synthesize a single text and write raw PCM to a file
    Synthesize {
        /// Text to convert to speech
        text: String,
        /// Voice ID to use
        #[arg(long, default_value = svara::voice::DEFAULT_VOICE)]
        voice: String,
        /// Speech speed multiplier
        #[arg(long, default_value_t = 1.0)]
        speed: f32,
        /// Output file for the PCM data
        #[arg(long, short, default_value = "output.pcm")]
        output: PathBuf,
        #[command(flatten)]
        args: SynthesizeArgs,
    },
    /// List the available voices
    Voices,
}

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Some(Commands::Serve {
            args,
        }) => handle_serve(args),
        Some(Commands::Synthesize {
            text,
            voice,
            speed,
            output,
            args,
        }) => handle_synthesize(SynthesisRequest::new(text).voice(voice).speed(speed), output, args),
        Some(Commands::Voices) => {
            handle_voices();
            Ok(())
        },
        None => {
            let mut cmd = Cli::command();
            cmd.print_help().map_err(anyhow::Error::from)
        },
    };

    if let Err(error) = result {
        eprintln!("❌ {error:#}");
        std::process::exit(1);
    }
}
