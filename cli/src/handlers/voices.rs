use console::Style;
use svara::voice::VoiceCatalog;

pub fn handle_voices() {
    let style_bold = Style::new().bold();
    for voice in VoiceCatalog::default().voices() {
        println!("{}  {} ({}, {})", style_bold.apply_to(&voice.id), voice.name, voice.language, voice.gender);
    }
}
