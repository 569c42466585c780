use serde::Serialize;

pub const DEFAULT_VOICE: &str = "en-US-male";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VoiceInfo {
    pub id: String,
    pub name: String,
    pub language: String,
    pub gender: String,
}

impl VoiceInfo {
    pub fn new(
        id: &str,
        name: &str,
        language: &str,
        gender: &str,
    ) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            language: language.to_string(),
            gender: gender.to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct VoiceCatalog {
    voices: Vec<VoiceInfo>,
}

impl VoiceCatalog {
    pub fn new(voices: Vec<VoiceInfo>) -> Self {
        Self {
            voices,
        }
    }

    pub fn voices(&self) -> &[VoiceInfo] {
        &self.voices
    }

    pub fn get(
        &self,
        id: &str,
    ) -> Option<&VoiceInfo> {
        self.voices.iter().find(|voice| voice.id == id)
    }
}

impl Default for VoiceCatalog {
    fn default() -> Self {
        Self::new(vec![
            VoiceInfo::new("en-US-male", "English (US) Male", "en-US", "male"),
            VoiceInfo::new("en-US-female", "English (US) Female", "en-US", "female"),
        ])
    }
}
