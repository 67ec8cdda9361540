//! Artifact kinds and the fixed system instruction attached to each.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

const WEBSITE_INSTRUCTION: &str = "You are an expert web developer. Generate complete, single-file HTML/CSS/JS code.
Requirements:
- Mobile-responsive design using modern CSS (Flexbox/Grid).
- Visually appealing, modern aesthetic.
- Valid HTML5 structure.
- Embed all CSS in a <style> tag inside <head>.
- Embed all JavaScript in a <script> tag at the end of <body>.
- If modern styling is requested, include the Tailwind CSS CDN link in <head>.
- Use placeholder images from placehold.co.
- Use rounded corners on all elements.
- Use the 'Inter' font unless the user asks for another.
Format: <!DOCTYPE html><html>...</html>";

const APP_INSTRUCTION: &str = "You are a mobile app developer. Generate complete, self-contained React Native code for the described app.
Requirements:
- Use functional components and hooks.
- Keep the UI clear and modern.
- Include every key feature from the request.
- Provide a single App.js (or App.tsx) file containing all components.
- Do NOT use external image URLs; use placeholders or simple colored shapes.
- Do NOT include API keys or other sensitive information.
- Comment the code structure and behavior.
- Start with a comment block explaining how to run the app (create a React Native project, replace App.js, install dependencies, run).
Example structure:
```javascript
import React from 'react';
import { View, Text, StyleSheet } from 'react-native';

const App = () => (
  <View style={styles.container}>
    <Text style={styles.text}>Your App Content Here</Text>
  </View>
);

const styles = StyleSheet.create({
  container: { flex: 1, justifyContent: 'center', alignItems: 'center', backgroundColor: '#f0f0f0' },
  text: { fontSize: 24, fontWeight: 'bold' },
});

export default App;
```";

/// What the model is asked to produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArtifactKind {
    /// Single-file HTML document, persisted and previewable.
    Website,
    /// React Native source; the "build" is simulated.
    App,
}

impl ArtifactKind {
    pub const ALL: [ArtifactKind; 2] = [ArtifactKind::Website, ArtifactKind::App];

    /// Fixed system instruction sent ahead of the user's prompt.
    pub fn system_instruction(self) -> &'static str {
        match self {
            Self::Website => WEBSITE_INSTRUCTION,
            Self::App => APP_INSTRUCTION,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Website => "website",
            Self::App => "app",
        }
    }

    /// Language hint for code views (fenced blocks, editor modes).
    pub fn code_language(self) -> &'static str {
        match self {
            Self::Website => "html",
            Self::App => "javascript",
        }
    }
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ArtifactKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "website" | "web" | "site" => Ok(Self::Website),
            "app" | "apk" => Ok(Self::App),
            other => Err(format!("unknown artifact kind: {other}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_instructions_are_distinct_and_shaped() {
        let web = ArtifactKind::Website.system_instruction();
        let app = ArtifactKind::App.system_instruction();
        assert_ne!(web, app);
        assert!(web.contains("<!DOCTYPE html>"));
        assert!(app.contains("React Native"));
    }

    #[test]
    fn test_parse_accepts_endpoint_aliases() {
        assert_eq!("website".parse::<ArtifactKind>().unwrap(), ArtifactKind::Website);
        assert_eq!("APK".parse::<ArtifactKind>().unwrap(), ArtifactKind::App);
        assert!("desktop".parse::<ArtifactKind>().is_err());
    }

    #[test]
    fn test_serde_uses_snake_case() {
        let json = serde_json::to_string(&ArtifactKind::Website).unwrap();
        assert_eq!(json, "\"website\"");
    }
}
