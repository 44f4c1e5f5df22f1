//! Sound and speech playback through external commands

use reqwest::Url;
use tokio::process::Command;
use tracing::{debug, info, warn};

use crate::state::{Action, Effect};

/// Plays display side effects.
///
/// Command templates are split on whitespace; a `{}` argument is replaced by
/// the sound URL or the text to speak. Without a template the effect is only
/// logged. Relative sound URLs (`/assets/...`) are served by the backend and
/// are resolved against its base URL.
#[derive(Debug, Clone, Default)]
pub struct EffectPlayer {
    pub sound_command: Option<String>,
    pub speech_command: Option<String>,
    /// Sound played when a running countdown expires
    pub alert_sound: String,
    base_url: Option<Url>,
}

impl EffectPlayer {
    pub fn new(sound_command: Option<String>, speech_command: Option<String>, alert_sound: String) -> Self {
        Self {
            sound_command,
            speech_command,
            alert_sound,
            base_url: None,
        }
    }

    /// Resolve relative sound URLs against `base_url`
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        match Url::parse(base_url) {
            Ok(url) => self.base_url = Some(url),
            Err(e) => warn!("Invalid sound base URL '{}': {}", base_url, e),
        }
        self
    }

    /// Where a sound is actually fetched from
    pub fn sound_source(&self, url: &str) -> String {
        if Url::parse(url).is_ok() {
            return url.to_string();
        }
        match self.base_url.as_ref().map(|base| base.join(url)) {
            Some(Ok(resolved)) => resolved.to_string(),
            Some(Err(e)) => {
                warn!("Cannot resolve sound URL '{}': {}", url, e);
                url.to_string()
            }
            None => url.to_string(),
        }
    }

    /// Play exactly one effect
    pub async fn play(&self, effect: &Effect) -> Result<(), String> {
        match effect {
            Effect::Action(Action::Sound { url }) => self.play_sound(url).await,
            Effect::Action(Action::Tts { text }) => self.speak(text).await,
            Effect::TimerExpired => {
                info!("Countdown finished, playing alert");
                self.play_sound(&self.alert_sound).await
            }
        }
    }

    pub async fn play_sound(&self, url: &str) -> Result<(), String> {
        let source = self.sound_source(url);
        info!("Playing sound: {}", source);
        match &self.sound_command {
            Some(template) => run_template(template, &source).await,
            None => {
                debug!("No sound command configured");
                Ok(())
            }
        }
    }

    pub async fn speak(&self, text: &str) -> Result<(), String> {
        info!("Speaking: {}", text);
        match &self.speech_command {
            Some(template) => run_template(template, text).await,
            None => {
                debug!("No speech command configured");
                Ok(())
            }
        }
    }
}

/// Expand `{}` in a command template into program + arguments
pub fn expand_template(template: &str, value: &str) -> Option<(String, Vec<String>)> {
    let mut parts = template.split_whitespace().map(|part| {
        if part == "{}" {
            value.to_string()
        } else {
            part.to_string()
        }
    });
    let program = parts.next()?;
    let mut args: Vec<String> = parts.collect();
    if !template.split_whitespace().any(|part| part == "{}") {
        args.push(value.to_string());
    }
    Some((program, args))
}

async fn run_template(template: &str, value: &str) -> Result<(), String> {
    let (program, args) = expand_template(template, value)
        .ok_or_else(|| "Empty command template".to_string())?;

    debug!("Running {} {:?}", program, args);
    let output = Command::new(&program)
        .args(&args)
        .output()
        .await
        .map_err(|e| format!("Failed to execute {}: {}", program, e))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(format!("{} failed: {}", program, stderr.trim()));
    }

    Ok(())
}
