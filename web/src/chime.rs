use wasm_bindgen_futures::JsFuture;
use web_sys::HtmlAudioElement;

/// Short sound played whenever a tile is revealed. Playback is best effort:
/// browsers refuse to play before the first user interaction, and that is fine.
#[derive(Debug)]
pub(crate) struct RevealChime {
    audio: Option<HtmlAudioElement>,
}

impl RevealChime {
    const VOLUME: f64 = 0.8;
    const ASSET: &'static str = "sounds/reveal.mp3";

    pub(crate) fn new(base_path: &str, muted: bool) -> Self {
        if muted {
            log::debug!("reveal chime muted");
            return Self { audio: None };
        }

        let src = asset_url(base_path, Self::ASSET);
        let audio = match HtmlAudioElement::new_with_src(&src) {
            Ok(audio) => {
                audio.set_volume(Self::VOLUME);
                Some(audio)
            }
            Err(err) => {
                log::warn!("could not load {}: {:?}", src, err);
                None
            }
        };
        Self { audio }
    }

    pub(crate) fn play(&self) {
        let Some(audio) = &self.audio else {
            return;
        };

        audio.set_current_time(0.0);
        match audio.play() {
            Ok(promise) => wasm_bindgen_futures::spawn_local(async move {
                if let Err(err) = JsFuture::from(promise).await {
                    log::debug!("chime playback refused: {:?}", err);
                }
            }),
            Err(err) => log::debug!("chime playback failed: {:?}", err),
        }
    }
}

/// Joins a base path prefix and a relative asset path with exactly one slash.
pub(crate) fn asset_url(base_path: &str, asset: &str) -> String {
    let base = base_path.trim_end_matches('/');
    let asset = asset.trim_start_matches('/');
    format!("{}/{}", base, asset)
}
