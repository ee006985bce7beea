//! Intro sequence played over the scene at startup.
//!
//! The intro is a fixed timeline measured from the moment the viewer starts:
//!
//! | time    | event                                  |
//! |---------|----------------------------------------|
//! | 500 ms  | overlay starts fading out, audio starts |
//! | 1000 ms | intro text becomes visible             |
//! | 4000 ms | intro text is hidden again             |
//! | 5000 ms | overlay and text are removed for good  |
//!
//! [`IntroSequence::advance`] is fed the elapsed time every frame and hands
//! back the events crossed since the previous call. Frame pacing does not
//! matter: a long frame that jumps over several timestamps reports all of
//! them, in order, and no event is ever reported twice.

use std::time::Duration;
use tracing::{info, warn};

use crate::error::AudioError;

/// Seconds the overlay takes to fade from opaque to transparent.
pub const OVERLAY_FADE_SECONDS: f32 = 1.0;

/// Fade in and out time of the on-screen caption.
pub const CAPTION_FADE_SECONDS: f32 = 0.5;

/// How long the intro text stays up.
pub const TEXT_VISIBLE_DURATION: Duration = Duration::from_millis(3000);

/// Something that happens at a fixed point of the intro.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntroEvent {
    /// Start fading the overlay out.
    FadeOutOverlay,
    /// Start the intro audio.
    StartAudio,
    ShowText,
    HideText,
    /// Remove overlay and text.
    Finish,
}

/// When each intro event fires, measured from start.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IntroTimeline {
    pub fade_overlay_at: Duration,
    pub show_text_at: Duration,
    pub hide_text_at: Duration,
    pub finish_at: Duration,
}

impl Default for IntroTimeline {
    fn default() -> Self {
        let show_text_at = Duration::from_millis(1000);
        let hide_text_at = show_text_at + TEXT_VISIBLE_DURATION;
        Self {
            fade_overlay_at: Duration::from_millis(500),
            show_text_at,
            hide_text_at,
            finish_at: hide_text_at + Duration::from_millis(1000),
        }
    }
}

impl IntroTimeline {
    /// Events in firing order.
    fn schedule(&self) -> [(Duration, IntroEvent); 5] {
        [
            (self.fade_overlay_at, IntroEvent::FadeOutOverlay),
            (self.fade_overlay_at, IntroEvent::StartAudio),
            (self.show_text_at, IntroEvent::ShowText),
            (self.hide_text_at, IntroEvent::HideText),
            (self.finish_at, IntroEvent::Finish),
        ]
    }
}

/// State of the intro: which events have fired and what is on screen.
#[derive(Debug, Clone)]
pub struct IntroSequence {
    timeline: IntroTimeline,
    text: String,
    next_event: usize,
    elapsed: Duration,
    fade_started: bool,
    text_visible: bool,
    text_hidden: bool,
    finished: bool,
}

impl IntroSequence {
    /// A fresh intro with the stock timeline.
    pub fn new(text: impl Into<String>) -> Self {
        Self::with_timeline(text, IntroTimeline::default())
    }

    pub fn with_timeline(text: impl Into<String>, timeline: IntroTimeline) -> Self {
        Self {
            timeline,
            text: text.into(),
            next_event: 0,
            elapsed: Duration::ZERO,
            fade_started: false,
            text_visible: false,
            text_hidden: false,
            finished: false,
        }
    }

    /// An intro that has already finished. Used when the intro is disabled.
    pub fn skipped() -> Self {
        let mut intro = Self::new(String::new());
        intro.next_event = intro.timeline.schedule().len();
        intro.fade_started = true;
        intro.finished = true;
        intro
    }

    /// Move to `elapsed` (time since start) and return the events crossed.
    ///
    /// Time never runs backwards here: an earlier `elapsed` than the last
    /// call is treated as no progress.
    pub fn advance(&mut self, elapsed: Duration) -> Vec<IntroEvent> {
        self.elapsed = self.elapsed.max(elapsed);

        let schedule = self.timeline.schedule();
        let mut fired = Vec::new();
        while let Some(&(at, event)) = schedule.get(self.next_event) {
            if at > self.elapsed {
                break;
            }
            self.apply(event);
            fired.push(event);
            self.next_event += 1;
        }
        fired
    }

    fn apply(&mut self, event: IntroEvent) {
        match event {
            IntroEvent::FadeOutOverlay => self.fade_started = true,
            IntroEvent::StartAudio => {}
            IntroEvent::ShowText => self.text_visible = true,
            IntroEvent::HideText => {
                self.text_visible = false;
                self.text_hidden = true;
            }
            IntroEvent::Finish => {
                self.fade_started = true;
                self.text_visible = false;
                self.finished = true;
                info!("Intro elements hidden.");
            }
        }
    }

    /// Opacity of the black overlay, 1 before the fade and 0 once it is done.
    pub fn overlay_opacity(&self) -> f32 {
        if self.finished {
            return 0.0;
        }
        if !self.fade_started {
            return 1.0;
        }
        let since_fade = self.elapsed.saturating_sub(self.timeline.fade_overlay_at);
        let progress = since_fade.as_secs_f32() / OVERLAY_FADE_SECONDS;
        (1.0 - progress).clamp(0.0, 1.0)
    }

    /// Opacity of the on-screen caption: fades in after the text is shown
    /// and out after it is hidden, over [`CAPTION_FADE_SECONDS`] each.
    pub fn caption_opacity(&self) -> f32 {
        if self.finished {
            return 0.0;
        }
        let since = |at: Duration| self.elapsed.saturating_sub(at).as_secs_f32();
        if self.text_visible {
            (since(self.timeline.show_text_at) / CAPTION_FADE_SECONDS).clamp(0.0, 1.0)
        } else if self.text_hidden {
            (1.0 - since(self.timeline.hide_text_at) / CAPTION_FADE_SECONDS).clamp(0.0, 1.0)
        } else {
            0.0
        }
    }

    #[inline]
    pub fn text_visible(&self) -> bool {
        self.text_visible
    }

    /// The intro text, if it is currently shown.
    pub fn visible_text(&self) -> Option<&str> {
        self.text_visible.then_some(self.text.as_str())
    }

    #[inline]
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn timeline(&self) -> &IntroTimeline {
        &self.timeline
    }
}

/// Audio played when the overlay starts fading.
pub trait IntroAudio {
    fn play(&mut self) -> Result<(), AudioError>;
}

/// Backend for builds without audio output.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoAudio;

impl IntroAudio for NoAudio {
    fn play(&mut self) -> Result<(), AudioError> {
        Err(AudioError::Unavailable)
    }
}

/// Start intro audio. Failures are logged and otherwise ignored.
pub fn start_audio(audio: &mut dyn IntroAudio) -> bool {
    match audio.play() {
        Ok(()) => true,
        Err(e) => {
            warn!("Audio playback failed: {}", e);
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(millis: u64) -> Duration {
        Duration::from_millis(millis)
    }

    #[test]
    fn test_default_timeline() {
        let timeline = IntroTimeline::default();
        assert_eq!(timeline.fade_overlay_at, ms(500));
        assert_eq!(timeline.show_text_at, ms(1000));
        assert_eq!(timeline.hide_text_at, ms(4000));
        assert_eq!(timeline.finish_at, ms(5000));
    }

    #[test]
    fn test_events_in_order_at_frame_rate() {
        let mut intro = IntroSequence::new("Nocturne");
        let mut all = Vec::new();
        for frame in 0..400 {
            all.extend(intro.advance(ms(frame * 16)));
        }
        assert_eq!(
            all,
            vec![
                IntroEvent::FadeOutOverlay,
                IntroEvent::StartAudio,
                IntroEvent::ShowText,
                IntroEvent::HideText,
                IntroEvent::Finish,
            ]
        );
        assert!(intro.is_finished());
    }

    #[test]
    fn test_single_long_frame_fires_everything_once() {
        let mut intro = IntroSequence::new("Nocturne");
        assert_eq!(intro.advance(ms(10_000)).len(), 5);
        assert!(intro.advance(ms(20_000)).is_empty());
    }

    #[test]
    fn test_nothing_before_first_event() {
        let mut intro = IntroSequence::new("Nocturne");
        assert!(intro.advance(ms(499)).is_empty());
        assert_eq!(intro.overlay_opacity(), 1.0);
        assert_eq!(
            intro.advance(ms(500)),
            vec![IntroEvent::FadeOutOverlay, IntroEvent::StartAudio]
        );
    }

    #[test]
    fn test_overlay_fades_linearly() {
        let mut intro = IntroSequence::new("Nocturne");
        intro.advance(ms(1000));
        assert!((intro.overlay_opacity() - 0.5).abs() < 1e-4);
        intro.advance(ms(1500));
        assert_eq!(intro.overlay_opacity(), 0.0);
    }

    #[test]
    fn test_text_visibility() {
        let mut intro = IntroSequence::new("Nocturne");
        intro.advance(ms(900));
        assert_eq!(intro.visible_text(), None);
        intro.advance(ms(1000));
        assert_eq!(intro.visible_text(), Some("Nocturne"));
        intro.advance(ms(3999));
        assert!(intro.text_visible());
        intro.advance(ms(4000));
        assert!(!intro.text_visible());
    }

    #[test]
    fn test_caption_fades_in_and_out() {
        let mut intro = IntroSequence::new("Nocturne");
        intro.advance(ms(999));
        assert_eq!(intro.caption_opacity(), 0.0);
        intro.advance(ms(1250));
        assert!((intro.caption_opacity() - 0.5).abs() < 1e-4);
        intro.advance(ms(2000));
        assert_eq!(intro.caption_opacity(), 1.0);
        intro.advance(ms(4250));
        assert!(!intro.text_visible());
        assert!((intro.caption_opacity() - 0.5).abs() < 1e-4);
        intro.advance(ms(4600));
        assert_eq!(intro.caption_opacity(), 0.0);
        intro.advance(ms(5000));
        assert_eq!(intro.caption_opacity(), 0.0);
    }

    #[test]
    fn test_custom_timeline() {
        let timeline = IntroTimeline {
            fade_overlay_at: ms(0),
            show_text_at: ms(100),
            hide_text_at: ms(200),
            finish_at: ms(300),
        };
        let mut intro = IntroSequence::with_timeline("Quick", timeline);
        assert_eq!(intro.timeline(), &timeline);
        assert_eq!(intro.advance(ms(0)).len(), 2);
        assert_eq!(intro.advance(ms(150)), vec![IntroEvent::ShowText]);
        assert_eq!(intro.visible_text(), Some("Quick"));
        assert_eq!(intro.advance(ms(300)).len(), 2);
        assert!(intro.is_finished());
    }

    #[test]
    fn test_time_does_not_run_backwards() {
        let mut intro = IntroSequence::new("Nocturne");
        intro.advance(ms(1200));
        assert!(intro.advance(ms(100)).is_empty());
        assert!(intro.text_visible());
    }

    #[test]
    fn test_skipped() {
        let mut intro = IntroSequence::skipped();
        assert!(intro.is_finished());
        assert_eq!(intro.overlay_opacity(), 0.0);
        assert!(intro.advance(ms(10_000)).is_empty());
    }

    #[test]
    fn test_no_audio_is_not_fatal() {
        assert!(!start_audio(&mut NoAudio));

        struct Silent;
        impl IntroAudio for Silent {
            fn play(&mut self) -> Result<(), AudioError> {
                Ok(())
            }
        }
        assert!(start_audio(&mut Silent));
    }
}
