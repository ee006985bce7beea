//! Intro sound playback.
//!
//! With the `audio` feature the intro sound is decoded and played through the
//! default output device with `rodio`. Without it, or when the file cannot be
//! loaded, the intro runs silently and the failure is logged.
//!
//! ```ignore
//! let mut audio = load_intro_audio(Some(Path::new("intro.mp3")));
//! start_audio(audio.as_mut());
//! ```

use std::path::Path;

use tracing::{debug, info, warn};

use crate::intro::{IntroAudio, NoAudio};

#[cfg(feature = "audio")]
pub use backend::FileAudio;

/// Pick the audio backend for the intro.
///
/// Never fails: a missing file, an unsupported format or a build without
/// audio support all fall back to [`NoAudio`] with a warning.
pub fn load_intro_audio(path: Option<&Path>) -> Box<dyn IntroAudio> {
    let Some(path) = path else {
        debug!("No intro audio configured");
        return Box::new(NoAudio);
    };
    open_file(path)
}

#[cfg(feature = "audio")]
fn open_file(path: &Path) -> Box<dyn IntroAudio> {
    match FileAudio::open(path) {
        Ok(audio) => {
            info!(path = %path.display(), "Loaded intro audio");
            Box::new(audio)
        }
        Err(e) => {
            warn!("Load error: {}: {}", path.display(), e);
            Box::new(NoAudio)
        }
    }
}

#[cfg(not(feature = "audio"))]
fn open_file(path: &Path) -> Box<dyn IntroAudio> {
    if path.is_file() {
        info!(
            path = %path.display(),
            "Intro audio found, but this build has no audio output (enable the `audio` feature)"
        );
    } else {
        warn!("Load error: {}", path.display());
    }
    Box::new(NoAudio)
}

#[cfg(feature = "audio")]
mod backend {
    use std::io::Cursor;
    use std::path::{Path, PathBuf};
    use std::sync::Arc;

    use rodio::{Decoder, OutputStream, Sink};
    use tracing::info;

    use crate::error::AudioError;
    use crate::intro::IntroAudio;

    /// Output stream and sink of a running playback. Dropping the stream
    /// stops the sound, so both live as long as the backend.
    struct Playback {
        _stream: OutputStream,
        sink: Sink,
    }

    /// An audio file held in memory and played once per [`IntroAudio::play`].
    pub struct FileAudio {
        path: PathBuf,
        bytes: Arc<[u8]>,
        playback: Option<Playback>,
    }

    impl FileAudio {
        /// Read `path` and check that it decodes.
        ///
        /// No output device is opened until [`play`](IntroAudio::play), so
        /// this works on machines without sound hardware.
        pub fn open(path: impl AsRef<Path>) -> Result<Self, AudioError> {
            let path = path.as_ref();
            let bytes: Arc<[u8]> = std::fs::read(path)?.into();
            decode(&bytes)?;
            Ok(Self {
                path: path.to_path_buf(),
                bytes,
                playback: None,
            })
        }

        pub fn path(&self) -> &Path {
            &self.path
        }

        /// True while a started sound has not run out.
        pub fn is_playing(&self) -> bool {
            self.playback.as_ref().is_some_and(|p| !p.sink.empty())
        }
    }

    fn decode(bytes: &Arc<[u8]>) -> Result<Decoder<Cursor<Arc<[u8]>>>, AudioError> {
        Decoder::new(Cursor::new(Arc::clone(bytes))).map_err(|e| AudioError::Decode(e.to_string()))
    }

    impl IntroAudio for FileAudio {
        fn play(&mut self) -> Result<(), AudioError> {
            let (stream, handle) =
                OutputStream::try_default().map_err(|e| AudioError::Playback(e.to_string()))?;
            let sink = Sink::try_new(&handle).map_err(|e| AudioError::Playback(e.to_string()))?;
            sink.append(decode(&self.bytes)?);

            info!(path = %self.path.display(), "Intro audio started");
            self.playback = Some(Playback {
                _stream: stream,
                sink,
            });
            Ok(())
        }
    }

    impl std::fmt::Debug for FileAudio {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            f.debug_struct("FileAudio")
                .field("path", &self.path)
                .field("bytes", &self.bytes.len())
                .field("playing", &self.is_playing())
                .finish()
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn test_missing_file_is_io_error() {
            let err = FileAudio::open("does/not/exist.mp3").unwrap_err();
            assert!(matches!(err, AudioError::Io(_)));
        }

        #[test]
        fn test_garbage_is_decode_error() {
            let path = std::env::temp_dir()
                .join(format!("nocturne-garbage-{}.mp3", std::process::id()));
            std::fs::write(&path, b"this is not a sound").expect("write temp file");
            let result = FileAudio::open(&path);
            let _ = std::fs::remove_file(&path);
            assert!(matches!(result, Err(AudioError::Decode(_))));
        }
    }
}
