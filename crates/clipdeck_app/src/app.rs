// SPDX-License-Identifier: MIT OR Apache-2.0
//! Headless preview application setup and frame loop.

use crate::audio::{MediaDecoder, Speaker};
use crate::loader::FsLoader;
use crate::outline::OutlineSurface;
use crate::preview::LogPreview;
use clipdeck_timeline::{
    format_timecode, load_samples, render_ruler, render_timeline, summarize, Clip, ClipId,
    ClipKind, EditorConfig, FrameScheduler, RulerLayout, SourceRef, SystemTimeSource,
    TickOutcome, TimeSource, TimelineError, TimelineLayout, TimelineSession, TrackId,
    WaveformEnvelope,
};
use std::cell::Cell;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use tokio::time::MissedTickBehavior;

/// Environment variable naming a config file
pub const CONFIG_ENV: &str = "CLIPDECK_CONFIG";

/// Length given to stills, video and undecodable audio
const DEFAULT_CLIP_SECONDS: f64 = 5.0;

/// Host frame cadence
const FRAME_INTERVAL: Duration = Duration::from_micros(16_667);

/// Preview application errors
#[derive(Debug, Error)]
pub enum PreviewError {
    /// Bad command line
    #[error("Invalid arguments: {0}")]
    Usage(String),

    /// Timeline engine error
    #[error(transparent)]
    Timeline(#[from] TimelineError),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for preview operations
pub type Result<T> = std::result::Result<T, PreviewError>;

/// Command line options
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AppOptions {
    /// Config file given with `--config`
    pub config_path: Option<PathBuf>,
    /// Playhead to start from, given with `--start`
    pub start_time: f64,
    /// Media files to place on the timeline
    pub files: Vec<PathBuf>,
}

impl AppOptions {
    /// Usage line
    pub const USAGE: &'static str = "clipdeck [--config FILE] [--start SECONDS] [MEDIA_FILE...]";

    /// Parse arguments, program name excluded
    pub fn parse(args: impl IntoIterator<Item = String>) -> Result<Self> {
        let mut options = Self::default();
        let mut args = args.into_iter();
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--config" => {
                    let path = args
                        .next()
                        .ok_or_else(|| PreviewError::Usage("--config needs a file".into()))?;
                    options.config_path = Some(PathBuf::from(path));
                }
                "--start" => {
                    let value = args
                        .next()
                        .ok_or_else(|| PreviewError::Usage("--start needs seconds".into()))?;
                    options.start_time = value
                        .parse()
                        .map_err(|_| PreviewError::Usage(format!("bad start time: {value}")))?;
                }
                flag if flag.starts_with("--") => {
                    return Err(PreviewError::Usage(format!("unknown option {flag}")));
                }
                _ => options.files.push(PathBuf::from(arg)),
            }
        }
        Ok(options)
    }
}

/// Read the config from `path`, or from [`CONFIG_ENV`], or use defaults
pub fn load_config(path: Option<&Path>) -> Result<EditorConfig> {
    let from_env = std::env::var_os(CONFIG_ENV).map(PathBuf::from);
    let config = match path.map(Path::to_path_buf).or(from_env) {
        Some(path) => EditorConfig::load(&path)?,
        None => EditorConfig::default(),
    };
    tracing::info!("Config: {}", config.to_json_string()?);
    Ok(config)
}

/// Frame requests from the session, consumed by the frame loop
#[derive(Debug, Default)]
pub struct FrameRequests {
    pending: Cell<bool>,
}

impl FrameRequests {
    /// Consume the pending request, if any
    pub fn take(&self) -> bool {
        self.pending.replace(false)
    }
}

impl FrameScheduler for FrameRequests {
    fn request_frame(&mut self) {
        self.pending.set(true);
    }
}

/// Tick the session once per host frame until it stops asking for frames
pub async fn run_frames<T: TimeSource>(
    session: &mut TimelineSession<T, FrameRequests>,
    preview: &mut LogPreview,
) -> Result<f64> {
    let mut interval = tokio::time::interval(FRAME_INTERVAL);
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

    while session.frames().take() {
        interval.tick().await;
        if let TickOutcome::Finished(end) = session.tick(preview)? {
            return Ok(end);
        }
    }
    Ok(session.clock().current_time())
}

/// Headless preview: a timeline session wired to disk, audio and the log
pub struct PreviewApp {
    session: TimelineSession<SystemTimeSource, FrameRequests>,
    preview: LogPreview,
    loader: FsLoader,
    decoder: MediaDecoder,
    speaker: Speaker,
    video_track: TrackId,
    audio_track: TrackId,
    waveforms: HashMap<ClipId, WaveformEnvelope>,
}

impl PreviewApp {
    /// Create an app with empty video and audio tracks
    pub fn new(config: EditorConfig) -> Result<Self> {
        let speaker = Speaker::new(config.volume_gain());
        let mut session =
            TimelineSession::new(config, SystemTimeSource::new(), FrameRequests::default())?;
        let video_track = session.add_track("Video")?;
        let audio_track = session.add_track("Audio")?;
        tracing::info!(audio_output = speaker.is_available(), "Preview ready");

        Ok(Self {
            session,
            preview: LogPreview::new(),
            loader: FsLoader::with_root(std::env::current_dir()?),
            decoder: MediaDecoder::new(),
            speaker,
            video_track,
            audio_track,
            waveforms: HashMap::new(),
        })
    }

    /// Place media files end to end, audio on its own track.
    ///
    /// Returns the number of clips added.
    pub async fn import(&mut self, files: &[PathBuf]) -> Result<usize> {
        let mut added = 0;
        for path in files {
            let Some(kind) = path
                .extension()
                .and_then(|ext| ext.to_str())
                .and_then(ClipKind::from_extension)
            else {
                tracing::warn!(path = %path.display(), "Unsupported file type, skipping");
                continue;
            };

            let source = SourceRef::new(path.to_string_lossy());
            let mut duration = DEFAULT_CLIP_SECONDS;
            let mut envelope = None;
            if kind == ClipKind::Audio {
                match load_samples(&self.loader, &self.decoder, &source).await {
                    Ok(samples) if samples.duration() > 0.0 => {
                        duration = samples.duration();
                        let columns = self.session.config().pixels_per_second * duration;
                        envelope = Some(summarize(samples.first_channel(), columns.ceil() as usize));
                    }
                    Ok(_) => tracing::warn!(path = %path.display(), "Audio file is empty"),
                    Err(e) => tracing::warn!(path = %path.display(), "Could not read audio: {e}"),
                }
            }

            let track = if kind == ClipKind::Audio {
                self.audio_track
            } else {
                self.video_track
            };
            let start = self.track_end(track);
            let label = path
                .file_stem()
                .map(|stem| stem.to_string_lossy().into_owned())
                .unwrap_or_default();
            let data = self
                .session
                .clip_data(track, kind, start, duration, source)
                .with_label(label);
            let id = self.session.add_clip(data)?;

            if let Some(envelope) = envelope {
                tracing::info!(clip = %id, columns = envelope.len(), "Waveform ready");
                self.waveforms.insert(id, envelope);
            }
            added += 1;
        }
        Ok(added)
    }

    /// Two overlapping clips to preview when no files are given
    pub fn add_demo_clips(&mut self) -> Result<()> {
        let intro = self.session.clip_data(
            self.video_track,
            ClipKind::Video,
            0.0,
            5.0,
            SourceRef::new("intro.mp4"),
        );
        let title = self.session.clip_data(
            self.video_track,
            ClipKind::Image,
            3.0,
            4.0,
            SourceRef::new("title.png"),
        );
        self.session.add_clip(intro.with_label("Intro"))?;
        self.session.add_clip(title.with_label("Title card"))?;
        Ok(())
    }

    /// Number of clips on the timeline
    pub fn clip_count(&self) -> usize {
        self.session.registry().clip_count()
    }

    fn track_end(&self, track: TrackId) -> f64 {
        self.session
            .registry()
            .clips()
            .filter(|clip| clip.track == track)
            .map(Clip::end_time)
            .fold(0.0, f64::max)
    }

    fn log_outline(&self) {
        let config = self.session.config();
        let time = self.session.clock().current_time();
        let layout = TimelineLayout::default();
        let mut surface = OutlineSurface::new();
        render_timeline(self.session.registry(), &layout, &self.waveforms, &mut surface, time);
        if let Ok(scale) = config.scale() {
            let ruler = RulerLayout::new(
                scale,
                layout.width,
                layout.ruler_height,
                config.timeline_duration_seconds,
            );
            render_ruler(&ruler, &mut surface);
        }
        surface.log();
    }

    /// Play from `start` to the end of the last clip.
    ///
    /// Audio is scheduled alongside the frame loop; returns the end time.
    pub async fn play_from(&mut self, start: f64) -> Result<f64> {
        self.session.seek(start, &mut self.preview)?;
        self.log_outline();

        let scheduling = self
            .session
            .schedule_audio(&self.loader, &self.decoder, &self.speaker);
        self.session.play();
        let (report, end) = tokio::join!(scheduling, run_frames(&mut self.session, &mut self.preview));
        let end = end?;

        tracing::info!(
            end,
            timecode = %format_timecode(end, self.session.config().frame_rate),
            frames = self.preview.frames(),
            active_at_end = self.preview.highlighted().len(),
            audio_clips = report.scheduled.len(),
            audio_failures = report.failed.len(),
            waveforms = self.waveforms.len(),
            "Playback finished"
        );
        Ok(end)
    }
}

/// Run the preview to completion
pub fn run(options: AppOptions) -> Result<()> {
    let config = load_config(options.config_path.as_deref())?;
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()?;

    runtime.block_on(async {
        let mut app = PreviewApp::new(config)?;
        if options.files.is_empty() {
            app.add_demo_clips()?;
        } else if app.import(&options.files).await? == 0 {
            return Err(PreviewError::Usage("no playable media files given".into()));
        }
        tracing::info!(clips = app.clip_count(), "Timeline built");
        app.play_from(options.start_time).await?;
        Ok(())
    })
}
