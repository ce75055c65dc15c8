//! Engine - owns every audio-thread object and feeds blocks to a sink
//!
//! ```text
//!   control thread                     audio thread
//!   ──────────────                     ────────────
//!   EngineHandle ──EngineMessage──▶ rtrb ──▶ Engine::process_block
//!   MIDI thread  ──SynthMessage───▶ rtrb ──▶   ├─ drain queues
//!                                              ├─ Mixer (tracks + metronome + voices)
//!        position ◀── AtomicU64 ◀─────────────┘
//!        stop()   ──▶ AtomicBool ──▶ Engine::run checks once per block
//! ```
//!
//! Queues are drained only between blocks, so a block is always rendered
//! against one consistent set of tracks, voices and tempo.

use std::sync::{
    atomic::{AtomicBool, AtomicU64, Ordering},
    Arc,
};

use rtrb::{Consumer, Producer, RingBuffer};

use crate::{
    config::{validate_bpm, EngineConfig},
    error::{EngineError, Result},
    graph::oscillator::Oscillator,
    io::output::AudioSink,
    runtime::{BlockSource, Metronome, Mixer, TimeLine, Track, TrackWindow},
    synth::{
        factory::{triangle_pad, VoiceFactory},
        message::SynthMessage,
        notes::NoteTable,
        poly::VoiceScheduler,
    },
};

/// Capacity of each control queue.
pub const COMMAND_QUEUE_CAPACITY: usize = 256;

/// Pitch of tracks added with [`EngineHandle::add_transient_track`].
pub const TRANSIENT_FREQUENCY: f32 = 723.0;
/// Output latency compensated when placing a transient track, in blocks plus
/// a fixed frame offset.
const LATENCY_BLOCKS: u64 = 8;
const LATENCY_FRAMES: u64 = 480;

/// Control-plane commands, applied between blocks.
pub enum EngineMessage {
    Note(SynthMessage),
    SetBpm(f64),
    AddTrack(Track),
    PruneTracks(usize),
    ResetAll,
}

pub struct Engine {
    config: EngineConfig,
    mixer: Mixer,
    timeline: TimeLine,
    metronome: Option<Metronome>,
    voices: VoiceScheduler,
    commands: Consumer<EngineMessage>,
    note_queues: Vec<Consumer<SynthMessage>>,
    position: Arc<AtomicU64>,
    running: Arc<AtomicBool>,
}

impl Engine {
    /// Validate `config` and build the engine plus its control handle.
    ///
    /// Voices use [`triangle_pad`] until another factory is set.
    pub fn new(config: EngineConfig) -> Result<(Engine, EngineHandle)> {
        config.validate()?;

        let sample_rate = config.sample_rate as f32;
        let metronome = Metronome::new(sample_rate, config.block_size, config.bpm)?;
        let voices = VoiceScheduler::new(
            triangle_pad(sample_rate),
            NoteTable::shared(),
            config.max_voices,
        );
        let (producer, consumer) = RingBuffer::new(COMMAND_QUEUE_CAPACITY);
        let position = Arc::new(AtomicU64::new(0));
        let running = Arc::new(AtomicBool::new(true));

        let handle = EngineHandle {
            commands: producer,
            position: position.clone(),
            running: running.clone(),
            block_size: config.block_size as u64,
            sample_rate,
        };

        tracing::info!(
            sample_rate = config.sample_rate,
            block_size = config.block_size,
            channels = config.channels,
            bpm = config.bpm,
            "engine created"
        );

        let engine = Engine {
            mixer: Mixer::new(config.channels),
            timeline: TimeLine::new(config.timeline_length),
            metronome: Some(metronome),
            voices,
            commands: consumer,
            note_queues: Vec::new(),
            position,
            running,
            config,
        };
        Ok((engine, handle))
    }

    pub fn with_voice_factory<F: VoiceFactory + 'static>(mut self, factory: F) -> Self {
        self.voices = VoiceScheduler::new(factory, NoteTable::shared(), self.config.max_voices);
        self
    }

    pub fn without_metronome(mut self) -> Self {
        self.metronome = None;
        self
    }

    /// Add a track before playback starts. Once the engine runs, use
    /// [`EngineHandle::add_track`].
    pub fn add_track(&mut self, track: Track) {
        self.mixer.add_track(track);
    }

    /// Open an extra note-only queue, e.g. for a MIDI input thread.
    pub fn note_sender(&mut self) -> Producer<SynthMessage> {
        let (producer, consumer) = RingBuffer::new(COMMAND_QUEUE_CAPACITY);
        self.note_queues.push(consumer);
        producer
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Interleaved values per block.
    pub fn block_len(&self) -> usize {
        self.config.block_size * usize::from(self.config.channels)
    }

    pub fn track_count(&self) -> usize {
        self.mixer.len()
    }

    pub fn voice_count(&self) -> usize {
        self.voices.voice_count()
    }

    pub fn metronome(&self) -> Option<&Metronome> {
        self.metronome.as_ref()
    }

    pub fn position(&self) -> u64 {
        self.timeline.position()
    }

    pub(crate) fn running_flag(&self) -> Arc<AtomicBool> {
        self.running.clone()
    }

    /// Apply queued commands, then render one block of `block_len()` values.
    pub fn process_block(&mut self, out: &mut [i16]) {
        while let Ok(msg) = self.commands.pop() {
            self.apply(msg);
        }
        for queue in self.note_queues.iter_mut() {
            self.voices.drain(queue);
        }

        let voices: &mut dyn BlockSource = &mut self.voices;
        match self.metronome.as_mut() {
            Some(metronome) => {
                let metronome: &mut dyn BlockSource = metronome;
                let mut sources = [metronome, voices];
                self.mixer.next_block_with(&mut self.timeline, &mut sources, out);
            }
            None => self.mixer.next_block_with(&mut self.timeline, &mut [voices], out),
        }

        self.position.store(self.timeline.position(), Ordering::Release);
    }

    /// Blocking production loop. Writes whole blocks until [`EngineHandle::stop`]
    /// is called, then closes the sink.
    pub fn run<S: AudioSink + ?Sized>(&mut self, sink: &mut S) -> Result<()> {
        let mut block = vec![0i16; self.block_len()];
        tracing::info!("engine running");

        while self.running.load(Ordering::Acquire) {
            self.process_block(&mut block);
            sink.write(&block)?;
        }

        sink.close()?;
        tracing::info!(position = self.timeline.position(), "engine stopped");
        Ok(())
    }

    fn apply(&mut self, msg: EngineMessage) {
        match msg {
            EngineMessage::Note(note) => self.voices.handle(note),
            EngineMessage::SetBpm(bpm) => {
                if let Some(metronome) = self.metronome.as_mut() {
                    if let Err(err) = metronome.set_bpm(bpm) {
                        tracing::warn!(%err, "tempo change rejected");
                    }
                }
            }
            EngineMessage::AddTrack(track) => self.mixer.add_track(track),
            EngineMessage::PruneTracks(keep) => {
                self.mixer.prune_tracks(keep);
                self.reset_extras();
                self.timeline.reset();
            }
            EngineMessage::ResetAll => {
                self.mixer.reset_all();
                self.reset_extras();
                self.timeline.reset();
            }
        }
    }

    fn reset_extras(&mut self) {
        if let Some(metronome) = self.metronome.as_mut() {
            metronome.reset();
        }
    }
}

/// Control-thread side of an [`Engine`].
///
/// Every method validates its input before queuing; a full queue is reported
/// as [`EngineError::QueueFull`] and the command is dropped.
pub struct EngineHandle {
    commands: Producer<EngineMessage>,
    position: Arc<AtomicU64>,
    running: Arc<AtomicBool>,
    block_size: u64,
    sample_rate: f32,
}

impl EngineHandle {
    pub fn note_on(&mut self, note: u8, velocity: u8) -> Result<()> {
        self.send(EngineMessage::Note(SynthMessage::NoteOn { note, velocity }))
    }

    pub fn note_off(&mut self, note: u8) -> Result<()> {
        self.send(EngineMessage::Note(SynthMessage::NoteOff { note, velocity: 0 }))
    }

    pub fn all_notes_off(&mut self) -> Result<()> {
        self.send(EngineMessage::Note(SynthMessage::AllNotesOff))
    }

    pub fn set_bpm(&mut self, bpm: f64) -> Result<()> {
        validate_bpm(bpm)?;
        self.send(EngineMessage::SetBpm(bpm))?;
        tracing::info!(bpm, "tempo change queued");
        Ok(())
    }

    pub fn add_track(&mut self, track: Track) -> Result<()> {
        self.send(EngineMessage::AddTrack(track))
    }

    /// Queue a short 723 Hz blip placed at the current position (minus the
    /// output latency) inside a 192-block loop. The track stays parked until
    /// the next reset of the timeline.
    pub fn add_transient_track(&mut self) -> Result<()> {
        let position = self.position();
        let length = 192 * self.block_size;
        let start = (position + LATENCY_FRAMES)
            .saturating_sub(LATENCY_BLOCKS * self.block_size)
            % length;
        let stop = (start + 3 * self.block_size).min(length);

        let window = TrackWindow::new(start, stop, length, true)?;
        let blip = Oscillator::sine(TRANSIENT_FREQUENCY, self.sample_rate);
        let track = Track::windowed(blip, window)?.inactive();
        self.add_track(track)?;
        tracing::info!(position, start, stop, "transient track queued");
        Ok(())
    }

    pub fn prune_tracks(&mut self, keep: usize) -> Result<()> {
        self.send(EngineMessage::PruneTracks(keep))
    }

    pub fn reset_all(&mut self) -> Result<()> {
        self.send(EngineMessage::ResetAll)
    }

    /// Timeline position after the most recent block, in frames.
    pub fn position(&self) -> u64 {
        self.position.load(Ordering::Acquire)
    }

    /// Ask the engine to stop after the block in flight.
    pub fn stop(&self) {
        self.running.store(false, Ordering::Release);
    }

    /// Resume after [`stop`](Self::stop) (output adapters render silence while
    /// stopped).
    pub fn resume(&self) {
        self.running.store(true, Ordering::Release);
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }

    fn send(&mut self, msg: EngineMessage) -> Result<()> {
        self.commands.push(msg).map_err(|_| EngineError::QueueFull)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::node::{Sample, SignalSource};

    struct Constant(f32);

    impl SignalSource for Constant {
        fn next_sample(&mut self) -> Sample {
            Sample::Mono(self.0)
        }
    }

    fn quiet_config() -> EngineConfig {
        EngineConfig {
            block_size: 64,
            timeline_length: Some(640),
            ..Default::default()
        }
    }

    /// Stops the engine after a fixed number of blocks.
    struct CountingSink {
        blocks: Vec<Vec<i16>>,
        limit: usize,
        handle: Arc<AtomicBool>,
        closed: bool,
    }

    impl AudioSink for CountingSink {
        fn write(&mut self, block: &[i16]) -> Result<()> {
            self.blocks.push(block.to_vec());
            if self.blocks.len() >= self.limit {
                self.handle.store(false, Ordering::Release);
            }
            Ok(())
        }

        fn close(&mut self) -> Result<()> {
            self.closed = true;
            Ok(())
        }
    }

    #[test]
    fn rejects_invalid_config() {
        let config = EngineConfig {
            channels: 5,
            ..Default::default()
        };
        assert!(matches!(
            Engine::new(config),
            Err(EngineError::InvalidConfig(_))
        ));
    }

    #[test]
    fn commands_apply_between_blocks() {
        let (engine, mut handle) = Engine::new(quiet_config()).unwrap();
        let mut engine = engine.without_metronome();
        let mut block = vec![0i16; engine.block_len()];

        engine.process_block(&mut block);
        assert!(block.iter().all(|&v| v == 0));
        assert_eq!(handle.position(), 64);

        handle.add_track(Track::new(Constant(0.5))).unwrap();
        assert_eq!(engine.track_count(), 0);
        engine.process_block(&mut block);
        assert_eq!(engine.track_count(), 1);
        assert!(block.iter().all(|&v| v == (0.5 * 32767.0) as i16));

        handle.prune_tracks(0).unwrap();
        engine.process_block(&mut block);
        assert_eq!(engine.track_count(), 0);
        assert_eq!(handle.position(), 64);
    }

    #[test]
    fn invalid_bpm_is_rejected_at_the_handle() {
        let (mut engine, mut handle) = Engine::new(quiet_config()).unwrap();
        assert!(matches!(
            handle.set_bpm(0.0),
            Err(EngineError::InvalidBpm { .. })
        ));

        handle.set_bpm(90.0).unwrap();
        let mut block = vec![0i16; engine.block_len()];
        engine.process_block(&mut block);
        assert_eq!(engine.metronome().map(Metronome::bpm), Some(90.0));
    }

    #[test]
    fn full_queue_reports_error() {
        let (_engine, mut handle) = Engine::new(quiet_config()).unwrap();
        for _ in 0..COMMAND_QUEUE_CAPACITY {
            handle.reset_all().unwrap();
        }
        assert!(matches!(handle.reset_all(), Err(EngineError::QueueFull)));
    }

    #[test]
    fn notes_reach_the_voice_scheduler() {
        let (mut engine, mut handle) = Engine::new(quiet_config()).unwrap();
        let mut midi = engine.note_sender();
        let mut block = vec![0i16; engine.block_len()];

        handle.note_on(60, 100).unwrap();
        midi.push(SynthMessage::NoteOn { note: 64, velocity: 100 }).unwrap();
        engine.process_block(&mut block);
        assert_eq!(engine.voice_count(), 2);

        handle.all_notes_off().unwrap();
        for _ in 0..4 {
            engine.process_block(&mut block);
        }
        assert_eq!(engine.voice_count(), 0);
    }

    #[test]
    fn run_stops_on_whole_block_and_closes_sink() {
        let (mut engine, handle) = Engine::new(quiet_config()).unwrap();
        let mut sink = CountingSink {
            blocks: Vec::new(),
            limit: 5,
            handle: engine.running_flag(),
            closed: false,
        };

        engine.run(&mut sink).unwrap();
        assert_eq!(sink.blocks.len(), 5);
        assert!(sink.blocks.iter().all(|b| b.len() == 64));
        assert!(sink.closed);
        assert!(!handle.is_running());
        assert_eq!(handle.position(), 5 * 64);
    }

    #[test]
    fn stopped_engine_writes_nothing() {
        let (mut engine, handle) = Engine::new(quiet_config()).unwrap();
        handle.stop();
        let mut captured: Vec<i16> = Vec::new();
        engine.run(&mut captured).unwrap();
        assert!(captured.is_empty());
    }

    #[test]
    fn transient_track_waits_for_timeline_wrap() {
        let (engine, mut handle) = Engine::new(quiet_config()).unwrap();
        let mut engine = engine.without_metronome();
        let mut block = vec![0i16; engine.block_len()];

        handle.add_transient_track().unwrap();
        engine.process_block(&mut block);
        assert_eq!(engine.track_count(), 1);
        assert!(block.iter().all(|&v| v == 0));
    }
}
