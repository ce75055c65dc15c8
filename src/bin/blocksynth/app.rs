//! App - engine setup and the stdin command loop

use std::{
    collections::HashSet,
    io::{self, BufRead, Write},
    sync::Arc,
    time::Instant,
};

use color_eyre::eyre::{eyre, Result, WrapErr};

use blocksynth::{
    io::{midi, CpalOutput, MidiInput},
    synth::NoteTable,
    Engine, EngineConfig, EngineHandle,
};

use crate::{session, Args};

const HELP: &str = "\
commands:
  p          play
  s          stop (output goes silent, position holds)
  P          reset to loop start
  a          add a transient track at the current position
  d          remove added tracks
  g          print position
  b <bpm>    change tempo
  n <note>   toggle a note, e.g. `n a4`
  h          help
  q          quit
  (empty line repeats the previous command)";

pub fn list_midi_ports() -> Result<()> {
    let ports = midi::list_ports().wrap_err("failed to query MIDI inputs")?;
    if ports.is_empty() {
        println!("no MIDI input ports");
    }
    for (index, name) in ports.iter().enumerate() {
        println!("{index}: {name}");
    }
    Ok(())
}

pub struct App {
    handle: EngineHandle,
    engine: Option<Engine>,
    output: Option<CpalOutput>,
    _midi: Option<MidiInput>,
    initial_tracks: usize,
    held_notes: HashSet<u8>,
    notes: Arc<NoteTable>,
    started: Instant,
}

impl App {
    pub fn new(args: &Args) -> Result<Self> {
        let config = EngineConfig {
            sample_rate: args.sample_rate,
            block_size: args.block_size,
            channels: args.channels,
            bpm: args.bpm,
            ..Default::default()
        };

        let (mut engine, handle) = Engine::new(config.clone()).wrap_err("invalid settings")?;
        if args.no_metronome {
            engine = engine.without_metronome();
        }

        let tracks = session::initial_tracks(&config)?;
        let initial_tracks = tracks.len();
        for track in tracks {
            engine.add_track(track);
        }

        // A missing MIDI port is not fatal: keep playing without it.
        let midi = match args.midi_port {
            Some(port) => {
                match MidiInput::connect(port, args.midi_channel, engine.note_sender()) {
                    Ok(input) => {
                        println!("MIDI input: {}", input.port_name());
                        Some(input)
                    }
                    Err(err) => {
                        tracing::warn!(%err, "continuing without MIDI input");
                        None
                    }
                }
            }
            None => None,
        };

        println!("=== blocksynth ===");
        println!("BPM: {}", config.bpm);
        println!("Sample rate: {} Hz", config.sample_rate);
        println!("Block size: {} frames", config.block_size);
        println!("Channels: {}", config.channels);
        println!();

        Ok(Self {
            handle,
            engine: Some(engine),
            output: None,
            _midi: midi,
            initial_tracks,
            held_notes: HashSet::new(),
            notes: NoteTable::shared(),
            started: Instant::now(),
        })
    }

    pub fn run(mut self) -> Result<()> {
        println!("{HELP}");
        let stdin = io::stdin();
        let mut last = String::new();

        loop {
            print!("-> ");
            io::stdout().flush()?;

            let mut line = String::new();
            if stdin.lock().read_line(&mut line)? == 0 {
                break;
            }
            let line = line.trim();
            let command = if line.is_empty() {
                last.clone()
            } else {
                last = line.to_string();
                line.to_string()
            };

            match self.execute(&command) {
                Ok(true) => {}
                Ok(false) => break,
                Err(err) => println!("error: {err:#}"),
            }
        }

        self.handle.stop();
        println!("Bye!!!");
        Ok(())
    }

    /// Returns `false` to quit.
    fn execute(&mut self, command: &str) -> Result<bool> {
        let mut parts = command.split_whitespace();
        let Some(key) = parts.next() else {
            return Ok(true);
        };

        match key {
            "p" => self.play()?,
            "s" => {
                self.handle.stop();
                println!("stopped");
            }
            "P" => self.handle.reset_all()?,
            "a" => self.handle.add_transient_track()?,
            "d" => self.handle.prune_tracks(self.initial_tracks)?,
            "g" => println!(
                "{} frames, {:.3} secs",
                self.handle.position(),
                self.started.elapsed().as_secs_f64()
            ),
            "b" => {
                let bpm: f64 = parts
                    .next()
                    .ok_or_else(|| eyre!("usage: b <bpm>"))?
                    .parse()
                    .wrap_err("bpm must be a number")?;
                self.handle.set_bpm(bpm)?;
            }
            "n" => {
                let name = parts.next().ok_or_else(|| eyre!("usage: n <note>"))?;
                let note = self
                    .notes
                    .note_from_name(name)
                    .ok_or_else(|| eyre!("unknown note {name}"))?;
                if self.held_notes.remove(&note) {
                    self.handle.note_off(note)?;
                } else {
                    self.handle.note_on(note, 100)?;
                    self.held_notes.insert(note);
                }
            }
            "h" => println!("{HELP}"),
            "q" => return Ok(false),
            other => println!("unknown command {other:?}, `h` for help"),
        }
        Ok(true)
    }

    fn play(&mut self) -> Result<()> {
        self.handle.resume();
        if self.output.is_some() {
            return Ok(());
        }

        let engine = self
            .engine
            .take()
            .ok_or_else(|| eyre!("audio output was lost"))?;
        let output = CpalOutput::start(engine).wrap_err("failed to open audio output")?;
        println!("Playing on {}", output.device_name());
        self.output = Some(output);
        self.started = Instant::now();
        Ok(())
    }
}
