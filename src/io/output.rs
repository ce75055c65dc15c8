//! Output sinks.
//!
//! Two ways to consume the engine's blocks:
//!   - blocking: [`Engine::run`](crate::engine::Engine::run) writes whole
//!     blocks into any [`AudioSink`]
//!   - callback: [`CpalOutput`] moves the engine into the device callback and
//!     serves whole blocks, re-chunked to whatever length the device asks for

use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

use cpal::{
    traits::{DeviceTrait, HostTrait, StreamTrait},
    BufferSize, Device, FromSample, SampleFormat, SampleRate, SizedSample, Stream, StreamConfig,
    SupportedBufferSize,
};

use crate::{
    engine::Engine,
    error::{EngineError, Result},
};

/// Blocking consumer of interleaved `i16` blocks.
pub trait AudioSink {
    fn write(&mut self, block: &[i16]) -> Result<()>;

    /// Called once after the last block.
    fn close(&mut self) -> Result<()> {
        Ok(())
    }
}

/// Capture everything written.
impl AudioSink for Vec<i16> {
    fn write(&mut self, block: &[i16]) -> Result<()> {
        self.extend_from_slice(block);
        Ok(())
    }
}

/// Running cpal output stream fed by an [`Engine`].
pub struct CpalOutput {
    // playback stops when the stream is dropped
    _stream: Stream,
    running: Arc<AtomicBool>,
    device_name: String,
}

impl CpalOutput {
    /// Open the default output device with the engine's rate, channel count
    /// and block size, then start playing.
    pub fn start(engine: Engine) -> Result<CpalOutput> {
        let host = cpal::default_host();
        let device = host
            .default_output_device()
            .ok_or(EngineError::NoOutputDevice)?;
        let device_name = device.name().unwrap_or_else(|_| "unknown".into());
        let sample_format = device
            .default_output_config()
            .map_err(|e| EngineError::Stream(e.to_string()))?
            .sample_format();

        let config = engine.config();
        let mut stream_config = StreamConfig {
            channels: config.channels,
            sample_rate: SampleRate(config.sample_rate),
            buffer_size: BufferSize::Fixed(config.block_size as u32),
        };
        if !supports_fixed_buffer(&device, &stream_config, sample_format) {
            // the callback re-chunks, so any device buffer length works
            tracing::warn!(
                block_size = config.block_size,
                "fixed buffer size not supported, using device default"
            );
            stream_config.buffer_size = BufferSize::Default;
        }
        let running = engine.running_flag();

        let stream = match sample_format {
            SampleFormat::F32 => build_stream::<f32>(&device, &stream_config, engine)?,
            SampleFormat::I16 => build_stream::<i16>(&device, &stream_config, engine)?,
            SampleFormat::U16 => build_stream::<u16>(&device, &stream_config, engine)?,
            other => {
                return Err(EngineError::Stream(format!(
                    "unsupported sample format {other:?}"
                )))
            }
        };

        stream
            .play()
            .map_err(|e| EngineError::Stream(e.to_string()))?;
        tracing::info!(
            device = %device_name,
            channels = stream_config.channels,
            sample_rate = stream_config.sample_rate.0,
            ?sample_format,
            "output stream started"
        );

        Ok(CpalOutput {
            _stream: stream,
            running,
            device_name,
        })
    }

    pub fn device_name(&self) -> &str {
        &self.device_name
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }
}

/// Engine plus the block currently being handed out to the device.
struct BlockFeeder {
    engine: Engine,
    running: Arc<AtomicBool>,
    block: Vec<i16>,
    offset: usize,
}

impl BlockFeeder {
    fn new(engine: Engine) -> Self {
        let len = engine.block_len();
        Self {
            running: engine.running_flag(),
            engine,
            block: vec![0; len],
            offset: len,
        }
    }

    /// Fill one device buffer. While the engine is stopped the buffer is
    /// silent and the engine does not advance.
    fn fill<T>(&mut self, data: &mut [T])
    where
        T: SizedSample + FromSample<i16>,
    {
        if !self.running.load(Ordering::Acquire) {
            data.fill(T::EQUILIBRIUM);
            return;
        }
        for sample in data.iter_mut() {
            *sample = T::from_sample(self.next_value());
        }
    }

    #[inline]
    fn next_value(&mut self) -> i16 {
        if self.offset == self.block.len() {
            self.engine.process_block(&mut self.block);
            self.offset = 0;
        }
        let value = self.block[self.offset];
        self.offset += 1;
        value
    }
}

fn supports_fixed_buffer(device: &Device, config: &StreamConfig, format: SampleFormat) -> bool {
    let BufferSize::Fixed(frames) = config.buffer_size else {
        return true;
    };
    device
        .supported_output_configs()
        .map(|mut ranges| {
            ranges.any(|range| {
                range.channels() == config.channels
                    && range.sample_format() == format
                    && range.min_sample_rate() <= config.sample_rate
                    && range.max_sample_rate() >= config.sample_rate
                    && matches!(
                        range.buffer_size(),
                        SupportedBufferSize::Range { min, max } if (*min..=*max).contains(&frames)
                    )
            })
        })
        .unwrap_or(false)
}

fn build_stream<T>(device: &Device, config: &StreamConfig, engine: Engine) -> Result<Stream>
where
    T: SizedSample + FromSample<i16>,
{
    let mut feeder = BlockFeeder::new(engine);

    device
        .build_output_stream(
            config,
            move |data: &mut [T], _: &cpal::OutputCallbackInfo| feeder.fill(data),
            |err| tracing::error!(%err, "audio stream error"),
            None,
        )
        .map_err(|e| EngineError::Stream(e.to_string()))
}
