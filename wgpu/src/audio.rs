use std::time::Duration;

use anyhow::Context;
use rodio::source::SineWave;
use rodio::{OutputStream, OutputStreamHandle, Sink, Source};

const TONE_HZ: f32 = 440.0;
const TONE_LENGTH: Duration = Duration::from_millis(120);
const VOLUME: f32 = 0.2;

pub struct Beeper {
    // dropping the stream stops playback, so it has to live as long as the sink
    _stream: OutputStream,
    _handle: OutputStreamHandle,
    sink: Sink,
}

impl Beeper {
    pub fn new() -> anyhow::Result<Self> {
        let (stream, handle) = OutputStream::try_default().context("open audio output")?;
        let sink = Sink::try_new(&handle).context("create audio sink")?;
        Ok(Self {
            _stream: stream,
            _handle: handle,
            sink,
        })
    }

    pub fn beep(&self) {
        let tone = SineWave::new(TONE_HZ)
            .take_duration(TONE_LENGTH)
            .amplify(VOLUME);
        self.sink.append(tone);
    }
}
