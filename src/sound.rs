//! Audio collaborator: short procedural tones per sound event, scaled by
//! the user's volume settings.  Playback is fire-and-forget through
//! detached rodio sinks; if no output device exists the player degrades
//! to silence instead of failing the game.

use jumper::audio::{SoundEvent, Volumes};

#[cfg(feature = "audio")]
mod imp {
    use jumper::audio::{SoundEvent, Volumes};
    use rodio::buffer::SamplesBuffer;
    use rodio::{OutputStream, OutputStreamHandle, Sink};

    const SAMPLE_RATE: u32 = 44_100;

    pub struct Audio {
        _stream: OutputStream,
        handle: OutputStreamHandle,
    }

    impl Audio {
        pub fn new() -> Option<Self> {
            let (stream, handle) = OutputStream::try_default().ok()?;
            Some(Audio {
                _stream: stream,
                handle,
            })
        }

        pub fn play(&self, event: SoundEvent, volumes: &Volumes) {
            let amp = volumes.effect_volume(event);
            if amp <= 0.0 {
                return;
            }
            let samples = match event {
                SoundEvent::Push => sweep(300.0, 600.0, 0.08, amp),
                SoundEvent::PlayerLanding => sweep(140.0, 140.0, 0.06, amp),
                SoundEvent::EnemyLanding => sweep(180.0, 180.0, 0.05, amp),
                SoundEvent::PlayerDie => sweep(400.0, 60.0, 0.5, amp),
                SoundEvent::EnemyDie => sweep(500.0, 120.0, 0.3, amp),
                SoundEvent::Boom => noise(0.35, amp),
            };
            if let Ok(sink) = Sink::try_new(&self.handle) {
                sink.append(SamplesBuffer::new(1, SAMPLE_RATE, samples));
                sink.detach();
            }
        }
    }

    /// Sine tone sliding from `f0` to `f1` Hz with a linear fade-out.
    fn sweep(f0: f32, f1: f32, duration: f32, amp: f32) -> Vec<f32> {
        let count = (SAMPLE_RATE as f32 * duration) as usize;
        let mut phase = 0.0f32;
        (0..count)
            .map(|i| {
                let t = i as f32 / count as f32;
                let freq = f0 + (f1 - f0) * t;
                phase += std::f32::consts::TAU * freq / SAMPLE_RATE as f32;
                phase.sin() * amp * (1.0 - t)
            })
            .collect()
    }

    /// Decaying white-ish noise burst (xorshift source).
    fn noise(duration: f32, amp: f32) -> Vec<f32> {
        let count = (SAMPLE_RATE as f32 * duration) as usize;
        let mut state = 0x9E37_79B9u32;
        (0..count)
            .map(|i| {
                state ^= state << 13;
                state ^= state >> 17;
                state ^= state << 5;
                let t = i as f32 / count as f32;
                let s = (state as f32 / u32::MAX as f32) * 2.0 - 1.0;
                s * amp * (1.0 - t) * (1.0 - t)
            })
            .collect()
    }
}

pub struct SoundPlayer {
    #[cfg(feature = "audio")]
    inner: Option<imp::Audio>,
}

impl SoundPlayer {
    pub fn new() -> Self {
        SoundPlayer {
            #[cfg(feature = "audio")]
            inner: imp::Audio::new(),
        }
    }

    #[cfg_attr(not(feature = "audio"), allow(unused_variables))]
    pub fn play(&self, event: SoundEvent, volumes: &Volumes) {
        #[cfg(feature = "audio")]
        if let Some(audio) = &self.inner {
            audio.play(event, volumes);
        }
    }
}
