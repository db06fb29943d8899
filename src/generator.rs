//! Single-example generation: chord draw, labels, mix, spectrogram.

use crate::builder::ExampleGeneratorBuilder;
use crate::config::GeneratorConfig;
use crate::{Error, Result};
use fretnet_analysis::{SpectrogramImage, SpectrogramRenderer};
use fretnet_core::{
    ChordSpecification, FretLabels, FretPosition, SpecificationSampler, Waveform, FRET_COUNT,
};
use fretnet_sampler::{ChordSynthesizer, SampleStore};
use rand::Rng;

/// One training example. `labels` always describes `specification`, the
/// chord that was mixed into `image`.
#[derive(Debug, Clone, PartialEq)]
pub struct Example {
    pub specification: ChordSpecification,
    pub labels: FretLabels,
    pub image: SpectrogramImage,
}

/// Draws chords and turns them into labelled spectrogram images.
///
/// Holds no per-example state, so one generator can be shared by reference
/// across rayon workers as long as the store is `Sync`.
#[derive(Debug)]
pub struct ExampleGenerator<S> {
    config: GeneratorConfig,
    sampler: SpecificationSampler,
    synth: ChordSynthesizer<S>,
    renderer: SpectrogramRenderer,
}

impl<S: SampleStore> ExampleGenerator<S> {
    pub fn new(store: S, config: GeneratorConfig) -> Result<Self> {
        config.validate()?;
        let renderer = SpectrogramRenderer::new(config.cqt.clone(), config.sample_rate)?;
        Ok(Self {
            sampler: SpecificationSampler::new().with_max_attempts(config.max_draw_attempts),
            synth: ChordSynthesizer::with_sample_rate(store, config.sample_rate),
            renderer,
            config,
        })
    }

    pub fn builder(store: S) -> ExampleGeneratorBuilder<S> {
        ExampleGeneratorBuilder::new(store)
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    pub fn store(&self) -> &S {
        self.synth.store()
    }

    pub fn renderer(&self) -> &SpectrogramRenderer {
        &self.renderer
    }

    /// Samples per example signal.
    pub fn window_len(&self) -> usize {
        Waveform::samples_for(self.config.sample_duration, self.config.sample_rate)
    }

    /// `(height, width, channels)` of every image this generator renders.
    pub fn input_shape(&self) -> (usize, usize, usize) {
        let (height, width) = self.renderer.image_shape(self.window_len());
        (height, width, 1)
    }

    /// Label classes per string: fret 0 through the last fret.
    pub fn output_shape(&self) -> usize {
        FRET_COUNT
    }

    pub fn sample_specification<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<ChordSpecification> {
        Ok(self.sampler.sample(rng)?)
    }

    /// Mixed signal of `specification`, one window long.
    pub fn signal(&self, specification: &ChordSpecification) -> Result<Waveform> {
        Ok(self
            .synth
            .synthesize(specification, self.config.sample_duration)?)
    }

    /// Signal of a single fretted note, one window long.
    pub fn note_signal(&self, position: FretPosition) -> Result<Waveform> {
        Ok(self
            .synth
            .render_note(position, self.config.sample_duration)?)
    }

    /// Draw a chord from `rng` and render it.
    pub fn generate<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<Example> {
        let specification = self.sample_specification(rng)?;
        self.generate_from(specification)
    }

    /// Render a given chord.
    pub fn generate_from(&self, specification: ChordSpecification) -> Result<Example> {
        let labels = FretLabels::from_specification(&specification);
        let signal = self.signal(&specification)?;

        if signal.is_silent() {
            let chord = describe(&specification);
            if self.config.reject_silent {
                return Err(Error::DegenerateSignal { chord });
            }
            tracing::debug!(%chord, "silent mix, rendering blank image");
        }

        let image = self.renderer.render(&signal)?;
        tracing::trace!(notes = specification.len(), "generated example");
        Ok(Example {
            specification,
            labels,
            image,
        })
    }
}

/// `[(string, fret), ...]` for log lines and errors.
fn describe(specification: &ChordSpecification) -> String {
    let pairs: Vec<(usize, usize)> = specification
        .iter()
        .map(|p| (p.string(), p.fret()))
        .collect();
    format!("{:?}", pairs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use fretnet_core::{pitch_frequency, pitch_id, STRING_COUNT};
    use fretnet_sampler::MemorySampleStore;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::f64::consts::PI;

    fn sine_store(sample_rate: u32, len: usize) -> MemorySampleStore {
        MemorySampleStore::from_fretboard(|pos| {
            let freq = pitch_frequency(pos);
            let samples = (0..len)
                .map(|i| (0.5 * (2.0 * PI * freq * i as f64 / sample_rate as f64).sin()) as f32)
                .collect();
            Waveform::new(samples, sample_rate)
        })
    }

    fn generator() -> ExampleGenerator<MemorySampleStore> {
        ExampleGenerator::new(sine_store(44100, 22050), GeneratorConfig::default()).unwrap()
    }

    #[test]
    fn test_shapes() {
        let gen = generator();
        assert_eq!(gen.window_len(), 22050);
        assert_eq!(gen.input_shape(), (120, 44, 1));
        assert_eq!(gen.output_shape(), 23);
    }

    #[test]
    fn test_labels_follow_specification() {
        let gen = generator();
        let mut rng = StdRng::seed_from_u64(3);

        for _ in 0..5 {
            let example = gen.generate(&mut rng).unwrap();
            assert_eq!(example.labels.count(), example.specification.len());
            for pos in &example.specification {
                assert!(example.labels.is_set(*pos));
            }
            assert_eq!(example.image.shape(), (120, 44));
        }
    }

    #[test]
    fn test_missing_recording_propagates() {
        let mut store = sine_store(44100, 22050);
        let pos = FretPosition::new(2, 5).unwrap();
        store.remove(&pitch_id(pos));
        let gen = ExampleGenerator::new(store, GeneratorConfig::default()).unwrap();

        let chord = ChordSpecification::new(vec![pos]).unwrap();
        let err = gen.generate_from(chord).unwrap_err();
        assert!(err.is_missing_asset());
    }

    #[test]
    fn test_silent_mix() {
        let silent = MemorySampleStore::from_fretboard(|_| Waveform::silence(100, 44100));
        let chord = ChordSpecification::from_pairs(&[(1, 2)]).unwrap();

        let gen = ExampleGenerator::new(&silent, GeneratorConfig::default()).unwrap();
        let example = gen.generate_from(chord.clone()).unwrap();
        assert!(example.image.is_blank());
        assert_eq!(example.labels.count(), 1);

        let strict = ExampleGenerator::builder(&silent)
            .reject_silent(true)
            .build()
            .unwrap();
        assert!(matches!(
            strict.generate_from(chord),
            Err(Error::DegenerateSignal { .. })
        ));
    }

    #[test]
    fn test_note_signal_is_window_long() {
        let gen = generator();
        let note = gen
            .note_signal(FretPosition::new(STRING_COUNT - 1, 0).unwrap())
            .unwrap();
        assert_eq!(note.len(), 22050);
        assert!(!note.is_silent());
    }
}
