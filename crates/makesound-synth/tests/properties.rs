//! Property-based tests for the note policy and voice rendering.

use makesound_synth::policy::{
    DEFAULT_ENVELOPE, delay_length_samples, draw_oscillator_mask, shape_envelope,
};
use makesound_synth::{MultiOscVoice, PulseVoice, SeededRandom, Voice, VoiceState};
use proptest::prelude::*;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Every drawn mask has at least one oscillator, and the count matches
    /// the enabled flags.
    #[test]
    fn mask_is_never_silent(note in 0u8..=127, seed in any::<u64>()) {
        let mut rng = SeededRandom::new(seed);
        let mask = draw_oscillator_mask(note, &mut rng);
        let flags = u32::from(mask.triangle()) + u32::from(mask.sine()) + u32::from(mask.square());
        prop_assert!(mask.count() >= 1);
        prop_assert_eq!(mask.count(), flags);
    }

    /// Delay length never decreases as velocity rises.
    #[test]
    fn delay_length_is_monotonic(
        a in 0.0f32..=1.0,
        b in 0.0f32..=1.0,
        sample_rate in prop::sample::select(vec![22050.0f32, 44100.0, 48000.0, 96000.0]),
    ) {
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        let lo_len = delay_length_samples(lo, sample_rate);
        let hi_len = delay_length_samples(hi, sample_rate);
        prop_assert!(lo_len <= hi_len);
        prop_assert!(hi_len <= sample_rate as usize);
    }

    /// Envelope stage times are never negative for valid velocities.
    #[test]
    fn envelope_times_are_non_negative(
        velocity in 0.0f32..=1.0,
        note in 0u8..=127,
        seed in any::<u64>(),
    ) {
        let mut rng = SeededRandom::new(seed);
        let env = shape_envelope(DEFAULT_ENVELOPE, velocity, note, &mut rng);
        prop_assert!(env.attack >= 0.0);
        prop_assert!(env.decay >= 0.0);
        prop_assert!(env.release >= 0.0);
        prop_assert!((0.0..=1.0).contains(&env.sustain));
    }

    /// A multi-oscillator voice produces finite, bounded output for any note.
    #[test]
    fn multi_osc_output_is_finite(
        note in 0u8..=127,
        velocity in 0.0f32..=1.0,
        seed in any::<u64>(),
    ) {
        let mut voice = MultiOscVoice::new(seed);
        voice.init(8000.0).unwrap();
        voice.start_note(note, velocity);

        let mut out = vec![0.0f32; 1024];
        voice.render_next_block(&mut [out.as_mut_slice()], 0, 1024);
        for &s in &out {
            prop_assert!(s.is_finite());
            prop_assert!(s.abs() < 4.0);
        }
    }

    /// Stopping without tail-off always idles the voice.
    #[test]
    fn hard_stop_always_idles(note in 0u8..=127, velocity in 0.0f32..=1.0, seed in any::<u64>()) {
        let mut voice = PulseVoice::new(seed);
        voice.init(8000.0).unwrap();
        voice.start_note(note, velocity);
        prop_assert_eq!(voice.state(), VoiceState::Sounding);
        voice.stop_note(false);
        prop_assert_eq!(voice.state(), VoiceState::Idle);
    }
}
