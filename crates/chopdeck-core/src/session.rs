//! Deck session - owns the control state and drives the backend
//!
//! The session is the single writer of all control state. Input
//! surfaces push [`SessionCommand`]s through the ring buffer, the host
//! calls [`DeckSession::process_commands`] and [`DeckSession::tick`]
//! from its update loop, and observers read the published
//! [`SessionAtomics`] without locking.

use std::sync::atomic::{AtomicBool, AtomicU32, AtomicU64, Ordering};
use std::sync::Arc;

use log::{error, info};
use rtrb::Consumer;

use crate::backend::{AudioBackend, EffectParam, TempoAnalyzer};
use crate::chop::ChopGesture;
use crate::clock::Clock;
use crate::command::SessionCommand;
use crate::config::SessionConfig;
use crate::crossfade::Crossfader;
use crate::mapper::{BrakeMapper, FlangerMapper, PhaserMapper};
use crate::sync::{load_material, LoadedMaterial};
use crate::tempo::TempoAuthority;
use crate::types::{beat_ms, ControlAxis, PlayState, SourceHandle, DEFAULT_BPM};

/// Lock-free mirror of the session state for UI threads.
///
/// All accesses are `Relaxed`: readers want a recent value, not a
/// synchronized one.
#[derive(Debug)]
pub struct SessionAtomics {
    crossfade_bits: AtomicU32,
    current_bpm_bits: AtomicU64,
    playing: AtomicBool,
    loaded: AtomicBool,
}

impl SessionAtomics {
    fn new() -> Arc<Self> {
        Arc::new(Self {
            crossfade_bits: AtomicU32::new(0.0f32.to_bits()),
            current_bpm_bits: AtomicU64::new(DEFAULT_BPM.to_bits()),
            playing: AtomicBool::new(false),
            loaded: AtomicBool::new(false),
        })
    }

    pub fn crossfade(&self) -> f32 {
        f32::from_bits(self.crossfade_bits.load(Ordering::Relaxed))
    }

    pub fn current_bpm(&self) -> f64 {
        f64::from_bits(self.current_bpm_bits.load(Ordering::Relaxed))
    }

    pub fn is_playing(&self) -> bool {
        self.playing.load(Ordering::Relaxed)
    }

    pub fn has_material(&self) -> bool {
        self.loaded.load(Ordering::Relaxed)
    }
}

/// The two-track chop session.
pub struct DeckSession<B, A, C> {
    backend: B,
    analyzer: A,
    clock: C,
    config: SessionConfig,
    tempo: TempoAuthority,
    fader: Crossfader,
    chop: ChopGesture,
    flanger: FlangerMapper,
    phaser: PhaserMapper,
    brake: BrakeMapper,
    material: Option<LoadedMaterial>,
    atomics: Arc<SessionAtomics>,
    last_tick_ms: f64,
}

impl<B, A, C> DeckSession<B, A, C>
where
    B: AudioBackend,
    A: TempoAnalyzer,
    C: Clock,
{
    pub fn new(backend: B, analyzer: A, clock: C, config: SessionConfig) -> Self {
        let fader = Crossfader::new(config.crossfade_floor_db);
        let chop = ChopGesture::new(config.chop_unit_beats);
        let last_tick_ms = clock.now_ms();
        Self {
            backend,
            analyzer,
            clock,
            config,
            tempo: TempoAuthority::default(),
            fader,
            chop,
            flanger: FlangerMapper::default(),
            phaser: PhaserMapper::default(),
            brake: BrakeMapper::default(),
            material: None,
            atomics: SessionAtomics::new(),
            last_tick_ms,
        }
    }

    /// Shared state handle for UI threads.
    pub fn atomics(&self) -> Arc<SessionAtomics> {
        Arc::clone(&self.atomics)
    }

    pub fn tempo(&self) -> &TempoAuthority {
        &self.tempo
    }

    pub fn crossfade_position(&self) -> f32 {
        self.fader.position()
    }

    pub fn material(&self) -> Option<&LoadedMaterial> {
        self.material.as_ref()
    }

    /// Drain and execute every queued command.
    pub fn process_commands(&mut self, commands: &mut Consumer<SessionCommand>) {
        while let Ok(command) = commands.pop() {
            self.handle_command(command);
        }
    }

    fn handle_command(&mut self, command: SessionCommand) {
        match command {
            SessionCommand::LoadSource(source) => self.load(source),
            SessionCommand::SetCurrentBpm(bpm) => {
                self.tempo.set_current_bpm(bpm);
                self.apply_tempo();
            }
            SessionCommand::ApplyTempoRatio(ratio) => {
                self.tempo.set_current_bpm(self.tempo.base_bpm() * ratio);
                self.apply_tempo();
            }
            SessionCommand::SetCrossfade(position) => {
                self.fader.set_position(position);
                self.fader.apply(&mut self.backend);
            }
            SessionCommand::ChopPress => {
                let now = self.clock.now_ms();
                self.chop.press(now, self.tempo.current_bpm());
                self.flip();
            }
            SessionCommand::ChopRelease => {
                let now = self.clock.now_ms();
                if self.chop.release(now) {
                    self.flip();
                }
            }
            SessionCommand::Axis { axis, value } => self.handle_axis(axis, value),
            SessionCommand::Start => self.backend.start(),
            SessionCommand::Stop => self.backend.stop(),
        }
        self.publish();
    }

    /// Advance time-driven behavior: deferred chop flips and the brake
    /// spring. Call from the host update loop; for exact chop timing
    /// schedule an extra wakeup at [`DeckSession::next_deadline`].
    pub fn tick(&mut self) {
        let now = self.clock.now_ms();
        let dt = (now - self.last_tick_ms).max(0.0);
        self.last_tick_ms = now;

        if self.chop.poll(now) {
            self.flip();
        }
        self.brake.tick(dt, &mut self.backend);
        self.publish();
    }

    /// Deadline of the pending deferred chop flip, if any.
    pub fn next_deadline(&self) -> Option<f64> {
        self.chop.next_deadline()
    }

    fn load(&mut self, source: SourceHandle) {
        match load_material(
            source,
            &mut self.backend,
            &mut self.analyzer,
            &mut self.tempo,
            &mut self.fader,
            self.config.autoplay,
        ) {
            Ok(loaded) => {
                self.material = Some(loaded);
                // Establish the effective tempo over the fresh material
                self.apply_tempo();
            }
            Err(e) => error!("load failed: {}", e),
        }
    }

    fn flip(&mut self) {
        self.fader.flip();
        self.fader.apply(&mut self.backend);
    }

    /// Fan the effective tempo out to the backend. One direction only:
    /// the authority decides, the engine and the delay follow.
    fn apply_tempo(&mut self) {
        let bpm = self.tempo.current_bpm();
        self.backend.insert_tempo_marker(0.0, bpm);
        // Keep the delay locked to the beat
        self.backend
            .set_effect_param(EffectParam::DelayTimeMs, beat_ms(bpm) as f32);
        info!("effective tempo {:.2} BPM (ratio {:.3})", bpm, self.tempo.ratio());
    }

    fn handle_axis(&mut self, axis: ControlAxis, value: f32) {
        match axis {
            ControlAxis::LeftStickX => self.flanger.on_x(value, &mut self.backend),
            ControlAxis::LeftStickY => self.flanger.on_y(value, &mut self.backend),
            ControlAxis::RightStickX => self.phaser.on_x(value, &mut self.backend),
            ControlAxis::RightStickY => self.phaser.on_y(value, &mut self.backend),
            ControlAxis::BrakeTrigger => self.brake.on_trigger(value, &mut self.backend),
        }
    }

    fn publish(&self) {
        self.atomics
            .crossfade_bits
            .store(self.fader.position().to_bits(), Ordering::Relaxed);
        self.atomics
            .current_bpm_bits
            .store(self.tempo.current_bpm().to_bits(), Ordering::Relaxed);
        self.atomics
            .playing
            .store(self.backend.play_state() == PlayState::Playing, Ordering::Relaxed);
        self.atomics
            .loaded
            .store(self.material.is_some(), Ordering::Relaxed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::testutil::RecordingBackend;
    use crate::backend::FixedAnalyzer;
    use crate::clock::ManualClock;
    use crate::command::command_channel;
    use crate::types::{SourceHandle, TrackId};
    use std::path::PathBuf;

    fn session(
        bpm: Option<f64>,
    ) -> DeckSession<RecordingBackend, FixedAnalyzer, ManualClock> {
        let config = SessionConfig {
            autoplay: false,
            ..Default::default()
        };
        DeckSession::new(
            RecordingBackend::default(),
            FixedAnalyzer(bpm),
            ManualClock::new(),
            config,
        )
    }

    fn push_load(session: &mut DeckSession<RecordingBackend, FixedAnalyzer, ManualClock>) {
        let (mut tx, mut rx) = command_channel(8);
        tx.push(SessionCommand::LoadSource(SourceHandle::new(PathBuf::from(
            "loop.wav",
        ))))
        .unwrap();
        session.process_commands(&mut rx);
    }

    #[test]
    fn test_chop_press_flips_immediately() {
        let mut s = session(Some(120.0));
        assert_eq!(s.crossfade_position(), 0.0);

        s.handle_command(SessionCommand::ChopPress);
        assert_eq!(s.crossfade_position(), 1.0);
        // Track B at unity, track A pushed to the floor
        assert!(s.backend.volumes_db[TrackId::A.index()].unwrap() <= -60.0);
    }

    #[test]
    fn test_short_chop_returns_on_the_beat() {
        // 120 bpm -> 500 ms minimum hold
        let mut s = session(Some(120.0));

        s.handle_command(SessionCommand::ChopPress);
        s.clock.set(200.0);
        s.handle_command(SessionCommand::ChopRelease);
        assert_eq!(s.crossfade_position(), 1.0);

        s.clock.set(499.0);
        s.tick();
        assert_eq!(s.crossfade_position(), 1.0);

        s.clock.set(501.0);
        s.tick();
        assert_eq!(s.crossfade_position(), 0.0);
    }

    #[test]
    fn test_long_chop_returns_on_release() {
        let mut s = session(Some(120.0));

        s.handle_command(SessionCommand::ChopPress);
        s.clock.set(600.0);
        s.handle_command(SessionCommand::ChopRelease);
        assert_eq!(s.crossfade_position(), 0.0);
    }

    #[test]
    fn test_load_runs_full_sequence() {
        let mut s = session(Some(128.0));
        push_load(&mut s);

        let loaded = s.material().unwrap();
        assert_eq!(loaded.base_bpm, 128.0);
        assert!((loaded.offset_ms - 468.75).abs() < 1e-9);
        assert!((s.backend.positions_ms[TrackId::B.index()].unwrap() - 468.75).abs() < 1e-9);
        assert!(s.atomics.has_material());
        // Effective tempo pushed after the load
        assert_eq!(s.backend.tempo_markers.last(), Some(&(0.0, 128.0)));
    }

    #[test]
    fn test_tempo_ratio_applies_over_base() {
        let mut s = session(Some(100.0));
        push_load(&mut s);

        s.handle_command(SessionCommand::ApplyTempoRatio(1.25));
        assert_eq!(s.tempo().current_bpm(), 125.0);
        assert_eq!(s.backend.tempo_markers.last(), Some(&(0.0, 125.0)));
        // Delay resynced to the new beat length
        assert_eq!(
            s.backend.last_param(EffectParam::DelayTimeMs),
            Some(beat_ms(125.0) as f32)
        );
    }

    #[test]
    fn test_tempo_change_does_not_move_crossfader() {
        let mut s = session(Some(120.0));
        s.handle_command(SessionCommand::SetCrossfade(0.3));
        let volumes = s.backend.volumes_db;

        s.handle_command(SessionCommand::SetCurrentBpm(90.0));
        assert_eq!(s.crossfade_position(), 0.3);
        assert_eq!(s.backend.volumes_db, volumes);
    }

    #[test]
    fn test_axis_commands_reach_mappers() {
        let mut s = session(Some(120.0));
        s.handle_command(SessionCommand::Axis {
            axis: ControlAxis::RightStickX,
            value: 0.5,
        });
        assert_eq!(s.backend.last_param(EffectParam::PhaserRate), Some(5.0));
        assert_eq!(s.backend.last_param(EffectParam::PhaserFeedback), Some(0.5));
    }

    #[test]
    fn test_atomics_track_state() {
        let mut s = session(Some(120.0));
        let atomics = s.atomics();
        assert!(!atomics.is_playing());

        s.handle_command(SessionCommand::Start);
        s.handle_command(SessionCommand::SetCrossfade(0.7));
        assert!(atomics.is_playing());
        assert_eq!(atomics.crossfade(), 0.7);
        assert_eq!(atomics.current_bpm(), 120.0);
    }

    #[test]
    fn test_failed_load_keeps_session_usable() {
        let mut s = session(Some(120.0));
        s.backend.reject_sources = true;
        push_load(&mut s);
        assert!(s.material().is_none());
        assert!(!s.atomics.has_material());

        s.backend.reject_sources = false;
        push_load(&mut s);
        assert!(s.material().is_some());
    }
}
